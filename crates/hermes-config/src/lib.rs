//! Typed configuration for Hermes.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`HermesConfig`] holds two sections:
//!
//! - [`ParamsConfig`] - Request parameter parsing (date format, upload limits, upload directory)
//! - [`LoggingConfig`] - Log level and output format
//!
//! # Example
//!
//! ```no_run
//! use hermes_config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("hermes.toml")?
//!     .with_env_prefix("HERMES")
//!     .load()?;
//!
//! hermes_telemetry::init_logging(&config.logging.to_log_config())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [params]
//! date_format = "%Y-%m-%dT%H:%M:%S"
//! size_threshold = 10240
//! max_body_size = 52428800
//! max_field_size = 10485760
//! max_fields = 100
//! upload_dir = "/var/lib/hermes/uploads"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables named `PREFIX__SECTION__KEY`:
//!
//! - `HERMES__PARAMS__UPLOAD_DIR=/tmp/uploads`
//! - `HERMES__PARAMS__SIZE_THRESHOLD=4096`
//! - `HERMES__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{HermesConfig, HermesConfigBuilder};
pub use error::ConfigError;
pub use hermes_params::ParamsConfig;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig};
