//! Structured logging for Hermes services.
//!
//! Hermes crates emit events through `tracing`; this crate installs the
//! subscriber that renders them:
//!
//! - **JSON** output for production, one object per event
//! - **Pretty** output for development, with file and line info
//! - Filtering through `RUST_LOG` or the configured directives
//!
//! # Example
//!
//! ```rust,ignore
//! use hermes_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> hermes_telemetry::TelemetryResult<()> {
//!     init_logging(&LogConfig::production())?;
//!     tracing::info!("service started");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
