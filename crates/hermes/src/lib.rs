//! # Hermes
//!
//! **RPC-over-HTTP glue layer**
//!
//! Hermes sits between an HTTP server and business services:
//!
//! - **Typed parameters**: every request is normalized into a
//!   [`RequestParams`](params::RequestParams) store with validated accessors
//!   for dates, integers, strings, enums, booleans and indexed lists
//! - **Uploads**: multipart files are kept in memory or spilled to disk and
//!   released by an explicit dispose
//! - **Service wiring**: a type-keyed container with modules, including a
//!   persistence context binding
//! - **Layered configuration** and structured logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hermes::prelude::*;
//!
//! struct ListImages {
//!     page: i32,
//!     tags: Vec<String>,
//! }
//!
//! impl FromParams for ListImages {
//!     fn from_params(params: &RequestParams) -> Result<Self, ParamError> {
//!         Ok(Self {
//!             page: params.get_as_int_or("page", 1, 1000, 1)?,
//!             tags: params.get_as_list_of_strings("tags"),
//!         })
//!     }
//! }
//!
//! async fn handle(request: InboundRequest, config: &HermesConfig) -> Result<(), ParamError> {
//!     let mut params = RequestParams::parse(&request, &config.params).await?;
//!     let result = ListImages::from_params(&params);
//!     params.dispose();
//!     let query = result?;
//!     // dispatch to the business service...
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use hermes_config as config;
pub use hermes_core as core;
pub use hermes_params as params;
pub use hermes_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```rust
/// use hermes::prelude::*;
///
/// let config = HermesConfig::default();
/// assert!(config.validate().is_ok());
/// ```
pub mod prelude {
    pub use hermes_config::{ConfigError, ConfigLoader, HermesConfig};
    pub use hermes_core::{
        Container, Inject, InjectionError, Module, Persistence, PersistenceContext,
        PersistenceModule,
    };
    pub use hermes_params::{
        DateFormat, FromParams, InboundRequest, ParamError, ParamErrorKind, ParamsConfig,
        RequestParams, UploadStorage, UploadedFile,
    };
    pub use hermes_telemetry::{init_logging, LogConfig};
}
