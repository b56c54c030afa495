//! # Hermes Params
//!
//! Request parameter store for the Hermes RPC server.
//!
//! For every inbound request, [`RequestParams::parse`] normalizes the
//! parameters it carries into one store: URL query and form body values,
//! multipart text fields, and multipart file uploads. Business handlers then
//! read from the store through typed, validated accessors.
//!
//! ## Accessors
//!
//! | Accessor | Result | Validation |
//! |----------|--------|------------|
//! | [`get_as_date`](RequestParams::get_as_date) | `NaiveDateTime` | configured [`DateFormat`] |
//! | [`get_as_int`](RequestParams::get_as_int) | `i32` | numeric, inclusive bounds |
//! | [`get_as_string`](RequestParams::get_as_string) | `String` | length bounds in characters |
//! | [`get_as_enum`](RequestParams::get_as_enum) | any `Deserialize` enum | member name |
//! | [`get_as_boolean`](RequestParams::get_as_boolean) | `bool` | `"true"` ignoring case |
//! | [`get_as_list_of_strings`](RequestParams::get_as_list_of_strings) | `Vec<String>` | `name[i]` ordering |
//! | [`get_as_list_of_ints`](RequestParams::get_as_list_of_ints) | `Vec<i32>` | numeric elements |
//! | [`get_as_enums`](RequestParams::get_as_enums) | `Vec<T>` | member names |
//!
//! ## Example
//!
//! ```rust
//! use hermes_params::{InboundRequest, ParamsConfig, RequestParams};
//! use http::{Method, Uri};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let request = InboundRequest::builder()
//!     .method(Method::POST)
//!     .uri(Uri::from_static("/images/add?album=7"))
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body("title=Sunset&tags%5B0%5D=sea&tags%5B1%5D=sky")
//!     .build();
//!
//! let mut params = RequestParams::parse(&request, &ParamsConfig::default())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(params.get_as_int("album", 1, 1000, true).unwrap(), Some(7));
//! assert_eq!(params.get_as_string_or("title", 1, 64, "untitled").unwrap(), "Sunset");
//! assert_eq!(params.get_as_list_of_strings("tags"), ["sea", "sky"]);
//!
//! params.dispose();
//! # }
//! ```
//!
//! ## Uploaded files
//!
//! File parts of a multipart body become [`UploadedFile`] handles. Files up
//! to [`ParamsConfig::size_threshold`] bytes stay in memory; larger ones are
//! written to a directory supplied by an [`UploadStorage`]. The store owner
//! must call [`RequestParams::dispose`] once the response is produced.
//!
//! ## Error Handling
//!
//! All fallible accessors return [`ParamError`], which names the offending
//! parameter and maps to an HTTP status:
//!
//! ```rust
//! use hermes_params::ParamError;
//!
//! let err = ParamError::missing("user_id");
//! assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
//! assert_eq!(err.error_code(), "MISSING_PARAMETER");
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-params/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod date;
mod error;
mod extractor;
mod indexed;
pub mod multipart;
mod params;
mod request;
mod upload;

pub use config::{
    ParamsConfig, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_FIELDS, DEFAULT_MAX_FIELD_SIZE,
    DEFAULT_SIZE_THRESHOLD,
};
pub use date::{DateFormat, DEFAULT_DATE_PATTERN};
pub use error::{ParamError, ParamErrorKind};
pub use extractor::FromParams;
pub use params::RequestParams;
pub use request::{InboundRequest, InboundRequestBuilder};
pub use upload::{FileContent, TempDirStorage, UploadStorage, UploadedFile};
