//! Parameter error types.
//!
//! Every failure raised while decoding a request or reading a typed value
//! out of a [`RequestParams`](crate::RequestParams) store is a [`ParamError`].
//! Accessor failures name the offending parameter, and enum failures also
//! name the target enumeration, so the dispatch layer can turn them into a
//! client-facing error response.

use http::StatusCode;
use std::fmt;

/// Category of a [`ParamError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamErrorKind {
    /// A mandatory parameter is absent.
    Missing,
    /// A present value cannot be parsed as the requested type.
    Malformed,
    /// A value violates a configured length or range bound.
    OutOfBounds,
    /// The request body could not be decomposed.
    Decoding,
    /// The request body or one of its parts exceeds a configured limit.
    PayloadTooLarge,
}

impl fmt::Display for ParamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Malformed => write!(f, "malformed"),
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::Decoding => write!(f, "decoding"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
        }
    }
}

/// Error raised while parsing a request or reading one of its parameters.
///
/// # Example
///
/// ```rust
/// use hermes_params::{ParamError, ParamErrorKind};
/// use http::StatusCode;
///
/// let err = ParamError::missing("user_id");
/// assert_eq!(err.kind(), ParamErrorKind::Missing);
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.parameter(), Some("user_id"));
/// assert!(err.to_string().contains("user_id"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    kind: ParamErrorKind,
    parameter: Option<String>,
    target_type: Option<&'static str>,
    message: String,
}

impl ParamError {
    /// Creates an error for a mandatory parameter that is absent.
    #[must_use]
    pub fn missing(parameter: impl Into<String>) -> Self {
        let parameter = parameter.into();
        Self {
            kind: ParamErrorKind::Missing,
            message: format!("missing mandatory parameter: {parameter}"),
            parameter: Some(parameter),
            target_type: None,
        }
    }

    /// Creates an error for a value that cannot be parsed.
    #[must_use]
    pub fn malformed(parameter: impl Into<String>, details: impl Into<String>) -> Self {
        let parameter = parameter.into();
        let details = details.into();
        Self {
            kind: ParamErrorKind::Malformed,
            message: format!("invalid value of parameter '{parameter}': {details}"),
            parameter: Some(parameter),
            target_type: None,
        }
    }

    /// Creates an error for a value that is not a member of `target_type`.
    #[must_use]
    pub fn malformed_enum(parameter: impl Into<String>, target_type: &'static str) -> Self {
        let parameter = parameter.into();
        Self {
            kind: ParamErrorKind::Malformed,
            message: format!(
                "could not determine value of parameter '{parameter}' for enum type {target_type}"
            ),
            parameter: Some(parameter),
            target_type: Some(target_type),
        }
    }

    /// Creates an error for a value outside its configured bounds.
    #[must_use]
    pub fn out_of_bounds(parameter: impl Into<String>, details: impl Into<String>) -> Self {
        let parameter = parameter.into();
        let details = details.into();
        Self {
            kind: ParamErrorKind::OutOfBounds,
            message: format!("value of parameter '{parameter}' out of bounds: {details}"),
            parameter: Some(parameter),
            target_type: None,
        }
    }

    /// Creates an error for a request body that cannot be decoded.
    #[must_use]
    pub fn decoding(details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            kind: ParamErrorKind::Decoding,
            message: format!("failed to decode request: {details}"),
            parameter: None,
            target_type: None,
        }
    }

    /// Creates an error for a payload that's too large.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            kind: ParamErrorKind::PayloadTooLarge,
            message: format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
            parameter: None,
            target_type: None,
        }
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ParamErrorKind {
        self.kind
    }

    /// Returns the offending parameter name, if any.
    #[must_use]
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    /// Returns the target enumeration type name for enum lookup failures.
    #[must_use]
    pub fn target_type(&self) -> Option<&'static str> {
        self.target_type
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ParamErrorKind::Missing | ParamErrorKind::Malformed | ParamErrorKind::Decoding => {
                StatusCode::BAD_REQUEST
            }
            ParamErrorKind::OutOfBounds => StatusCode::UNPROCESSABLE_ENTITY,
            ParamErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ParamErrorKind::Missing => "MISSING_PARAMETER",
            ParamErrorKind::Malformed => "INVALID_PARAMETER",
            ParamErrorKind::OutOfBounds => "VALIDATION_FAILED",
            ParamErrorKind::Decoding => "DECODING_FAILED",
            ParamErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
        }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParamError {}
