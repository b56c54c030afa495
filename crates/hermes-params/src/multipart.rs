//! Multipart body decomposition.
//!
//! [`Multipart`] splits a `multipart/form-data` body into [`Field`]s using
//! `multer`, enforcing the size and field-count limits of [`ParamsConfig`].
//!
//! # Example
//!
//! ```rust,ignore
//! let mut multipart = Multipart::new(request.headers(), request.body().clone(), &config)?;
//! while let Some(field) = multipart.next_field().await? {
//!     match field.file_name() {
//!         Some(file_name) => println!("file {file_name}"),
//!         None => println!("field = {}", field.text().await?),
//!     }
//! }
//! ```

use bytes::Bytes;
use http::{header, HeaderMap};
use std::io;

use crate::{ParamError, ParamsConfig};

/// Returns `true` if the Content-Type header announces a multipart body.
#[must_use]
pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| {
            v.trim_start()
                .get(..10)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("multipart/"))
        })
}

/// A multipart body being decomposed into fields.
pub struct Multipart {
    inner: multer::Multipart<'static>,
    max_field_size: usize,
    max_fields: usize,
    field_count: usize,
}

impl Multipart {
    /// Create a new multipart reader from request components.
    ///
    /// # Errors
    ///
    /// Returns an error if the Content-Type header is missing or carries no
    /// boundary, or if the body exceeds `config.max_body_size`.
    pub fn new(headers: &HeaderMap, body: Bytes, config: &ParamsConfig) -> Result<Self, ParamError> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .ok_or_else(|| ParamError::decoding("missing Content-Type header"))?
            .to_str()
            .map_err(|_| ParamError::decoding("invalid UTF-8 in Content-Type header"))?;

        let boundary = multer::parse_boundary(content_type).map_err(|_| {
            ParamError::decoding("missing or invalid boundary in multipart Content-Type")
        })?;

        if body.len() > config.max_body_size {
            return Err(ParamError::payload_too_large(
                config.max_body_size,
                body.len(),
            ));
        }

        let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
        let inner = multer::Multipart::new(stream, boundary);

        Ok(Self {
            inner,
            max_field_size: config.max_field_size,
            max_fields: config.max_fields,
            field_count: 0,
        })
    }

    /// Get the next field from the multipart stream.
    ///
    /// Returns `None` when all fields have been processed.
    ///
    /// # Errors
    ///
    /// Returns an error if the maximum number of fields is exceeded or the
    /// multipart data is malformed.
    pub async fn next_field(&mut self) -> Result<Option<Field>, ParamError> {
        match self.inner.next_field().await {
            Ok(Some(field)) => {
                if self.field_count >= self.max_fields {
                    return Err(ParamError::decoding(format!(
                        "too many multipart fields (max {})",
                        self.max_fields
                    )));
                }
                self.field_count += 1;
                Ok(Some(Field::new(field, self.max_field_size)))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(ParamError::decoding(format!("multipart parse error: {e}"))),
        }
    }

    /// Returns the number of fields read so far.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.field_count
    }
}

impl std::fmt::Debug for Multipart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multipart")
            .field("max_field_size", &self.max_field_size)
            .field("max_fields", &self.max_fields)
            .field("field_count", &self.field_count)
            .finish_non_exhaustive()
    }
}

/// A single part of a multipart body.
///
/// A part carrying a file name is a file upload; any other part is a
/// simple form field.
pub struct Field {
    inner: multer::Field<'static>,
    max_size: usize,
}

impl Field {
    fn new(inner: multer::Field<'static>, max_size: usize) -> Self {
        Self { inner, max_size }
    }

    /// Get the field name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    /// Get the client-supplied file name, if this part is a file upload.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.inner.file_name()
    }

    /// Get the declared Content-Type of this part.
    #[must_use]
    pub fn content_type(&self) -> Option<&mime::Mime> {
        self.inner.content_type()
    }

    /// Read the entire part as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the part exceeds the field size limit.
    pub async fn bytes(self) -> Result<Bytes, ParamError> {
        let bytes = self
            .inner
            .bytes()
            .await
            .map_err(|e| ParamError::decoding(format!("failed to read field: {e}")))?;

        if bytes.len() > self.max_size {
            return Err(ParamError::payload_too_large(self.max_size, bytes.len()));
        }

        Ok(bytes)
    }

    /// Read the part as UTF-8 text.
    ///
    /// Invalid sequences are replaced with U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the part is too large.
    pub async fn text(self) -> Result<String, ParamError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.inner.name())
            .field("file_name", &self.inner.file_name())
            .field("content_type", &self.inner.content_type())
            .field("max_size", &self.max_size)
            .finish()
    }
}
