//! Uploaded file handles and their backing storage.
//!
//! Each [`UploadedFile`] owns its content: small uploads stay in memory,
//! larger ones are written into the directory provisioned by an
//! [`UploadStorage`] for the request. Storage is released only by an
//! explicit [`UploadedFile::dispose`] call.

use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ParamError;

/// Strategy providing the directory that receives uploaded file content.
///
/// Invoked at most once per multipart request, before the body is
/// decomposed. Closures returning `io::Result<PathBuf>` implement it.
///
/// # Example
///
/// ```rust
/// use hermes_params::UploadStorage;
/// use std::path::PathBuf;
///
/// let storage = || -> std::io::Result<PathBuf> { Ok(PathBuf::from("/srv/uploads")) };
/// assert_eq!(storage.provision().unwrap(), PathBuf::from("/srv/uploads"));
/// ```
pub trait UploadStorage: Send + Sync {
    /// Provisions and returns the directory for this request's uploads.
    fn provision(&self) -> io::Result<PathBuf>;
}

impl<F> UploadStorage for F
where
    F: Fn() -> io::Result<PathBuf> + Send + Sync,
{
    fn provision(&self) -> io::Result<PathBuf> {
        self()
    }
}

/// Upload storage rooted at a fixed directory, created on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempDirStorage {
    root: PathBuf,
}

impl TempDirStorage {
    /// Creates storage rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates storage rooted at the OS temp directory.
    #[must_use]
    pub fn system() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for TempDirStorage {
    fn default() -> Self {
        Self::system()
    }
}

impl UploadStorage for TempDirStorage {
    fn provision(&self) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        Ok(self.root.clone())
    }
}

/// Where the content of an uploaded file lives.
#[derive(Debug, PartialEq, Eq)]
pub enum FileContent {
    /// Content held in memory.
    InMemory(Bytes),
    /// Content written to a file owned by the handle.
    OnDisk(PathBuf),
}

/// A file received in a multipart request.
///
/// Handles are not `Clone`: each one exclusively owns its backing storage
/// until [`dispose`](Self::dispose) is called. Dropping an undisposed
/// on-disk handle leaks the file.
#[derive(Debug)]
pub struct UploadedFile {
    original_name: String,
    mime_type: Option<String>,
    size: usize,
    content: FileContent,
    disposed: bool,
}

impl UploadedFile {
    /// Creates an in-memory upload.
    #[must_use]
    pub fn in_memory(
        original_name: impl Into<String>,
        mime_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            original_name: original_name.into(),
            mime_type,
            size: data.len(),
            content: FileContent::InMemory(data),
            disposed: false,
        }
    }

    /// Stores `data` in memory when it fits `threshold`, otherwise in a new
    /// file inside `dir`.
    pub(crate) async fn receive(
        original_name: String,
        mime_type: Option<String>,
        data: Bytes,
        dir: &Path,
        threshold: usize,
    ) -> Result<Self, ParamError> {
        if data.len() <= threshold {
            return Ok(Self::in_memory(original_name, mime_type, data));
        }

        let path = dir.join(format!("upload_{}.tmp", Uuid::now_v7()));
        if let Err(e) = tokio::fs::write(&path, &data).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(ParamError::decoding(format!(
                "failed to store uploaded file '{original_name}': {e}"
            )));
        }
        debug!(file = %original_name, path = %path.display(), size = data.len(), "stored upload on disk");

        Ok(Self {
            original_name,
            mime_type,
            size: data.len(),
            content: FileContent::OnDisk(path),
            disposed: false,
        })
    }

    /// Returns the file name supplied by the client.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Returns the declared MIME type.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Returns the content size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns where the content lives.
    #[must_use]
    pub fn content(&self) -> &FileContent {
        &self.content
    }

    /// Returns the backing file path for on-disk uploads.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            FileContent::OnDisk(path) => Some(path),
            FileContent::InMemory(_) => None,
        }
    }

    /// Returns `true` if the content is held in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        matches!(self.content, FileContent::InMemory(_))
    }

    /// Returns `true` once the handle has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Reads the whole content.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle was disposed or the backing file
    /// cannot be read.
    pub fn read_bytes(&self) -> io::Result<Bytes> {
        if self.disposed {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("upload '{}' has been disposed", self.original_name),
            ));
        }
        match &self.content {
            FileContent::InMemory(data) => Ok(data.clone()),
            FileContent::OnDisk(path) => std::fs::read(path).map(Bytes::from),
        }
    }

    /// Get the file extension from the original name.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.original_name.rsplit_once('.').map(|(_, ext)| ext)
    }

    /// Validate the file against allowed MIME type prefixes.
    ///
    /// # Errors
    ///
    /// Returns an error if the MIME type is absent or not in the allowed list.
    pub fn validate_content_type(&self, allowed: &[&str]) -> Result<(), ParamError> {
        match &self.mime_type {
            Some(ct) if allowed.iter().any(|a| ct.starts_with(a)) => Ok(()),
            Some(ct) => Err(ParamError::out_of_bounds(
                &self.original_name,
                format!("invalid content type '{ct}', expected one of: {allowed:?}"),
            )),
            None => Err(ParamError::out_of_bounds(
                &self.original_name,
                "missing content type",
            )),
        }
    }

    /// Validate the file size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file size exceeds `max_bytes`.
    pub fn validate_size(&self, max_bytes: usize) -> Result<(), ParamError> {
        if self.size > max_bytes {
            Err(ParamError::payload_too_large(max_bytes, self.size))
        } else {
            Ok(())
        }
    }

    /// Releases the backing storage. Calling it again is a no-op.
    ///
    /// A backing file that is already gone is not an error; other removal
    /// failures are logged.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        match &mut self.content {
            FileContent::InMemory(data) => *data = Bytes::new(),
            FileContent::OnDisk(path) => match std::fs::remove_file(&*path) {
                Ok(()) => debug!(path = %path.display(), "released uploaded file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to release uploaded file");
                }
            },
        }
    }
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        if let (false, FileContent::OnDisk(path)) = (self.disposed, &self.content) {
            warn!(path = %path.display(), file = %self.original_name, "uploaded file dropped without dispose");
        }
    }
}
