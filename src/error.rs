//! Error types.
//!
//! Application-level failures (bad form, missing file) become HTTP responses
//! inside the handler that hit them. Only [`Error`] ever leaves the server.

use thiserror::Error;

/// Infrastructure failures: binding the listen socket, accepting connections.
#[derive(Error, Debug)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to pull the `file` part out of an upload request.
#[derive(Error, Debug)]
pub enum FormError {
    /// The request did not declare a multipart content type.
    #[error("request Content-Type isn't multipart/form-data")]
    NotMultipart,

    /// The body is not valid multipart, or a part could not be read.
    #[error(transparent)]
    Multipart(#[from] multer::Error),

    /// The form parsed, but carries no file part named `file`.
    #[error("http: no such file")]
    MissingFile,
}

/// Failure to map a caller-supplied name onto the storage directory, or to
/// read/write the resulting file.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The name has no usable final segment (`""`, `.`, `..`, `dir/`).
    #[error("invalid file name `{0}`")]
    InvalidName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// `true` when the target simply does not exist as a regular file.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::InvalidName(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
        }
    }
}
