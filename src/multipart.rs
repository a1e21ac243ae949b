//! Extracting the uploaded file from a `multipart/form-data` body.

use std::convert::Infallible;

use bytes::{Bytes, BytesMut};
use futures::stream;
use multer::Multipart;

use crate::error::FormError;

/// Form field the upload handler reads.
pub const FILE_FIELD: &str = "file";

/// The `file` part of an upload form.
#[derive(Debug)]
pub struct FilePart {
    /// Filename exactly as the client declared it, directories included.
    pub file_name: String,
    pub data: Bytes,
}

/// Pulls the first part named `file` out of a multipart body.
///
/// The body is already in memory and bounded by the router, so the part is
/// buffered whole. Other parts are skipped. A `file` part without a filename,
/// or with an empty one, is a plain form value, not a file, and is skipped
/// as well.
pub async fn file_part(content_type: Option<&str>, body: Bytes) -> Result<FilePart, FormError> {
    let boundary = content_type
        .ok_or(FormError::NotMultipart)
        .and_then(|ct| multer::parse_boundary(ct).map_err(|_| FormError::NotMultipart))?;

    let body = stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = Multipart::new(body, boundary);

    while let Some(mut field) = multipart.next_field().await? {
        let file_name = match (field.name(), field.file_name()) {
            (Some(FILE_FIELD), Some(file_name)) if !file_name.is_empty() => file_name.to_owned(),
            _ => continue,
        };

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            data.extend_from_slice(&chunk);
        }
        return Ok(FilePart { file_name, data: data.freeze() });
    }

    Err(FormError::MissingFile)
}
