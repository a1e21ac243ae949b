//! Upload and download handlers.

use std::sync::Arc;

use http::header::CONTENT_TYPE;
use tracing::{info, warn};

use crate::multipart;
use crate::storage::{base_name, Storage};
use crate::{Request, Response, Status};

/// `POST /upload` — stores the form's `file` part under its base name.
///
/// Both form and write failures answer `400`; the body carries the
/// underlying error text behind a `get form err:` or `upload file err:`
/// prefix.
pub async fn upload(storage: Arc<Storage>, req: Request) -> Response {
    let part = match multipart::file_part(req.header(CONTENT_TYPE.as_str()), req.body().clone()).await {
        Ok(part) => part,
        Err(e) => {
            warn!("upload rejected: {e}");
            return bad_request(format!("get form err: {e}"));
        }
    };

    let path = match storage.write(&part.file_name, &part.data).await {
        Ok(path) => path,
        Err(e) => {
            warn!(file = %part.file_name, "upload write failed: {e}");
            return bad_request(format!("upload file err: {e}"));
        }
    };

    info!(file = %part.file_name, path = %path.display(), bytes = part.data.len(), "stored upload");
    Response::text(format!(
        "File {} uploaded successfully with fields as {}",
        part.file_name,
        path.display()
    ))
}

/// `GET /download/{filename}` — the stored bytes, typed by extension.
///
/// The name is the decoded path segment, used as is: a name that only
/// resolves after stripping directories (an encoded `a%2Fb`) is not found.
pub async fn download(storage: Arc<Storage>, req: Request) -> Response {
    let Some(name) = req.param("filename").filter(|n| base_name(n) == Some(*n)) else {
        return Response::status(Status::NotFound);
    };

    match storage.read(name).await {
        Ok(data) => {
            let mime = mime_guess::from_path(name).first_or_octet_stream();
            Response::builder().bytes(mime.essence_str(), data)
        }
        Err(e) if e.is_not_found() => Response::status(Status::NotFound),
        Err(e) => {
            warn!(file = %name, "download failed: {e}");
            Response::status(Status::InternalServerError)
        }
    }
}

fn bad_request(msg: String) -> Response {
    Response::builder().status(Status::BadRequest).text(msg)
}
