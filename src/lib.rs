//! # depot
//!
//! A tiny file drop service over HTTP.
//!
//! | Method | Path | |
//! |---|---|---|
//! | `POST` | `/upload` | multipart form, part `file`, stored under its base name |
//! | `GET` | `/download/{filename}` | stored bytes, content type by extension |
//! | `GET` | `/ping` | `{"message":"pong"}` |
//!
//! Files live as plain files in one directory. There is no index, no
//! locking and no metadata beyond what the filesystem keeps.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use depot::{Server, Storage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), depot::Error> {
//!     let app = depot::app(Arc::new(Storage::new("files")));
//!     Server::bind("0.0.0.0:8080".parse().unwrap()).await?.serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod files;
pub mod health;
pub mod multipart;
pub mod storage;

use std::sync::Arc;

pub use config::Config;
pub use error::{Error, FormError, StorageError};
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::{Router, DEFAULT_MAX_BODY};
pub use server::Server;
pub use status::Status;
pub use storage::Storage;

/// The service's route table, with handlers bound to `storage`.
pub fn app(storage: Arc<Storage>) -> Router<Arc<Storage>> {
    Router::with_state(storage)
        .post("/upload", files::upload)
        .get("/download/{filename}", files::download)
        .get("/ping", health::ping::<Arc<Storage>>)
}
