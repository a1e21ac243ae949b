//! Stateful handlers.
//!
//! A handler is any `Fn(S, Request) -> impl Future<Output = impl IntoResponse>`,
//! where `S` is the router's state (for this service, the `Arc<Storage>`).
//! The router hands every call its own clone of the state, so handlers stay
//! plain `async fn`s and tests swap the state for one rooted in a temp dir.
//!
//! Registered handlers are boxed into one shape so a single radix tree can
//! hold all of them:
//!
//! ```text
//! files::upload : async fn(Arc<Storage>, Request) -> Response
//!        ↓ Handler::boxed
//! Arc<dyn Fn(Arc<Storage>, Request) -> BoxFuture>
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A handler after boxing, as stored in the route table.
pub type BoxedHandler<S> = Arc<dyn Fn(S, Request) -> BoxFuture + Send + Sync + 'static>;

/// Anything the router accepts as a route handler for state `S`.
pub trait Handler<S>: Send + Sync + 'static {
    fn boxed(self) -> BoxedHandler<S>;
}

impl<S, F, Fut, R> Handler<S> for F
where
    S: 'static,
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn boxed(self) -> BoxedHandler<S> {
        Arc::new(move |state: S, req: Request| -> BoxFuture {
            let fut = self(state, req);
            Box::pin(async move { fut.await.into_response() })
        })
    }
}
