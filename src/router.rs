//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router also owns the
//! things every request goes through before a handler sees it: decoding path
//! parameters, reading the body into memory under a size cap, and the access
//! log line.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use tracing::{info, warn};

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Default cap on a request body held in memory: 8 MiB.
pub const DEFAULT_MAX_BODY: usize = 8 << 20;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Every handler call receives a clone of the router's state `S`.
/// Registration methods return `self` so calls chain.
pub struct Router<S = ()> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: S,
    max_body: usize,
}

impl Router<()> {
    /// A router whose handlers need no state.
    pub fn new() -> Self {
        Self::with_state(())
    }
}

impl<S: Clone + Send + Sync + 'static> Router<S> {
    pub fn with_state(state: S) -> Self {
        Self { routes: HashMap::new(), state, max_body: DEFAULT_MAX_BODY }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax and match exactly one segment of
    /// the raw path, so an encoded `%2F` never splits a segment. The matched
    /// value is percent-decoded before `req.param("name")` sees it.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.boxed())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Post, path, handler)
    }

    /// Largest request body, in bytes, read into memory. Bigger bodies are
    /// answered with `413` before dispatch.
    pub fn max_body(mut self, bytes: usize) -> Self {
        self.max_body = bytes;
        self
    }

    /// Finds the handler for `method` + raw `path`. A parameter that does not
    /// decode to UTF-8 names nothing, so the lookup misses.
    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| {
                let value = percent_decode_str(v).decode_utf8().ok()?;
                Some((k.to_owned(), value.into_owned()))
            })
            .collect::<Option<_>>()?;
        Some((handler, params))
    }

    /// Routes one request and produces one response.
    ///
    /// Never fails: unknown routes become `404`, unsupported methods `405`,
    /// oversized bodies `413`. Generic over the body so tests can drive it
    /// with an in-memory `Full<Bytes>`.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: Body<Data = Bytes>,
        B::Error: StdError + Send + Sync + 'static,
    {
        let started = Instant::now();
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();

        let response = self.route(parts.method.as_str(), path.clone(), parts.headers, body).await;

        info!(
            method = %parts.method,
            path = %path,
            status = response.status_code(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "request"
        );
        response.into_inner()
    }

    async fn route<B>(
        &self,
        method: &str,
        path: String,
        headers: http::HeaderMap,
        body: B,
    ) -> Response
    where
        B: Body<Data = Bytes>,
        B::Error: StdError + Send + Sync + 'static,
    {
        let Ok(method) = method.parse::<Method>() else {
            return Response::status(Status::MethodNotAllowed);
        };
        let Some((handler, params)) = self.lookup(method, &path) else {
            return Response::status(Status::NotFound);
        };

        let body = match Limited::new(body, self.max_body).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                warn!(path = %path, limit = self.max_body, "request body over limit");
                return Response::status(Status::ContentTooLarge);
            }
            Err(e) => {
                warn!(path = %path, "failed to read request body: {e}");
                return Response::status(Status::BadRequest);
            }
        };

        handler(self.state.clone(), Request::new(method, path, headers, body, params)).await
    }
}

impl Default for Router<()> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo_param(_: (), req: Request) -> Response {
        Response::text(req.param("name").unwrap_or("-").to_owned())
    }

    async fn echo_len(_: (), req: Request) -> Response {
        Response::text(req.body().len().to_string())
    }

    fn request(method: &str, uri: &str, body: &'static [u8]) -> http::Request<Full<Bytes>> {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from_static(body)))
            .unwrap()
    }

    async fn body_of(res: http::Response<Full<Bytes>>) -> Bytes {
        res.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn lookup_extracts_single_segment_param() {
        let router = Router::new().get("/download/{name}", echo_param);
        let (_, params) = router.lookup(Method::Get, "/download/a.txt").unwrap();
        assert_eq!(params["name"], "a.txt");
        assert!(router.lookup(Method::Get, "/download/a/b.txt").is_none());
        assert!(router.lookup(Method::Post, "/download/a.txt").is_none());
    }

    #[test]
    fn params_are_percent_decoded_after_matching() {
        let router = Router::new().get("/download/{name}", echo_param);

        let (_, params) = router.lookup(Method::Get, "/download/my%20report.txt").unwrap();
        assert_eq!(params["name"], "my report.txt");

        let (_, params) = router.lookup(Method::Get, "/download/r%C3%A9sum%C3%A9.pdf").unwrap();
        assert_eq!(params["name"], "résumé.pdf");

        // Encoded separators stay inside the one segment they were sent in.
        let (_, params) = router.lookup(Method::Get, "/download/a%2Fb").unwrap();
        assert_eq!(params["name"], "a/b");
    }

    #[tokio::test]
    async fn undecodable_param_is_404() {
        let router = Router::new().get("/download/{name}", echo_param);
        assert!(router.lookup(Method::Get, "/download/%FF").is_none());

        let res = router.handle(request("GET", "/download/%FF%FE", b"")).await;
        assert_eq!(res.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn handlers_receive_router_state() {
        async fn answer(state: u32, _req: Request) -> String {
            state.to_string()
        }
        let router = Router::with_state(42u32).get("/answer", answer);
        let res = router.handle(request("GET", "/answer", b"")).await;
        assert_eq!(body_of(res).await, "42");
    }

    #[tokio::test]
    async fn dispatches_to_matching_handler() {
        let router = Router::new().get("/download/{name}", echo_param);
        let res = router.handle(request("GET", "/download/report.txt", b"")).await;
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(body_of(res).await, "report.txt");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let router = Router::new().get("/ping", echo_len);
        let res = router.handle(request("GET", "/nope", b"")).await;
        assert_eq!(res.status().as_u16(), 404);
        assert_eq!(body_of(res).await, "404 page not found");

        let res = router.handle(request("POST", "/ping", b"")).await;
        assert_eq!(res.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn unsupported_method_is_405() {
        let router = Router::new().get("/ping", echo_len);
        let res = router.handle(request("PURGE", "/ping", b"")).await;
        assert_eq!(res.status().as_u16(), 405);
    }

    #[tokio::test]
    async fn body_over_limit_is_413() {
        let router = Router::new().post("/upload", echo_len).max_body(4);
        let res = router.handle(request("POST", "/upload", b"12345")).await;
        assert_eq!(res.status().as_u16(), 413);

        let res = router.handle(request("POST", "/upload", b"1234")).await;
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(body_of(res).await, "4");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_route_panics() {
        let _ = Router::new()
            .get("/download/{a}", echo_param)
            .get("/download/{b}", echo_param);
    }
}
