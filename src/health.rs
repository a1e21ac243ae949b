//! Liveness probe.
//!
//! If the process can answer HTTP at all it is alive, so the handler has no
//! dependencies and never fails.

use serde::Serialize;

use crate::Request;
use crate::response::Json;

#[derive(Serialize)]
pub struct Pong {
    message: &'static str,
}

/// `GET /ping` — always `200` with `{"message":"pong"}`. Works with any
/// router state and reads none of it.
pub async fn ping<S>(_state: S, _req: Request) -> Json<Pong> {
    Json(Pong { message: "pong" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::IntoResponse;

    #[tokio::test]
    async fn ping_ignores_state_and_request() {
        let req = Request::new(
            crate::Method::Get,
            "/ping".to_owned(),
            http::HeaderMap::new(),
            bytes::Bytes::from_static(b"anything"),
            Default::default(),
        );
        let res = ping((), req).await.into_response();
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), br#"{"message":"pong"}"#);
    }
}
