//! A real TCP round trip through `Server`, then a graceful stop.

use std::sync::Arc;

use depot::{Server, Storage};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

async fn raw_request(addr: std::net::SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn serves_over_tcp_and_drains_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let app = depot::app(Arc::new(Storage::new(dir.path())));

    let server = Server::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = server.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve_with_shutdown(app, async move {
        let _ = stop_rx.await;
    }));

    let ping = raw_request(addr, b"GET /ping HTTP/1.1\r\nHost: t\r\nConnection: close\r\n\r\n").await;
    assert!(ping.starts_with("HTTP/1.1 200 OK\r\n"), "{ping}");
    assert!(ping.ends_with(r#"{"message":"pong"}"#), "{ping}");

    let body = "--b\r\nContent-Disposition: form-data; name=\"file\"; filename=\"test1\"\r\n\r\nhello world!\r\n--b--\r\n";
    let upload = format!(
        "POST /upload HTTP/1.1\r\nHost: t\r\nConnection: close\r\n\
         Content-Type: multipart/form-data; boundary=b\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    let res = raw_request(addr, upload.as_bytes()).await;
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"), "{res}");

    let download = raw_request(addr, b"GET /download/test1 HTTP/1.1\r\nHost: t\r\nConnection: close\r\n\r\n").await;
    assert!(download.starts_with("HTTP/1.1 200 OK\r\n"), "{download}");
    assert!(download.ends_with("\r\n\r\nhello world!"), "{download}");

    let missing = raw_request(addr, b"GET /missing HTTP/1.1\r\nHost: t\r\nConnection: close\r\n\r\n").await;
    assert!(missing.starts_with("HTTP/1.1 404 Not Found\r\n"), "{missing}");

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn bind_reports_address_in_use() {
    let first = Server::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = first.local_addr().unwrap();
    assert!(Server::bind(addr).await.is_err());
}
