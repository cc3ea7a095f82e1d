//! Throwaway HTTP/1.1 server for fetch and session tests.

use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

use super::DashboardClient;

/// `(path, status, body)`; unknown paths answer 404.
pub(crate) type Route = (&'static str, u16, String);

type Responder = dyn Fn(&str) -> (Duration, u16, String) + Send + Sync;

/// Serve `routes` on 127.0.0.1 until the test runtime shuts down and return
/// the base URL.
pub(crate) async fn serve(routes: Vec<Route>) -> Url {
    serve_with(Arc::new(move |path: &str| {
        let (status, body) = routes
            .iter()
            .find(|(route, _, _)| *route == path)
            .map(|(_, status, body)| (*status, body.clone()))
            .unwrap_or((404, "{}".to_string()));
        (Duration::ZERO, status, body)
    }))
    .await
}

/// Answer the n-th request for `path` with the n-th `(delay, body)`, after
/// sleeping for `delay`. Requests past the list, or for other paths, get 404.
pub(crate) async fn serve_sequence(path: &'static str, responses: Vec<(Duration, String)>) -> Url {
    let seen = AtomicUsize::new(0);
    serve_with(Arc::new(move |requested: &str| {
        if requested != path {
            return (Duration::ZERO, 404, "{}".to_string());
        }
        match responses.get(seen.fetch_add(1, Ordering::SeqCst)) {
            Some((delay, body)) => (*delay, 200, body.clone()),
            None => (Duration::ZERO, 404, "{}".to_string()),
        }
    }))
    .await
}

async fn serve_with(respond: Arc<Responder>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
    let addr = listener.local_addr().expect("test server address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let respond = Arc::clone(&respond);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (delay, status, body) = respond(&path);
                tokio::time::sleep(delay).await;
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Url::parse(&format!("http://{addr}/")).expect("test server URL")
}

pub(crate) fn client_for(base: Url) -> DashboardClient {
    let http = Client::builder().no_proxy().build().expect("test HTTP client");
    DashboardClient::with_http(http, base)
}

/// A base URL nothing listens on.
pub(crate) async fn closed_port() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    Url::parse(&format!("http://{addr}/")).expect("closed port URL")
}
