//! In-process HTTP server for integration tests
//!
//! Serves canned responses by path over plain HTTP/1.1 and records every
//! request it sees. Each connection answers one request and closes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Canned response for one path
#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// Sleep before the response head
    pub delay: Duration,
    /// Sleep before each body byte; zero sends the body in one write
    pub trickle: Duration,
    pub location: Option<String>,
}

impl Route {
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
            delay: Duration::ZERO,
            trickle: Duration::ZERO,
            location: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/plain".to_string()),
            body: b"error".to_vec(),
            delay: Duration::ZERO,
            trickle: Duration::ZERO,
            location: None,
        }
    }

    /// Redirect with `status` to `location`
    pub fn redirect(status: u16, location: &str) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
            delay: Duration::ZERO,
            trickle: Duration::ZERO,
            location: Some(location.to_string()),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Send the head at once, then the body one byte per `interval`
    pub fn trickled(mut self, interval: Duration) -> Self {
        self.trickle = interval;
        self
    }
}

/// Request as seen by the server
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub headers: HashMap<String, String>,
}

#[derive(Default)]
struct State {
    routes: HashMap<String, Route>,
    requests: Vec<SeenRequest>,
}

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(State::default()));

        let accept_state = state.clone();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, accept_state.clone()));
            }
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Register (or replace) the response for `path`
    pub fn route(&self, path: &str, route: Route) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(path.to_string(), route);
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Number of requests received for `path`
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(mut stream: TcpStream, state: Arc<Mutex<State>>) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };

    let route = {
        let mut state = state.lock().unwrap();
        state.requests.push(request.clone());
        state.routes.get(&request.path).cloned()
    };
    let route = route.unwrap_or_else(|| Route::status(404));

    if !route.delay.is_zero() {
        tokio::time::sleep(route.delay).await;
    }

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        reason_phrase(route.status),
        route.body.len()
    );
    if let Some(content_type) = &route.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    if let Some(location) = &route.location {
        head.push_str(&format!("Location: {}\r\n", location));
    }
    head.push_str("\r\n");

    if stream.write_all(head.as_bytes()).await.is_err() {
        return;
    }

    if route.trickle.is_zero() {
        let _ = stream.write_all(&route.body).await;
    } else {
        for byte in &route.body {
            tokio::time::sleep(route.trickle).await;
            if stream.write_all(&[*byte]).await.is_err() {
                return;
            }
            let _ = stream.flush().await;
        }
    }
    let _ = stream.shutdown().await;
}

async fn read_request(stream: &mut TcpStream) -> Option<SeenRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines = text.split("\r\n");
    let path = lines.next()?.split_whitespace().nth(1)?.to_string();
    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    Some(SeenRequest { path, headers })
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Build an extended M3U document from `(directive, url)` pairs
pub fn master_playlist(entries: &[(&str, &str)]) -> String {
    let mut text = String::from("#EXTM3U\n");
    for (directive, url) in entries {
        text.push_str(directive);
        text.push('\n');
        text.push_str(url);
        text.push('\n');
    }
    text
}
