//! In-test HTTP fixture server.
//!
//! A minimal one-response-per-connection server on a loopback port. It
//! records every request (so tests can assert on headers and on the exact
//! number of network calls) and answers from a static route table keyed by
//! `"METHOD /path?query"`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// A canned response.
#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub set_cookies: Vec<&'static str>,
}

impl Route {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
            set_cookies: Vec::new(),
        }
    }

    pub fn html(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.to_string(),
            set_cookies: Vec::new(),
        }
    }

    pub fn redirect() -> Self {
        Self {
            status: 302,
            content_type: "text/html",
            body: String::new(),
            set_cookies: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, cookie: &'static str) -> Self {
        self.set_cookies.push(cookie);
        self
    }
}

/// The fixture server handle.
pub struct FixtureServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureServer {
    /// Binds a loopback port and starts serving `routes`.
    pub async fn start(routes: Vec<(&'static str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture server");
        let addr = listener.local_addr().expect("fixture server addr");

        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let task_hits = Arc::clone(&hits);
        let task_requests = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                task_hits.fetch_add(1, Ordering::SeqCst);

                let request = read_request(&mut stream).await;
                task_requests.lock().await.push(request.clone());

                let target = request
                    .lines()
                    .next()
                    .unwrap_or("")
                    .trim_end_matches(" HTTP/1.1")
                    .to_string();

                let response = routes
                    .iter()
                    .find(|(key, _)| *key == target)
                    .map_or_else(not_found, |(_, route)| render(route));

                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
            requests,
        }
    }

    /// Number of connections the server has accepted.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw requests received so far, head and body.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

/// Reads one full request (head plus `Content-Length` body) off the stream.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = find_head_end(&buffer) {
            break pos;
        }
        let Ok(n) = stream.read(&mut chunk).await else {
            return String::from_utf8_lossy(&buffer).into_owned();
        };
        if n == 0 {
            return String::from_utf8_lossy(&buffer).into_owned();
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buffer[..head_end]).into_owned();
    let content_length: usize = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())?
        })
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buffer.len() < body_start + content_length {
        let Ok(n) = stream.read(&mut chunk).await else {
            break;
        };
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}

fn render(route: &Route) -> String {
    let mut response = format!(
        "HTTP/1.1 {} Fixture\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        route.content_type,
        route.body.len()
    );
    for cookie in &route.set_cookies {
        response.push_str(&format!("Set-Cookie: {cookie}\r\n"));
    }
    response.push_str("\r\n");
    response.push_str(&route.body);
    response
}

fn not_found() -> String {
    "HTTP/1.1 404 Fixture\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
}
