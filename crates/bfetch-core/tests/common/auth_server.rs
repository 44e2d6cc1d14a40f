//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one scripted response to every GET and records each request's
//! `Authorization` header so tests can assert on it.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    /// Advertised Content-Length; defaults to the real body length.
    pub content_length: Option<u64>,
}

impl Reply {
    pub fn ok(body: &[u8]) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
            content_length: None,
        }
    }

    pub fn status(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            body: body.to_vec(),
            content_length: None,
        }
    }
}

/// Handle to a running server. The server thread lives until the process exits.
#[derive(Clone)]
pub struct AuthServer {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Option<String>>>>,
}

impl AuthServer {
    /// URL for `path` on this server (path without leading slash).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `Authorization` header of each request received so far, in order.
    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

pub fn start(reply: Reply) -> AuthServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_srv = Arc::clone(&seen);
    let reply = Arc::new(reply);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let reply = Arc::clone(&reply);
            let seen = Arc::clone(&seen_srv);
            thread::spawn(move || handle(stream, &reply, &seen));
        }
    });
    AuthServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        seen,
    }
}

/// Returns a URL on a port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/artifact.bin", port)
}

fn handle(mut stream: std::net::TcpStream, reply: &Reply, seen: &Mutex<Vec<Option<String>>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    seen.lock().unwrap().push(authorization(&request));

    let advertised = reply.content_length.unwrap_or(reply.body.len() as u64);
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        advertised
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
}

fn authorization(request: &str) -> Option<String> {
    request
        .lines()
        .skip(1)
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.trim().to_string())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
