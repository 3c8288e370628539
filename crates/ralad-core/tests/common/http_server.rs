//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed route table: each path maps to a canned response. Unknown
//! paths get 404. Every connection is closed after one response.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Declared Content-Length when it should differ from the body.
    pub content_length: Option<usize>,
}

impl Response {
    pub fn ok(body: &[u8]) -> Self {
        Self {
            status: "200 OK",
            headers: Vec::new(),
            body: body.to_vec(),
            content_length: None,
        }
    }

    pub fn redirect(status: &'static str, location: &str, body: &[u8]) -> Self {
        Self {
            status,
            headers: vec![("Location".to_string(), location.to_string())],
            body: body.to_vec(),
            content_length: None,
        }
    }

    /// Declares `len` bytes regardless of the body actually sent.
    pub fn declaring_length(mut self, len: usize) -> Self {
        self.content_length = Some(len);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A listener bound before its routes are known, so routes can point at
/// its own address.
pub struct Server {
    listener: TcpListener,
    pub base: String,
}

impl Server {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        Self {
            listener,
            base: format!("http://127.0.0.1:{}", port),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Serves `routes` in a background thread until the process exits.
    pub fn serve(self, routes: Vec<(&str, Response)>) -> String {
        let routes: HashMap<String, Response> = routes
            .into_iter()
            .map(|(path, resp)| (path.to_string(), resp))
            .collect();
        let routes = Arc::new(routes);
        let listener = self.listener;
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                thread::spawn(move || handle(stream, &routes));
            }
        });
        self.base
    }
}

fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let text = String::from_utf8_lossy(&data);
    let request_line = text.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(str::to_string)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Response>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let path = match read_request_path(&mut stream) {
        Some(p) => p,
        None => return,
    };
    let not_found = Response {
        status: "404 Not Found",
        headers: Vec::new(),
        body: b"not found".to_vec(),
        content_length: None,
    };
    let resp = routes.get(&path).unwrap_or(&not_found);

    let mut head = format!("HTTP/1.1 {}\r\n", resp.status);
    for (name, value) in &resp.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        resp.content_length.unwrap_or(resp.body.len())
    ));
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&resp.body);
    let _ = stream.flush();
}
