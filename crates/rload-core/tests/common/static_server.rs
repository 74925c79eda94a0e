//! Minimal HTTP/1.1 server serving a fixed set of paths for integration tests.
//!
//! Known paths get 200 with their body; anything else gets 404. Every GET is
//! counted per path so tests can assert how often a resource was fetched.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub struct StaticServer {
    pub base_url: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl StaticServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn hits(&self, path: &str) -> usize {
        let key = format!("/{}", path.trim_start_matches('/'));
        self.hits.lock().unwrap().get(&key).copied().unwrap_or(0)
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(files: &[(&str, &str)]) -> StaticServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files: Arc<HashMap<String, Vec<u8>>> = Arc::new(
        files
            .iter()
            .map(|(p, b)| (format!("/{}", p.trim_start_matches('/')), b.as_bytes().to_vec()))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &files, &hits));
        }
    });
    StaticServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    files: &HashMap<String, Vec<u8>>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    *hits.lock().unwrap().entry(path.clone()).or_default() += 1;
    match files.get(&path) {
        Some(body) => {
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body);
        }
        None => {
            let _ = stream
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        }
    }
}
