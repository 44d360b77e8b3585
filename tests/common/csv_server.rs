//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every request with whatever status and body were last set, and
//! counts the requests it has seen.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: Vec<u8>,
    delay: Option<Duration>,
}

#[derive(Clone)]
pub struct CsvServer {
    url: String,
    reply: Arc<Mutex<Reply>>,
    hits: Arc<AtomicUsize>,
}

impl CsvServer {
    /// Start serving `body` with 200 OK on a background thread. The server
    /// runs until the process exits.
    pub fn start(body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let reply = Arc::new(Mutex::new(Reply {
            status: 200,
            body: body.as_bytes().to_vec(),
            delay: None,
        }));
        let hits = Arc::new(AtomicUsize::new(0));

        {
            let reply = Arc::clone(&reply);
            let hits = Arc::clone(&hits);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let current = reply.lock().unwrap().clone();
                    thread::spawn(move || handle(stream, current));
                }
            });
        }

        Self {
            url: format!("http://127.0.0.1:{}/data.csv", port),
            reply,
            hits,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn set_body(&self, body: &str) {
        let mut reply = self.reply.lock().unwrap();
        reply.status = 200;
        reply.body = body.as_bytes().to_vec();
    }

    pub fn set_status(&self, status: u16) {
        self.reply.lock().unwrap().status = status;
    }

    pub fn set_delay(&self, delay: Duration) {
        self.reply.lock().unwrap().delay = Some(delay);
    }
}

/// A URL on a port nothing is listening on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/data.csv", port)
}

fn handle(mut stream: TcpStream, reply: Reply) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    if let Some(delay) = reply.delay {
        thread::sleep(delay);
    }

    let reason = match reply.status {
        200 => "OK",
        300 => "Multiple Choices",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason,
        reply.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
    let _ = stream.flush();
}
