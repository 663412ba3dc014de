//! Minimal threaded HTTP/1.1 server speaking the droppa endpoints, for integration tests.
//!
//! One request per connection (`Connection: close`). SSE endpoints write their
//! scripted `data:` messages and then close the stream. Every request line is
//! recorded so tests can assert on call order. Like the real server, progress
//! subscriptions without a `User-Agent` are answered with 400.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Progress percentages sent on every `/progress/<name>` stream.
    pub progress_events: Vec<u8>,
    /// File names whose progress endpoint answers 404.
    pub missing_progress: Vec<String>,
    /// Status and body for every upload endpoint.
    pub upload_status: u16,
    pub upload_body: String,
    /// Time the server spends "storing" each upload.
    pub upload_delay: Duration,
    /// Body of `/download-files` and `/download-files-mobile`.
    pub bundle: Vec<u8>,
    pub bundle_status: u16,
    /// Payload scripts for feed endpoints, keyed by path; connection N uses
    /// entry N (the last entry repeats). A missing path answers 404.
    pub feeds: HashMap<String, Vec<Vec<String>>>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            progress_events: vec![0, 50, 100],
            missing_progress: Vec::new(),
            upload_status: 200,
            upload_body: String::new(),
            upload_delay: Duration::from_millis(0),
            bundle: Vec::new(),
            bundle_status: 200,
            feeds: HashMap::new(),
        }
    }
}

#[derive(Default)]
struct Shared {
    hits: Mutex<Vec<String>>,
    user_agents: Mutex<Vec<Option<String>>>,
    uploads: Mutex<Vec<Vec<u8>>>,
    feed_connections: Mutex<HashMap<String, usize>>,
    uploads_in_flight: AtomicUsize,
    max_uploads_in_flight: AtomicUsize,
}

pub struct DroppaServer {
    pub url: String,
    shared: Arc<Shared>,
}

impl DroppaServer {
    /// Request lines seen so far, e.g. `GET /progress/a.txt`.
    pub fn hits(&self) -> Vec<String> {
        self.shared.hits.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.hits().iter().filter(|h| h.starts_with(prefix)).count()
    }

    /// `User-Agent` of each request, in the same order as [`DroppaServer::hits`].
    pub fn user_agents(&self) -> Vec<Option<String>> {
        self.shared.user_agents.lock().unwrap().clone()
    }

    /// Raw bodies of every upload request.
    pub fn uploads(&self) -> Vec<Vec<u8>> {
        self.shared.uploads.lock().unwrap().clone()
    }

    pub fn max_uploads_in_flight(&self) -> usize {
        self.shared.max_uploads_in_flight.load(Ordering::SeqCst)
    }
}

/// Starts the server on an ephemeral port; it runs until the process exits.
pub fn start(opts: ServerOptions) -> DroppaServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let shared = Arc::new(Shared::default());
    let opts = Arc::new(opts);
    {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let shared = Arc::clone(&shared);
                let opts = Arc::clone(&opts);
                thread::spawn(move || handle(stream, &opts, &shared));
            }
        });
    }
    DroppaServer {
        url: format!("http://127.0.0.1:{}", port),
        shared,
    }
}

struct Request {
    method: String,
    path: String,
    target: String,
    user_agent: Option<String>,
    body: Vec<u8>,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 8192];
    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut tmp).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let mut content_length = None;
    let mut chunked = false;
    let mut user_agent = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<usize>().ok();
            }
            if name.eq_ignore_ascii_case("user-agent") {
                user_agent = Some(value.trim().to_string());
            }
            if name.eq_ignore_ascii_case("transfer-encoding")
                && value.to_ascii_lowercase().contains("chunked")
            {
                chunked = true;
            }
        }
    }

    let mut body = buf[header_end..].to_vec();
    if let Some(len) = content_length {
        while body.len() < len {
            let n = stream.read(&mut tmp).ok()?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&tmp[..n]);
        }
        body.truncate(len);
    } else if chunked {
        while !body.ends_with(b"0\r\n\r\n") {
            let n = stream.read(&mut tmp).ok()?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&tmp[..n]);
        }
    }

    let path = target.split('?').next().unwrap_or("").to_string();
    Some(Request {
        method,
        path,
        target,
        user_agent,
        body,
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn respond(stream: &mut TcpStream, status: u16, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

fn respond_sse(stream: &mut TcpStream, payloads: &[String]) {
    let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n";
    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }
    for payload in payloads {
        let _ = stream.write_all(format!("data: {}\n\n", payload).as_bytes());
        let _ = stream.flush();
        thread::sleep(Duration::from_millis(5));
    }
    let _ = stream.shutdown(std::net::Shutdown::Both);
}

fn handle(mut stream: TcpStream, opts: &ServerOptions, shared: &Shared) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    {
        let mut hits = shared.hits.lock().unwrap();
        hits.push(format!("{} {}", req.method, req.target));
        shared.user_agents.lock().unwrap().push(req.user_agent.clone());
    }

    match (req.method.as_str(), req.path.as_str()) {
        ("GET", path) if path.starts_with("/progress/") => {
            if req.user_agent.is_none() {
                respond(&mut stream, 400, b"Request to `/` that does not contain user agent");
                return;
            }
            let name = &path["/progress/".len()..];
            if opts.missing_progress.iter().any(|m| m == name) {
                respond(&mut stream, 404, b"unknown transfer");
                return;
            }
            let payloads: Vec<String> = opts
                .progress_events
                .iter()
                .map(|p| format!("{{ \"progress\": {} }}", p))
                .collect();
            respond_sse(&mut stream, &payloads);
        }
        ("POST", "/upload") | ("POST", "/upload-mobile") | ("POST", "/upload-desktop") => {
            let now = shared.uploads_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            shared.max_uploads_in_flight.fetch_max(now, Ordering::SeqCst);
            thread::sleep(opts.upload_delay);
            shared.uploads.lock().unwrap().push(req.body.clone());
            shared.uploads_in_flight.fetch_sub(1, Ordering::SeqCst);
            respond(&mut stream, opts.upload_status, opts.upload_body.as_bytes());
        }
        ("GET", "/download-files") | ("GET", "/download-files-mobile") => {
            if opts.bundle_status == 200 {
                respond(&mut stream, 200, &opts.bundle);
            } else {
                respond(&mut stream, opts.bundle_status, b"error zipping up your files");
            }
        }
        ("POST", "/init-device") | ("POST", "/uninit-device") | ("GET", "/connect") => {
            respond(&mut stream, 200, b"ok");
        }
        ("GET", path) => match opts.feeds.get(path) {
            Some(scripts) if !scripts.is_empty() => {
                let n = {
                    let mut conns = shared.feed_connections.lock().unwrap();
                    let n = conns.entry(path.to_string()).or_insert(0);
                    *n += 1;
                    *n - 1
                };
                let script = &scripts[n.min(scripts.len() - 1)];
                respond_sse(&mut stream, script);
            }
            _ => respond(&mut stream, 404, b"<h1>NOT FOUND</h1>"),
        },
        _ => respond(&mut stream, 404, b"<h1>NOT FOUND</h1>"),
    }
}
