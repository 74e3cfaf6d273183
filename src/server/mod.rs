//! Minimal blocking HTTP front end over the evaluation pipeline. One connection at a time,
//! one request per connection.

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};

use tracing::{debug, info, warn};

use crate::model::Environment;

pub mod api;
pub mod routes;

pub const BIND_ENV_VAR: &str = "ARMORY_BIND";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

const READ_CHUNK: usize = 4096;
const MAX_REQUEST_BYTES: usize = 1 << 20;

pub fn run_server(bind_addr: &str, env: &Environment) -> io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    info!(address = bind_addr, "armory server listening");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, env) {
                    warn!(error = %err, "request error");
                }
            }
            Err(err) => warn!(error = %err, "connection failed"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, env: &Environment) -> io::Result<()> {
    let raw = read_request(stream)?;
    if raw.is_empty() {
        return Ok(());
    }

    let request = Request::parse(&raw);
    let response = routes::route_request(&request.method, &request.path, &request.body, env);
    debug!(
        method = %request.method,
        path = %request.path,
        status = response.status_code,
        "handled request"
    );
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Request {
    method: String,
    path: String,
    body: String,
}

impl Request {
    fn parse(raw: &[u8]) -> Self {
        let (head, body) = match header_end(raw) {
            Some((head_len, end)) => (&raw[..head_len], &raw[end..]),
            None => (raw, &raw[raw.len()..]),
        };
        let head = String::from_utf8_lossy(head);
        let mut parts = head.lines().next().unwrap_or_default().split_whitespace();
        Self {
            method: parts.next().unwrap_or("GET").to_string(),
            path: parts.next().unwrap_or("/").to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

/// Reads the header block, then keeps reading until `Content-Length` body bytes have arrived
/// or the peer closes the connection.
fn read_request<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut raw = Vec::new();
    let mut chunk = [0_u8; READ_CHUNK];
    let mut expected_len: Option<usize> = None;

    loop {
        if expected_len.is_none() {
            if let Some((head_len, body_start)) = header_end(&raw) {
                let length = content_length(&raw[..head_len])?;
                expected_len = Some(body_start + length);
            }
        }
        if let Some(expected) = expected_len {
            if raw.len() >= expected {
                raw.truncate(expected);
                return Ok(raw);
            }
        }
        if raw.len() > MAX_REQUEST_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("request exceeds {MAX_REQUEST_BYTES} bytes"),
            ));
        }

        let read = match reader.read(&mut chunk) {
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if read == 0 {
            return Ok(raw);
        }
        raw.extend_from_slice(&chunk[..read]);
    }
}

/// Length of the header block and the offset where the body starts.
fn header_end(raw: &[u8]) -> Option<(usize, usize)> {
    if let Some(at) = find(raw, b"\r\n\r\n") {
        return Some((at, at + 4));
    }
    find(raw, b"\n\n").map(|at| (at, at + 2))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn content_length(head: &[u8]) -> io::Result<usize> {
    let head = String::from_utf8_lossy(head);
    for line in head.lines().skip(1) {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            let length = value.trim().parse::<usize>().map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("bad content-length '{}'", value.trim()),
                )
            })?;
            if length > MAX_REQUEST_BYTES {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("content-length {length} exceeds {MAX_REQUEST_BYTES} bytes"),
                ));
            }
            return Ok(length);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most `step` bytes per read, like a socket receiving small segments.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let count = self.step.min(buf.len()).min(self.data.len());
            buf[..count].copy_from_slice(&self.data[..count]);
            self.data = &self.data[count..];
            Ok(count)
        }
    }

    fn post(body: &str) -> String {
        format!(
            "POST /api/evaluate HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn body_split_across_reads_is_reassembled() {
        let body = format!(
            r#"{{"weapon":"minigun","build":"------","pad":"{}"}}"#,
            "x".repeat(20_000)
        );
        let raw = post(&body);
        let mut reader = Trickle {
            data: raw.as_bytes(),
            step: 7,
        };
        let bytes = read_request(&mut reader).expect("complete request");
        let request = Request::parse(&bytes);

        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/evaluate");
        assert_eq!(request.body, body);
    }

    #[test]
    fn bytes_past_content_length_are_dropped() {
        let raw = format!("{}trailing", post("{}"));
        let mut reader = Trickle {
            data: raw.as_bytes(),
            step: 1024,
        };
        let request = Request::parse(&read_request(&mut reader).expect("complete request"));
        assert_eq!(request.body, "{}");
    }

    #[test]
    fn request_without_body_stops_at_headers() {
        let raw = b"GET /api/health HTTP/1.1\nHost: localhost\n\n";
        let mut reader = Trickle {
            data: raw,
            step: 3,
        };
        let request = Request::parse(&read_request(&mut reader).expect("complete request"));
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/api/health");
        assert!(request.body.is_empty());
    }

    #[test]
    fn oversized_content_length_is_rejected() {
        let raw = "POST /api/evaluate HTTP/1.1\r\nContent-Length: 99999999\r\n\r\n";
        let mut reader = Trickle {
            data: raw.as_bytes(),
            step: 64,
        };
        let err = read_request(&mut reader).expect_err("too large");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
