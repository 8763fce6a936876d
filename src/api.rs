//! Local status-log query API.
//!
//! A small loopback HTTP server on a background thread:
//!
//! - `GET /logs`   — every committed compliance record, insertion order, JSON
//! - `GET /health` — liveness probe
//!
//! Reads go through the server thread's own SQLite connection, so they see a
//! consistent snapshot of committed records while the pipeline keeps
//! writing. A read failure answers with an empty record set plus an error
//! field — the query boundary never crashes the process.

use anyhow::{anyhow, Result};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::sink::{SqliteStatusSink, StatusSink};

const MAX_REQUEST_BYTES: usize = 8192;

#[derive(Clone, Debug)]
pub struct StatusApiConfig {
    pub addr: String,
    pub db_path: String,
}

impl Default for StatusApiConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8790".to_string(),
            db_path: "helmet_check.db".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct StatusApiHandle {
    pub addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl StatusApiHandle {
    pub fn stop(mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(join) = self.join.take() {
            join.join()
                .map_err(|_| anyhow!("status api thread panicked"))?;
        }
        Ok(())
    }
}

pub struct StatusApiServer {
    cfg: StatusApiConfig,
}

impl StatusApiServer {
    pub fn new(cfg: StatusApiConfig) -> Self {
        Self { cfg }
    }

    pub fn spawn(self) -> Result<StatusApiHandle> {
        let configured_addr: SocketAddr = self.cfg.addr.parse()?;
        let listener = TcpListener::bind(configured_addr)?;
        let addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_thread = shutdown.clone();
        let cfg = self.cfg.clone();
        let join = std::thread::spawn(move || {
            if let Err(err) = run_api(listener, cfg, shutdown_thread) {
                log::error!("status api stopped: {}", err);
            }
        });

        Ok(StatusApiHandle {
            addr,
            shutdown,
            join: Some(join),
        })
    }
}

fn run_api(listener: TcpListener, cfg: StatusApiConfig, shutdown: Arc<AtomicBool>) -> Result<()> {
    // The server thread's own connection; readers never share the
    // pipeline's write connection.
    let sink = SqliteStatusSink::open(&cfg.db_path)?;
    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        match listener.accept() {
            Ok((stream, _)) => {
                if let Err(err) = handle_connection(stream, &sink) {
                    log::warn!("status api request rejected: {}", err);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(Duration::from_millis(50));
                continue;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn handle_connection(mut stream: TcpStream, sink: &SqliteStatusSink) -> Result<()> {
    let peer = stream.peer_addr()?;
    let local = stream.local_addr()?;
    if local.ip().is_loopback() && !peer.ip().is_loopback() {
        write_json_response(&mut stream, 403, r#"{"error":"forbidden"}"#)?;
        return Ok(());
    }

    let (method, path) = read_request(&mut stream)?;
    if method != "GET" {
        write_json_response(&mut stream, 405, r#"{"error":"method_not_allowed"}"#)?;
        return Ok(());
    }
    match path.as_str() {
        "/health" => write_json_response(&mut stream, 200, r#"{"status":"ok"}"#),
        "/logs" => match sink.query_all() {
            Ok(records) => {
                let payload = serde_json::to_string(&records)?;
                write_json_response(&mut stream, 200, &payload)
            }
            Err(err) => {
                log::error!("status log read failed: {}", err);
                let payload = format!(r#"{{"error":"{}","logs":[]}}"#, "sink_read_failure");
                write_json_response(&mut stream, 500, &payload)
            }
        },
        _ => write_json_response(&mut stream, 404, r#"{"error":"not_found"}"#),
    }
}

fn read_request(stream: &mut TcpStream) -> Result<(String, String)> {
    stream.set_read_timeout(Some(Duration::from_secs(2)))?;
    let mut buf = [0u8; 1024];
    let mut data = Vec::new();
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        if data.len() > MAX_REQUEST_BYTES {
            return Err(anyhow!("request too large"));
        }
        if data.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    let text = String::from_utf8_lossy(&data);
    let request_line = text
        .split("\r\n")
        .next()
        .ok_or_else(|| anyhow!("empty request"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().ok_or_else(|| anyhow!("missing method"))?;
    let raw_path = parts.next().ok_or_else(|| anyhow!("missing path"))?;
    let path = raw_path.split('?').next().unwrap_or(raw_path);
    Ok((method.to_string(), path.to_string()))
}

fn write_json_response(stream: &mut TcpStream, status: u16, body: &str) -> Result<()> {
    let status_line = match status {
        200 => "HTTP/1.1 200 OK",
        403 => "HTTP/1.1 403 Forbidden",
        404 => "HTTP/1.1 404 Not Found",
        405 => "HTTP/1.1 405 Method Not Allowed",
        _ => "HTTP/1.1 500 Internal Server Error",
    };
    let response = format!(
        "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes())?;
    Ok(())
}
