use crate::types::PortState;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;
use tracing::trace;

/// Most bytes ever read from a service when grabbing a banner.
pub const BANNER_MAX_BYTES: usize = 1024;

/// Longest banner line kept in a result; hostile services cannot inflate the
/// report past this.
pub const BANNER_MAX_CHARS: usize = 100;

/// Total budget for the banner exchange (reconnect, optional probe write,
/// read). Kept above the connect timeout but small enough that a silent
/// listener cannot stall a worker for long.
const BANNER_BUDGET: Duration = Duration::from_secs(2);

/// Attempt a full TCP connect to `ip:port`, bounded by `timeout`.
///
/// Open iff the handshake completes. Refused, unreachable, and timed-out
/// attempts all collapse into `Closed` — a connect scan cannot tell them
/// apart. The stream is dropped before returning so descriptors never
/// outlive the probe.
pub async fn probe_port(ip: IpAddr, port: u16, timeout: Duration) -> PortState {
    let addr = SocketAddr::new(ip, port);
    match time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            trace!(%addr, "connect succeeded");
            PortState::Open
        }
        _ => PortState::Closed,
    }
}

/// Best-effort banner grab against a port already known to be open.
///
/// Re-establishes a connection, sends a minimal HTTP HEAD request on
/// well-known web ports (services that speak first need no prompt), then
/// reads once. Every failure mode — connect error, write error, silent
/// listener, budget exhausted — yields `None`, never an error; service
/// identification falls back to the static table.
pub async fn grab_banner(ip: IpAddr, port: u16, connect_timeout: Duration) -> Option<String> {
    time::timeout(BANNER_BUDGET, banner_exchange(ip, port, connect_timeout))
        .await
        .ok()
        .flatten()
}

async fn banner_exchange(ip: IpAddr, port: u16, connect_timeout: Duration) -> Option<String> {
    let addr = SocketAddr::new(ip, port);
    let mut stream = time::timeout(connect_timeout, TcpStream::connect(addr))
        .await
        .ok()?
        .ok()?;

    if is_web_port(port) {
        let head = format!("HEAD / HTTP/1.1\r\nHost: {ip}\r\nConnection: close\r\n\r\n");
        stream.write_all(head.as_bytes()).await.ok()?;
    }

    let mut buf = vec![0u8; BANNER_MAX_BYTES];
    let n = stream.read(&mut buf).await.ok()?;
    if n == 0 {
        return None;
    }
    buf.truncate(n);
    let text = String::from_utf8_lossy(&buf);
    let line = sanitize_first_line(&text);
    trace!(%addr, banner = %line, "banner read");
    (!line.is_empty()).then_some(line)
}

/// Ports that expect the client to speak first with an HTTP request.
fn is_web_port(port: u16) -> bool {
    matches!(port, 80 | 443 | 8080 | 8443)
}

/// First line only, control characters stripped, length capped. Banners are
/// attacker-controlled bytes headed for a terminal and a report.
pub fn sanitize_first_line(raw: &str) -> String {
    raw.lines()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_control())
        .take(BANNER_MAX_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}
