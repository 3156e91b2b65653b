use port_zero::error::ScanError;
use port_zero::resolve;
use port_zero::scanner;
use port_zero::types::{PortState, ScanRequest};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

fn loopback_request(port_low: u16, port_high: u16) -> ScanRequest {
    let mut req = ScanRequest::new(
        "127.0.0.1",
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        port_low,
        port_high,
    );
    req.concurrency = 4;
    req.probe_timeout = Duration::from_millis(300);
    req
}

/// Bind a loopback listener on an ephemeral port and keep accepting so
/// connect probes complete. Returns the port it listens on.
async fn spawn_listener() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        loop {
            let _ = listener.accept().await;
        }
    });
    port
}

#[tokio::test]
async fn finds_the_one_listener_in_a_range() {
    let port = spawn_listener().await;
    let low = port.saturating_sub(3);
    let high = port.saturating_add(3);

    let result = scanner::run_scan(&loopback_request(low, high)).await;

    assert!(result.complete);
    assert!(
        result.ports.iter().any(|r| r.port == port && r.state == PortState::Open),
        "listener on {port} not reported open"
    );
    for pair in result.ports.windows(2) {
        assert!(pair[0].port < pair[1].port, "report not strictly ascending");
    }
}

#[tokio::test]
async fn single_port_range_against_live_listener() {
    let port = spawn_listener().await;
    let result = scanner::run_scan(&loopback_request(port, port)).await;

    assert!(result.complete);
    assert_eq!(result.ports.len(), 1);
    assert_eq!(result.ports[0].port, port);
    assert_eq!(result.ports[0].state, PortState::Open);
    // Detection off: no service label, no banner.
    assert_eq!(result.ports[0].service, None);
    assert_eq!(result.ports[0].banner, None);
}

#[tokio::test]
async fn port_without_listener_is_absent_from_report() {
    // Bind then drop so the port is known-free.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let result = scanner::run_scan(&loopback_request(port, port)).await;

    assert!(result.complete);
    assert!(result.ports.is_empty());
}

#[tokio::test]
async fn silent_listener_keeps_static_service_name() {
    // Accepts connections but never writes: the banner read must time out
    // quietly and identification falls back to the static table.
    let port = spawn_listener().await;
    let mut req = loopback_request(port, port);
    req.detect_services = true;

    let result = scanner::run_scan(&req).await;

    assert!(result.complete);
    assert_eq!(result.ports.len(), 1);
    let r = &result.ports[0];
    assert_eq!(r.state, PortState::Open);
    assert_eq!(r.banner, None);
    // Ephemeral ports are not in the well-known table.
    assert_eq!(r.service.as_deref(), Some("Unknown"));
}

#[tokio::test]
async fn cancelled_scan_is_marked_incomplete() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = scanner::run_scan_with_cancel(&loopback_request(1, 200), cancel).await;

    assert!(!result.complete);
    assert!(result.ports.is_empty());
}

#[tokio::test]
async fn unresolvable_target_aborts_before_any_probe() {
    let err = resolve::resolve("this.invalid.nonexistent").await.unwrap_err();
    assert!(matches!(err, ScanError::Resolution { .. }));
}

#[tokio::test]
async fn request_round_trips_through_json() {
    let port = spawn_listener().await;
    let result = scanner::run_scan(&loopback_request(port, port)).await;

    let json = serde_json::to_string(&result).expect("serialize");
    let back: port_zero::types::ScanResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.ports, result.ports);
    assert_eq!(back.complete, result.complete);
}
