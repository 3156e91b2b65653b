use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Default worker-pool size when the caller does not specify one.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Default per-probe TCP connect timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Outcome of a single TCP connect probe.
///
/// A full connect scan cannot tell a refused port from a filtered one, so
/// every negative outcome (refused, timeout, unreachable) is `Closed`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Open,
    Closed,
}

/// One probed port. Created by a worker task, written once into the shared
/// result set, never mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PortResult {
    pub port: u16,
    pub state: PortState,
    /// Service label from the static table, refined with banner text when
    /// detection is enabled.
    pub service: Option<String>,
    /// Sanitized first line of whatever the service sent, if anything.
    pub banner: Option<String>,
}

/// Everything the engine needs for one scan. Built once per invocation,
/// immutable thereafter.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanRequest {
    /// Target as the caller gave it (hostname or IP literal).
    pub target: String,
    /// Resolved address all probes are aimed at.
    pub addr: IpAddr,
    pub port_low: u16,
    pub port_high: u16,
    /// Worker-pool size; the engine clamps this to at least 1.
    pub concurrency: usize,
    pub probe_timeout: Duration,
    pub detect_services: bool,
}

impl ScanRequest {
    pub fn new(target: impl Into<String>, addr: IpAddr, port_low: u16, port_high: u16) -> Self {
        Self {
            target: target.into(),
            addr,
            port_low,
            port_high,
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            detect_services: false,
        }
    }
}

/// Terminal artifact of a scan. `ports` holds open ports only, sorted
/// ascending with no duplicates regardless of completion order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanResult {
    pub request: ScanRequest,
    /// Advisory liveness answer; a host may block echo probes and still
    /// accept TCP, so `false` never stops the scan.
    pub host_up: bool,
    pub ports: Vec<PortResult>,
    pub elapsed: Duration,
    /// `false` when the scan was cancelled before covering the full range.
    pub complete: bool,
    /// RFC 3339 timestamp taken when the scan started.
    pub started_at: String,
}
