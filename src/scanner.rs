use crate::types::{PortResult, PortState, ScanRequest, ScanResult};
use crate::{liveness, probe, services};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use ::time::{format_description::well_known, OffsetDateTime};

/// Budget for the single pre-scan liveness probe.
const LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Hard ceiling on in-flight probes regardless of the requested pool size.
const MAX_CONCURRENCY: usize = 5_000;

/// Probe every port in the request's range and return the aggregated result.
///
/// Blocks until each port has been probed exactly once; full enumeration,
/// no early exit. Never fails: per-port errors are recorded as closed and
/// absorbed into the result.
pub async fn run_scan(req: &ScanRequest) -> ScanResult {
    run_scan_with_cancel(req, CancellationToken::new()).await
}

/// Variant taking a `CancellationToken` for external interruption.
///
/// Once `cancel` fires, no new probes are submitted; in-flight probes drain
/// (bounded by their own timeouts) and whatever was collected is returned
/// with `complete == false`. A partial scan is a value, not an error.
pub async fn run_scan_with_cancel(req: &ScanRequest, cancel: CancellationToken) -> ScanResult {
    let started_at = now_rfc3339();
    let start = Instant::now();

    // Advisory gate: recorded, never a reason to stop.
    let host_up = liveness::probe_alive(req.addr, LIVENESS_TIMEOUT).await;
    if !host_up {
        debug!(target = %req.target, addr = %req.addr, "no liveness reply, scanning anyway");
    }

    let addr = req.addr;
    let timeout = req.probe_timeout;
    let detect = req.detect_services;
    let (ports, complete) = scan_range(req, &cancel, move |port| async move {
        match probe::probe_port(addr, port, timeout).await {
            PortState::Open => {
                let banner = if detect {
                    probe::grab_banner(addr, port, timeout).await
                } else {
                    None
                };
                let service = detect.then(|| services::identify(port, banner.as_deref()));
                Some(PortResult {
                    port,
                    state: PortState::Open,
                    service,
                    banner,
                })
            }
            PortState::Closed => None,
        }
    })
    .await;

    debug!(
        target = %req.target,
        open = ports.len(),
        complete,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scan finished"
    );

    ScanResult {
        request: req.clone(),
        host_up,
        ports,
        elapsed: start.elapsed(),
        complete,
        started_at,
    }
}

/// Fan one task per port in `[port_low, port_high]` out over a pool of
/// `concurrency` permits, collecting whatever `probe_one` yields.
///
/// The permit is acquired before the task is spawned and held for the
/// probe's whole lifetime, so at most `concurrency` probes are in their
/// connect phase at any instant even when the range dwarfs the pool. The
/// shared collection's lock covers only the O(1) append, never network I/O.
/// Returns the results sorted ascending by port — completion order is
/// nondeterministic, the report is not — plus whether the full range was
/// covered.
async fn scan_range<F, Fut>(
    req: &ScanRequest,
    cancel: &CancellationToken,
    probe_one: F,
) -> (Vec<PortResult>, bool)
where
    F: Fn(u16) -> Fut,
    Fut: Future<Output = Option<PortResult>> + Send + 'static,
{
    let sem = Arc::new(Semaphore::new(req.concurrency.clamp(1, MAX_CONCURRENCY)));
    let open_ports = Arc::new(Mutex::new(Vec::new()));
    let mut tasks = JoinSet::new();

    for port in req.port_low..=req.port_high {
        if cancel.is_cancelled() {
            break;
        }
        let permit = match sem.clone().acquire_owned().await {
            Ok(p) => p,
            // Semaphore is never closed; bail defensively if it ever is.
            Err(_) => break,
        };
        let open_ports = open_ports.clone();
        let cancel = cancel.clone();
        let fut = probe_one(port);

        tasks.spawn(async move {
            let _permit = permit; // released when the probe is done

            if cancel.is_cancelled() {
                return;
            }
            if let Some(result) = fut.await {
                let mut guard = open_ports.lock().await;
                guard.push(result);
            }
        });
    }

    while tasks.join_next().await.is_some() {}

    let complete = !cancel.is_cancelled();
    let mut out = match Arc::try_unwrap(open_ports) {
        Ok(m) => m.into_inner(),
        // All tasks have joined, so this branch should be unreachable.
        Err(arc) => arc.lock().await.clone(),
    };
    out.sort_unstable_by_key(|r| r.port);
    (out, complete)
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
