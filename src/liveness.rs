use std::net::IpAddr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time;
use tracing::debug;

/// One-shot reachability check via the platform `ping` binary.
///
/// Returns whether a single echo request was answered within `timeout`.
/// No reply, a non-zero exit, a missing `ping` binary, or the timeout
/// expiring are all a normal `false` — liveness is advisory and never an
/// error. Hosts that drop ICMP may still accept TCP connections.
pub async fn probe_alive(ip: IpAddr, timeout: Duration) -> bool {
    let mut cmd = Command::new("ping");
    if cfg!(target_os = "windows") {
        cmd.arg("-n").arg("1").arg("-w").arg(timeout.as_millis().to_string());
    } else {
        let secs = timeout.as_secs().max(1);
        cmd.arg("-c").arg("1").arg("-W").arg(secs.to_string());
    }
    cmd.arg(ip.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match time::timeout(timeout, cmd.status()).await {
        Ok(Ok(status)) => {
            debug!(%ip, success = status.success(), "liveness probe finished");
            status.success()
        }
        Ok(Err(e)) => {
            debug!(%ip, error = %e, "liveness probe could not run");
            false
        }
        Err(_) => {
            debug!(%ip, "liveness probe timed out");
            false
        }
    }
}
