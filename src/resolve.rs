use crate::error::ScanError;
use std::net::IpAddr;
use tokio::net::lookup_host;
use tracing::debug;

/// Resolve a hostname or IP literal to a single address.
///
/// Literal IPs parse without touching DNS. Hostnames go through one system
/// lookup; IPv4 answers are preferred since the scan targets a single
/// address and IPv4 is the common case for this kind of probing. A name
/// that maps to nothing is a fatal error — no partial scan without a target.
pub async fn resolve(target: &str) -> Result<IpAddr, ScanError> {
    if let Ok(ip) = target.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs = lookup_host((target, 0u16))
        .await
        .map_err(|e| ScanError::Resolution {
            target: target.to_string(),
            reason: e.to_string(),
        })?;

    let mut fallback = None;
    for addr in addrs {
        let ip = addr.ip();
        if ip.is_ipv4() {
            debug!(%target, %ip, "resolved target");
            return Ok(ip);
        }
        fallback.get_or_insert(ip);
    }

    match fallback {
        Some(ip) => {
            debug!(%target, %ip, "resolved target (IPv6 only)");
            Ok(ip)
        }
        None => Err(ScanError::Resolution {
            target: target.to_string(),
            reason: "name resolved to no addresses".to_string(),
        }),
    }
}
