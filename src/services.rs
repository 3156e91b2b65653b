//! Static service identification for well-known TCP ports, with optional
//! banner-derived refinement.

/// Well-known port to service name. Anything not in the table is "Unknown".
pub fn service_name(port: u16) -> &'static str {
    match port {
        21 => "FTP",
        22 => "SSH",
        23 => "Telnet",
        25 => "SMTP",
        53 => "DNS",
        80 => "HTTP",
        110 => "POP3",
        143 => "IMAP",
        443 => "HTTPS",
        993 => "IMAPS",
        995 => "POP3S",
        1433 => "MSSQL",
        3306 => "MySQL",
        3389 => "RDP",
        5432 => "PostgreSQL",
        6379 => "Redis",
        8080 => "HTTP-Proxy",
        8443 => "HTTPS-Alt",
        27017 => "MongoDB",
        _ => "Unknown",
    }
}

/// Service label for a port, refined with banner text when one was read.
///
/// `banner` is expected to already be sanitized and length-capped by the
/// prober; it is used verbatim here.
pub fn identify(port: u16, banner: Option<&str>) -> String {
    let name = service_name(port);
    match banner {
        Some(b) if !b.is_empty() => format!("{name} ({b})"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ports_have_names() {
        assert_eq!(service_name(22), "SSH");
        assert_eq!(service_name(443), "HTTPS");
        assert_eq!(service_name(27017), "MongoDB");
    }

    #[test]
    fn unknown_port_is_unknown() {
        assert_eq!(service_name(49152), "Unknown");
    }

    #[test]
    fn banner_refines_label() {
        let label = identify(22, Some("SSH-2.0-OpenSSH_9.6"));
        assert_eq!(label, "SSH (SSH-2.0-OpenSSH_9.6)");
    }

    #[test]
    fn empty_banner_falls_back_to_table() {
        assert_eq!(identify(22, Some("")), "SSH");
        assert_eq!(identify(22, None), "SSH");
        assert_eq!(identify(6000, None), "Unknown");
    }
}
