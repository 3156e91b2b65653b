use crate::error::ScanError;

/// Parse a port specification into an inclusive `(low, high)` range.
///
/// Supported forms:
/// - single port: `80`
/// - inclusive range: `1-1000`
/// - comma list: `80,443,22` — reduced to the `[min, max]` envelope of the
///   list, a documented simplification rather than per-port filtering
///
/// Rejects 0, anything above 65535, reversed ranges, and garbage. These are
/// the only port-related failures and they are fatal before any scan starts.
pub fn parse_port_spec(spec: &str) -> Result<(u16, u16), ScanError> {
    let s = spec.trim();
    if s.is_empty() {
        return Err(invalid(spec, "empty specification"));
    }

    if s.contains(',') {
        let mut low = u16::MAX;
        let mut high = 1u16;
        for part in s.split(',') {
            let p = parse_port(spec, part.trim())?;
            low = low.min(p);
            high = high.max(p);
        }
        return Ok((low, high));
    }

    if let Some((a, b)) = s.split_once('-') {
        let low = parse_port(spec, a.trim())?;
        let high = parse_port(spec, b.trim())?;
        if low > high {
            return Err(invalid(spec, "start port greater than end port"));
        }
        return Ok((low, high));
    }

    let p = parse_port(spec, s)?;
    Ok((p, p))
}

/// Whether a comma list was collapsed to its `[min, max]` envelope, so the
/// caller can surface the simplification.
pub fn is_comma_list(spec: &str) -> bool {
    spec.contains(',')
}

fn parse_port(spec: &str, s: &str) -> Result<u16, ScanError> {
    let val: u32 = s
        .parse()
        .map_err(|_| invalid(spec, format!("invalid port value '{s}'")))?;
    if val == 0 || val > 65535 {
        return Err(invalid(spec, format!("port {val} out of range 1-65535")));
    }
    Ok(val as u16)
}

fn invalid(spec: &str, reason: impl Into<String>) -> ScanError {
    ScanError::InvalidRange {
        spec: spec.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_port() {
        assert_eq!(parse_port_spec("80").unwrap(), (80, 80));
        assert_eq!(parse_port_spec("  65535 ").unwrap(), (65535, 65535));
    }

    #[test]
    fn inclusive_range() {
        assert_eq!(parse_port_spec("1-1000").unwrap(), (1, 1000));
        assert_eq!(parse_port_spec("22-22").unwrap(), (22, 22));
    }

    #[test]
    fn comma_list_reduces_to_envelope() {
        assert_eq!(parse_port_spec("80,443,22").unwrap(), (22, 443));
        assert_eq!(parse_port_spec("7,7,7").unwrap(), (7, 7));
        assert!(is_comma_list("80,443"));
        assert!(!is_comma_list("80-443"));
    }

    #[test]
    fn zero_rejected() {
        assert!(parse_port_spec("0").is_err());
        assert!(parse_port_spec("0-80").is_err());
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(parse_port_spec("70000").is_err());
        assert!(parse_port_spec("1-70000").is_err());
        assert!(parse_port_spec("80,99999").is_err());
    }

    #[test]
    fn reversed_range_rejected() {
        let err = parse_port_spec("1000-1").unwrap_err();
        assert!(matches!(err, ScanError::InvalidRange { .. }));
    }

    #[test]
    fn garbage_rejected() {
        assert!(parse_port_spec("").is_err());
        assert!(parse_port_spec("http").is_err());
        assert!(parse_port_spec("80-").is_err());
        assert!(parse_port_spec("-80").is_err());
    }
}
