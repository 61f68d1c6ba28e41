use std::net::IpAddr;

use crate::entities::DnsRecord;

/// Records whose content does not match `ip`.
pub fn find_drift<'a>(records: &'a [DnsRecord], ip: &str) -> Vec<&'a DnsRecord> {
    records
        .iter()
        .filter(|record| record.content.trim() != ip)
        .collect()
}

/// Takes the first token of an echo-service body and checks it is an IP address.
pub fn normalize_ip(raw: &str) -> Option<String> {
    let token = raw.split_whitespace().next()?;
    token.parse::<IpAddr>().ok().map(|addr| addr.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, content: &str) -> DnsRecord {
        DnsRecord {
            id: format!("id-{}", name),
            name: name.to_string(),
            content: content.to_string(),
            proxied: false,
        }
    }

    #[test]
    fn only_mismatched_records_drift() {
        let records = vec![
            record("example.com", "203.0.113.7"),
            record("www.example.com", "198.51.100.1"),
        ];
        let drifted = find_drift(&records, "203.0.113.7");
        assert_eq!(drifted.len(), 1);
        assert_eq!(drifted[0].name, "www.example.com");
    }

    #[test]
    fn no_records_means_no_drift() {
        assert!(find_drift(&[], "203.0.113.7").is_empty());
    }

    #[test]
    fn normalize_ip_accepts_plain_text_bodies() {
        assert_eq!(normalize_ip("203.0.113.7\n").as_deref(), Some("203.0.113.7"));
        assert_eq!(normalize_ip("  2001:db8::1 ").as_deref(), Some("2001:db8::1"));
        assert!(normalize_ip("<html>rate limited</html>").is_none());
        assert!(normalize_ip("").is_none());
    }
}
