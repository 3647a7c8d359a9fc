//! Target URL validation for SSRF protection.
//!
//! Extraction targets come from end users, and direct-fetch backends
//! will request whatever URL they are handed. This guard blocks
//! non-HTTP schemes, loopback and private hosts, and cloud metadata
//! ranges before a target ever reaches a backend.

use std::collections::HashSet;
use std::net::IpAddr;

use crate::error::{SecurityError, SecurityResult};

/// Validates target URLs before acquisition.
#[derive(Debug, Clone)]
pub struct TargetGuard {
    blocked_hosts: HashSet<String>,
    blocked_cidrs: Vec<ipnet::IpNet>,
    allowed_hosts: HashSet<String>,
}

impl Default for TargetGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetGuard {
    /// Create a guard with the default block rules.
    pub fn new() -> Self {
        Self {
            blocked_hosts: [
                "localhost",
                "127.0.0.1",
                "::1",
                "[::1]",
                "0.0.0.0",
                "metadata.google.internal",
                "instance-data",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            blocked_cidrs: vec![
                "10.0.0.0/8".parse().unwrap(),
                "172.16.0.0/12".parse().unwrap(),
                "192.168.0.0/16".parse().unwrap(),
                "169.254.0.0/16".parse().unwrap(),
                "127.0.0.0/8".parse().unwrap(),
                "::1/128".parse().unwrap(),
                "fc00::/7".parse().unwrap(),
                "fe80::/10".parse().unwrap(),
            ],
            allowed_hosts: HashSet::new(),
        }
    }

    /// Exempt a host from validation (useful in tests against a local
    /// fixture server).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into());
        self
    }

    /// Block an additional host.
    pub fn block_host(mut self, host: impl Into<String>) -> Self {
        self.blocked_hosts.insert(host.into());
        self
    }

    /// Validate a target URL for safety.
    pub fn validate(&self, target: &str) -> SecurityResult<()> {
        let parsed = url::Url::parse(target)?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SecurityError::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;
        if self.allowed_hosts.contains(host) {
            return Ok(());
        }
        if self.blocked_hosts.contains(host) {
            return Err(SecurityError::BlockedHost(host.to_string()));
        }

        if let Ok(ip) = host.trim_matches(['[', ']']).parse::<IpAddr>() {
            if let Some(cidr) = self.blocked_cidrs.iter().find(|c| c.contains(&ip)) {
                return Err(SecurityError::BlockedCidr(cidr.to_string()));
            }
        }

        Ok(())
    }

    /// Validate and additionally resolve DNS to catch hostnames that
    /// point at internal IPs.
    pub async fn validate_resolved(&self, target: &str) -> SecurityResult<()> {
        self.validate(target)?;

        let parsed = url::Url::parse(target)?;
        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;
        if self.allowed_hosts.contains(host) || host.parse::<IpAddr>().is_ok() {
            return Ok(());
        }

        let port = parsed.port_or_known_default().unwrap_or(443);
        let addrs = tokio::net::lookup_host(format!("{host}:{port}"))
            .await
            .map_err(|e| SecurityError::DnsResolution(e.to_string()))?;

        for addr in addrs {
            let ip = addr.ip();
            if self.blocked_cidrs.iter().any(|c| c.contains(&ip)) {
                return Err(SecurityError::BlockedCidr(format!(
                    "{host} resolves to blocked IP {ip}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_loopback_and_private() {
        let guard = TargetGuard::new();
        assert!(guard.validate("http://localhost/admin").is_err());
        assert!(guard.validate("http://127.0.0.1/").is_err());
        assert!(guard.validate("http://10.1.2.3/").is_err());
        assert!(guard.validate("http://192.168.0.10/").is_err());
    }

    #[test]
    fn test_blocks_metadata_service() {
        let guard = TargetGuard::new();
        assert!(guard.validate("http://169.254.169.254/latest").is_err());
        assert!(guard.validate("http://metadata.google.internal/").is_err());
    }

    #[test]
    fn test_blocks_non_http_schemes() {
        let guard = TargetGuard::new();
        assert!(guard.validate("file:///etc/passwd").is_err());
        assert!(guard.validate("ftp://example.com/").is_err());
    }

    #[test]
    fn test_allows_public_urls_and_exemptions() {
        let guard = TargetGuard::new().allow_host("localhost");
        assert!(guard.validate("https://example.com/about").is_ok());
        assert!(guard.validate("http://localhost:8080/fixture").is_ok());
    }
}
