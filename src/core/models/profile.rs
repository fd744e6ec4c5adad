use ipnetwork::IpNetwork;

use crate::core::errors::{Result, WgKnifeError};

/// Everything a client needs to join the overlay.
///
/// Built once for export and then dropped; never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    pub interface: String,
    pub private_key: String,
    pub peer_public_key: String,
    pub allowed_address: IpNetwork,
    pub endpoint: String,
}

impl ConnectionProfile {
    /// Render the fixed five-line text form.
    pub fn to_text(&self) -> String {
        format!(
            "interface {}\n\
             private_key {}\n\
             peer {}\n\
             allowed_ips {}\n\
             endpoint {}\n",
            self.interface,
            self.private_key,
            self.peer_public_key,
            self.allowed_address,
            self.endpoint,
        )
    }
}

impl std::fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("interface", &self.interface)
            .field("peer_public_key", &self.peer_public_key)
            .field("allowed_address", &self.allowed_address)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Check a server endpoint before it is written into a profile.
///
/// Accepts `host:port` or `[v6-address]:port`. Whitespace and control
/// characters are rejected so the endpoint stays on its own line.
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let invalid = |why: &str| {
        Err(WgKnifeError::usage(format!(
            "endpoint '{}' is invalid: {why} (expected host:port)",
            endpoint.escape_debug()
        )))
    };

    if endpoint.is_empty() {
        return invalid("it is empty");
    }
    if endpoint.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return invalid("it contains whitespace or control characters");
    }
    let Some((host, port)) = endpoint.rsplit_once(':') else {
        return invalid("no port");
    };
    match port.parse::<u16>() {
        Ok(p) if p > 0 => {}
        _ => return invalid("port must be 1-65535"),
    }

    if let Some(inner) = host.strip_prefix('[') {
        match inner.strip_suffix(']') {
            Some(addr) if addr.parse::<std::net::Ipv6Addr>().is_ok() => Ok(()),
            _ => invalid("bracketed host is not an IPv6 address"),
        }
    } else if host.is_empty() || host.contains([':', '[', ']']) {
        invalid("bad host")
    } else {
        Ok(())
    }
}
