use std::net::IpAddr;
use std::sync::LazyLock;

use ipnetwork::IpNetwork;
use regex::Regex;

use crate::core::errors::{Result, WgKnifeError};

static INTERFACE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_=+.-]{1,15}$").expect("static regex"));

/// Check an interface name against the Linux naming rules
/// (at most 15 characters, no slashes or whitespace).
pub fn validate_interface_name(name: &str) -> Result<()> {
    if INTERFACE_NAME.is_match(name) && name != "." && name != ".." {
        Ok(())
    } else {
        Err(WgKnifeError::usage(format!(
            "'{name}' is not a valid interface name (1-15 of A-Z a-z 0-9 _ = + . -)"
        )))
    }
}

/// One authorization entry on an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    pub public_key: String,
    pub allowed_address: IpNetwork,
    pub interface: String,
}

/// Parse the host part of an allowed address (`10.0.0.5`, `fd00::5`).
///
/// A prefix is not accepted here; the scope comes from configuration.
pub fn parse_host(raw: &str) -> Result<IpAddr> {
    let trimmed = raw.trim();
    if trimmed.contains('/') {
        return Err(WgKnifeError::usage(format!(
            "'{trimmed}' includes a prefix; pass the bare host address (e.g. 10.0.0.5)"
        )));
    }
    trimmed
        .parse()
        .map_err(|_| WgKnifeError::usage(format!("'{trimmed}' is not a valid IP address")))
}

/// Host address with the given scope, e.g. `10.0.0.5/24`.
pub fn scoped(host: IpAddr, prefix: u8) -> Result<IpNetwork> {
    IpNetwork::new(host, prefix).map_err(|e| WgKnifeError::InvalidConfig {
        detail: format!("prefix /{prefix} is not valid for {host}: {e}"),
    })
}

/// Single-host mask for the address (`/32` or `/128`).
pub fn host_only(host: IpAddr) -> IpNetwork {
    IpNetwork::from(host)
}
