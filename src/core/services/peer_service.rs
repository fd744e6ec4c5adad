use std::net::IpAddr;
use std::path::Path;

use crate::core::errors::{Result, WgKnifeError};
use crate::core::models::key_pair::{KeyPair, is_valid_key};
use crate::core::models::peer::{PeerRecord, parse_host, scoped, validate_interface_name};
use crate::core::traits::interface_control::InterfaceControl;
use crate::core::traits::key_provider::KeyProvider;

/// Arguments of an `add` request, unvalidated.
#[derive(Debug, Clone, Copy)]
pub struct AddPeer<'a> {
    pub public_key: Option<&'a str>,
    pub address: &'a str,
    pub private_key_file: &'a Path,
    pub interface: &'a str,
}

/// Result of a successful `add`.
#[derive(Debug, Clone)]
pub struct AddedPeer {
    pub keys: KeyPair,
    pub record: PeerRecord,
    pub host: IpAddr,
    /// True when a new key pair was generated for this peer.
    pub generated: bool,
}

/// Sequences key provisioning and interface mutations for the peer verbs.
pub struct PeerService<K: KeyProvider, C: InterfaceControl> {
    pub keys: K,
    pub control: C,
    /// Scope applied to IPv4 allowed addresses on the interface.
    pub prefix_v4: u8,
    /// Scope applied to IPv6 allowed addresses on the interface.
    pub prefix_v6: u8,
}

impl<K: KeyProvider, C: InterfaceControl> PeerService<K, C> {
    /// Validate the request up front, then provision keys and authorize.
    ///
    /// Nothing is written or issued when validation fails. If authorization
    /// fails after a key was generated, the key file stays on disk.
    pub fn add(&self, request: &AddPeer<'_>) -> Result<AddedPeer> {
        validate_interface_name(request.interface)?;
        if let Some(pk) = request.public_key
            && !is_valid_key(pk)
        {
            return Err(WgKnifeError::usage(format!(
                "'{pk}' is not a WireGuard public key (expected 32 bytes, base64)"
            )));
        }
        let host = parse_host(request.address)?;
        let prefix = match host {
            IpAddr::V4(_) => self.prefix_v4,
            IpAddr::V6(_) => self.prefix_v6,
        };
        let allowed_address = scoped(host, prefix)?;

        let keys = self
            .keys
            .provision(request.public_key, request.private_key_file)?;

        let record = PeerRecord {
            public_key: keys.public_key.clone(),
            allowed_address,
            interface: request.interface.to_string(),
        };
        self.control.authorize(&record, request.private_key_file)?;

        tracing::info!(
            interface = %record.interface,
            peer = %record.public_key,
            allowed = %record.allowed_address,
            "peer authorized"
        );

        Ok(AddedPeer {
            keys,
            record,
            host,
            generated: request.public_key.is_none(),
        })
    }

    /// Revoke a peer. Absent peers are not an error.
    pub fn remove(&self, public_key: &str, interface: &str) -> Result<()> {
        validate_interface_name(interface)?;
        if public_key.trim().is_empty() {
            return Err(WgKnifeError::usage("public key must not be empty"));
        }
        self.control.revoke(interface, public_key.trim())?;
        tracing::info!(interface, peer = public_key, "peer revoked");
        Ok(())
    }

    /// Public keys authorized on `interface`, in interface order.
    pub fn list(&self, interface: &str) -> Result<Vec<String>> {
        validate_interface_name(interface)?;
        self.control.list_authorized(interface)
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;

    use ipnetwork::IpNetwork;

    use crate::core::errors::{Result, WgKnifeError};
    use crate::core::models::key_pair::KeyPair;
    use crate::core::models::peer::PeerRecord;
    use crate::core::traits::interface_control::InterfaceControl;
    use crate::core::traits::key_provider::KeyProvider;

    pub const NEW_PUBLIC: &str = "hSDwCYkwp1R0i33ctD73Wg2/Og0mOBr066SpjqqbTmo=";
    pub const NEW_PRIVATE: &str = "dwdtCnMYpX08FsFyUbJmRd9ML4frwJkqsXf7pR25LCo=";

    /// Key provider that hands out a fixed pair and records file writes.
    #[derive(Default)]
    pub struct FixedKeys {
        pub written: RefCell<Vec<String>>,
    }

    impl KeyProvider for FixedKeys {
        fn provision(&self, existing: Option<&str>, file: &Path) -> Result<KeyPair> {
            match existing {
                Some(pk) => Ok(KeyPair {
                    private_key: NEW_PRIVATE.into(),
                    public_key: pk.into(),
                }),
                None => {
                    self.written.borrow_mut().push(file.display().to_string());
                    Ok(KeyPair {
                        private_key: NEW_PRIVATE.into(),
                        public_key: NEW_PUBLIC.into(),
                    })
                }
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// In-memory interface set keyed by interface name.
    #[derive(Default)]
    pub struct MemoryInterface {
        pub peers: RefCell<HashMap<String, Vec<(String, IpNetwork)>>>,
        pub mutations: RefCell<usize>,
    }

    impl MemoryInterface {
        pub fn with_interface(name: &str) -> Self {
            let this = Self::default();
            this.peers.borrow_mut().insert(name.to_string(), Vec::new());
            this
        }

        fn missing(operation: &str, interface: &str) -> WgKnifeError {
            WgKnifeError::ControlSurfaceError {
                operation: operation.into(),
                detail: format!("Unable to access interface {interface}: No such device"),
            }
        }
    }

    impl InterfaceControl for MemoryInterface {
        fn authorize(&self, peer: &PeerRecord, _private_key_file: &Path) -> Result<()> {
            let mut all = self.peers.borrow_mut();
            let set = all
                .get_mut(&peer.interface)
                .ok_or_else(|| Self::missing("wg set", &peer.interface))?;
            match set.iter_mut().find(|(pk, _)| *pk == peer.public_key) {
                Some(entry) => entry.1 = peer.allowed_address,
                None => set.push((peer.public_key.clone(), peer.allowed_address)),
            }
            *self.mutations.borrow_mut() += 1;
            Ok(())
        }

        fn revoke(&self, interface: &str, public_key: &str) -> Result<()> {
            let mut all = self.peers.borrow_mut();
            let set = all
                .get_mut(interface)
                .ok_or_else(|| Self::missing("wg show", interface))?;
            if set.iter().any(|(pk, _)| pk == public_key) {
                set.retain(|(pk, _)| pk != public_key);
                *self.mutations.borrow_mut() += 1;
            }
            Ok(())
        }

        fn list_authorized(&self, interface: &str) -> Result<Vec<String>> {
            let all = self.peers.borrow();
            let set = all
                .get(interface)
                .ok_or_else(|| Self::missing("wg show", interface))?;
            Ok(set.iter().map(|(pk, _)| pk.clone()).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;

    const OTHER_PUBLIC: &str = "OGsUhWokRhyudXjE7Cyd9uvNx6YzxI1T3qj/odisvm4=";

    fn service() -> PeerService<FixedKeys, MemoryInterface> {
        PeerService {
            keys: FixedKeys::default(),
            control: MemoryInterface::with_interface("wg0"),
            prefix_v4: 24,
            prefix_v6: 64,
        }
    }

    fn request<'a>(public_key: Option<&'a str>, address: &'a str) -> AddPeer<'a> {
        AddPeer {
            public_key,
            address,
            private_key_file: Path::new("/tmp/peerA.key"),
            interface: "wg0",
        }
    }

    #[test]
    fn add_new_peer_generates_and_authorizes() {
        let svc = service();
        let added = svc.add(&request(None, "10.0.0.5")).unwrap();

        assert!(added.generated);
        assert_eq!(added.keys.public_key, NEW_PUBLIC);
        assert_eq!(added.record.allowed_address.to_string(), "10.0.0.5/24");
        assert_eq!(*svc.keys.written.borrow(), vec!["/tmp/peerA.key".to_string()]);
        assert_eq!(svc.list("wg0").unwrap(), vec![NEW_PUBLIC.to_string()]);
    }

    #[test]
    fn add_with_existing_key_does_not_generate() {
        let svc = service();
        let added = svc.add(&request(Some(OTHER_PUBLIC), "10.0.0.6")).unwrap();

        assert!(!added.generated);
        assert_eq!(added.keys.public_key, OTHER_PUBLIC);
        assert!(svc.keys.written.borrow().is_empty());
    }

    #[test]
    fn reauthorizing_updates_instead_of_duplicating() {
        let svc = service();
        svc.add(&request(Some(OTHER_PUBLIC), "10.0.0.6")).unwrap();
        svc.add(&request(Some(OTHER_PUBLIC), "10.0.0.7")).unwrap();

        let listed = svc.list("wg0").unwrap();
        assert_eq!(listed.iter().filter(|pk| *pk == OTHER_PUBLIC).count(), 1);
        let peers = svc.control.peers.borrow();
        assert_eq!(peers["wg0"][0].1.to_string(), "10.0.0.7/24");
    }

    #[test]
    fn ipv6_uses_v6_prefix() {
        let svc = service();
        let added = svc.add(&request(None, "fd00::5")).unwrap();
        assert_eq!(added.record.allowed_address.to_string(), "fd00::5/64");
    }

    #[test]
    fn invalid_arguments_have_no_side_effects() {
        let svc = service();
        assert!(matches!(
            svc.add(&request(None, "10.0.0.999")),
            Err(WgKnifeError::UsageError { .. })
        ));
        assert!(matches!(
            svc.add(&request(Some("not-a-key"), "10.0.0.5")),
            Err(WgKnifeError::UsageError { .. })
        ));
        let mut bad_iface = request(None, "10.0.0.5");
        bad_iface.interface = "wg0 peer x";
        assert!(svc.add(&bad_iface).is_err());

        assert!(svc.keys.written.borrow().is_empty());
        assert_eq!(*svc.control.mutations.borrow(), 0);
    }

    #[test]
    fn add_to_missing_interface_is_control_error() {
        let svc = service();
        let mut req = request(None, "10.0.0.5");
        req.interface = "wg9";
        assert!(matches!(
            svc.add(&req),
            Err(WgKnifeError::ControlSurfaceError { .. })
        ));
    }

    #[test]
    fn remove_twice_is_idempotent() {
        let svc = service();
        svc.add(&request(Some(OTHER_PUBLIC), "10.0.0.6")).unwrap();
        svc.add(&request(None, "10.0.0.5")).unwrap();

        svc.remove(OTHER_PUBLIC, "wg0").unwrap();
        let after_first = svc.list("wg0").unwrap();
        svc.remove(OTHER_PUBLIC, "wg0").unwrap();

        assert_eq!(svc.list("wg0").unwrap(), after_first);
        assert_eq!(after_first, vec![NEW_PUBLIC.to_string()]);
    }

    #[test]
    fn remove_unknown_peer_succeeds() {
        let svc = service();
        svc.remove("nonexistentPK", "wg0").unwrap();
    }

    #[test]
    fn remove_rejects_empty_key() {
        let svc = service();
        assert!(svc.remove("  ", "wg0").is_err());
    }

    #[test]
    fn list_keeps_interface_order() {
        let svc = service();
        svc.add(&request(Some(OTHER_PUBLIC), "10.0.0.6")).unwrap();
        svc.add(&request(None, "10.0.0.5")).unwrap();
        assert_eq!(
            svc.list("wg0").unwrap(),
            vec![OTHER_PUBLIC.to_string(), NEW_PUBLIC.to_string()]
        );
    }
}
