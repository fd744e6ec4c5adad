use std::path::Path;

use sha2::{Digest, Sha256};

use crate::core::errors::Result;
use crate::core::models::peer::validate_interface_name;
use crate::core::traits::interface_control::InterfaceControl;
use crate::core::traits::snapshot_store::SnapshotStore;

/// Point-in-time capture of the peers authorized on an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub peers: Vec<String>,
    /// SHA-256 of the bytes written, lowercase hex.
    pub digest: String,
}

/// Refreshes the peer list from the live interface and persists it.
pub struct RegistryService<C: InterfaceControl, S: SnapshotStore> {
    pub control: C,
    pub store: S,
}

impl<C: InterfaceControl, S: SnapshotStore> RegistryService<C, S> {
    /// Query the interface and write the result to `destination`.
    ///
    /// The snapshot may be stale as soon as this returns.
    pub fn save(&self, interface: &str, destination: &Path) -> Result<Snapshot> {
        validate_interface_name(interface)?;
        let peers = self.control.list_authorized(interface)?;
        let written = self.store.write(&peers, destination)?;

        tracing::info!(
            interface,
            peers = peers.len(),
            path = %destination.display(),
            "peer snapshot saved"
        );

        Ok(Snapshot {
            peers,
            digest: sha256_hex(&written),
        })
    }
}

/// Compute the SHA-256 hash of `data` as a lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::*;
    use crate::core::services::peer_service::fakes::{MemoryInterface, NEW_PUBLIC};

    #[derive(Default)]
    struct RecordingStore {
        writes: RefCell<Vec<(Vec<String>, PathBuf)>>,
    }

    impl SnapshotStore for RecordingStore {
        fn write(&self, peers: &[String], destination: &Path) -> Result<Vec<u8>> {
            self.writes
                .borrow_mut()
                .push((peers.to_vec(), destination.to_path_buf()));
            Ok(peers.join(",").into_bytes())
        }
    }

    fn seeded() -> RegistryService<MemoryInterface, RecordingStore> {
        let control = MemoryInterface::with_interface("wg0");
        control.peers.borrow_mut().get_mut("wg0").unwrap().extend([
            (NEW_PUBLIC.to_string(), "10.0.0.5/24".parse().unwrap()),
            ("second".to_string(), "10.0.0.6/24".parse().unwrap()),
        ]);
        RegistryService {
            control,
            store: RecordingStore::default(),
        }
    }

    #[test]
    fn save_writes_live_list_in_order() {
        let svc = seeded();
        let live = svc.control.list_authorized("wg0").unwrap();
        let snapshot = svc.save("wg0", Path::new("/tmp/peers.json")).unwrap();

        assert_eq!(snapshot.peers, live);
        let writes = svc.store.writes.borrow();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, live);
        assert_eq!(writes[0].1, PathBuf::from("/tmp/peers.json"));
    }

    #[test]
    fn save_on_missing_interface_writes_nothing() {
        let svc = seeded();
        assert!(svc.save("wg7", Path::new("/tmp/peers.json")).is_err());
        assert!(svc.store.writes.borrow().is_empty());
    }

    #[test]
    fn digest_covers_written_bytes() {
        let svc = seeded();
        let snapshot = svc.save("wg0", Path::new("/tmp/peers.json")).unwrap();
        let expected = sha256_hex(format!("{NEW_PUBLIC},second").as_bytes());
        assert_eq!(snapshot.digest, expected);
    }

    #[test]
    fn sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
