use std::path::Path;

use crate::core::errors::{Result, WgKnifeError};
use crate::core::traits::snapshot_store::SnapshotStore;

/// Writes peer snapshots as a pretty-printed JSON array of key strings.
///
/// Example `peers.json`:
/// ```text
/// [
///   "hSDwCYkwp1R0i33ctD73Wg2/Og0mOBr066SpjqqbTmo=",
///   "OGsUhWokRhyudXjE7Cyd9uvNx6YzxI1T3qj/odisvm4="
/// ]
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSnapshotStore;

impl JsonSnapshotStore {
    /// Serialize `peers` to the on-disk form, trailing newline included.
    pub fn serialize(peers: &[String]) -> Result<Vec<u8>> {
        let mut bytes =
            serde_json::to_vec_pretty(peers).map_err(|e| WgKnifeError::StorageUnavailable {
                path: Default::default(),
                reason: format!("failed to serialize snapshot: {e}"),
            })?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn write(&self, peers: &[String], destination: &Path) -> Result<Vec<u8>> {
        let bytes = Self::serialize(peers)?;
        std::fs::write(destination, &bytes).map_err(|e| WgKnifeError::storage(destination, e))?;
        Ok(bytes)
    }
}
