use std::path::Path;

use crate::core::errors::Result;

/// Port for persisting a point-in-time list of authorized peers.
pub trait SnapshotStore {
    /// Write `peers` to `destination`, replacing previous content.
    /// Returns the exact bytes written.
    fn write(&self, peers: &[String], destination: &Path) -> Result<Vec<u8>>;
}
