use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::peer::PeerRecord;

/// Port for the privileged control surface of a live interface.
///
/// Every call is a single attempt against external mutable state; nothing
/// is retried and nothing is locked.
pub trait InterfaceControl {
    /// Add the peer, or update its allowed address if it is already present.
    fn authorize(&self, peer: &PeerRecord, private_key_file: &Path) -> Result<()>;

    /// Remove the peer. Succeeds when the peer is already absent.
    fn revoke(&self, interface: &str, public_key: &str) -> Result<()>;

    /// Public keys currently authorized, in the order the interface reports them.
    fn list_authorized(&self, interface: &str) -> Result<Vec<String>>;
}
