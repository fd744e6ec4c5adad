use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::key_pair::KeyPair;

/// Port for producing or loading a peer's key material.
///
/// Implementations live in `adapters::keys`.
pub trait KeyProvider {
    /// Generate a fresh pair and write the private half to `private_key_file`,
    /// or, when `existing_public_key` is given, read the private half from
    /// that file and pair it with the supplied public key.
    fn provision(&self, existing_public_key: Option<&str>, private_key_file: &Path)
    -> Result<KeyPair>;

    /// Short name of this provider (e.g. "builtin", "wg").
    fn name(&self) -> &str;
}
