use std::path::{Path, PathBuf};
use std::process::Command;

use super::key_file;
use crate::adapters::process;
use crate::core::errors::{Result, WgKnifeError};
use crate::core::models::key_pair::{KeyPair, is_valid_key};
use crate::core::traits::key_provider::KeyProvider;

/// Key generation that shells out to `wg genkey` and `wg pubkey`.
///
/// Needs wireguard-tools installed but no privilege.
pub struct WgToolKeyProvider {
    wg_path: PathBuf,
}

impl WgToolKeyProvider {
    /// Use the given `wg` binary.
    pub fn with_path(wg_path: PathBuf) -> Self {
        Self { wg_path }
    }

    fn wg(&self, args: &[&str], stdin_data: Option<&[u8]>) -> Result<String> {
        let out = process::run(&mut Command::new(&self.wg_path), args, stdin_data)
            .map_err(|reason| WgKnifeError::KeyGenerationFailed { reason })?;
        let text = String::from_utf8(out).map_err(|_| WgKnifeError::KeyGenerationFailed {
            reason: format!("wg {} printed non UTF-8 output", args.join(" ")),
        })?;
        let key = text.trim().to_string();
        if !is_valid_key(&key) {
            return Err(WgKnifeError::KeyGenerationFailed {
                reason: format!("wg {} printed something that is not a key", args.join(" ")),
            });
        }
        Ok(key)
    }

    /// Generate a fresh key pair without touching the filesystem.
    pub fn generate(&self) -> Result<KeyPair> {
        let private_key = self.wg(&["genkey"], None)?;
        let public_key = self.wg(&["pubkey"], Some(private_key.as_bytes()))?;
        Ok(KeyPair {
            private_key,
            public_key,
        })
    }
}

impl KeyProvider for WgToolKeyProvider {
    fn provision(
        &self,
        existing_public_key: Option<&str>,
        private_key_file: &Path,
    ) -> Result<KeyPair> {
        match existing_public_key {
            Some(public_key) => key_file::reuse(public_key, private_key_file),
            None => {
                let pair = self.generate()?;
                key_file::write_private_key(private_key_file, &pair.private_key)?;
                Ok(pair)
            }
        }
    }

    fn name(&self) -> &str {
        "wg"
    }
}
