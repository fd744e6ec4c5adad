use std::path::Path;

use rand::RngCore;
use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};

use super::key_file;
use crate::core::errors::{Result, WgKnifeError};
use crate::core::models::key_pair::{KEY_LEN, KeyPair, encode_key};
use crate::core::traits::key_provider::KeyProvider;

/// In-process Curve25519 key generation using the OS random source.
///
/// Output matches `wg genkey | tee priv | wg pubkey`: clamped private
/// scalar, base64 on both halves.
#[derive(Debug, Default, Clone, Copy)]
pub struct X25519KeyProvider;

impl X25519KeyProvider {
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh key pair without touching the filesystem.
    pub fn generate() -> Result<KeyPair> {
        let mut scalar = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut scalar)
            .map_err(|e| WgKnifeError::KeyGenerationFailed {
                reason: format!("OS random source unavailable: {e}"),
            })?;
        scalar[0] &= 248;
        scalar[31] &= 127;
        scalar[31] |= 64;

        let secret = StaticSecret::from(scalar);
        let public = PublicKey::from(&secret);

        Ok(KeyPair {
            private_key: encode_key(&secret.to_bytes()),
            public_key: encode_key(public.as_bytes()),
        })
    }
}

impl KeyProvider for X25519KeyProvider {
    fn provision(
        &self,
        existing_public_key: Option<&str>,
        private_key_file: &Path,
    ) -> Result<KeyPair> {
        match existing_public_key {
            Some(public_key) => key_file::reuse(public_key, private_key_file),
            None => {
                let pair = Self::generate()?;
                key_file::write_private_key(private_key_file, &pair.private_key)?;
                tracing::debug!(file = %private_key_file.display(), "generated new key pair");
                Ok(pair)
            }
        }
    }

    fn name(&self) -> &str {
        "builtin"
    }
}
