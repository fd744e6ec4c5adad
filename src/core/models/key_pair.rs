use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Length in bytes of a Curve25519 key as used by WireGuard.
pub const KEY_LEN: usize = 32;

/// Private and public halves of a peer identity, both as base64 text.
///
/// `private_key` is kept verbatim as read from (or written to) the key file.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Decode a base64 key into its raw 32 bytes, if well-formed.
pub fn decode_key(encoded: &str) -> Option<[u8; KEY_LEN]> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    bytes.try_into().ok()
}

/// Encode raw key bytes the way `wg` prints them.
pub fn encode_key(bytes: &[u8; KEY_LEN]) -> String {
    STANDARD.encode(bytes)
}

/// Whether `candidate` looks like a WireGuard public key.
pub fn is_valid_key(candidate: &str) -> bool {
    decode_key(candidate).is_some()
}

/// Derive the public key for a base64 private key.
///
/// Returns `None` when the private key is not a 32-byte base64 value.
pub fn derive_public_key(private_key: &str) -> Option<String> {
    let secret = x25519_dalek::StaticSecret::from(decode_key(private_key)?);
    let public = x25519_dalek::PublicKey::from(&secret);
    Some(encode_key(public.as_bytes()))
}
