use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::core::errors::{Result, WgKnifeError};
use crate::core::models::key_pair::{KeyPair, derive_public_key};

/// Write a private key as a single line, replacing any previous file.
///
/// The key goes to a fresh owner-only (0600 on Unix) temp file next to
/// `path`, which is then renamed over it. An existing file at `path` is
/// replaced, never written into.
pub fn write_private_key(path: &Path, private_key: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| WgKnifeError::storage(path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))
            .map_err(|e| WgKnifeError::storage(path, e))?;
    }
    writeln!(file, "{private_key}").map_err(|e| WgKnifeError::storage(path, e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| WgKnifeError::storage(path, e))?;

    file.persist(path)
        .map_err(|e| WgKnifeError::storage(path, e.error))?;
    Ok(())
}

/// Read a stored private key, trimmed of surrounding whitespace.
pub fn read_private_key(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| WgKnifeError::storage(path, e))?;
    let key = content.trim();
    if key.is_empty() {
        return Err(WgKnifeError::StorageUnavailable {
            path: path.to_path_buf(),
            reason: "private key file is empty".into(),
        });
    }
    Ok(key.to_string())
}

/// Pair a caller-supplied public key with the private key stored at `path`.
///
/// Correspondence is not enforced. A mismatch that can be detected is
/// logged and the pair is returned as given.
pub fn reuse(public_key: &str, path: &Path) -> Result<KeyPair> {
    let private_key = read_private_key(path)?;

    match derive_public_key(&private_key) {
        Some(derived) if derived != public_key => tracing::warn!(
            supplied = public_key,
            derived = %derived,
            file = %path.display(),
            "stored private key does not match the supplied public key"
        ),
        Some(_) => {}
        None => tracing::debug!(
            file = %path.display(),
            "stored private key is not a base64 x25519 key; skipping match check"
        ),
    }

    Ok(KeyPair {
        private_key,
        public_key: public_key.to_string(),
    })
}
