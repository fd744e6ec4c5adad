use std::path::PathBuf;

/// All domain errors for wgknife.
///
/// Each variant names the step that failed so the message alone is
/// enough to see what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum WgKnifeError {
    #[error("Key generation failed: {reason}")]
    KeyGenerationFailed { reason: String },

    #[error(
        "Storage unavailable: {path}\n\n  \
         {reason}\n  \
         Check that the path exists and is readable/writable by this user."
    )]
    StorageUnavailable { path: PathBuf, reason: String },

    #[error(
        "Interface control failed during '{operation}': {detail}\n\n  \
         Common causes:\n    \
         → The interface does not exist (check: wg show interfaces)\n    \
         → Insufficient privilege (run as root or enable use_sudo)"
    )]
    ControlSurfaceError { operation: String, detail: String },

    #[error(
        "Credential delivery failed: {reason}\n\n  \
         The peer stays authorized on the interface.\n  \
         Remove it with 'wgknife remove <public-key> <interface>' if it should not keep access."
    )]
    DeliveryFailed { reason: String },

    #[error("Usage error: {detail}")]
    UsageError { detail: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Could not encode connection profile: {reason}")]
    ProfileEncodingFailed { reason: String },
}

impl WgKnifeError {
    /// Wrap an I/O failure on `path` as `StorageUnavailable`.
    pub fn storage(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Shorthand for a `UsageError`.
    pub fn usage(detail: impl Into<String>) -> Self {
        Self::UsageError {
            detail: detail.into(),
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UsageError { .. } => 2,
            _ => 1,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WgKnifeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_with_two() {
        assert_eq!(WgKnifeError::usage("bad").exit_code(), 2);
        let err = WgKnifeError::DeliveryFailed {
            reason: "timeout".into(),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn control_error_names_operation() {
        let err = WgKnifeError::ControlSurfaceError {
            operation: "wg show".into(),
            detail: "No such device".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'wg show'"));
        assert!(msg.contains("No such device"));
    }

    #[test]
    fn storage_error_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = WgKnifeError::storage("/tmp/peer.key", io);
        assert!(err.to_string().contains("/tmp/peer.key"));
    }
}
