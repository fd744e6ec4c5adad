use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::config::app_config::AuditSection;
use crate::core::errors::{Result, WgKnifeError};
use crate::core::models::audit_entry::AuditEntry;
use crate::core::traits::audit::AuditLogger;

/// Audit logger that appends entries as JSON lines to a file.
///
/// Each line is a self-contained JSON object for one `AuditEntry`, so the
/// journal can be appended to without reading it and tailed with `jq`.
pub struct JsonAuditLogger {
    log_path: PathBuf,
}

impl JsonAuditLogger {
    /// Create a logger that appends to `log_path`.
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Build a logger from the `[audit]` section, if auditing is on.
    pub fn from_config(section: Option<&AuditSection>) -> Option<Self> {
        section
            .filter(|a| a.enabled)
            .map(|a| Self::new(a.log_file.clone()))
    }
}

impl AuditLogger for JsonAuditLogger {
    fn log_event(&self, entry: &AuditEntry) -> Result<()> {
        let line = serde_json::to_string(entry).map_err(|e| WgKnifeError::StorageUnavailable {
            path: self.log_path.clone(),
            reason: format!("failed to serialize audit entry: {e}"),
        })?;

        if let Some(parent) = self.log_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| WgKnifeError::storage(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| WgKnifeError::storage(&self.log_path, e))?;

        writeln!(file, "{line}").map_err(|e| WgKnifeError::storage(&self.log_path, e))?;

        Ok(())
    }
}
