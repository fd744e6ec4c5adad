use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditEntry;

/// Port for recording completed operations.
pub trait AuditLogger {
    /// Append an entry to the journal.
    fn log_event(&self, entry: &AuditEntry) -> Result<()>;
}
