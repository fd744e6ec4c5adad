use chrono::Utc;

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::cli::context::Context;
use crate::cli::output;
use crate::core::models::audit_entry::{AuditAction, AuditEntry};
use crate::core::traits::audit::AuditLogger;

/// Who ran the command: the invoking user under sudo, else `$USER`.
pub fn current_user() -> String {
    ["SUDO_USER", "USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Fields of one audit record besides timestamp and user.
pub struct AuditEvent<'a> {
    pub action: AuditAction,
    pub interface: &'a str,
    pub public_key: Option<&'a str>,
    pub detail: Option<String>,
    pub state_hash: Option<String>,
}

/// Record an audit event if `[audit]` is configured. Warns on failure
/// instead of propagating, since the operation itself already succeeded.
pub fn log_audit(ctx: &Context, event: AuditEvent<'_>) {
    let Some(logger) = JsonAuditLogger::from_config(ctx.config.audit.as_ref()) else {
        return;
    };

    let entry = AuditEntry {
        timestamp: Utc::now(),
        user: current_user(),
        action: event.action,
        interface: event.interface.to_string(),
        public_key: event.public_key.map(str::to_string),
        detail: event.detail,
        state_hash: event.state_hash,
    };

    if let Err(e) = logger.log_event(&entry) {
        tracing::warn!(error = %e, "audit write failed");
        output::warning(&format!("Could not write audit log: {e}"));
    }
}
