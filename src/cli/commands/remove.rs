use super::audit_helpers::{AuditEvent, log_audit};
use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;

/// Execute the `wgknife remove` command.
///
/// Removing a peer that is not on the interface succeeds.
pub fn execute(ctx: &Context, pubkey: &str, interface: &str) -> Result<()> {
    ctx.peer_service().remove(pubkey, interface)?;
    output::success(&format!("Removed {pubkey} from {interface}"));

    log_audit(
        ctx,
        AuditEvent {
            action: AuditAction::PeerRemove,
            interface,
            public_key: Some(pubkey),
            detail: None,
            state_hash: None,
        },
    );

    Ok(())
}
