use std::path::Path;

use super::audit_helpers::{AuditEvent, log_audit};
use crate::adapters::registry::json_snapshot_store::JsonSnapshotStore;
use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;
use crate::core::services::registry_service::RegistryService;

/// Execute the `wgknife save` command.
pub fn execute(ctx: &Context, interface: &str, destination: &Path) -> Result<()> {
    let service = RegistryService {
        control: ctx.control(),
        store: JsonSnapshotStore,
    };
    let snapshot = service.save(interface, destination)?;

    output::success(&format!(
        "Saved {} peer(s) from {interface} to {}",
        snapshot.peers.len(),
        destination.display()
    ));

    log_audit(
        ctx,
        AuditEvent {
            action: AuditAction::Save,
            interface,
            public_key: None,
            detail: Some(destination.display().to_string()),
            state_hash: Some(snapshot.digest),
        },
    );

    Ok(())
}
