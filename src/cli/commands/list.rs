use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;

/// Execute the `wgknife list` command.
///
/// With `--quiet`, prints bare keys one per line for scripting.
pub fn execute(ctx: &Context, interface: &str) -> Result<()> {
    let peers = ctx.peer_service().list(interface)?;

    if output::is_quiet() {
        for pk in &peers {
            println!("{pk}");
        }
        return Ok(());
    }

    if peers.is_empty() {
        output::warning(&format!("No peers authorized on {interface}."));
        println!("  Run 'wgknife add <address> <key-file> {interface}' to add one.");
        return Ok(());
    }

    output::header(&format!("Authorized peers on {interface} ({})", peers.len()));
    for pk in &peers {
        println!("  • {pk}");
    }

    Ok(())
}
