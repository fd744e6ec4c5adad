use std::path::{Path, PathBuf};

use lettre::message::Mailbox;

use super::audit_helpers::{AuditEvent, log_audit};
use crate::adapters::delivery::smtp_delivery::SmtpDelivery;
use crate::adapters::keys::wg_tool_provider::WgToolKeyProvider;
use crate::adapters::keys::x25519_provider::X25519KeyProvider;
use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::{Result, WgKnifeError};
use crate::core::models::audit_entry::AuditAction;
use crate::core::models::profile::validate_endpoint;
use crate::core::services::peer_service::{AddPeer, AddedPeer};
use crate::core::services::profile_builder::{self, BuiltProfile};
use crate::core::traits::delivery::CredentialDelivery;
use crate::core::traits::key_provider::KeyProvider;

/// Arguments of `wgknife add`.
pub struct AddArgs<'a> {
    pub pubkey: Option<&'a str>,
    pub address: &'a str,
    pub private_key_file: &'a Path,
    pub interface: &'a str,
    pub email: Option<&'a str>,
    pub output_dir: Option<&'a Path>,
    pub endpoint: Option<&'a str>,
}

/// Execute the `wgknife add` command.
///
/// The endpoint, the recipient and the delivery settings are checked
/// before anything is generated or authorized. A delivery failure
/// afterwards leaves the peer in place.
pub fn execute(ctx: &Context, args: &AddArgs<'_>) -> Result<()> {
    let endpoint = args.endpoint.or(ctx.config.server.endpoint.as_deref());

    if let Some(dir) = args.output_dir
        && !dir.is_dir()
    {
        return Err(WgKnifeError::usage(format!(
            "--output-dir {} is not a directory",
            dir.display()
        )));
    }

    match endpoint {
        Some(endpoint) => validate_endpoint(endpoint)?,
        None if args.output_dir.is_some() => {
            return Err(WgKnifeError::usage(
                "--output-dir needs a server endpoint ([server] endpoint or --endpoint)",
            ));
        }
        None => {}
    }

    let delivery = match args.email {
        Some(recipient) => Some(prepare_delivery(ctx, recipient, endpoint, args.output_dir)?),
        None => None,
    };

    let request = AddPeer {
        public_key: args.pubkey,
        address: args.address,
        private_key_file: args.private_key_file,
        interface: args.interface,
    };
    let added = match ctx.key_backend.as_str() {
        "wg" => provision(
            ctx,
            WgToolKeyProvider::with_path(ctx.config.control.wg_path.clone()),
            &request,
        )?,
        _ => provision(ctx, X25519KeyProvider::new(), &request)?,
    };

    report(&added, args.private_key_file);
    log_audit(
        ctx,
        AuditEvent {
            action: AuditAction::PeerAdd,
            interface: &added.record.interface,
            public_key: Some(added.keys.public_key.as_str()),
            detail: Some(format!("allowed-ips {}", added.record.allowed_address)),
            state_hash: None,
        },
    );

    let Some(endpoint) = endpoint else {
        output::warning(
            "No server endpoint configured; skipping the connection profile.\n    \
             Set [server] endpoint in the config or pass --endpoint.",
        );
        return Ok(());
    };

    let built = profile_builder::build(
        &added.record.interface,
        &added.keys.private_key,
        &added.keys.public_key,
        added.host,
        endpoint,
    )?;

    match (delivery, args.email) {
        (Some(delivery), Some(recipient)) => {
            delivery.deliver(&built, recipient)?;
            output::success(&format!("Profile sent to {recipient}"));
        }
        _ => show_locally(&built, args.output_dir)?,
    }

    Ok(())
}

fn provision<K: KeyProvider>(ctx: &Context, keys: K, request: &AddPeer<'_>) -> Result<AddedPeer> {
    tracing::debug!(backend = keys.name(), "provisioning peer keys");
    ctx.peer_service_with(keys).add(request)
}

fn prepare_delivery(
    ctx: &Context,
    recipient: &str,
    endpoint: Option<&str>,
    output_dir: Option<&Path>,
) -> Result<SmtpDelivery> {
    let mail = ctx.config.mail.clone().ok_or_else(|| {
        WgKnifeError::usage("--email needs a [mail] section in the config file")
    })?;
    recipient.parse::<Mailbox>().map_err(|e| {
        WgKnifeError::usage(format!("--email '{recipient}' is not a valid address: {e}"))
    })?;
    if endpoint.is_none() {
        return Err(WgKnifeError::usage(
            "--email needs a server endpoint ([server] endpoint or --endpoint)",
        ));
    }
    Ok(SmtpDelivery::new(mail, output_dir.map(PathBuf::from)))
}

fn report(added: &AddedPeer, private_key_file: &Path) {
    if added.generated {
        output::success(&format!(
            "Generated key pair, private key written to {}",
            private_key_file.display()
        ));
    }
    output::success(&format!(
        "Authorized {} on {} (allowed-ips {})",
        added.record.public_key, added.record.interface, added.record.allowed_address
    ));
}

fn show_locally(built: &BuiltProfile, output_dir: Option<&Path>) -> Result<()> {
    if let Some(dir) = output_dir {
        let path = dir.join(profile_builder::image_file_name(
            &built.profile.peer_public_key,
        ));
        profile_builder::save_png(&built.code, &path)?;
        output::success(&format!("QR code saved to {}", path.display()));
    }

    if output::is_quiet() {
        return Ok(());
    }
    output::header("Connection profile");
    println!("{}", built.text);
    println!("{}", profile_builder::render_terminal(&built.code));
    Ok(())
}
