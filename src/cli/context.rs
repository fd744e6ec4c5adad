use crate::adapters::control::wg_command::WgCommand;
use crate::adapters::keys::x25519_provider::X25519KeyProvider;
use crate::cli::Cli;
use crate::config::app_config::{AppConfig, validate_key_backend};
use crate::core::errors::Result;
use crate::core::services::peer_service::PeerService;

/// Settings resolved once at startup and handed to every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: AppConfig,
    /// Key backend after applying `--keygen` over `[keys] backend`.
    pub key_backend: String,
}

impl Context {
    /// Load the config named on the command line (or found by default)
    /// and apply command-line overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = AppConfig::load(cli.config.as_deref())?;
        let key_backend = cli
            .keygen
            .clone()
            .unwrap_or_else(|| config.keys.backend.clone());
        validate_key_backend(&key_backend)?;

        Ok(Self {
            config,
            key_backend,
        })
    }

    /// Interface controller configured from `[control]`.
    pub fn control(&self) -> WgCommand {
        let control = &self.config.control;
        let sudo = control.use_sudo.then(|| control.sudo_path.clone());
        WgCommand::new(control.wg_path.clone(), sudo)
            .with_private_key_assignment(control.assign_private_key)
    }

    /// Peer service for verbs that never generate keys.
    pub fn peer_service(&self) -> PeerService<X25519KeyProvider, WgCommand> {
        self.peer_service_with(X25519KeyProvider::new())
    }

    /// Peer service backed by the given key provider.
    pub fn peer_service_with<K>(&self, keys: K) -> PeerService<K, WgCommand>
    where
        K: crate::core::traits::key_provider::KeyProvider,
    {
        PeerService {
            keys,
            control: self.control(),
            prefix_v4: self.config.control.peer_prefix,
            prefix_v6: self.config.control.peer_prefix_v6,
        }
    }
}
