use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, WgKnifeError};

/// File name looked up in the working directory when no config is named.
pub const LOCAL_CONFIG: &str = "wgknife.toml";

/// Key backends that `[keys] backend` may name.
pub const KEY_BACKENDS: &[&str] = &["builtin", "wg"];

/// Top-level configuration, every section optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub control: ControlSection,
    #[serde(default)]
    pub keys: KeysSection,
    pub mail: Option<MailSection>,
    pub audit: Option<AuditSection>,
}

impl AppConfig {
    /// Resolve and load the configuration.
    ///
    /// An explicit path must exist. Otherwise `./wgknife.toml`, then
    /// `<config dir>/wgknife/config.toml`, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(WgKnifeError::InvalidConfig {
                    detail: format!("config file {} not found", path.display()),
                });
            }
            return Self::from_file(path);
        }

        match Self::default_locations().into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("wgknife").join("config.toml"));
        }
        candidates
    }

    /// Parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WgKnifeError::InvalidConfig {
            detail: format!("cannot read {}: {e}", path.display()),
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            WgKnifeError::InvalidConfig { detail } => WgKnifeError::InvalidConfig {
                detail: format!("{}: {detail}", path.display()),
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| WgKnifeError::InvalidConfig {
            detail: format!("failed to parse: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.control.peer_prefix > 32 {
            return Err(WgKnifeError::InvalidConfig {
                detail: format!("control.peer_prefix {} is above 32", self.control.peer_prefix),
            });
        }
        if self.control.peer_prefix_v6 > 128 {
            return Err(WgKnifeError::InvalidConfig {
                detail: format!(
                    "control.peer_prefix_v6 {} is above 128",
                    self.control.peer_prefix_v6
                ),
            });
        }
        validate_key_backend(&self.keys.backend)?;
        if let Some(mail) = &self.mail
            && mail.smtp_port == 0
        {
            return Err(WgKnifeError::InvalidConfig {
                detail: "mail.smtp_port must not be 0".into(),
            });
        }
        Ok(())
    }
}

/// Reject backend names other than those in `KEY_BACKENDS`.
pub fn validate_key_backend(name: &str) -> Result<()> {
    if KEY_BACKENDS.contains(&name) {
        Ok(())
    } else {
        Err(WgKnifeError::InvalidConfig {
            detail: format!(
                "unknown key backend '{name}'. Use one of: {}",
                KEY_BACKENDS.join(", ")
            ),
        })
    }
}

/// The `[server]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// `host:port` clients connect to; written into every profile.
    pub endpoint: Option<String>,
}

/// The `[control]` section: how the interface is driven.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlSection {
    #[serde(default = "default_wg_path")]
    pub wg_path: PathBuf,
    #[serde(default = "default_true")]
    pub use_sudo: bool,
    #[serde(default = "default_sudo_path")]
    pub sudo_path: PathBuf,
    #[serde(default = "default_peer_prefix")]
    pub peer_prefix: u8,
    #[serde(default = "default_peer_prefix_v6")]
    pub peer_prefix_v6: u8,
    #[serde(default)]
    pub assign_private_key: bool,
}

impl Default for ControlSection {
    fn default() -> Self {
        Self {
            wg_path: default_wg_path(),
            use_sudo: true,
            sudo_path: default_sudo_path(),
            peer_prefix: default_peer_prefix(),
            peer_prefix_v6: default_peer_prefix_v6(),
            assign_private_key: false,
        }
    }
}

/// The `[keys]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeysSection {
    #[serde(default = "default_key_backend")]
    pub backend: String,
}

impl Default for KeysSection {
    fn default() -> Self {
        Self {
            backend: default_key_backend(),
        }
    }
}

/// The `[mail]` section. Credentials live in a separate file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MailSection {
    pub sender: String,
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub credentials_file: PathBuf,
    #[serde(default = "default_subject")]
    pub subject: String,
}

/// The `[audit]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub log_file: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_wg_path() -> PathBuf {
    PathBuf::from("wg")
}

fn default_sudo_path() -> PathBuf {
    PathBuf::from("sudo")
}

fn default_peer_prefix() -> u8 {
    24
}

fn default_peer_prefix_v6() -> u8 {
    64
}

fn default_key_backend() -> String {
    "builtin".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject() -> String {
    "WireGuard client configuration".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert!(config.server.endpoint.is_none());
        assert_eq!(config.control.wg_path, PathBuf::from("wg"));
        assert!(config.control.use_sudo);
        assert_eq!(config.control.peer_prefix, 24);
        assert_eq!(config.keys.backend, "builtin");
        assert!(config.mail.is_none());
        assert!(config.audit.is_none());
    }

    #[test]
    fn full_config_parses() {
        let config = AppConfig::parse(
            r#"
            [server]
            endpoint = "vpn.example.com:51820"

            [control]
            wg_path = "/usr/bin/wg"
            use_sudo = false
            peer_prefix = 32
            assign_private_key = true

            [keys]
            backend = "wg"

            [mail]
            sender = "ops@example.com"
            smtp_host = "smtp.example.com"
            credentials_file = "/etc/wgknife/smtp"

            [audit]
            log_file = "/var/log/wgknife/audit.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.endpoint.as_deref(), Some("vpn.example.com:51820"));
        assert!(!config.control.use_sudo);
        assert!(config.control.assign_private_key);
        assert_eq!(config.control.peer_prefix, 32);
        assert_eq!(config.keys.backend, "wg");
        let mail = config.mail.unwrap();
        assert_eq!(mail.smtp_port, 587);
        assert_eq!(mail.subject, "WireGuard client configuration");
        assert!(config.audit.unwrap().enabled);
    }

    #[test]
    fn rejects_out_of_range_prefix() {
        let err = AppConfig::parse("[control]\npeer_prefix = 33\n").unwrap_err();
        assert!(err.to_string().contains("peer_prefix"));
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(AppConfig::parse("[keys]\nbackend = \"openssl\"\n").is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(AppConfig::parse("[mail]\nsender = \"a@b.c\"\npassword = \"hunter2\"\n").is_err());
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(WgKnifeError::InvalidConfig { .. })));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[server]\nendpoint = \"10.1.1.1:51820\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.endpoint.as_deref(), Some("10.1.1.1:51820"));
    }
}
