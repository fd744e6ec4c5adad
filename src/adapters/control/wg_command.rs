use std::path::{Path, PathBuf};
use std::process::Command;

use crate::adapters::process;
use crate::core::errors::{Result, WgKnifeError};
use crate::core::models::key_pair::is_valid_key;
use crate::core::models::peer::PeerRecord;
use crate::core::traits::interface_control::InterfaceControl;

/// Interface controller that shells out to `wg set` / `wg show`,
/// optionally through `sudo`.
pub struct WgCommand {
    wg_path: PathBuf,
    sudo_path: Option<PathBuf>,
    assign_private_key: bool,
}

impl WgCommand {
    /// Run `wg_path` directly, or as `sudo_path wg_path ...` when given.
    pub fn new(wg_path: PathBuf, sudo_path: Option<PathBuf>) -> Self {
        Self {
            wg_path,
            sudo_path,
            assign_private_key: false,
        }
    }

    /// Also pass `private-key <file>` when authorizing a peer.
    pub fn with_private_key_assignment(mut self, enabled: bool) -> Self {
        self.assign_private_key = enabled;
        self
    }

    fn command(&self) -> Command {
        match &self.sudo_path {
            Some(sudo) => {
                let mut cmd = Command::new(sudo);
                cmd.arg(&self.wg_path);
                cmd
            }
            None => Command::new(&self.wg_path),
        }
    }

    fn wg(&self, operation: &str, args: &[String]) -> Result<String> {
        let out = process::run(&mut self.command(), args, None).map_err(|detail| {
            WgKnifeError::ControlSurfaceError {
                operation: operation.into(),
                detail,
            }
        })?;
        String::from_utf8(out).map_err(|_| WgKnifeError::ControlSurfaceError {
            operation: operation.into(),
            detail: "output is not valid UTF-8".into(),
        })
    }

    /// Arguments for `wg` that add or update `peer`.
    pub fn authorize_args(peer: &PeerRecord, private_key_file: &Path, assign: bool) -> Vec<String> {
        let mut args = vec!["set".to_string(), peer.interface.clone()];
        if assign {
            args.push("private-key".into());
            args.push(private_key_file.display().to_string());
        }
        args.extend([
            "peer".into(),
            peer.public_key.clone(),
            "allowed-ips".into(),
            peer.allowed_address.to_string(),
        ]);
        args
    }

    /// Parse `wg show <if> peers` output into public keys.
    ///
    /// Each non-empty line must hold one key, or `interface<TAB>key` as
    /// printed for `wg show all peers`. Anything else is rejected.
    pub fn parse_peers(output: &str) -> Result<Vec<String>> {
        let mut peers = Vec::new();
        for (idx, raw) in output.lines().enumerate() {
            let line = raw.trim_end();
            if line.is_empty() {
                continue;
            }
            let key = match line.split('\t').collect::<Vec<_>>().as_slice() {
                [key] | [_, key] => *key,
                _ => "",
            };
            if !is_valid_key(key) || key.trim() != key {
                return Err(WgKnifeError::ControlSurfaceError {
                    operation: "wg show".into(),
                    detail: format!("unexpected output at line {}: '{line}'", idx + 1),
                });
            }
            peers.push(key.to_string());
        }
        Ok(peers)
    }
}

impl InterfaceControl for WgCommand {
    fn authorize(&self, peer: &PeerRecord, private_key_file: &Path) -> Result<()> {
        if self.assign_private_key && !private_key_file.exists() {
            return Err(WgKnifeError::StorageUnavailable {
                path: private_key_file.to_path_buf(),
                reason: "private key file not found".into(),
            });
        }
        let args = Self::authorize_args(peer, private_key_file, self.assign_private_key);
        self.wg("wg set", &args)?;
        Ok(())
    }

    fn revoke(&self, interface: &str, public_key: &str) -> Result<()> {
        let present = self.list_authorized(interface)?;
        if !present.iter().any(|pk| pk == public_key) {
            tracing::debug!(interface, peer = public_key, "peer not present; nothing to revoke");
            return Ok(());
        }
        let args = [
            "set".to_string(),
            interface.to_string(),
            "peer".into(),
            public_key.to_string(),
            "remove".into(),
        ];
        self.wg("wg set", &args)?;
        Ok(())
    }

    fn list_authorized(&self, interface: &str) -> Result<Vec<String>> {
        let args = ["show".to_string(), interface.to_string(), "peers".into()];
        let out = self.wg("wg show", &args)?;
        Self::parse_peers(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PK_A: &str = "hSDwCYkwp1R0i33ctD73Wg2/Og0mOBr066SpjqqbTmo=";
    const PK_B: &str = "OGsUhWokRhyudXjE7Cyd9uvNx6YzxI1T3qj/odisvm4=";

    fn record() -> PeerRecord {
        PeerRecord {
            public_key: PK_A.into(),
            allowed_address: "10.0.0.5/24".parse().unwrap(),
            interface: "wg0".into(),
        }
    }

    #[test]
    fn authorize_args_without_key_assignment() {
        let args = WgCommand::authorize_args(&record(), Path::new("/tmp/peerA.key"), false);
        assert_eq!(
            args,
            vec!["set", "wg0", "peer", PK_A, "allowed-ips", "10.0.0.5/24"]
        );
    }

    #[test]
    fn authorize_args_with_key_assignment() {
        let args = WgCommand::authorize_args(&record(), Path::new("/tmp/peerA.key"), true);
        assert_eq!(
            args,
            vec![
                "set",
                "wg0",
                "private-key",
                "/tmp/peerA.key",
                "peer",
                PK_A,
                "allowed-ips",
                "10.0.0.5/24"
            ]
        );
    }

    #[test]
    fn parse_one_key_per_line() {
        let out = format!("{PK_A}\n{PK_B}\n");
        assert_eq!(WgCommand::parse_peers(&out).unwrap(), vec![PK_A, PK_B]);
    }

    #[test]
    fn parse_all_interfaces_form() {
        let out = format!("wg0\t{PK_A}\nwg1\t{PK_B}\n");
        assert_eq!(WgCommand::parse_peers(&out).unwrap(), vec![PK_A, PK_B]);
    }

    #[test]
    fn parse_empty_output() {
        assert!(WgCommand::parse_peers("").unwrap().is_empty());
        assert!(WgCommand::parse_peers("\n\n").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_unexpected_lines() {
        let cases = [
            "interface: wg0\n".to_string(),
            format!("{PK_A}\t(none)\t10.0.0.5/32\n"),
            format!(" {PK_A}\n"),
            "not-a-key\n".to_string(),
        ];
        for bad in &cases {
            let err = WgCommand::parse_peers(bad).unwrap_err();
            assert!(
                matches!(err, WgKnifeError::ControlSurfaceError { .. }),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn unreachable_binary_is_control_error() {
        let wg = WgCommand::new("/nonexistent/wg".into(), None);
        assert!(matches!(
            wg.list_authorized("wg0"),
            Err(WgKnifeError::ControlSurfaceError { .. })
        ));
        assert!(matches!(
            wg.revoke("wg0", PK_A),
            Err(WgKnifeError::ControlSurfaceError { .. })
        ));
    }

    #[test]
    fn assignment_requires_existing_key_file() {
        let wg = WgCommand::new("/nonexistent/wg".into(), None).with_private_key_assignment(true);
        let result = wg.authorize(&record(), Path::new("/nonexistent/peer.key"));
        assert!(matches!(result, Err(WgKnifeError::StorageUnavailable { .. })));
    }
}
