pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Add, remove, list and save WireGuard peers.
#[derive(Parser, Debug)]
#[command(name = "wgknife", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file (default: ./wgknife.toml, then the user config dir)
    #[arg(long, global = true, env = "WGKNIFE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Key generation backend: builtin or wg (overrides [keys] backend)
    #[arg(long, global = true)]
    pub keygen: Option<String>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors and requested data
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision a peer and authorize it on an interface
    Add {
        /// Public key of an existing peer; a new key pair is generated when omitted
        #[arg(long)]
        pubkey: Option<String>,
        /// Host address allocated to the peer (e.g. 10.0.0.5)
        address: String,
        /// Where the peer's private key is written (or read, with --pubkey)
        private_key_file: PathBuf,
        /// WireGuard interface name
        interface: String,
        /// Email the connection profile to this address
        #[arg(long)]
        email: Option<String>,
        /// Directory for the QR code PNG
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Server endpoint written into the profile (overrides [server] endpoint)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Revoke a peer from an interface
    Remove {
        /// Public key of the peer to remove
        pubkey: String,
        /// WireGuard interface name
        interface: String,
    },

    /// List the peers authorized on an interface
    List {
        /// WireGuard interface name
        interface: String,
    },

    /// Save the current peer list to a JSON file
    Save {
        /// WireGuard interface name
        interface: String,
        /// File the peer list is written to
        destination: PathBuf,
    },
}
