mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::commands::add::AddArgs;
use cli::context::Context;
use cli::{Cli, Commands};
use crate::core::errors::Result;

fn main() {
    let args = Cli::parse();

    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    cli::output::set_quiet(args.quiet);

    if let Err(e) = run(&args) {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(e.exit_code());
    }
}

fn run(args: &Cli) -> Result<()> {
    let ctx = Context::load(args)?;

    match &args.command {
        Commands::Add {
            pubkey,
            address,
            private_key_file,
            interface,
            email,
            output_dir,
            endpoint,
        } => cli::commands::add::execute(
            &ctx,
            &AddArgs {
                pubkey: pubkey.as_deref(),
                address,
                private_key_file,
                interface,
                email: email.as_deref(),
                output_dir: output_dir.as_deref(),
                endpoint: endpoint.as_deref(),
            },
        ),
        Commands::Remove { pubkey, interface } => {
            cli::commands::remove::execute(&ctx, pubkey, interface)
        }
        Commands::List { interface } => cli::commands::list::execute(&ctx, interface),
        Commands::Save {
            interface,
            destination,
        } => cli::commands::save::execute(&ctx, interface, destination),
    }
}
