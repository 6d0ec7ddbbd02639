//! jarshift CLI - Command-line utility for migrating JAR and WAR archives
//! between package namespaces.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = !cli.quiet && !cli.json;

    match &cli.command {
        cli::Commands::Migrate(args) => commands::migrate::execute(args, &*formatter, show_progress),
        cli::Commands::Scan(args) => commands::scan::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}

/// Logs go to stderr so they never mix with JSON on stdout. `RUST_LOG`
/// overrides the level picked from the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
