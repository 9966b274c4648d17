//! Quire - Markdown blog publisher

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use quire::cli::Cli;
use quire::commands;
use quire::status::StatusMessage;

/// Log filter variable; falls back to `warn`, or `debug` with `-v`
const LOG_ENV: &str = "QUIRE_LOG";

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let action = cli.command.action();
    if let Err(e) = commands::run(cli).await {
        tracing::debug!(error = ?e, "command failed");
        StatusMessage::from_error(action, &e).print();
        if let Some(help) = e.help() {
            eprintln!("  help: {help}");
        }
        std::process::exit(1);
    }
}
