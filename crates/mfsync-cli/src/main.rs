mod cli;
mod commands;
mod interactive;
mod logging;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::CommandOptions;

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130);
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let options = CommandOptions::new(cli.verbose, cli.dry_run, cli.yes, cli.config.as_deref());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match &cli.command {
        Commands::List {
            store,
            resources,
            entries,
            output,
        } => {
            runtime
                .block_on(commands::List::execute(
                    store,
                    *resources,
                    *entries,
                    output.as_deref(),
                    &options,
                ))
                .context("Failed to execute list command")?;
        }
        Commands::Copy(args) => {
            runtime
                .block_on(commands::Copy::execute(args, &options))
                .context("Failed to execute copy command")?;
        }
        Commands::Delete {
            store,
            resources,
            manifest,
            entries,
        } => {
            runtime
                .block_on(commands::Delete::execute(
                    store,
                    *resources,
                    manifest.as_deref(),
                    *entries,
                    &options,
                ))
                .context("Failed to execute delete command")?;
        }
        Commands::Bulk(args) => {
            runtime
                .block_on(commands::Bulk::execute(args, &options))
                .context("Failed to execute bulk command")?;
        }
    }

    Ok(())
}
