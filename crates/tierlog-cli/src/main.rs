//! tierlog CLI - emit entries, inspect file routes and serve the level endpoint

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` may set TIERLOG_LEVEL, so load it before parsing
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    output::set_json_mode(cli.json);
    if !atty::is(atty::Stream::Stderr) {
        colored::control::set_override(false);
    }

    // `serve` routes tracing into tierlog itself
    if !matches!(cli.command, Commands::Serve(_)) {
        let log_level = match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| format!("tierlog={}", log_level).into()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .without_time(),
            )
            .init();
    }

    let result = match load_config(&cli) {
        Ok(config) => match cli.command {
            Commands::Emit(args) => emit::execute(&config, args),
            Commands::Routes => routes::execute(&config),
            Commands::Serve(args) => serve::execute(&config, args).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
