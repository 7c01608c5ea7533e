//! reactqa - ReAct question-answering agent CLI
//!
#![doc = "Main entry point for the reactqa command."]

use anyhow::Result;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reactqa::cli::Cli;
use reactqa::commands;
use reactqa::config::Config;

#[tokio::main]
async fn main() {
    // Credentials may live in a .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    commands::ask::run_ask(config, &cli.question, cli.verbose).await?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "reactqa=debug" } else { "reactqa=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
