use anyhow::Result;
use clap::Parser;
use std::fs;
use std::process::ExitCode;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tubesmith::catalog::persistence;
use tubesmith::cli::{Cli, Command};
use tubesmith::commands;
use tubesmith::console;
use tubesmith::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    debug!(catalog = ?config.catalog_path, "loading catalog");
    let mut catalog = persistence::load(&config.catalog_path)?;

    match cli.command {
        Command::Status => {
            commands::status(&catalog);
            return Ok(());
        }
        Command::Json => return commands::dump_json(&catalog),
        Command::Add { target } => commands::add::run(&mut catalog, &config, target).await?,
        Command::Desc(args) => commands::desc::run(&mut catalog, &config, args)?,
        Command::Schedule { action } => {
            commands::schedule::run(&mut catalog, &config, action).await?
        }
        Command::Upload => commands::upload::run(&mut catalog, &config).await?,
    }

    fs::create_dir_all(&config.root_path)?;
    persistence::save(&config.catalog_path, &catalog)
}
