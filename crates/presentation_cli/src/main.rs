//! ics-to-wiki CLI
//!
//! Publishes the upcoming events of an iCalendar feed as a table on a
//! MediaWiki page.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::{path::PathBuf, process::ExitCode};

use application::{ApplicationError, RunMode};
use chrono::Utc;
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, ConfigError, init_logging, wiki_page_service};
use tracing::{debug, error, info, warn};

/// ics-to-wiki CLI
#[derive(Debug, Parser)]
#[command(name = "ics-to-wiki")]
#[command(author, version, about = "Publish upcoming calendar events to a MediaWiki page", long_about = None)]
struct Cli {
    /// Configuration file (default: config.toml, if present)
    #[arg(short, long, global = true, env = "ICS_TO_WIKI_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Render the page but do not publish it
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Fetch the feed, render the table and replace the wiki page (default)
    #[default]
    Publish,

    /// Fetch the feed and print the rendered wikitext; never publishes
    Render,

    /// Validate the configuration and print it with the password redacted
    CheckConfig,
}

impl Cli {
    /// Mode for the publish command
    const fn run_mode(&self) -> RunMode {
        if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Publish
        }
    }
}

/// Process exit code for a failed run
fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(app_error) = error.downcast_ref::<ApplicationError>() {
        return u8::try_from(app_error.exit_code()).unwrap_or(1);
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return 2;
    }
    1
}

async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    let now = Utc::now();

    match cli.command.unwrap_or_default() {
        Commands::CheckConfig => {
            config.validate(RunMode::Publish)?;
            println!("{}", config.to_redacted_toml()?);
            info!("Configuration is valid");
        },

        Commands::Render => {
            let page = wiki_page_service(config, RunMode::DryRun, now)?
                .build_page(now)
                .await?;
            println!("{page}");
        },

        Commands::Publish => {
            let mode = cli.run_mode();
            let outcome = wiki_page_service(config, mode, now)?.run(now, mode).await?;
            if outcome.published {
                info!(rows = outcome.page.row_count, "Wiki page updated");
            } else {
                println!("{}", outcome.page);
            }
        },
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // before parsing, so `.env` can feed clap's `env` fallbacks
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref());

    let logging = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    if let Err(e) = init_logging(&logging, cli.verbose) {
        eprintln!("ics-to-wiki: {e}");
    }

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {},
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        command = ?cli.command.unwrap_or_default(),
        "ics-to-wiki starting"
    );

    let result = match config {
        Ok(config) => run(&cli, &config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_code(&e))
        },
    }
}
