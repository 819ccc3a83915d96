//! Classifieds scraper CLI
//!
//! Run settings are read from `CLASSIFIEDS_*` environment variables.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use classifieds::{
    error::Result,
    models::{Config, ScrapeProfile, config::env},
    pipeline,
    services::HttpMarkupSource,
    storage::ShellPersister,
};

/// Classifieds - listing scraper and dataset publisher
#[derive(Parser, Debug)]
#[command(
    name = "classifieds",
    version,
    about = "Scrapes classified listings into a versioned dataset"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Scrape all pages and persist through the external tool (default)
    Run,

    /// Scrape all pages and write the output file only
    Scrape,

    /// Validate environment configuration and scrape profile
    Validate,

    /// Print the active extraction rules as TOML
    Rules,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load the profile named by the environment, or the built-in one.
fn load_profile(path: Option<&PathBuf>) -> Result<ScrapeProfile> {
    match path {
        Some(path) => {
            log::info!("Loading scrape profile from {}", path.display());
            ScrapeProfile::load(path)
        }
        None => Ok(ScrapeProfile::default()),
    }
}

/// Load and validate everything a scrape needs, before any network activity.
fn load_run_settings() -> Result<(Config, ScrapeProfile)> {
    let config = Config::from_env()?;
    let profile = load_profile(config.profile_path.as_ref())?;
    config.validate()?;
    profile.validate()?;
    Ok((config, profile))
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Rules => {
            let path = std::env::var(env::PROFILE).ok().map(PathBuf::from);
            let profile = load_profile(path.as_ref())?;
            print!("{}", toml::to_string_pretty(&profile)?);
        }

        Command::Validate => {
            let (config, profile) = load_run_settings()?;
            log::info!("✓ Config OK (dataset {}, {} page(s))", config.dataset, config.pages);
            log::info!("✓ Profile OK ({} rule(s))", profile.rules.len());
        }

        Command::Scrape => {
            let (config, profile) = load_run_settings()?;
            let source = HttpMarkupSource::new(&profile.crawler)?;
            let outcome = pipeline::run_scrape(&config, &profile, &source).await?;
            pipeline::write_output(&config, &outcome.listings).await?;
        }

        Command::Run => {
            let (config, profile) = load_run_settings()?;
            let persister = ShellPersister::new(&config, profile.persist.clone())?;
            let source = HttpMarkupSource::new(&profile.crawler)?;
            let outcome = pipeline::run_pipeline(&config, &profile, &source, &persister).await?;
            println!("{}", outcome.report.output.trim_end());
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command.unwrap_or(Command::Run)).await {
        Ok(()) => {
            log::info!("Done!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
