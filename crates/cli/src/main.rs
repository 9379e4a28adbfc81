//! AutoDesign CLI - Main Entry Point
//!
//! Generates Gherkin features, page objects, step bindings and Playwright
//! tests from a recorded browser session, a screenshot or a text description.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

mod commands;
mod output;

use autodesign_common::Config;
use commands::{image, record, text};

/// AutoDesign CLI - Test Plan Synthesis
#[derive(Parser)]
#[command(name = "autodesign")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "autodesign.toml", global = true)]
    config: PathBuf,

    /// Output root directory (overrides output_root)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Build the plan and render it without writing files
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record user actions in a live browser
    Record(record::RecordArgs),

    /// Analyze a text description or user story
    Text(text::TextArgs),

    /// Generate from a screenshot's detected fields
    Image(image::ImageArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(commands::config::ConfigCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(output) = cli.output {
        config.output_root = output;
    }
    debug!(
        "Using {} (output root {})",
        cli.config.display(),
        config.output_root.display()
    );

    match cli.command {
        Commands::Record(args) => record::execute(args, config, cli.dry_run, cli.format).await?,
        Commands::Text(args) => text::execute(args, config, cli.dry_run, cli.format).await?,
        Commands::Image(args) => image::execute(args, config, cli.dry_run, cli.format).await?,
        Commands::Config(cmd) => commands::config::execute(cmd, &cli.config, &config, cli.format)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_text_requires_a_source() {
        assert!(Cli::try_parse_from(["autodesign", "text", "--name", "X"]).is_err());
        assert!(Cli::try_parse_from(["autodesign", "text", "--name", "X", "--text", "log in"]).is_ok());
    }

    #[test]
    fn test_image_detector_command() {
        let cli = Cli::try_parse_from([
            "autodesign",
            "--dry-run",
            "image",
            "--path",
            "shot.png",
            "--name",
            "Login",
            "--detector-cmd",
            "python3",
            "scan.py",
            "--json",
        ])
        .unwrap();

        assert!(cli.dry_run);
        match cli.command {
            Commands::Image(args) => assert_eq!(args.detector_cmd, vec!["python3", "scan.py", "--json"]),
            _ => panic!("expected image command"),
        }
    }

    #[test]
    fn test_config_round_trip_through_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autodesign.toml");
        commands::config::execute(
            commands::config::ConfigCommands::Init { force: false },
            &path,
            &Config::default(),
            output::OutputFormat::Table,
        )
        .unwrap();

        assert_eq!(Config::load(&path).unwrap(), Config::default());
        assert!(commands::config::execute(
            commands::config::ConfigCommands::Init { force: false },
            &path,
            &Config::default(),
            output::OutputFormat::Table,
        )
        .is_err());
    }
}
