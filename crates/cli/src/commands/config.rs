//! Config Commands

use std::path::Path;

use anyhow::{bail, Result};
use clap::Subcommand;

use autodesign_common::Config;

use crate::output::{print_document, print_success, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

pub fn execute(cmd: ConfigCommands, path: &Path, config: &Config, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save(path)?;
            print_success(&format!("Wrote {}", path.display()));
        }

        ConfigCommands::Show => match format {
            OutputFormat::Table => print!("{}", toml::to_string_pretty(config)?),
            _ => print_document(config, format)?,
        },
    }

    Ok(())
}
