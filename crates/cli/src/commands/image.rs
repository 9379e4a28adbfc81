//! Image Command

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use autodesign_common::Config;
use autodesign_synth::{ImageStrategy, PlanRequest, Synthesizer};

use crate::output::OutputFormat;

#[derive(Args)]
pub struct ImageArgs {
    /// Screenshot to analyze
    #[arg(short, long)]
    pub path: PathBuf,

    /// Feature name
    #[arg(short, long)]
    pub name: String,

    /// Field detector command; the image path is appended to it
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    pub detector_cmd: Vec<String>,
}

pub async fn execute(args: ImageArgs, mut config: Config, dry_run: bool, format: OutputFormat) -> Result<()> {
    if !args.detector_cmd.is_empty() {
        config.image.detector_command = args.detector_cmd;
    }

    let strategy = ImageStrategy::from_config(&config.image);
    let synth = Synthesizer::new(Box::new(strategy), &config.output_root).dry_run(dry_run);
    let request = PlanRequest::new(args.path.to_string_lossy()).with_feature_name(args.name);

    super::synthesize(synth, request, format).await
}
