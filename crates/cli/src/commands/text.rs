//! Text Command

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args};

use autodesign_common::{Config, Error};
use autodesign_synth::{PlanOptions, PlanRequest, Synthesizer, TextStrategy};

use crate::output::OutputFormat;

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "text"])))]
pub struct TextArgs {
    /// Text file holding the description
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Description given inline
    #[arg(short, long)]
    pub text: Option<String>,

    /// Feature name
    #[arg(short, long)]
    pub name: String,

    /// Enable the NLP tier of user-story extraction
    #[arg(long)]
    pub nlp: bool,
}

pub async fn execute(args: TextArgs, config: Config, dry_run: bool, format: OutputFormat) -> Result<()> {
    let input = match (args.file, args.text) {
        (Some(path), _) => {
            if !path.is_file() {
                return Err(Error::Validation(format!("text file not found: {}", path.display())).into());
            }
            path.to_string_lossy().into_owned()
        }
        (None, text) => text.unwrap_or_default(),
    };

    let options = PlanOptions {
        use_nlp: args.nlp.then_some(true),
    };
    let request = PlanRequest::new(input)
        .with_feature_name(args.name)
        .with_options(options);

    let strategy = TextStrategy::new(config.text.clone());
    let synth = Synthesizer::new(Box::new(strategy), &config.output_root).dry_run(dry_run);

    super::synthesize(synth, request, format).await
}
