//! Record Command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use autodesign_common::{Browser, Config};
use autodesign_synth::{BrowserDriver, PlanRequest, PlaywrightDriver, RecordingStrategy, ScriptedDriver, Synthesizer};

use crate::output::{print_info, OutputFormat};

#[derive(Args)]
pub struct RecordArgs {
    /// Page to open (defaults to recording.start_url)
    #[arg(short, long, env = "APP_URL")]
    pub url: Option<String>,

    /// Feature name (defaults to the page title)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Replay a captured session log (JSON lines) instead of opening a browser
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Browser engine
    #[arg(long)]
    pub browser: Option<BrowserArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BrowserArg {
    Chromium,
    Firefox,
    Webkit,
}

impl From<BrowserArg> for Browser {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Chromium => Browser::Chromium,
            BrowserArg::Firefox => Browser::Firefox,
            BrowserArg::Webkit => Browser::Webkit,
        }
    }
}

pub async fn execute(args: RecordArgs, mut config: Config, dry_run: bool, format: OutputFormat) -> Result<()> {
    if let Some(browser) = args.browser {
        config.recording.browser = browser.into();
    }

    let driver: Box<dyn BrowserDriver> = match &args.replay {
        Some(path) => Box::new(
            ScriptedDriver::from_jsonl(path)
                .with_context(|| format!("Failed to load session log {}", path.display()))?,
        ),
        None => {
            let driver = PlaywrightDriver::new(&config.recording)?;
            print_info("Recording: interact with the page, then close the browser window to finish");
            Box::new(driver)
        }
    };

    let strategy = RecordingStrategy::new(driver).with_default_url(config.recording.start_url.clone());
    let synth = Synthesizer::new(Box::new(strategy), &config.output_root).dry_run(dry_run);

    let mut request = PlanRequest::new(args.url.unwrap_or_default());
    if let Some(name) = args.name {
        request = request.with_feature_name(name);
    }

    super::synthesize(synth, request, format).await
}
