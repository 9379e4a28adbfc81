//! CLI Commands

pub mod config;
pub mod image;
pub mod record;
pub mod text;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use autodesign_synth::{ArtifactKind, PlanRequest, SynthesisReport, Synthesizer};

use crate::output::{print_document, print_info, print_item, print_list, print_success, print_warning, spinner, OutputFormat, TableDisplay};

/// Plan summary display wrapper
#[derive(Serialize)]
pub struct PlanDisplay {
    pub feature: String,
    pub scenario: String,
    pub page_class: String,
    pub locators: usize,
    pub steps: usize,
    pub tags: String,
}

impl From<&SynthesisReport> for PlanDisplay {
    fn from(report: &SynthesisReport) -> Self {
        Self {
            feature: report.plan.feature_name.clone(),
            scenario: report.plan.scenario_name.clone(),
            page_class: report.names.page_class.clone(),
            locators: report.plan.locators.len(),
            steps: report.plan.steps.len(),
            tags: report.plan.tags.join(", "),
        }
    }
}

impl TableDisplay for PlanDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Feature", "Scenario", "Page", "Locators", "Steps", "Tags"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.feature.clone(),
            self.scenario.clone(),
            self.page_class.clone(),
            self.locators.to_string(),
            self.steps.to_string(),
            self.tags.clone(),
        ]
    }
}

/// Generated file display wrapper
#[derive(Serialize)]
pub struct FileDisplay {
    pub artifact: ArtifactKind,
    pub path: String,
}

impl TableDisplay for FileDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Artifact", "Path"]
    }

    fn row(&self) -> Vec<String> {
        let artifact = match self.artifact {
            ArtifactKind::Feature => "feature",
            ArtifactKind::PageObject => "page object",
            ArtifactKind::Steps => "steps",
            ArtifactKind::Test => "test",
        };
        vec![artifact.to_string(), self.path.clone()]
    }
}

/// Run a synthesizer and report what it produced
pub async fn synthesize(synth: Synthesizer, request: PlanRequest, format: OutputFormat) -> Result<()> {
    debug!("Synthesizing from input: {}", request.input);
    let Some(plan) = synth.plan(&request).await? else {
        print_warning("No test plan was produced; nothing was generated");
        return Ok(());
    };

    let progress = spinner(format!("Generating artifacts for {}", plan.feature_name));
    let report = synth.emit(plan);
    progress.finish_and_clear();
    let report = report?;

    if format != OutputFormat::Table {
        return print_document(&report, format);
    }

    print_item(&PlanDisplay::from(&report), format)?;
    match &report.files {
        Some(files) => {
            let rows: Vec<FileDisplay> = ArtifactKind::ALL
                .into_iter()
                .zip(&files.files)
                .map(|(artifact, path)| FileDisplay {
                    artifact,
                    path: path.display().to_string(),
                })
                .collect();
            print_list(&rows, format)?;
            info!("Wrote {} artifact(s) for {}", files.files.len(), report.names.safe);
            print_success(&format!("Test files generated in {}", files.dir.display()));
        }
        None => print_info("Dry run: no files were written"),
    }
    Ok(())
}
