//! Synthesis orchestrator: strategy -> plan -> artifacts

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use autodesign_common::{Result, TestPlan};

use crate::render::{ArtifactNames, GeneratedFiles, Renderer};
use crate::strategy::{PlanRequest, Strategy};

/// Outcome of a run that produced a plan
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisReport {
    pub plan: TestPlan,
    pub names: ArtifactNames,

    /// `None` on a dry run
    pub files: Option<GeneratedFiles>,
}

pub struct Synthesizer {
    strategy: Box<dyn Strategy>,
    renderer: Renderer,
    output_root: PathBuf,
    dry_run: bool,
}

impl Synthesizer {
    pub fn new(strategy: Box<dyn Strategy>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            strategy,
            renderer: Renderer::new(),
            output_root: output_root.into(),
            dry_run: false,
        }
    }

    /// Render without touching the filesystem
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the strategy and check the plan it returns.
    ///
    /// `Ok(None)` when the strategy had nothing to generate or the feature
    /// name has no usable characters.
    pub async fn plan(&self, request: &PlanRequest) -> Result<Option<TestPlan>> {
        let Some(plan) = self.strategy.create_test_plan(request).await? else {
            warn!("{} strategy produced no test plan", self.strategy.name());
            return Ok(None);
        };

        if plan.safe_feature_name().is_empty() {
            warn!("Feature name '{}' is unusable, nothing generated", plan.feature_name);
            return Ok(None);
        }

        plan.validate()?;
        Ok(Some(plan))
    }

    /// Render a plan and, unless this is a dry run, write it out
    pub fn emit(&self, plan: TestPlan) -> Result<SynthesisReport> {
        let rendered = self.renderer.render(&plan);
        let files = if self.dry_run {
            info!("Dry run, skipping write of {}", rendered.names.safe);
            None
        } else {
            Some(self.renderer.write(&rendered, &self.output_root)?)
        };

        Ok(SynthesisReport {
            plan,
            names: rendered.names,
            files,
        })
    }

    /// `plan` followed by `emit`
    pub async fn generate(&self, request: &PlanRequest) -> Result<Option<SynthesisReport>> {
        match self.plan(request).await? {
            Some(plan) => self.emit(plan).map(Some),
            None => Ok(None),
        }
    }
}
