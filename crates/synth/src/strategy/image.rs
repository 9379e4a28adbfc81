//! Screenshot strategy: detected UI fields become locators and steps

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use autodesign_common::{selector, Error, ImageConfig, LocatorRegistry, Result, Step, StepKeyword, TestPlan};

use super::{PlanRequest, Strategy};
use crate::detector::{CommandFieldDetector, DetectedField, FieldDetector, FieldKind, SidecarFieldDetector};

const NAME: &str = "image";

/// Value typed into every detected text field
pub const FILL_VALUE: &str = "test-data";

pub struct ImageStrategy {
    detector: Box<dyn FieldDetector>,
}

impl ImageStrategy {
    pub fn new(detector: Box<dyn FieldDetector>) -> Self {
        Self { detector }
    }

    /// Command detector when one is configured, sidecar files otherwise
    pub fn from_config(config: &ImageConfig) -> Self {
        match CommandFieldDetector::from_command_line(&config.detector_command) {
            Some(detector) => Self::new(Box::new(detector)),
            None => Self::new(Box::new(SidecarFieldDetector::new())),
        }
    }

    fn check_image(path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(Error::Validation(format!("image not found: {}", path.display())));
        }
        image::image_dimensions(path)
            .map(|(w, h)| debug!("Image {} is {}x{}", path.display(), w, h))
            .map_err(|e| Error::Validation(format!("cannot decode image {}: {}", path.display(), e)))
    }

    /// Map detected fields onto a plan; `None` when none are actionable
    pub fn plan_from_fields(feature_name: &str, file_name: &str, fields: &[DetectedField]) -> Option<TestPlan> {
        let actionable: Vec<&DetectedField> = fields
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Button | FieldKind::Text))
            .collect();
        if actionable.is_empty() {
            return None;
        }

        let mut plan = TestPlan::new(feature_name, format!("A scenario from image {}", file_name));
        let mut registry = LocatorRegistry::new();
        plan.steps.push(Step::navigate("I am on the application", None));

        for field in actionable {
            let step = match field.kind {
                FieldKind::Button => {
                    // first action opens with When, later clicks chain with And
                    let keyword = if plan.steps.len() == 1 {
                        StepKeyword::When
                    } else {
                        StepKeyword::And
                    };
                    let name = registry.resolve(&mut plan, &selector::role("button", &field.label), &field.label);
                    Step::click(keyword, format!("I click the '{}' button", field.label), name)
                }
                FieldKind::Text => {
                    let name = registry.resolve(&mut plan, &selector::label(&field.label), &field.label);
                    Step::fill(
                        StepKeyword::When,
                        format!("I fill the '{}' field with '{}'", field.label, FILL_VALUE),
                        name,
                        FILL_VALUE,
                    )
                }
                FieldKind::Other => continue,
            };
            plan.steps.push(step);
        }

        Some(plan)
    }
}

#[async_trait]
impl Strategy for ImageStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn create_test_plan(&self, request: &PlanRequest) -> Result<Option<TestPlan>> {
        let path = PathBuf::from(&request.input);
        Self::check_image(&path)?;

        let fields = self.detector.detect(std::slice::from_ref(&path)).await?;
        info!("Detected {} field(s) in {}", fields.len(), path.display());

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let feature_name = request.feature_name.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        let plan = Self::plan_from_fields(&feature_name, &file_name, &fields);
        if plan.is_none() {
            warn!("No actionable fields detected in {}", path.display());
        }
        Ok(plan)
    }
}
