//! Free-text analysis strategy
//!
//! Layered heuristics over prose: explicit story and Gherkin patterns first,
//! then optional NLP, then keyword tables.

mod locators;
mod metadata;
mod rules;
mod scenario;
mod story;

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use autodesign_common::{naming, Error, Result, TestPlan, TextConfig};

use super::{PlanRequest, Strategy};
use crate::nlp::{LexiconNlp, NlpCapability};

pub use locators::{infer_locators, synthesize_steps};
pub use metadata::{extract_tags, sentence_count, word_count};
pub use scenario::{extract_scenarios, scenario_name};
pub use story::extract_user_story;

const NAME: &str = "text";

pub struct TextStrategy {
    config: TextConfig,
    nlp: Option<Box<dyn NlpCapability>>,
}

impl TextStrategy {
    /// Uses the built-in lexicon tagger when NLP is enabled
    pub fn new(config: TextConfig) -> Self {
        Self {
            config,
            nlp: Some(Box::new(LexiconNlp::new())),
        }
    }

    /// Replace the NLP capability; `None` disables the tier regardless of options
    pub fn with_nlp(mut self, nlp: Option<Box<dyn NlpCapability>>) -> Self {
        self.nlp = nlp;
        self
    }

    /// Read the input as a file when it names one, else treat it as the text itself
    async fn resolve_content(&self, input: &str) -> Result<String> {
        let path = Path::new(input);
        if !path.is_file() {
            debug!("Analyzing literal text ({} bytes)", input.len());
            return Ok(input.to_string());
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !self.config.allowed_extensions.iter().any(|e| e.eq_ignore_ascii_case(&extension)) {
            warn!("File extension '.{}' may not be a supported text file", extension);
        }

        info!("Reading text from {}", path.display());
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::strategy(NAME, e))
    }

    /// Build a plan from already-resolved text
    pub fn analyze(&self, text: &str, feature_name: Option<&str>, use_nlp: bool) -> TestPlan {
        let nlp = if use_nlp { self.nlp.as_deref() } else { None };

        let story = extract_user_story(text, nlp);
        let scenario_name = scenario_name(text, &story);
        let feature_name = feature_name
            .map(naming::sanitize_feature_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| naming::sanitize_feature_name(&scenario_name));

        let locators = infer_locators(text);
        let steps = synthesize_steps(&locators);

        let mut plan = TestPlan::new(feature_name, scenario_name);
        plan.scenarios = extract_scenarios(text, &story);
        plan.tags = extract_tags(text);
        plan.metadata = Some(metadata::build_metadata(text, story.kind, nlp.is_some()));
        plan.user_story = Some(story);
        plan.locators = locators;
        plan.steps = steps;

        info!(
            "Text analysis complete: {} scenario(s), {} locator(s), {} step(s), tags [{}]",
            plan.scenarios.len(),
            plan.locators.len(),
            plan.steps.len(),
            plan.tags.join(", ")
        );
        plan
    }
}

#[async_trait]
impl Strategy for TextStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn create_test_plan(&self, request: &PlanRequest) -> Result<Option<TestPlan>> {
        if request.input.trim().is_empty() {
            return Err(Error::Validation("text input cannot be empty".to_string()));
        }

        let text = self.resolve_content(&request.input).await?;
        if text.trim().is_empty() {
            return Err(Error::Validation(format!("'{}' contains no text", request.input)));
        }

        let use_nlp = request.options.use_nlp.unwrap_or(self.config.use_nlp);
        Ok(Some(self.analyze(&text, request.feature_name.as_deref(), use_nlp)))
    }
}
