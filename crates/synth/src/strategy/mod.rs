//! Plan strategies
//!
//! Each strategy turns one kind of raw input into a [`TestPlan`].

pub mod image;
pub mod recording;
pub mod text;

use async_trait::async_trait;
use autodesign_common::{Result, TestPlan};

pub use image::ImageStrategy;
pub use recording::{RecordingSession, RecordingStrategy};
pub use text::TextStrategy;

/// Input handed to a strategy
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    /// Start URL, image path, text file path or literal text, depending on the strategy
    pub input: String,

    /// Feature name chosen by the caller
    pub feature_name: Option<String>,

    pub options: PlanOptions,
}

impl PlanRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_feature_name(mut self, name: impl Into<String>) -> Self {
        self.feature_name = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: PlanOptions) -> Self {
        self.options = options;
        self
    }
}

/// Per-request overrides
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Force the NLP tier of text analysis on or off
    pub use_nlp: Option<bool>,
}

/// Produce a Test Plan from some input.
///
/// `Ok(None)` means the input held nothing to generate; it is not an error.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    async fn create_test_plan(&self, request: &PlanRequest) -> Result<Option<TestPlan>>;
}
