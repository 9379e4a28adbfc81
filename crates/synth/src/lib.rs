//! AutoDesign test plan synthesis
//!
//! ```text
//!  ┌────────────┐  ┌────────────┐  ┌────────────┐
//!  │ Recording  │  │   Image    │  │    Text    │
//!  │ (browser)  │  │ (detector) │  │ (heuristic)│
//!  └─────┬──────┘  └─────┬──────┘  └─────┬──────┘
//!        └───────────────┼───────────────┘
//!                        ▼
//!                 ┌─────────────┐
//!                 │  TestPlan   │
//!                 └──────┬──────┘
//!                        ▼
//!                 ┌─────────────┐
//!                 │  Renderer   │
//!                 └──────┬──────┘
//!                        ▼
//!   Features/*.feature  Pages/*.page.js  Steps/*.steps.js  Tests/*.test.js
//! ```

pub mod detector;
pub mod nlp;
pub mod orchestrator;
pub mod playwright;
pub mod render;
pub mod strategy;

pub use detector::{CommandFieldDetector, DetectedField, FieldDetector, FieldKind, SidecarFieldDetector};
pub use nlp::{LexiconNlp, NlpCapability, NlpDocument};
pub use orchestrator::{SynthesisReport, Synthesizer};
pub use playwright::{BrowserDriver, BrowserSession, PlaywrightDriver, ScriptedDriver, SessionEvent, UserAction};
pub use render::{ArtifactKind, ArtifactNames, GeneratedFiles, RenderedArtifacts, Renderer};
pub use strategy::{
    ImageStrategy, PlanOptions, PlanRequest, RecordingSession, RecordingStrategy, Strategy, TextStrategy,
};
