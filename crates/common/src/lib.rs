//! AutoDesign Common Library
//!
//! The Test Plan model shared by every strategy and the renderer, together
//! with the naming, selector and error rules they agree on.

pub mod config;
pub mod error;
pub mod naming;
pub mod plan;
pub mod registry;
pub mod selector;

pub use config::{Browser, Config, ImageConfig, RecordingConfig, TextConfig};
pub use error::{BoxError, Error, Result};
pub use plan::*;
pub use registry::LocatorRegistry;
