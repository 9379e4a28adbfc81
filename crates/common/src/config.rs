//! Synthesis configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Configuration for one synthesis run.
///
/// Loaded once before a strategy is built and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory that receives `<Feature>/{Features,Pages,Steps,Tests}`
    pub output_root: PathBuf,

    /// Live recording configuration
    pub recording: RecordingConfig,

    /// Free-text analysis configuration
    pub text: TextConfig,

    /// Screenshot analysis configuration
    pub image: ImageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("output"),
            recording: RecordingConfig::default(),
            text: TextConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

/// Live recording configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Page the session opens on when the caller gives none
    pub start_url: Option<String>,

    /// Browser engine to launch
    pub browser: Browser,

    /// Node.js executable used to run the Playwright driver
    pub node_binary: PathBuf,

    /// Working directory for the driver, must be able to `require('playwright')`
    pub driver_dir: Option<PathBuf>,

    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            start_url: None,
            browser: Browser::Chromium,
            node_binary: PathBuf::from("node"),
            driver_dir: None,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Free-text analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Enable the lexicon NLP tier of user-story extraction
    pub use_nlp: bool,

    /// File extensions read without a warning
    pub allowed_extensions: Vec<String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            use_nlp: false,
            allowed_extensions: ["txt", "md", "json", "yml", "yaml"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Screenshot analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// External field detector: program followed by its arguments.
    /// Empty means fields are read from `<image>.fields.json`.
    pub detector_command: Vec<String>,
}

impl Config {
    /// Load configuration from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
