//! UI field detection for screenshots
//!
//! Detection itself happens outside this crate. A detector only returns
//! the labelled, typed fields it was told about.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

use autodesign_common::{Error, Result};

const STRATEGY: &str = "image";

/// A field found on a screenshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedField {
    #[serde(default)]
    pub label: String,

    #[serde(rename = "type")]
    pub kind: FieldKind,
}

impl DetectedField {
    pub fn new(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Button,
    Text,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetectorOutput {
    Bare(Vec<DetectedField>),
    Wrapped { fields: Vec<DetectedField> },
}

impl DetectorOutput {
    fn into_fields(self) -> Vec<DetectedField> {
        match self {
            DetectorOutput::Bare(fields) | DetectorOutput::Wrapped { fields } => fields,
        }
    }
}

/// Parse detector JSON: a bare array or `{"fields": [...]}`
pub fn parse_fields(json: &str) -> Result<Vec<DetectedField>> {
    let output: DetectorOutput = serde_json::from_str(json)?;
    Ok(output.into_fields())
}

#[async_trait]
pub trait FieldDetector: Send + Sync {
    async fn detect(&self, images: &[PathBuf]) -> Result<Vec<DetectedField>>;
}

/// Reads fields from a `<stem>.fields.json` file next to each image
#[derive(Debug, Default)]
pub struct SidecarFieldDetector;

impl SidecarFieldDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn sidecar_path(image: &Path) -> PathBuf {
        image.with_extension("fields.json")
    }
}

#[async_trait]
impl FieldDetector for SidecarFieldDetector {
    async fn detect(&self, images: &[PathBuf]) -> Result<Vec<DetectedField>> {
        let mut fields = Vec::new();
        for image in images {
            let sidecar = Self::sidecar_path(image);
            if !sidecar.exists() {
                warn!("No field file for {} (expected {})", image.display(), sidecar.display());
                continue;
            }
            let content = tokio::fs::read_to_string(&sidecar).await?;
            let found = parse_fields(&content).map_err(|e| Error::strategy(STRATEGY, e))?;
            debug!("Read {} field(s) from {}", found.len(), sidecar.display());
            fields.extend(found);
        }
        Ok(fields)
    }
}

/// Runs an external detector with the image paths appended to its arguments
#[derive(Debug, Clone)]
pub struct CommandFieldDetector {
    program: String,
    args: Vec<String>,
}

impl CommandFieldDetector {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a `[program, args...]` command line; `None` when empty
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

#[async_trait]
impl FieldDetector for CommandFieldDetector {
    async fn detect(&self, images: &[PathBuf]) -> Result<Vec<DetectedField>> {
        debug!("Running field detector: {} {:?}", self.program, self.args);

        let output = TokioCommand::new(&self.program)
            .args(&self.args)
            .args(images)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::strategy(STRATEGY, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::strategy(
                STRATEGY,
                format!("field detector exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_fields(&stdout).map_err(|e| Error::strategy(STRATEGY, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_and_wrapped() {
        let bare = parse_fields(r#"[{"label":"Login","type":"button"}]"#).unwrap();
        let wrapped = parse_fields(r#"{"fields":[{"label":"Login","type":"button"}]}"#).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0], DetectedField::new("Login", FieldKind::Button));
    }

    #[test]
    fn test_unknown_kind_is_other() {
        let fields = parse_fields(r#"[{"label":"Logo","type":"image"},{"type":"text"}]"#).unwrap();
        assert_eq!(fields[0].kind, FieldKind::Other);
        assert_eq!(fields[1], DetectedField::new("", FieldKind::Text));
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            SidecarFieldDetector::sidecar_path(Path::new("shots/login.png")),
            PathBuf::from("shots/login.fields.json")
        );
    }

    #[tokio::test]
    async fn test_sidecar_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let fields = SidecarFieldDetector::new()
            .detect(&[dir.path().join("nothing.png")])
            .await
            .unwrap();
        assert!(fields.is_empty());
    }

    #[tokio::test]
    async fn test_sidecar_reads_fields() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("login.png");
        std::fs::write(
            dir.path().join("login.fields.json"),
            r#"{"fields":[{"label":"Username","type":"text"},{"label":"Go","type":"button"}]}"#,
        )
        .unwrap();

        let fields = SidecarFieldDetector::new().detect(&[image]).await.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].kind, FieldKind::Button);
    }

    #[test]
    fn test_command_line_split() {
        assert!(CommandFieldDetector::from_command_line(&[]).is_none());
        let detector =
            CommandFieldDetector::from_command_line(&["python3".to_string(), "scan.py".to_string()]).unwrap();
        assert_eq!(detector.program, "python3");
        assert_eq!(detector.args, vec!["scan.py"]);
    }
}
