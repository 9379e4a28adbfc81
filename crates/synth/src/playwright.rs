//! Playwright browser automation for live recording
//!
//! The driver writes a small Node script that launches a headed browser,
//! exposes `onUserAction` to the page and installs a capture listener for
//! `click` and `change` events. Every event is printed to stdout as one JSON
//! line, which the host reads back in order.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command as TokioCommand};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use autodesign_common::{Browser, Error, RecordingConfig, Result};

const STRATEGY: &str = "recording";

/// How long to wait for the driver to exit after the page closed
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Event relayed from the browser page to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The start page finished loading
    Ready {
        #[serde(default)]
        title: Option<String>,
    },

    /// A user-initiated click or change
    Action(UserAction),

    /// The operator closed the page
    Closed,

    /// The driver could not run the session
    Error { message: String },
}

/// A captured user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,

    /// Selector chosen in the page for the event target
    pub selector: String,

    /// Visible text, or the field label for fills
    #[serde(default)]
    pub text: Option<String>,

    /// Lower-cased tag name of the target
    #[serde(default)]
    pub tag: Option<String>,

    /// `type` attribute when the target is an input
    #[serde(default)]
    pub input_type: Option<String>,

    /// Current value for fills
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Click,
    Fill,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Click => "click",
            ActionKind::Fill => "fill",
        }
    }
}

/// An open browser session: an ordered event stream plus the process behind it
pub struct BrowserSession {
    events: mpsc::Receiver<SessionEvent>,
    process: Option<Child>,
    _scratch: Option<TempDir>,
}

impl BrowserSession {
    /// A session fed by an in-memory event stream
    pub fn from_events(events: mpsc::Receiver<SessionEvent>) -> Self {
        Self {
            events,
            process: None,
            _scratch: None,
        }
    }

    /// Wait for the next event; `None` once the stream has ended
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Release the browser process
    pub async fn close(mut self) -> Result<()> {
        self.events.close();
        let Some(mut child) = self.process.take() else {
            return Ok(());
        };

        match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
            Ok(Ok(status)) => {
                debug!("Playwright driver exited with {}", status);
                Ok(())
            }
            Ok(Err(e)) => Err(Error::strategy(STRATEGY, e)),
            Err(_) => {
                warn!("Playwright driver did not exit, killing it");
                child.kill().await.map_err(|e| Error::strategy(STRATEGY, e))
            }
        }
    }
}

/// Capability to open an interactive browser session
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn open(&self, start_url: &str) -> Result<BrowserSession>;
}

/// Drives a real browser through Playwright for Node
pub struct PlaywrightDriver {
    node_binary: PathBuf,
    working_dir: PathBuf,
    browser: Browser,
    viewport_width: u32,
    viewport_height: u32,
}

impl PlaywrightDriver {
    /// Create a driver, verifying that Node can load Playwright
    pub fn new(config: &RecordingConfig) -> Result<Self> {
        let working_dir = match &config.driver_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        Self::check_playwright_installed(&config.node_binary, &working_dir)?;

        Ok(Self {
            node_binary: config.node_binary.clone(),
            working_dir,
            browser: config.browser,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
        })
    }

    /// Check that `require('playwright')` resolves from the working directory
    fn check_playwright_installed(node: &Path, working_dir: &Path) -> Result<()> {
        let status = std::process::Command::new(node)
            .args(["-e", "require.resolve('playwright', { paths: [process.cwd()] })"])
            .current_dir(working_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(Error::PlaywrightNotFound),
        }
    }

    /// Build the Node driver script for a session
    pub fn build_script(&self, start_url: &str) -> String {
        format!(
            r#"
const {{ chromium, firefox, webkit }} = require(require.resolve('playwright', {{ paths: [process.cwd()] }}));

const emit = (event) => process.stdout.write(JSON.stringify(event) + '\n');

(async () => {{
  let browser;
  try {{
    browser = await {browser}.launch({{ headless: false }});
    const finished = new Promise((resolve) => browser.on('disconnected', resolve));
    const context = await browser.newContext({{
      viewport: {{ width: {width}, height: {height} }}
    }});
    const page = await context.newPage();
    const closed = new Promise((resolve) => page.on('close', resolve));

    await page.exposeFunction('onUserAction', (action) => emit({{ event: 'action', ...action }}));
    await page.addInitScript({capture});

    await page.goto('{start_url}');
    emit({{ event: 'ready', title: await page.title() }});

    await Promise.race([closed, finished]);
    emit({{ event: 'closed' }});
  }} catch (error) {{
    emit({{ event: 'error', message: error.message }});
    process.exitCode = 1;
  }} finally {{
    if (browser) {{
      await browser.close().catch(() => {{}});
    }}
  }}
}})();
"#,
            browser = self.browser.as_str(),
            width = self.viewport_width,
            height = self.viewport_height,
            capture = CAPTURE_SCRIPT.trim(),
            start_url = autodesign_common::naming::escape_single_quoted(start_url),
        )
    }
}

#[async_trait]
impl BrowserDriver for PlaywrightDriver {
    async fn open(&self, start_url: &str) -> Result<BrowserSession> {
        let scratch = tempfile::tempdir()?;
        let script_path = scratch.path().join("record.js");
        std::fs::write(&script_path, self.build_script(start_url))?;

        debug!("Running Playwright driver: {}", script_path.display());

        let mut child = TokioCommand::new(&self.node_binary)
            .arg(&script_path)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::strategy(STRATEGY, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::strategy(STRATEGY, "driver stdout was not captured"))?;

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => match serde_json::from_str::<SessionEvent>(&line) {
                        Ok(event) => {
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(_) => debug!("[driver] {}", line),
                    },
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Lost driver output: {}", e);
                        break;
                    }
                }
            }
        });

        info!("Browser launched ({}), opening {}", self.browser.as_str(), start_url);

        Ok(BrowserSession {
            events: rx,
            process: Some(child),
            _scratch: Some(scratch),
        })
    }
}

/// Replays a fixed list of events, e.g. a captured session log
pub struct ScriptedDriver {
    events: Vec<SessionEvent>,
}

impl ScriptedDriver {
    pub fn new(events: Vec<SessionEvent>) -> Self {
        Self { events }
    }

    /// Load events from a JSON-lines log as printed by the Playwright driver
    pub fn from_jsonl(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let events = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str)
            .collect::<std::result::Result<Vec<SessionEvent>, _>>()?;
        Ok(Self::new(events))
    }
}

#[async_trait]
impl BrowserDriver for ScriptedDriver {
    async fn open(&self, start_url: &str) -> Result<BrowserSession> {
        debug!("Replaying {} event(s) for {}", self.events.len(), start_url);
        let (tx, rx) = mpsc::channel(self.events.len().max(1));
        for event in &self.events {
            // capacity covers every event, so this never waits
            let _ = tx.try_send(event.clone());
        }
        Ok(BrowserSession::from_events(rx))
    }
}

/// Page-side capture listener, installed before any page script runs.
///
/// Selector priority: data-testid, data-test, non-numeric id, name, visible
/// text for links/buttons/submits, tag name.
const CAPTURE_SCRIPT: &str = r#"
() => {
  const bestSelector = (el) => {
    const attr = (name) => (el.getAttribute ? el.getAttribute(name) : null);
    if (attr('data-testid')) return `[data-testid="${attr('data-testid')}"]`;
    if (attr('data-test')) return `[data-test="${attr('data-test')}"]`;
    if (el.id && !/^\d+$/.test(el.id)) return `#${el.id}`;
    if (attr('name')) return `[name="${attr('name')}"]`;
    const interactive = el.tagName === 'A' || el.tagName === 'BUTTON' || el.type === 'submit';
    const firstLine = (el.innerText || '').trim().split('\n')[0].trim();
    if (interactive && firstLine) return `text=${firstLine}`;
    return el.tagName.toLowerCase();
  };
  const elementText = (el) => {
    const text = (el.innerText || '').trim() || (el.value || '').trim() || el.name || '';
    return text.split('\n')[0].trim().slice(0, 50);
  };
  const fieldLabel = (el) => {
    const label = (el.labels && el.labels[0]) || el.closest('label');
    return (label && label.innerText.trim()) || el.name || '';
  };
  const listener = (event) => {
    const el = event.target;
    if (!el || !window.onUserAction) return;
    if (event.type === 'click' && el.tagName) {
      window.onUserAction({
        type: 'click',
        selector: bestSelector(el),
        text: elementText(el),
        tag: el.tagName.toLowerCase(),
        inputType: el.tagName === 'INPUT' ? el.type : null,
      });
    } else if (event.type === 'change' && (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA')) {
      window.onUserAction({
        type: 'fill',
        selector: bestSelector(el),
        text: fieldLabel(el),
        value: el.value,
      });
    }
  };
  document.addEventListener('click', listener, { capture: true, passive: true });
  document.addEventListener('change', listener, { capture: true, passive: true });
}
"#;
