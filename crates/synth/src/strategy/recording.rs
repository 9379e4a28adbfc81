//! Live recording strategy
//!
//! Opens a browser on the start URL and turns each captured user action into
//! a step until the operator closes the page.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use autodesign_common::{naming, selector, Error, LocatorRegistry, Result, Step, StepKeyword, TestPlan};

use super::{PlanRequest, Strategy};
use crate::playwright::{ActionKind, BrowserDriver, SessionEvent, UserAction};

const NAME: &str = "recording";

const DEFAULT_FEATURE: &str = "RecordedFeature";
const DEFAULT_SCENARIO: &str = "A scenario recorded from user actions";

/// In-progress plan for one recording; owned by the event loop
pub struct RecordingSession {
    plan: TestPlan,
    registry: LocatorRegistry,
    emitted: HashSet<String>,
    explicit_name: bool,
}

impl RecordingSession {
    pub fn new(start_url: &str, feature_name: Option<&str>) -> Self {
        let mut plan = TestPlan::new(feature_name.unwrap_or(DEFAULT_FEATURE), DEFAULT_SCENARIO);
        plan.steps.push(Step::navigate("I am on the application", Some(start_url.to_string())));
        Self {
            plan,
            registry: LocatorRegistry::new(),
            emitted: HashSet::new(),
            explicit_name: feature_name.is_some(),
        }
    }

    /// The start page is loaded
    pub fn begin(&mut self, title: Option<&str>) {
        let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
            return;
        };

        if !self.explicit_name {
            let stripped = naming::strip_non_alphanumeric(title);
            if !stripped.is_empty() {
                self.plan.feature_name = stripped;
            }
        }
        self.plan.scenario_name = format!("A recorded scenario on the '{}' page", title);
    }

    /// Fold one captured action into the plan; returns whether a step was added
    pub fn apply(&mut self, action: &UserAction) -> bool {
        let text = action
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| action.kind.as_str());

        let locator = self
            .registry
            .resolve(&mut self.plan, &selector::css_locator(&action.selector), text);

        let keyword = if self.plan.steps.len() == 1 {
            StepKeyword::When
        } else {
            StepKeyword::And
        };

        let step = match action.kind {
            ActionKind::Click => Step::click(
                keyword,
                format!("I click on the '{}' {}", text, click_target(action)),
                locator,
            ),
            ActionKind::Fill => {
                let value = action.value.clone().unwrap_or_default();
                Step::fill(
                    keyword,
                    format!("I fill the '{}' field with '{}'", text, value),
                    locator,
                    value,
                )
            }
        };

        if !self.emitted.insert(step.text.clone()) {
            debug!("Skipping repeated action: {}", step.text);
            return false;
        }

        info!("Recorded: {} {}", step.keyword, step.text);
        self.plan.steps.push(step);
        true
    }

    pub fn plan(&self) -> &TestPlan {
        &self.plan
    }

    pub fn finish(self) -> TestPlan {
        self.plan
    }
}

fn click_target(action: &UserAction) -> &'static str {
    match action.tag.as_deref() {
        Some("a") => "link",
        Some("button") => "button",
        Some("input") if action.input_type.as_deref() == Some("submit") => "button",
        _ => "element",
    }
}

pub struct RecordingStrategy {
    driver: Box<dyn BrowserDriver>,
    default_url: Option<String>,
}

impl RecordingStrategy {
    pub fn new(driver: Box<dyn BrowserDriver>) -> Self {
        Self {
            driver,
            default_url: None,
        }
    }

    /// URL used when the request carries none
    pub fn with_default_url(mut self, url: Option<String>) -> Self {
        self.default_url = url;
        self
    }

    async fn record(&self, start_url: &str, feature_name: Option<&str>) -> Result<TestPlan> {
        let mut browser = self.driver.open(start_url).await?;
        let mut session = RecordingSession::new(start_url, feature_name);

        let outcome = Self::drive(&mut browser, &mut session).await;
        let closed = browser.close().await;

        outcome?;
        closed?;
        Ok(session.finish())
    }

    async fn drive(browser: &mut crate::playwright::BrowserSession, session: &mut RecordingSession) -> Result<()> {
        let mut ready = false;

        while let Some(event) = browser.next_event().await {
            match event {
                SessionEvent::Ready { title } => {
                    debug!("Page ready: {:?}", title);
                    session.begin(title.as_deref());
                    ready = true;
                }
                SessionEvent::Action(action) if ready => {
                    session.apply(&action);
                }
                SessionEvent::Action(action) => {
                    warn!("Ignoring {} before the page was ready", action.kind.as_str());
                }
                SessionEvent::Closed => {
                    info!("Page closed, recording finished");
                    break;
                }
                SessionEvent::Error { message } => {
                    return Err(Error::strategy(NAME, message));
                }
            }
        }

        if !ready {
            return Err(Error::strategy(NAME, "browser session ended before the page was ready"));
        }
        Ok(())
    }
}

#[async_trait]
impl Strategy for RecordingStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn create_test_plan(&self, request: &PlanRequest) -> Result<Option<TestPlan>> {
        let start_url = match request.input.trim() {
            "" => self
                .default_url
                .clone()
                .ok_or_else(|| Error::Validation("no start URL given for recording".to_string()))?,
            url => url.to_string(),
        };

        info!("Recording user actions on {}", start_url);
        let plan = self.record(&start_url, request.feature_name.as_deref()).await?;
        info!("Recorded {} step(s) and {} locator(s)", plan.steps.len() - 1, plan.locators.len());
        Ok(Some(plan))
    }
}
