//! Test Plan: the intermediate representation every strategy produces
//! and the renderer consumes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::naming;

/// A complete plan for one generated scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlan {
    /// Human-readable feature identifier
    pub feature_name: String,

    /// Name of the sole generated scenario
    pub scenario_name: String,

    /// Symbolic element handles in first-discovery order
    #[serde(default)]
    pub locators: Vec<Locator>,

    /// Narrative steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,

    /// User story behind the scenario (text strategy only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_story: Option<UserStory>,

    /// Scenarios found in or generated from the source text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenarios: Vec<Scenario>,

    /// Classification tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Analysis bookkeeping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PlanMetadata>,
}

impl TestPlan {
    /// Create an empty plan
    pub fn new(feature_name: impl Into<String>, scenario_name: impl Into<String>) -> Self {
        Self {
            feature_name: feature_name.into(),
            scenario_name: scenario_name.into(),
            locators: Vec::new(),
            steps: Vec::new(),
            user_story: None,
            scenarios: Vec::new(),
            tags: Vec::new(),
            metadata: None,
        }
    }

    /// Alphanumeric-only form of the feature name, used for paths and type names
    pub fn safe_feature_name(&self) -> String {
        naming::strip_non_alphanumeric(&self.feature_name)
    }

    /// Look up a locator by name
    pub fn locator(&self, name: &str) -> Option<&Locator> {
        self.locators.iter().find(|l| l.name == name)
    }

    /// Check the structural invariants of the plan
    pub fn validate(&self) -> Result<()> {
        if self.safe_feature_name().is_empty() {
            return Err(Error::Validation(format!(
                "feature name '{}' has no alphanumeric characters",
                self.feature_name
            )));
        }

        match self.steps.first() {
            Some(step) if step.keyword == StepKeyword::Given => {}
            Some(step) => {
                return Err(Error::Validation(format!(
                    "plan must open with a Given step, found '{} {}'",
                    step.keyword, step.text
                )));
            }
            None => {
                return Err(Error::Validation("plan has no steps".to_string()));
            }
        }

        let givens = self.steps.iter().filter(|s| s.keyword == StepKeyword::Given).count();
        if givens != 1 {
            return Err(Error::Validation(format!(
                "plan must contain exactly one Given step, found {}",
                givens
            )));
        }

        let mut seen = HashSet::new();
        for locator in &self.locators {
            if !seen.insert(locator.name.to_lowercase()) {
                return Err(Error::Validation(format!(
                    "duplicate locator name '{}'",
                    locator.name
                )));
            }
        }

        for step in &self.steps {
            if let Some(name) = &step.locator_name {
                if self.locator(name).is_none() {
                    return Err(Error::Validation(format!(
                        "step '{}' references unknown locator '{}'",
                        step.text, name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// A named handle to a page element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub name: String,
    pub selector: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<LocatorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl Locator {
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            kind: None,
            confidence: None,
        }
    }
}

/// Structural role of a located element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    Input,
    Button,
    Navigation,
    List,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
}

/// One step of the narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub keyword: StepKeyword,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_value: Option<String>,
}

impl Step {
    /// A step with no attached action
    pub fn new(keyword: StepKeyword, text: impl Into<String>) -> Self {
        Self {
            keyword,
            text: text.into(),
            action_type: None,
            locator_name: None,
            action_value: None,
        }
    }

    /// Opening step that puts the browser on the application
    pub fn navigate(text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            action_type: Some(ActionType::Navigate),
            action_value: url,
            ..Self::new(StepKeyword::Given, text)
        }
    }

    pub fn click(keyword: StepKeyword, text: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            action_type: Some(ActionType::Click),
            locator_name: Some(locator.into()),
            ..Self::new(keyword, text)
        }
    }

    pub fn fill(
        keyword: StepKeyword,
        text: impl Into<String>,
        locator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            action_type: Some(ActionType::Fill),
            locator_name: Some(locator.into()),
            action_value: Some(value.into()),
            ..Self::new(keyword, text)
        }
    }
}

/// Gherkin step keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
}

impl StepKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKeyword::Given => "Given",
            StepKeyword::When => "When",
            StepKeyword::Then => "Then",
            StepKeyword::And => "And",
            StepKeyword::But => "But",
        }
    }

    /// Parse a keyword case-insensitively
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "given" => Some(StepKeyword::Given),
            "when" => Some(StepKeyword::When),
            "then" => Some(StepKeyword::Then),
            "and" => Some(StepKeyword::And),
            "but" => Some(StepKeyword::But),
            _ => None,
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a step does to its locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Navigate,
    Click,
    Fill,
}

/// Actor / action / benefit triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    pub actor: String,
    pub action: String,
    pub benefit: String,
    #[serde(rename = "type")]
    pub kind: StoryKind,
}

/// Which extraction tier produced a user story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoryKind {
    Formal,
    Basic,
    NlpExtracted,
    ContextInferred,
    Generic,
}

/// A scenario found in source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<ScenarioStep>,
    #[serde(rename = "type")]
    pub kind: ScenarioKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Scenario,
    Outline,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub keyword: StepKeyword,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
}

/// Coarse purpose of a scenario step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Setup,
    Action,
    Verification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetadata {
    pub analysis_method: String,
    pub story_tier: StoryKind,
    pub nlp_used: bool,
    pub word_count: usize,
    pub sentence_count: usize,
    pub complexity: Complexity,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_plan() -> TestPlan {
        let mut plan = TestPlan::new("Login Flow", "User logs in");
        plan.locators.push(Locator::new("loginButton", "getByRole('button')"));
        plan.steps.push(Step::navigate("I am on the application", None));
        plan.steps.push(Step::click(StepKeyword::When, "I click login", "loginButton"));
        plan
    }

    #[test]
    fn test_valid_plan() {
        assert!(login_plan().validate().is_ok());
        assert_eq!(login_plan().safe_feature_name(), "LoginFlow");
    }

    #[test]
    fn test_rejects_missing_given() {
        let mut plan = login_plan();
        plan.steps.remove(0);
        assert!(plan.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_rejects_unknown_locator() {
        let mut plan = login_plan();
        plan.steps.push(Step::click(StepKeyword::And, "I click ghost", "ghost"));
        let err = plan.validate().unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_rejects_duplicate_locator_names_case_insensitively() {
        let mut plan = login_plan();
        plan.locators.push(Locator::new("LoginButton", "locator('#login')"));
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_safe_name() {
        let mut plan = login_plan();
        plan.feature_name = "!!!".to_string();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(login_plan()).unwrap();
        assert_eq!(json["featureName"], "Login Flow");
        assert_eq!(json["steps"][1]["actionType"], "click");
        assert_eq!(json["steps"][1]["locatorName"], "loginButton");
        assert!(json.get("userStory").is_none());
    }

    #[test]
    fn test_keyword_parse() {
        assert_eq!(StepKeyword::parse("GIVEN"), Some(StepKeyword::Given));
        assert_eq!(StepKeyword::parse("but"), Some(StepKeyword::But));
        assert_eq!(StepKeyword::parse("scenario"), None);
    }
}
