//! Scenario discovery and scenario naming

use once_cell::sync::Lazy;
use regex::Regex;

use autodesign_common::{Scenario, ScenarioKind, ScenarioStep, StepKeyword, StepKind, UserStory};

use super::rules::{matches_any, SCENARIO_NAME_RULES};

static HEADER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^scenario\s*(?:outline)?\s*:\s*").expect("hardcoded regex"));
static STEP_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(given|when|then|and|but)\s+(.*)$").expect("hardcoded regex"));
static SCENARIO_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*scenario(?:\s+outline)?\s*:\s*(.+?)\s*$").expect("hardcoded regex")
});

/// Lines shorter than this inside a scenario are not treated as description steps
const MIN_DESCRIPTION_LEN: usize = 10;

/// Scan the text for Gherkin scenarios; generate one from the story when there are none
pub fn extract_scenarios(text: &str, story: &UserStory) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    let mut current: Option<Scenario> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();

        if lower.starts_with("scenario:") || lower.starts_with("scenario outline:") {
            scenarios.extend(current.take());
            current = Some(Scenario {
                name: HEADER_PREFIX.replace(line, "").into_owned(),
                steps: Vec::new(),
                kind: if lower.contains("outline") {
                    ScenarioKind::Outline
                } else {
                    ScenarioKind::Scenario
                },
            });
            continue;
        }

        let Some(scenario) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = STEP_LINE.captures(line) {
            let keyword = StepKeyword::parse(&caps[1]).unwrap_or(StepKeyword::Given);
            scenario.steps.push(ScenarioStep {
                keyword,
                text: caps[2].to_string(),
                kind: classify_step(line),
            });
        } else if line.chars().count() > MIN_DESCRIPTION_LEN {
            scenario.steps.push(ScenarioStep {
                keyword: StepKeyword::Given,
                text: line.to_string(),
                kind: StepKind::Action,
            });
        }
    }
    scenarios.extend(current);

    if scenarios.is_empty() {
        scenarios.push(generated_scenario(story));
    }
    scenarios
}

fn generated_scenario(story: &UserStory) -> Scenario {
    let step = |keyword, text: String, kind| ScenarioStep { keyword, text, kind };
    Scenario {
        name: format!("{} {}", story.actor, story.action),
        steps: vec![
            step(StepKeyword::Given, format!("I am a {}", story.actor), StepKind::Setup),
            step(StepKeyword::When, format!("I {}", story.action), StepKind::Action),
            step(
                StepKeyword::Then,
                format!("I should be able to {}", story.benefit),
                StepKind::Verification,
            ),
        ],
        kind: ScenarioKind::Generated,
    }
}

/// Classify a step line by the words it contains
pub fn classify_step(line: &str) -> StepKind {
    let lower = line.to_lowercase();
    if matches_any(&lower, &["given", "setup"]) {
        StepKind::Setup
    } else if matches_any(&lower, &["when", "click", "enter"]) {
        StepKind::Action
    } else if matches_any(&lower, &["then", "should", "expect"]) {
        StepKind::Verification
    } else {
        StepKind::Action
    }
}

/// Name for the generated scenario: explicit label, else context, else the story
pub fn scenario_name(text: &str, story: &UserStory) -> String {
    if let Some(caps) = SCENARIO_LABEL.captures(text) {
        return caps[1].to_string();
    }

    let lower = text.to_lowercase();
    SCENARIO_NAME_RULES
        .iter()
        .find(|rule| matches_any(&lower, rule.keywords))
        .map(|rule| rule.name.to_string())
        .unwrap_or_else(|| format!("{} {}", story.actor, story.action))
}
