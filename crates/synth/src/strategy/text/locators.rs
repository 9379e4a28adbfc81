//! Locator inference and step synthesis for free text

use once_cell::sync::Lazy;
use regex::Regex;

use autodesign_common::{selector, Confidence, Locator, LocatorKind, Step, StepKeyword};

use super::rules::{matches_any, LOCATOR_RULES};

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)"|'([^']+)'"#).expect("hardcoded regex"));

const FILL_VALUE: &str = "test data";

/// Keyword-table locators followed by one text locator per quoted substring
pub fn infer_locators(text: &str) -> Vec<Locator> {
    let lower = text.to_lowercase();

    let mut locators: Vec<Locator> = LOCATOR_RULES
        .iter()
        .filter(|rule| matches_any(&lower, rule.keywords))
        .map(|rule| Locator {
            name: rule.name.to_string(),
            selector: rule.selector.to_string(),
            kind: Some(rule.kind),
            confidence: Some(Confidence::High),
        })
        .collect();

    for (index, caps) in QUOTED.captures_iter(text).enumerate() {
        let quoted = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or_default();
        let clean: String = quoted.chars().filter(|c| *c != '"' && *c != '\'').collect();
        locators.push(Locator {
            name: format!("textElement{}", index + 1),
            selector: selector::text(&clean),
            kind: Some(LocatorKind::Text),
            confidence: Some(Confidence::Medium),
        });
    }

    for locator in &mut locators {
        locator.selector = selector::normalize(&locator.selector);
    }
    locators
}

/// Field word for step text: `passwordInput` -> `password`
fn field_name(locator_name: &str, suffix: &str) -> String {
    locator_name
        .strip_suffix(suffix)
        .unwrap_or(locator_name)
        .to_lowercase()
}

/// Opening navigation, one action per input or button locator, closing check
pub fn synthesize_steps(locators: &[Locator]) -> Vec<Step> {
    let mut steps = vec![Step::navigate("I am on the application page", None)];

    for locator in locators {
        match locator.kind {
            Some(LocatorKind::Input) => steps.push(Step::fill(
                StepKeyword::When,
                format!("I enter text into the {} field", field_name(&locator.name, "Input")),
                locator.name.clone(),
                FILL_VALUE,
            )),
            Some(LocatorKind::Button) => steps.push(Step::click(
                StepKeyword::When,
                format!("I click the {} button", field_name(&locator.name, "Button")),
                locator.name.clone(),
            )),
            _ => {}
        }
    }

    steps.push(Step::new(StepKeyword::Then, "I should see the expected result"));
    steps
}
