//! User-story extraction
//!
//! Tiers, first hit wins: explicit story patterns, NLP, context table,
//! generic story.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use autodesign_common::{StoryKind, UserStory};

use super::rules::{matches_any, CONTEXT_RULES, ROLE_NOUNS};
use crate::nlp::NlpCapability;

static FORMAL_STORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)as an? (.+?)(?:\s+i want to|\s+i would like to|\s+i need to)\s+(.+?)(?:\s+so that|\s+in order to)\s+(.+?)(?:\.|$)",
    )
    .expect("hardcoded regex")
});
static GIVEN_WHEN_THEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)given (.+?) when (.+?) then (.+?)(?:\.|$)").expect("hardcoded regex"));
static USER_STORY_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)user story[:\s]*(.+?)(?:\n|$)").expect("hardcoded regex"));
static STORY_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)story[:\s]*(.+?)(?:\n|$)").expect("hardcoded regex"));

const DEFAULT_ACTOR: &str = "user";
const DEFAULT_ACTION: &str = "interact with the application";

fn story(actor: &str, action: &str, benefit: &str, kind: StoryKind) -> UserStory {
    UserStory {
        actor: actor.trim().to_string(),
        action: action.trim().to_string(),
        benefit: benefit.trim().to_string(),
        kind,
    }
}

pub fn extract_user_story(text: &str, nlp: Option<&dyn NlpCapability>) -> UserStory {
    for pattern in [&*FORMAL_STORY, &*GIVEN_WHEN_THEN] {
        if let Some(caps) = pattern.captures(text) {
            return story(&caps[1], &caps[2], &caps[3], StoryKind::Formal);
        }
    }

    for pattern in [&*USER_STORY_LABEL, &*STORY_LABEL] {
        if let Some(caps) = pattern.captures(text) {
            return story(DEFAULT_ACTOR, &caps[1], "accomplish the task", StoryKind::Basic);
        }
    }

    if let Some(nlp) = nlp {
        match nlp.analyze(text) {
            Ok(doc) => {
                let actor = doc
                    .people
                    .first()
                    .cloned()
                    .or_else(|| {
                        doc.nouns
                            .iter()
                            .find(|noun| ROLE_NOUNS.contains(&noun.to_lowercase().as_str()))
                            .cloned()
                    })
                    .unwrap_or_else(|| DEFAULT_ACTOR.to_string());

                let action = if doc.verbs.is_empty() {
                    DEFAULT_ACTION.to_string()
                } else {
                    doc.verbs.iter().take(3).cloned().collect::<Vec<_>>().join(" and ")
                };

                let benefit = match doc.sentences.as_slice() {
                    [_, .., last] => last.clone(),
                    _ => "achieve their goals".to_string(),
                };

                debug!("NLP story: actor={}, action={}", actor, action);
                return story(&actor, &action, &benefit, StoryKind::NlpExtracted);
            }
            Err(e) => warn!("NLP extraction failed, using fallback: {}", e),
        }
    }

    infer_from_context(text)
}

fn infer_from_context(text: &str) -> UserStory {
    let lower = text.to_lowercase();
    CONTEXT_RULES
        .iter()
        .find(|rule| matches_any(&lower, rule.keywords))
        .map(|rule| story(rule.actor, rule.action, rule.benefit, StoryKind::ContextInferred))
        .unwrap_or_else(|| story(DEFAULT_ACTOR, DEFAULT_ACTION, "accomplish their goals", StoryKind::Generic))
}
