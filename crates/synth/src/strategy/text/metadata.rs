//! Tags and analysis metadata

use once_cell::sync::Lazy;
use regex::Regex;

use autodesign_common::{Complexity, PlanMetadata, StoryKind};

use super::rules::{matches_any, TAG_RULES};

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("hardcoded regex"));

pub const ANALYSIS_METHOD: &str = "heuristic";

/// Tags in table order, without duplicates
pub fn extract_tags(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tags: Vec<String> = Vec::new();
    for rule in TAG_RULES {
        if matches_any(&lower, rule.keywords) && !tags.iter().any(|t| t == rule.tag) {
            tags.push(rule.tag.to_string());
        }
    }
    tags
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Non-empty `[.!?]`-delimited segments, at least one
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_END
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1)
}

pub fn assess_complexity(words: usize, sentences: usize) -> Complexity {
    let per_sentence = words as f64 / sentences.max(1) as f64;
    if words < 20 || per_sentence < 5.0 {
        Complexity::Simple
    } else if words >= 100 && per_sentence >= 15.0 {
        Complexity::Complex
    } else {
        Complexity::Moderate
    }
}

pub fn build_metadata(text: &str, story_tier: StoryKind, nlp_used: bool) -> PlanMetadata {
    let words = word_count(text);
    let sentences = sentence_count(text);
    PlanMetadata {
        analysis_method: ANALYSIS_METHOD.to_string(),
        story_tier,
        nlp_used,
        word_count: words,
        sentence_count: sentences,
        complexity: assess_complexity(words, sentences),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_tags_deduplicated_in_order() {
        let tags = extract_tags("Critical smoke test: log in, then add an item to the cart and checkout");
        assert_eq!(tags, vec!["authentication", "ecommerce", "crud", "critical", "smoke"]);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("One. Two! Three?"), 3);
        assert_eq!(sentence_count("no terminator"), 1);
        assert_eq!(sentence_count("..."), 1);
    }

    #[test_case(10, 1, Complexity::Simple ; "short text")]
    #[test_case(40, 10, Complexity::Simple ; "short sentences")]
    #[test_case(60, 4, Complexity::Moderate ; "medium text")]
    #[test_case(150, 5, Complexity::Complex ; "long dense text")]
    #[test_case(150, 12, Complexity::Moderate ; "long text short sentences")]
    fn test_complexity(words: usize, sentences: usize, expected: Complexity) {
        assert_eq!(assess_complexity(words, sentences), expected);
    }

    #[test]
    fn test_metadata() {
        let metadata = build_metadata("Search for shoes. Then buy them.", StoryKind::ContextInferred, false);
        assert_eq!(metadata.analysis_method, "heuristic");
        assert_eq!(metadata.word_count, 6);
        assert_eq!(metadata.sentence_count, 2);
        assert_eq!(metadata.complexity, Complexity::Simple);
        assert!(!metadata.timestamp.is_empty());
    }
}
