//! Optional natural-language analysis for user-story extraction

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use autodesign_common::Result;

static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("hardcoded regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z'-]*").expect("hardcoded regex"));

/// Parts of speech pulled out of a text, each in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NlpDocument {
    pub people: Vec<String>,
    pub nouns: Vec<String>,
    pub verbs: Vec<String>,
    pub sentences: Vec<String>,
}

pub trait NlpCapability: Send + Sync {
    fn analyze(&self, text: &str) -> Result<NlpDocument>;
}

/// Word-list tagger.
///
/// Verbs come from a fixed lexicon of UI actions (inflections included).
/// Nouns are the words following a determiner. People are capitalized
/// words that do not open a sentence.
#[derive(Debug, Default)]
pub struct LexiconNlp;

const VERBS: &[&str] = &[
    "access", "add", "browse", "buy", "cancel", "checkout", "choose", "click", "close", "create",
    "delete", "download", "edit", "enter", "fill", "filter", "find", "log", "login", "logout",
    "manage", "navigate", "open", "order", "pay", "purchase", "register", "remove", "reset",
    "save", "search", "select", "send", "sign", "sort", "submit", "type", "update", "upload",
    "view", "visit",
];

const DETERMINERS: &[&str] = &["a", "an", "the", "my", "your", "their", "his", "her", "this", "that", "each"];

const NOT_PEOPLE: &[&str] = &["I", "I'm", "I'd", "I'll", "I've"];

impl LexiconNlp {
    pub fn new() -> Self {
        Self
    }

    fn is_verb(word: &str) -> bool {
        let lower = word.to_lowercase();
        if VERBS.contains(&lower.as_str()) {
            return true;
        }
        ["ing", "ed", "es", "s"].iter().any(|suffix| {
            lower
                .strip_suffix(suffix)
                .map(|stem| VERBS.contains(&stem) || VERBS.contains(&format!("{}e", stem).as_str()))
                .unwrap_or(false)
        })
    }
}

impl NlpCapability for LexiconNlp {
    fn analyze(&self, text: &str) -> Result<NlpDocument> {
        let mut doc = NlpDocument::default();

        for sentence in SENTENCE_SPLIT.split(text) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            doc.sentences.push(sentence.to_string());

            let words: Vec<&str> = WORD.find_iter(sentence).map(|m| m.as_str()).collect();
            for (i, word) in words.iter().enumerate() {
                if Self::is_verb(word) {
                    doc.verbs.push(word.to_string());
                } else if i > 0 && DETERMINERS.contains(&words[i - 1].to_lowercase().as_str()) {
                    doc.nouns.push(word.to_string());
                }

                let capitalized = word.chars().next().map(char::is_uppercase).unwrap_or(false);
                if i > 0 && capitalized && !NOT_PEOPLE.contains(word) {
                    doc.people.push(word.to_string());
                }
            }
        }

        Ok(doc)
    }
}
