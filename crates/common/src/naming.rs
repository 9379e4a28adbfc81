//! Name derivation rules shared by strategies and the renderer

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker prepended to identifiers that would otherwise be empty or start with a digit
pub const GENERIC_ELEMENT: &str = "element";

static TICKET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{3,4})-(.+)$").expect("hardcoded regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("hardcoded regex"));

/// Keep only ASCII letters and digits
pub fn strip_non_alphanumeric(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Turn a free-form label into an identifier-safe locator name.
///
/// Non-alphanumerics are removed; an empty result or one starting with a
/// digit gets the `element` prefix; the first character is lower-cased.
pub fn identifier_from_label(label: &str) -> String {
    let stripped = strip_non_alphanumeric(label);
    let base = match stripped.chars().next() {
        None => GENERIC_ELEMENT.to_string(),
        Some(c) if c.is_ascii_digit() => format!("{}{}", GENERIC_ELEMENT, stripped),
        Some(_) => stripped,
    };
    lowercase_first(&base)
}

/// Sanitize a feature name for display and file naming.
///
/// A short upper-case ticket prefix such as `ABC-` or `ABCD-` is kept
/// verbatim and only the remainder is cleaned.
pub fn sanitize_feature_name(name: &str) -> String {
    if let Some(caps) = TICKET_PREFIX.captures(name) {
        let rest = clean_words(&caps[2]);
        if !rest.is_empty() {
            return format!("{}-{}", &caps[1], rest);
        }
    }
    clean_words(name)
}

fn clean_words(s: &str) -> String {
    let kept: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    WHITESPACE_RUN.replace_all(&kept, " ").trim().to_string()
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Escape text for embedding in a single-quoted JavaScript string
pub fn escape_single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Login", "login" ; "plain word")]
    #[test_case("Sign In!", "signIn" ; "punctuation stripped")]
    #[test_case("", "element" ; "empty label")]
    #[test_case("***", "element" ; "only symbols")]
    #[test_case("2nd step", "element2ndstep" ; "leading digit")]
    #[test_case("Über", "ber" ; "non ascii dropped")]
    fn test_identifier_from_label(label: &str, expected: &str) {
        assert_eq!(identifier_from_label(label), expected);
    }

    #[test_case("User Login!", "User Login" ; "symbols removed")]
    #[test_case("  many   spaces\there ", "many spaces here" ; "whitespace collapsed")]
    #[test_case("ABC-Login & Logout", "ABC-Login Logout" ; "ticket prefix kept")]
    #[test_case("ABCD-search", "ABCD-search" ; "four letter prefix")]
    #[test_case("ABCDE-search", "ABCDEsearch" ; "five letters is not a prefix")]
    #[test_case("abc-search", "abcsearch" ; "lower case is not a prefix")]
    #[test_case("ABC-!!!", "ABC" ; "empty remainder")]
    fn test_sanitize_feature_name(input: &str, expected: &str) {
        assert_eq!(sanitize_feature_name(input), expected);
    }

    #[test]
    fn test_sanitize_feature_name_is_idempotent() {
        for name in ["ABC-Login & Logout", "  x  y ", "ABC-!!!", "JIRA-12 Checkout (v2)", "plain", ""] {
            let once = sanitize_feature_name(name);
            assert_eq!(sanitize_feature_name(&once), once, "input: {:?}", name);
        }
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(capitalize_first("loginFlow"), "LoginFlow");
        assert_eq!(lowercase_first("LoginFlow"), "loginFlow");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_escape_single_quoted() {
        assert_eq!(escape_single_quoted("it's"), "it\\'s");
        assert_eq!(escape_single_quoted("a\\b"), "a\\\\b");
    }
}
