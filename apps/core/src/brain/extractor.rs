//! Expression extraction from free text.
//!
//! Pulls a candidate arithmetic substring out of a message. Trigger phrases
//! are tried in order; the first match wins. Without a trigger, the longest
//! run of digits and operators is taken. Number words are replaced by their
//! operator symbols before the candidate is returned.

use regex::Regex;
use std::sync::LazyLock;

// NOTE: expect() is acceptable in these statics: the patterns are literals.
static TRIGGER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)сколько будет\s+([^?]+)").expect("Invalid regex: how-much trigger"),
        Regex::new(r"(?i)посчитай\s+([^.]+)").expect("Invalid regex: calculate trigger"),
        Regex::new(r"(?i)вычисли\s+([^.]+)").expect("Invalid regex: compute trigger"),
        Regex::new(r"([0-9\s+\-*/^().]*[0-9][0-9\s+\-*/^().]*)=").expect("Invalid regex: run before '='"),
    ]
});

static OPERATOR_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9\s+\-*/^().]+").expect("Invalid regex: operator run")
});

/// Word phrases and their operator symbols, longest phrases first.
const WORD_OPERATORS: &[(&str, &str)] = &[
    (" умножить на ", "*"),
    (" разделить на ", "/"),
    (" делить на ", "/"),
    (" плюс ", "+"),
    (" минус ", "-"),
    (" умножить ", "*"),
    (" разделить ", "/"),
    (" на ", "/"),
];

/// Extracts an arithmetic expression from `text`, or `None` when there is
/// nothing that contains a digit.
pub fn extract(text: &str) -> Option<String> {
    for pattern in TRIGGER_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            if let Some(group) = captures.get(1) {
                let candidate = substitute_words(group.as_str());
                if has_digit(&candidate) {
                    return Some(candidate);
                }
            }
        }
    }

    OPERATOR_RUN
        .find_iter(text)
        .map(|m| m.as_str().trim_matches(|c: char| c.is_whitespace() || c == '.'))
        .filter(|run| has_digit(run))
        .max_by_key(|run| run.len())
        .map(substitute_words)
}

fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn substitute_words(raw: &str) -> String {
    // Pad so that phrases at the edges still carry their surrounding spaces.
    let mut expression = format!(" {} ", raw.trim().to_lowercase());
    for (word, symbol) in WORD_OPERATORS {
        expression = expression.replace(word, symbol);
    }
    expression.split_whitespace().collect::<Vec<_>>().join(" ")
}
