//! Intent Classification using keyword membership.
//!
//! Decides whether a message is a math problem, an encyclopedia query or
//! general chatter. Keyword sets are tested in order against the lower-cased
//! text; the first set with a hit wins.
//!
//! Bare operator characters are math keywords, so any text containing `=`,
//! `+`, `-`, `*`, `/` or `^` is classified as math even when it reads like an
//! encyclopedia question. This is an accepted limitation of the heuristic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Arithmetic, equations, percentages, powers, trigonometry
    Math,
    /// "What is X" / "who is Y" lookups
    Encyclopedia,
    /// Everything else
    General,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns a human-readable label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Math => "math",
            Intent::Encyclopedia => "encyclopedia",
            Intent::General => "general",
        }
    }
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentResult {
    /// Detected intent
    pub intent: Intent,
    /// Keyword that decided the intent (None for `General`)
    pub matched_keyword: Option<&'static str>,
}

/// Math triggers. Checked before anything else.
pub const MATH_KEYWORDS: &[&str] = &[
    "сколько будет",
    "реши",
    "посчитай",
    "вычисли",
    "уравнение",
    "равно",
    "=",
    "+",
    "-",
    "*",
    "/",
    "^",
    "квадрат",
    "корень",
    "синус",
    "косинус",
    "тангенс",
    "котангенс",
    "логарифм",
    "процент",
    "степень",
    "модуль",
    "√",
    "sin",
    "cos",
    "tg",
];

/// Encyclopedia triggers.
pub const ENCYCLOPEDIA_KEYWORDS: &[&str] = &[
    "что такое",
    "кто такой",
    "кто такая",
    "определение",
    "это",
    "расскажи о",
    "информация о",
    "статья о",
    "википедия",
];

struct KeywordGroup {
    intent: Intent,
    keywords: &'static [&'static str],
}

/// Intent classifier using ordered keyword groups
pub struct IntentClassifier {
    groups: Vec<KeywordGroup>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a new classifier. Math is tested first, then Encyclopedia.
    pub fn new() -> Self {
        let groups = vec![
            KeywordGroup {
                intent: Intent::Math,
                keywords: MATH_KEYWORDS,
            },
            KeywordGroup {
                intent: Intent::Encyclopedia,
                keywords: ENCYCLOPEDIA_KEYWORDS,
            },
        ];

        Self { groups }
    }

    /// Classify the intent of a text
    pub fn classify(&self, text: &str) -> IntentResult {
        let lower = text.to_lowercase();

        for group in &self.groups {
            if let Some(keyword) = group.keywords.iter().find(|k| lower.contains(**k)) {
                return IntentResult {
                    intent: group.intent,
                    matched_keyword: Some(*keyword),
                };
            }
        }

        IntentResult {
            intent: Intent::General,
            matched_keyword: None,
        }
    }
}
