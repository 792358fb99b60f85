//! Status report for the `/status` command.
//!
//! Each check is cheap and runs on every request; nothing here touches the
//! network.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::brain::evaluator;

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
        }
    }

    fn fail(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
        }
    }
}

/// Complete status report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    pub started_at: DateTime<Utc>,
    pub processed_messages: u64,
}

/// Inputs gathered by the supervisor.
pub struct StatusInputs<'a> {
    pub cache_entries: usize,
    pub encyclopedia_endpoint: &'a str,
    pub started_at: DateTime<Utc>,
    pub processed_messages: u64,
}

pub fn build_report(inputs: StatusInputs<'_>) -> StatusReport {
    let checks = vec![
        check_math_engine(),
        check_cache(inputs.cache_entries),
        check_encyclopedia(inputs.encyclopedia_endpoint),
    ];

    for check in &checks {
        if check.passed {
            info!(check = %check.name, "Status check passed: {}", check.message);
        } else {
            warn!(check = %check.name, "Status check failed: {}", check.message);
        }
    }

    StatusReport {
        all_passed: checks.iter().all(|c| c.passed),
        checks,
        started_at: inputs.started_at,
        processed_messages: inputs.processed_messages,
    }
}

/// Evaluates a known expression end to end.
fn check_math_engine() -> CheckResult {
    match evaluator::evaluate("2+2*2") {
        Ok(value) if value == 6.0 => CheckResult::pass("math_engine", "2+2*2 = 6"),
        Ok(value) => CheckResult::fail("math_engine", &format!("2+2*2 = {}", value)),
        Err(e) => CheckResult::fail("math_engine", &e.to_string()),
    }
}

fn check_cache(entries: usize) -> CheckResult {
    CheckResult::pass("cache", &format!("{} записей", entries))
}

fn check_encyclopedia(endpoint: &str) -> CheckResult {
    match url::Url::parse(endpoint) {
        Ok(url) => CheckResult::pass(
            "encyclopedia",
            url.host_str().unwrap_or(endpoint),
        ),
        Err(e) => CheckResult::fail("encyclopedia", &format!("некорректный адрес: {}", e)),
    }
}

impl StatusReport {
    /// Renders the report in the bot's markup.
    pub fn render(&self) -> String {
        let headline = if self.all_passed {
            "✅ *Бот работает нормально!*"
        } else {
            "⚠️ *Бот работает с ошибками*"
        };

        let mut text = String::from(headline);
        text.push_str("\n\n");
        for check in &self.checks {
            let mark = if check.passed { "✓" } else { "✗" };
            // Code spans keep `_` and `*` in names and messages literal.
            text.push_str(&format!("{} `{}`: `{}`\n", mark, check.name, check.message));
        }
        text.push_str(&format!(
            "\n⏰ *Запущен:* {}\n📩 *Обработано сообщений:* {}",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.processed_messages
        ));
        text
    }
}
