//! Display helpers shared by solvers and handlers.
//!
//! All lengths are counted in characters, not bytes: answers are mostly
//! Cyrillic and the transport ceiling is expressed in characters.

/// Appended when an answer is cut to fit the transport ceiling.
pub const TRUNCATION_NOTICE: &str = "\n\n... (сообщение обрезано)";

/// Formats a number, dropping the fractional part of whole values.
///
/// `f64`'s `Display` already prints `30.0` as `30`; only the sign of
/// negative zero needs fixing.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Formats with a fixed number of decimals (`0.5000`), without `-0.0000`.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value);
    match rendered.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => rendered,
    }
}

/// Cuts `text` to `limit` characters and appends `...` when it was longer.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.trim().to_string();
    }
    let head: String = text.chars().take(limit).collect();
    format!("{}...", head.trim())
}

/// Keeps an answer within `ceiling` characters, notice included.
pub fn enforce_ceiling(answer: String, ceiling: usize) -> String {
    if answer.chars().count() <= ceiling {
        return answer;
    }
    let notice_len = TRUNCATION_NOTICE.chars().count();
    let keep = ceiling.saturating_sub(notice_len);
    let mut cut: String = answer.chars().take(keep).collect();
    cut.push_str(TRUNCATION_NOTICE);
    cut
}

/// Short single-line preview for log records.
pub fn preview(text: &str, limit: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(limit)
        .collect();
    if text.chars().count() > limit {
        format!("{}...", flat)
    } else {
        flat
    }
}
