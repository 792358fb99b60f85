//! Specialized math solvers.
//!
//! Each solver is a stateless procedure over the raw problem text. It either
//! returns a formatted solution or `None` (not applicable); none of them
//! panics or propagates an error.
//!
//! Numbers are taken from the text in order of appearance and used
//! positionally. `5 = 2x + 5` is therefore read as `a = 5, b = 2, c = 5`;
//! this is a known limitation of the heuristic.

use regex::Regex;
use std::sync::LazyLock;

use super::format::{format_fixed, format_number};

static SIGNED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("Invalid regex: signed number")
});

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("Invalid regex: integer"));

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("Invalid regex: decimal"));

static PERCENT_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*%\s*от\s*([0-9]+(?:\.[0-9]+)?)")
        .expect("Invalid regex: percent of")
});

static WHAT_PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)сколько процентов составляет\s+([0-9]+(?:\.[0-9]+)?)\s*от\s*([0-9]+(?:\.[0-9]+)?)",
    )
    .expect("Invalid regex: what percent")
});

/// Below this magnitude a tangent or sine is treated as zero.
const TRIG_EPSILON: f64 = 1e-10;

fn finite(literal: &str) -> Option<f64> {
    literal.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numbers in order of appearance. Empty if any literal does not fit an `f64`,
/// since dropping one would shift the positional reading.
fn numbers(pattern: &Regex, text: &str) -> Vec<f64> {
    pattern
        .find_iter(text)
        .map(|m| finite(m.as_str()))
        .collect::<Option<Vec<f64>>>()
        .unwrap_or_default()
}

fn mentions_unknown(lower: &str) -> bool {
    // Latin x or Cyrillic х
    lower.contains('x') || lower.contains('х')
}

/// Solves `a·x + b = c` using the first three numbers of the text.
pub fn solve_linear(problem: &str) -> Option<String> {
    if !mentions_unknown(&problem.to_lowercase()) {
        return None;
    }

    let nums = numbers(&SIGNED_NUMBER, problem);
    let [a, b, c] = match nums.as_slice() {
        [a, b, c, ..] => [*a, *b, *c],
        _ => return None,
    };
    if a == 0.0 {
        return None;
    }

    let x = (c - b) / a;
    if !x.is_finite() {
        return None;
    }

    Some(format!(
        "Уравнение: {}\nРешение: x = ({} - {}) / {} = {}",
        problem.trim(),
        format_number(c),
        format_number(b),
        format_number(a),
        format_number(x)
    ))
}

/// Squares, square and cube roots, and explicit powers.
pub fn solve_power_root(problem: &str) -> Option<String> {
    let lower = problem.to_lowercase();
    let nums = numbers(&INTEGER, problem);
    let num = *nums.first()?;

    // Roots first: "квадратный корень" also contains "квадрат".
    if lower.contains("корень") || lower.contains('√') {
        return if lower.contains("кубич") {
            Some(format!(
                "Кубический корень из {} = {}",
                format_number(num),
                format_fixed(num.cbrt(), 4)
            ))
        } else {
            Some(format!(
                "Квадратный корень из {} = {}",
                format_number(num),
                format_fixed(num.sqrt(), 4)
            ))
        };
    }

    if lower.contains("квадрат") {
        let square = num * num;
        if !square.is_finite() {
            return None;
        }
        return Some(format!(
            "Квадрат числа {} = {}",
            format_number(num),
            format_number(square)
        ));
    }

    if lower.contains("степен") || lower.contains('^') {
        let (base, exponent) = match nums.as_slice() {
            [base, exponent, ..] => (*base, *exponent),
            _ => return None,
        };
        let result = base.powf(exponent);
        if !result.is_finite() {
            return None;
        }
        return Some(format!(
            "{} в степени {} = {}",
            format_number(base),
            format_number(exponent),
            format_number(result)
        ));
    }

    None
}

/// `P% от N` and `сколько процентов составляет P от W`.
pub fn solve_percentage(problem: &str) -> Option<String> {
    if let Some(caps) = PERCENT_OF.captures(problem) {
        let percent = finite(caps.get(1)?.as_str())?;
        let number = finite(caps.get(2)?.as_str())?;
        let result = percent / 100.0 * number;
        if !result.is_finite() {
            return None;
        }
        return Some(format!(
            "{}% от {} = {}",
            format_number(percent),
            format_number(number),
            format_number(result)
        ));
    }

    if let Some(caps) = WHAT_PERCENT.captures(problem) {
        let part = finite(caps.get(1)?.as_str())?;
        let whole = finite(caps.get(2)?.as_str())?;
        if whole == 0.0 {
            return None;
        }
        let percent = part / whole * 100.0;
        if !percent.is_finite() {
            return None;
        }
        return Some(format!(
            "{} от {} = {}%",
            format_number(part),
            format_number(whole),
            format_fixed(percent, 1)
        ));
    }

    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrigFunction {
    Sin,
    Cos,
    Tan,
    Cot,
}

impl TrigFunction {
    fn detect(lower: &str) -> Option<Self> {
        // Order matters: "котангенс" contains "тангенс", "ctg" contains "tg",
        // "косинус" contains "синус".
        if ["ctg", "cot", "котангенс"].iter().any(|k| lower.contains(k)) {
            Some(TrigFunction::Cot)
        } else if ["cos", "косинус"].iter().any(|k| lower.contains(k)) {
            Some(TrigFunction::Cos)
        } else if ["sin", "синус"].iter().any(|k| lower.contains(k)) {
            Some(TrigFunction::Sin)
        } else if ["tg", "tan", "тангенс"].iter().any(|k| lower.contains(k)) {
            Some(TrigFunction::Tan)
        } else {
            None
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TrigFunction::Sin => "sin",
            TrigFunction::Cos => "cos",
            TrigFunction::Tan => "tg",
            TrigFunction::Cot => "ctg",
        }
    }

    /// `None` where the function is undefined.
    fn apply(&self, radians: f64) -> Option<f64> {
        match self {
            TrigFunction::Sin => Some(radians.sin()),
            TrigFunction::Cos => Some(radians.cos()),
            TrigFunction::Tan => {
                if radians.cos().abs() < TRIG_EPSILON {
                    None
                } else {
                    Some(radians.tan())
                }
            }
            TrigFunction::Cot => {
                let tan = radians.tan();
                if tan.abs() < TRIG_EPSILON {
                    None
                } else {
                    Some(1.0 / tan)
                }
            }
        }
    }
}

/// sin/cos/tg/ctg of the first number, read as degrees.
pub fn solve_trigonometry(problem: &str) -> Option<String> {
    let lower = problem.to_lowercase();
    let function = TrigFunction::detect(&lower)?;
    let angle = *numbers(&DECIMAL, problem).first()?;

    let label = function.label();
    let shown = format_number(angle);
    match function.apply(angle.to_radians()) {
        Some(value) => Some(format!("{}({}°) = {}", label, shown, format_fixed(value, 4))),
        None => Some(format!("{}({}°) не определён", label, shown)),
    }
}
