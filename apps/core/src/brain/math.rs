//! Math request dispatch.
//!
//! Solver kinds are tried in declaration order. A kind is only tried when its
//! gate keywords appear in the text, and a `None` from a solver falls through
//! to the next kind. After the solvers comes a generic extract-and-evaluate
//! pass, and finally a help message.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::evaluator;
use super::extractor;
use super::format::{format_number, preview};
use super::solvers;

/// The specialized math solvers, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathSolverKind {
    HowMuch,
    Equation,
    PowerRoot,
    Percentage,
    Trigonometry,
}

impl MathSolverKind {
    pub const ALL: [MathSolverKind; 5] = [
        MathSolverKind::HowMuch,
        MathSolverKind::Equation,
        MathSolverKind::PowerRoot,
        MathSolverKind::Percentage,
        MathSolverKind::Trigonometry,
    ];

    /// Sub-keyword test deciding whether this kind is worth trying.
    pub fn is_gated_in(&self, lower: &str) -> bool {
        match self {
            MathSolverKind::HowMuch => lower.contains("сколько будет"),
            MathSolverKind::Equation => {
                lower.contains("уравнение")
                    || (lower.contains('=') && (lower.contains('x') || lower.contains('х')))
            }
            MathSolverKind::PowerRoot => ["квадрат", "корень", "√", "степен"]
                .iter()
                .any(|k| lower.contains(k)),
            MathSolverKind::Percentage => lower.contains("процент") || lower.contains('%'),
            MathSolverKind::Trigonometry => [
                "sin", "cos", "tg", "tan", "cot", "синус", "косинус", "тангенс", "котангенс",
            ]
            .iter()
            .any(|k| lower.contains(k)),
        }
    }

    fn solve(&self, problem: &str) -> Option<String> {
        match self {
            MathSolverKind::HowMuch => evaluate_in_text(problem).ok(),
            MathSolverKind::Equation => solvers::solve_linear(problem)
                .map(|s| format!("📐 **Решение уравнения:**\n\n{}", s)),
            MathSolverKind::PowerRoot => {
                solvers::solve_power_root(problem).map(|s| format!("🔢 **Решение:**\n\n{}", s))
            }
            MathSolverKind::Percentage => {
                solvers::solve_percentage(problem).map(|s| format!("📊 **Проценты:**\n\n{}", s))
            }
            MathSolverKind::Trigonometry => solvers::solve_trigonometry(problem)
                .map(|s| format!("📐 **Тригонометрия:**\n\n{}", s)),
        }
    }

    /// Usage hint shown when this kind was requested but could not solve.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            MathSolverKind::HowMuch => None,
            MathSolverKind::Equation => Some(
                "📐 *Решение уравнений:*\n\nНапишите уравнение в формате:\n`2x + 5 = 15` или `3x - 6 = 9`",
            ),
            MathSolverKind::PowerRoot => Some(
                "🔢 *Степени и корни:*\n\nПримеры:\n• квадрат 5\n• корень из 16\n• 2 в степени 3",
            ),
            MathSolverKind::Percentage => Some(
                "📊 *Проценты:*\n\nПример:\n`15% от 200` или `сколько процентов составляет 30 от 150?`",
            ),
            MathSolverKind::Trigonometry => {
                Some("📐 *Тригонометрия:*\n\nПримеры:\n• sin 30\n• cos 45\n• tg 60")
            }
        }
    }
}

/// Shown when nothing at all could be made of a math request.
pub const MATH_HELP: &str =
    "🧮 *Математическая помощь:*\n\nУточните:\n• Конкретное выражение\n• Тип задачи\n• Пример";

/// Why the generic evaluation path produced no answer.
enum GenericFailure {
    NoExpression,
    Failed(String),
}

fn evaluate_in_text(problem: &str) -> Result<String, GenericFailure> {
    let expression = extractor::extract(problem).ok_or(GenericFailure::NoExpression)?;
    match evaluator::evaluate(&expression) {
        Ok(value) => Ok(format!(
            "🧮 **Решение:**\n\n`{} = {}`",
            expression,
            format_number(value)
        )),
        Err(e) => {
            debug!(expression = %preview(&expression, 50), error = %e, "Expression evaluation failed");
            Err(GenericFailure::Failed(e.to_string()))
        }
    }
}

/// Stateless dispatcher over [`MathSolverKind`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MathSolver;

impl MathSolver {
    pub fn new() -> Self {
        Self
    }

    /// Produces the answer text for a message already classified as math.
    pub fn solve(&self, problem: &str) -> String {
        let lower = problem.to_lowercase();
        let gated: Vec<MathSolverKind> = MathSolverKind::ALL
            .into_iter()
            .filter(|kind| kind.is_gated_in(&lower))
            .collect();

        for kind in &gated {
            if let Some(answer) = kind.solve(problem) {
                debug!(solver = ?kind, "Math solver answered");
                return answer;
            }
            debug!(solver = ?kind, "Math solver not applicable");
        }

        let first_help = gated.iter().find_map(|kind| kind.help());
        match evaluate_in_text(problem) {
            Ok(answer) => answer,
            Err(GenericFailure::Failed(message)) => match first_help {
                Some(help) => help.to_string(),
                None => format!(
                    "❌ Ошибка вычисления: {}\n\nПопробуйте сформулировать иначе.",
                    message
                ),
            },
            Err(GenericFailure::NoExpression) => first_help.unwrap_or(MATH_HELP).to_string(),
        }
    }
}
