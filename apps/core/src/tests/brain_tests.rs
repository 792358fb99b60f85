//! Brain Module Tests
//!
//! Cross-component tests for classification, extraction, evaluation and the
//! math dispatcher. Unit tests for each component live next to its code.

use crate::brain::evaluator;
use crate::brain::extractor;
use crate::brain::format::format_number;
use crate::brain::solvers;
use crate::brain::{Intent, IntentClassifier, MathSolver, MathSolverKind};
use crate::error::MathError;

#[cfg(test)]
mod intent_classifier_tests {
    use super::*;

    #[test]
    fn test_reference_examples() {
        let classifier = IntentClassifier::new();

        let cases = vec![
            ("сколько будет 15% от 200", Intent::Math),
            ("что такое искусственный интеллект", Intent::Encyclopedia),
            ("привет", Intent::General),
        ];

        for (text, expected) in cases {
            assert_eq!(
                classifier.classify(text).intent,
                expected,
                "Unexpected intent for '{}'",
                text
            );
        }
    }

    #[test]
    fn test_math_keywords_win_over_lookup_triggers() {
        let classifier = IntentClassifier::new();

        let texts = vec![
            "что такое 2+2",
            "определение: a = b",
            "расскажи о квадрат числа",
            "кто такая Анна-Мария",
        ];

        for text in texts {
            assert_eq!(
                classifier.classify(text).intent,
                Intent::Math,
                "Expected Math for '{}'",
                text
            );
        }
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("СКОЛЬКО БУДЕТ ДВА").intent, Intent::Math);
        assert_eq!(
            classifier.classify("ЧТО ТАКОЕ атом").intent,
            Intent::Encyclopedia
        );
    }

    #[test]
    fn test_trig_shorthand_is_math() {
        let classifier = IntentClassifier::new();
        for text in ["sin 30", "cos 60", "tg 45", "√16"] {
            assert_eq!(classifier.classify(text).intent, Intent::Math, "{}", text);
        }
    }
}

#[cfg(test)]
mod evaluator_tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_reference_values() {
        assert_eq!(evaluator::evaluate("2+2*2"), Ok(6.0));
        assert_eq!(format_number(evaluator::evaluate("(2+3)^2").unwrap()), "25");
        assert!(matches!(
            evaluator::evaluate("10/0"),
            Err(MathError::Evaluation(_))
        ));
    }

    #[test]
    fn test_injection_attempts_rejected_before_evaluation() {
        let attempts = vec![
            "__import__('os')",
            "2+2; rm -rf /",
            "abs(-1)",
            "x=1",
            "1e10",
            "math.pi",
            "2**2;2",
            "0x10",
        ];

        for attempt in attempts {
            assert!(
                matches!(
                    evaluator::evaluate(attempt),
                    Err(MathError::InvalidCharacter(_))
                ),
                "'{}' should fail the whitelist",
                attempt
            );
        }
    }

    #[test]
    fn test_fuzzed_strings_with_forbidden_tokens() {
        let mut rng = StdRng::seed_from_u64(20241017);
        let allowed: Vec<char> = "0123456789+-*/.()^ ".chars().collect();
        let forbidden = ["a", "Z", "_", "__", ";", "x", "π", "е", "=", ",", "!"];

        for _ in 0..2000 {
            let len = rng.gen_range(0..12);
            let mut text: String = (0..len)
                .map(|_| allowed[rng.gen_range(0..allowed.len())])
                .collect();
            let token = forbidden[rng.gen_range(0..forbidden.len())];
            let at = rng.gen_range(0..=text.chars().count());
            let byte_at = text
                .char_indices()
                .nth(at)
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            text.insert_str(byte_at, token);

            let result = evaluator::evaluate(&text);
            assert!(
                matches!(result, Err(MathError::InvalidCharacter(_))),
                "'{}' produced {:?}",
                text,
                result
            );
        }
    }

    #[test]
    fn test_whitelisted_garbage_never_panics() {
        let mut rng = StdRng::seed_from_u64(7);
        let allowed: Vec<char> = "0123456789+-*/.()^".chars().collect();

        for _ in 0..5000 {
            let len = rng.gen_range(0..20);
            let text: String = (0..len)
                .map(|_| allowed[rng.gen_range(0..allowed.len())])
                .collect();
            // Either a finite value or a typed error; never a panic or NaN.
            if let Ok(value) = evaluator::evaluate(&text) {
                assert!(value.is_finite(), "'{}' gave {}", text, value);
            }
        }
    }
}

#[cfg(test)]
mod extraction_pipeline_tests {
    use super::*;

    fn extract_and_evaluate(text: &str) -> Option<String> {
        let expression = extractor::extract(text)?;
        evaluator::evaluate(&expression).ok().map(format_number)
    }

    #[test]
    fn test_word_problems() {
        assert_eq!(extract_and_evaluate("сколько будет 6 умножить на 7?").as_deref(), Some("42"));
        assert_eq!(extract_and_evaluate("посчитай 100 минус 1.").as_deref(), Some("99"));
        assert_eq!(extract_and_evaluate("вычисли (1+2)^3").as_deref(), Some("27"));
        assert_eq!(extract_and_evaluate("2 + 2 = ?").as_deref(), Some("4"));
    }

    #[test]
    fn test_extracted_expressions_pass_the_whitelist() {
        let texts = [
            "сколько будет 2 плюс 2?",
            "посчитай 10 разделить на 4",
            "ну 15 * 4 - 1 вроде",
            "вычисли 3 ^ 2",
        ];
        for text in texts {
            let expression = extractor::extract(text).unwrap();
            assert_eq!(evaluator::validate(&expression), Ok(()), "{}", expression);
        }
    }
}

#[cfg(test)]
mod solver_tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert!(solvers::solve_percentage("15% от 200").unwrap().ends_with("= 30"));
        assert!(solvers::solve_linear("2x + 5 = 15").unwrap().ends_with("= 5"));
        assert!(solvers::solve_trigonometry("sin 30").unwrap().ends_with("= 0.5000"));
    }

    #[test]
    fn test_solvers_decline_instead_of_failing() {
        let junk = ["", "   ", "x", "%", "корень", "sin", "уравнение x", "степень"];
        for text in junk {
            assert_eq!(solvers::solve_linear(text), None, "{}", text);
            assert_eq!(solvers::solve_power_root(text), None, "{}", text);
            assert_eq!(solvers::solve_percentage(text), None, "{}", text);
            assert_eq!(solvers::solve_trigonometry(text), None, "{}", text);
        }
    }
}

#[cfg(test)]
mod math_dispatch_tests {
    use super::*;

    #[test]
    fn test_declared_order() {
        assert_eq!(
            MathSolverKind::ALL,
            [
                MathSolverKind::HowMuch,
                MathSolverKind::Equation,
                MathSolverKind::PowerRoot,
                MathSolverKind::Percentage,
                MathSolverKind::Trigonometry,
            ]
        );
    }

    #[test]
    fn test_each_kind_reachable() {
        let solver = MathSolver::new();

        assert!(solver.solve("сколько будет 3*3").contains("`3*3 = 9`"));
        assert!(solver.solve("уравнение 3x + 3 = 9").starts_with("📐 **Решение уравнения:**"));
        assert!(solver.solve("квадрат 12").contains("Квадрат числа 12 = 144"));
        assert!(solver.solve("сколько процентов составляет 30 от 150?").contains("= 20.0%"));
        assert!(solver.solve("косинус 60").contains("cos(60°) = 0.5000"));
    }

    #[test]
    fn test_help_fallbacks() {
        let solver = MathSolver::new();

        assert_eq!(
            solver.solve("посчитай проценты"),
            MathSolverKind::Percentage.help().unwrap()
        );
        assert_eq!(
            solver.solve("синус"),
            MathSolverKind::Trigonometry.help().unwrap()
        );
    }

    #[test]
    fn test_never_empty() {
        let solver = MathSolver::new();
        let texts = ["+", "=", "реши", "-1", "сколько будет", "2^^2", "((((1"];
        for text in texts {
            assert!(!solver.solve(text).is_empty(), "{}", text);
        }
    }
}
