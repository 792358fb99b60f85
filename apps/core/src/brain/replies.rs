//! Templated hints for messages that are neither math nor lookups.
//!
//! Which template is picked is deliberately unconstrained; the picker is
//! seedable so tests and reproductions can pin it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Number of general reply templates.
pub const TEMPLATE_COUNT: usize = 3;

fn render(template: usize, question: &str) -> String {
    match template {
        0 => format!(
            "🤔 *Ваш запрос:* '{}'\n\n*Я могу помочь с:*\n• Математическими задачами\n• Поиском в Wikipedia\n• Вычислениями и формулами\n\n*Примеры:*\n• сколько будет 15% от 200\n• что такое искусственный интеллект\n• sin 30 градусов",
            question
        ),
        1 => format!(
            "📝 *Запрос:* '{}'\n\nУточните, что нужно:\n• **Математика**: решение, вычисление\n• **Информация**: определение, факты\n• **Объяснение**: как работает, что значит",
            question
        ),
        _ => format!(
            "💡 *'{}'*\n\nДля лучшего ответа:\n1. Математика → напишите выражение\n2. Wikipedia → 'что такое [термин]'\n3. Помощь → конкретный вопрос",
            question
        ),
    }
}

pub struct GeneralReplies {
    rng: Mutex<StdRng>,
}

impl GeneralReplies {
    /// A fixed seed gives a reproducible sequence; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn reply(&self, question: &str) -> String {
        let template = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.gen_range(0..TEMPLATE_COUNT)
        };
        render(template, question)
    }

    /// Every reply this picker could produce for `question`.
    pub fn candidates(question: &str) -> Vec<String> {
        (0..TEMPLATE_COUNT).map(|t| render(t, question)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_is_one_of_the_templates() {
        let replies = GeneralReplies::new(None);
        let candidates = GeneralReplies::candidates("привет");
        for _ in 0..20 {
            assert!(candidates.contains(&replies.reply("привет")));
        }
    }

    #[test]
    fn test_seeded_picker_is_reproducible() {
        let a = GeneralReplies::new(Some(7));
        let b = GeneralReplies::new(Some(7));
        for _ in 0..10 {
            assert_eq!(a.reply("q"), b.reply("q"));
        }
    }

    #[test]
    fn test_templates_embed_question() {
        for candidate in GeneralReplies::candidates("как дела") {
            assert!(candidate.contains("как дела"));
        }
    }
}
