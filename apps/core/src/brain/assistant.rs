//! Assistant - answers a single question.
//!
//! Flow: cache lookup, intent classification, one handler per intent, cache
//! store, length ceiling. The assistant is constructed once per process and
//! shared by reference; it holds no per-conversation state.

use std::sync::Arc;
use tracing::{debug, error, info};

use super::cache::ResponseCache;
use super::encyclopedia;
use super::format::{enforce_ceiling, preview};
use super::intent::{Intent, IntentClassifier};
use super::math::MathSolver;
use super::replies::GeneralReplies;
use crate::actors::messages::AppError;
use crate::actors::traits::EncyclopediaActor;
use crate::config::BotConfig;

/// Returned when anything in the answer chain fails.
pub const APOLOGY_MESSAGE: &str = "⚠️ *Произошла ошибка*\n\nПопробуйте:\n1. Переформулировать вопрос\n2. Использовать команду /start\n3. Подождать 1-2 минуты";

/// Returned by the supervisor when processing panicked or overran its deadline.
pub const INTERNAL_ERROR_MESSAGE: &str = "❌ Внутренняя ошибка бота. Попробуйте ещё раз.";

/// Length limits applied to answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerLimits {
    /// Hard ceiling for a whole answer, truncation notice included.
    pub max_answer_chars: usize,
    /// Ceiling for an encyclopedia summary before `...` is appended.
    pub summary_chars: usize,
}

impl Default for AnswerLimits {
    fn default() -> Self {
        Self {
            max_answer_chars: 4000,
            summary_chars: 400,
        }
    }
}

/// A computed answer and whether it may be memoized.
struct Reply {
    text: String,
    cacheable: bool,
}

impl Reply {
    fn cached(text: String) -> Self {
        Self {
            text,
            cacheable: true,
        }
    }

    fn transient(text: String) -> Self {
        Self {
            text,
            cacheable: false,
        }
    }
}

pub struct Assistant<E: EncyclopediaActor> {
    classifier: IntentClassifier,
    math: MathSolver,
    encyclopedia: Arc<E>,
    cache: ResponseCache,
    replies: GeneralReplies,
    limits: AnswerLimits,
}

impl<E: EncyclopediaActor> Assistant<E> {
    pub fn new(encyclopedia: Arc<E>, limits: AnswerLimits, reply_seed: Option<u64>) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            math: MathSolver::new(),
            encyclopedia,
            cache: ResponseCache::new(),
            replies: GeneralReplies::new(reply_seed),
            limits,
        }
    }

    pub fn from_config(config: &BotConfig, encyclopedia: Arc<E>) -> Self {
        Self::new(encyclopedia, config.answer_limits(), config.reply_seed)
    }

    /// Number of memoized answers.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Answers `question`. Never fails and never returns an empty string.
    pub async fn answer(&self, question: &str) -> String {
        if let Some(hit) = self.cache.lookup(question) {
            debug!(question = %preview(question, 50), "Cache hit");
            return hit;
        }

        let text = match self.compute(question).await {
            Ok(reply) => {
                let text = enforce_ceiling(reply.text, self.limits.max_answer_chars);
                if reply.cacheable {
                    self.cache.store(question, &text);
                }
                text
            }
            Err(e) => {
                error!(error = %e, "Failed to answer question");
                APOLOGY_MESSAGE.to_string()
            }
        };

        if text.is_empty() {
            return APOLOGY_MESSAGE.to_string();
        }
        text
    }

    async fn compute(&self, question: &str) -> Result<Reply, AppError> {
        let classification = self.classifier.classify(question);
        info!(
            intent = %classification.intent,
            keyword = ?classification.matched_keyword,
            "Question classified"
        );

        match classification.intent {
            Intent::Math => Ok(Reply::cached(self.math.solve(question))),
            Intent::Encyclopedia => {
                match encyclopedia::answer(
                    self.encyclopedia.as_ref(),
                    question,
                    self.limits.summary_chars,
                )
                .await
                {
                    Ok(text) => Ok(Reply::cached(text)),
                    // Lookup outages are not memoized: the next ask may succeed.
                    Err(e) => match encyclopedia::failure_message(&e) {
                        Some(message) => Ok(Reply::transient(message.to_string())),
                        None => Err(e),
                    },
                }
            }
            Intent::General => Ok(Reply::cached(self.replies.reply(question))),
        }
    }
}
