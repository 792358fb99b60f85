//! Encyclopedia questions: query cleaning and answer formatting.
//!
//! The lookup itself is done by an [`EncyclopediaActor`]; this module only
//! decides what to ask and how to present the result.

use tracing::{debug, warn};

use super::format::truncate_with_ellipsis;
use crate::actors::messages::{ActorError, AppError, Article};
use crate::actors::traits::EncyclopediaActor;

/// Phrases stripped from a question before it is sent to the lookup.
const TRIGGER_PHRASES: &[&str] = &[
    "что такое",
    "кто такой",
    "кто такая",
    "расскажи о",
    "информация о",
    "статья о",
    "определение",
];

pub const USAGE_HINT: &str = "📚 *Wikipedia поиск:*\n\nУкажите, что найти:\n• что такое [термин]\n• кто такой [имя]\n• информация о [тема]";

pub const TIMEOUT_MESSAGE: &str = "⏰ Wikipedia не отвечает. Попробуйте позже.";

pub const FAILURE_MESSAGE: &str = "❌ Ошибка поиска в Wikipedia. Попробуйте позже.";

/// Lower-cases the question and strips trigger phrases and trailing punctuation.
pub fn clean_query(question: &str) -> String {
    let mut query = question.to_lowercase();
    for phrase in TRIGGER_PHRASES {
        query = query.replace(phrase, " ");
    }
    let collapsed = query.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(['?', '!', '.', ','])
        .trim()
        .to_string()
}

pub fn format_article(article: &Article, summary_chars: usize) -> String {
    if article.summary.trim().is_empty() {
        return format!(
            "📚 **{}**\n\nСтатья найдена, но без описания.\n🔗 [Wikipedia]({})",
            article.title, article.url
        );
    }
    format!(
        "📚 **{}**\n\n{}\n\n🔗 [Читать далее на Wikipedia]({})",
        article.title,
        truncate_with_ellipsis(&article.summary, summary_chars),
        article.url
    )
}

pub fn not_found(query: &str) -> String {
    format!(
        "🔍 По запросу '{}' ничего не найдено в Wikipedia.\n\nПопробуйте:\n• Другие формулировки\n• Английские термины\n• Более общие запросы",
        query
    )
}

/// User-facing text for a failed lookup, `None` for errors that are not lookup failures.
pub fn failure_message(err: &AppError) -> Option<&'static str> {
    match err {
        AppError::Actor(ActorError::LookupTimeout(_)) => Some(TIMEOUT_MESSAGE),
        AppError::Actor(ActorError::LookupFailed(_)) => Some(FAILURE_MESSAGE),
        _ => None,
    }
}

/// Answers an encyclopedia question through `actor`.
///
/// Lookup errors are returned as-is so the caller can decide whether the
/// resulting message may be cached.
pub async fn answer<E>(actor: &E, question: &str, summary_chars: usize) -> Result<String, AppError>
where
    E: EncyclopediaActor + ?Sized,
{
    let query = clean_query(question);
    if query.is_empty() {
        return Ok(USAGE_HINT.to_string());
    }

    match actor.lookup(query.clone()).await {
        Ok(Some(article)) => {
            debug!(title = %article.title, "Encyclopedia article found");
            Ok(format_article(&article, summary_chars))
        }
        Ok(None) => {
            debug!(query = %query, "Encyclopedia article not found");
            Ok(not_found(&query))
        }
        Err(e) => {
            warn!(query = %query, error = %e, "Encyclopedia lookup failed");
            Err(e)
        }
    }
}
