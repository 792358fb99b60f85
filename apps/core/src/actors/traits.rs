use crate::actors::messages::{AppError, Article};
use async_trait::async_trait;

/// Defines the public interface for the encyclopedia lookup collaborator.
///
/// This trait abstracts the search backend so the orchestrator can be driven
/// by the Wikipedia actor in production and by mocks in tests.
#[async_trait]
pub trait EncyclopediaActor: Send + Sync + 'static {
    /// Looks up an already cleaned query.
    ///
    /// Returns `Ok(None)` when nothing matches. Timeouts are reported as
    /// `ActorError::LookupTimeout`, every other failure as
    /// `ActorError::LookupFailed`.
    async fn lookup(&self, query: String) -> Result<Option<Article>, AppError>;
}
