use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::status::StatusReport;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// The encyclopedia did not answer within the configured timeout.
    #[error("Encyclopedia lookup timed out: {0}")]
    LookupTimeout(String),
    /// The encyclopedia request failed (network, HTTP status, malformed body).
    #[error("Encyclopedia lookup failed: {0}")]
    LookupFailed(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// An encyclopedia article as returned by the lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Plain-text introduction; may be empty.
    pub summary: String,
    /// Canonical page URL.
    pub url: String,
}

/// Messages that can be sent to the `WikipediaActor`.
#[derive(Debug)]
pub enum LookupMessage {
    /// Look up a cleaned query. `None` in the response means "not found".
    Lookup {
        query: String,
        responder: oneshot::Sender<Result<Option<Article>, AppError>>,
    },
}

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A request to answer a user's text message from a specific chat.
    ProcessUserMessage {
        chat_id: i64,
        content: String,
        /// A channel to send the final answer back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
    /// A request for the `/status` report.
    Status {
        responder: oneshot::Sender<StatusReport>,
    },
    /// A command to stop the supervisor loop.
    Shutdown,
}
