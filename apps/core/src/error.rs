use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents errors specific to the actor system, such as communication failures
    /// or a failed encyclopedia lookup.
    #[error("Actor error: {0}")]
    Actor(#[from] crate::actors::messages::ActorError),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents failures talking to the chat transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by the arithmetic evaluator.
///
/// The messages are shown to the user, hence the Russian text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// The expression contains a character outside `0-9 + - * / . ( ) ^`.
    #[error("недопустимый символ '{0}'")]
    InvalidCharacter(char),

    /// Parsing or arithmetic failed (division by zero, overflow, malformed syntax).
    #[error("{0}")]
    Evaluation(String),
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Validation(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}
