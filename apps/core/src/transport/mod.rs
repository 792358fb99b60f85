//! Chat transports: Telegram long polling and a line-based console.
//!
//! Both feed incoming text through [`respond`], so commands and error
//! handling behave the same everywhere.

pub mod commands;
pub mod console;
pub mod telegram;

use tracing::{debug, error};

use crate::actors::supervisor::SupervisorHandle;
use crate::brain::assistant::INTERNAL_ERROR_MESSAGE;
use commands::Command;

/// Produces the reply for one incoming text, or `None` when it should be ignored.
pub async fn respond(
    supervisor: &SupervisorHandle,
    chat_id: i64,
    first_name: &str,
    text: &str,
) -> Option<String> {
    match commands::parse(text) {
        Command::Start => Some(commands::start_greeting(first_name)),
        Command::Status => match supervisor.status().await {
            Ok(report) => Some(report.render()),
            Err(e) => {
                error!(chat_id, error = %e, "Status request failed");
                Some(INTERNAL_ERROR_MESSAGE.to_string())
            }
        },
        Command::Unknown(name) => {
            debug!(chat_id, command = %name, "Ignoring unknown command");
            None
        }
        Command::Text(content) if content.trim().is_empty() => None,
        Command::Text(content) => match supervisor.process_message(chat_id, content).await {
            Ok(answer) => Some(answer),
            Err(e) => {
                error!(chat_id, error = %e, "Message processing failed");
                Some(INTERNAL_ERROR_MESSAGE.to_string())
            }
        },
    }
}
