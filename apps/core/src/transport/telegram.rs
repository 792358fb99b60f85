//! Telegram Bot API transport over long polling.
//!
//! Only the two calls the bot needs are implemented: `getUpdates` and
//! `sendMessage`. Answers go out with `parse_mode=Markdown`; when Telegram
//! rejects the markup with a 400 the same text is resent as plain text.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::respond;
use crate::actors::supervisor::SupervisorHandle;
use crate::error::AppError;

/// Seconds a single `getUpdates` call may wait for new messages.
pub const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause after a failed poll before trying again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub first_name: String,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

/// Strips the request URL from errors: it contains the bot token.
fn transport_error(err: reqwest::Error) -> AppError {
    AppError::Transport(err.without_url().to_string())
}

/// Thin Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()
            .map_err(transport_error)?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, AppError> {
        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", timeout_secs.to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let body: ApiResponse<Vec<Update>> = response.json().await.map_err(transport_error)?;
        if !body.ok {
            return Err(AppError::Transport(format!(
                "getUpdates rejected: {}",
                body.description.unwrap_or_default()
            )));
        }
        Ok(body.result.unwrap_or_default())
    }

    async fn post_message(&self, payload: &SendMessage<'_>) -> Result<StatusCode, AppError> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        Ok(response.status())
    }

    /// Sends `text` with Markdown, falling back to plain text if the markup is rejected.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), AppError> {
        let status = self
            .post_message(&SendMessage {
                chat_id,
                text,
                parse_mode: Some("Markdown"),
            })
            .await?;

        let status = if status == StatusCode::BAD_REQUEST {
            warn!(chat_id, "Markdown rejected, sending as plain text");
            self.post_message(&SendMessage {
                chat_id,
                text,
                parse_mode: None,
            })
            .await?
        } else {
            status
        };

        if status.is_success() {
            Ok(())
        } else {
            Err(AppError::Transport(format!(
                "sendMessage failed with status {}",
                status
            )))
        }
    }
}

/// Long-polling loop feeding updates to the supervisor.
pub struct TelegramTransport {
    client: TelegramClient,
    supervisor: SupervisorHandle,
    offset: i64,
}

impl TelegramTransport {
    pub fn new(client: TelegramClient, supervisor: SupervisorHandle) -> Self {
        Self {
            client,
            supervisor,
            offset: 0,
        }
    }

    /// Acknowledges updates queued while the bot was offline without answering them.
    pub async fn skip_pending(&mut self) -> Result<(), AppError> {
        let pending = self.client.get_updates(-1, 0).await?;
        if let Some(last) = pending.last() {
            self.offset = last.update_id + 1;
            info!(offset = self.offset, "Dropped pending updates");
        }
        Ok(())
    }

    /// Fetches one batch of updates and spawns a handler per update.
    pub async fn poll_once(&mut self) -> Result<Vec<JoinHandle<()>>, AppError> {
        let updates = self.client.get_updates(self.offset, POLL_TIMEOUT_SECS).await?;
        let mut handlers = Vec::with_capacity(updates.len());

        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);
            let client = self.client.clone();
            let supervisor = self.supervisor.clone();
            handlers.push(tokio::spawn(async move {
                handle_update(&client, &supervisor, update).await;
            }));
        }
        Ok(handlers)
    }

    /// Polls forever; transient failures are logged and retried.
    pub async fn run(mut self) -> Result<(), AppError> {
        info!("Telegram transport started");
        if let Err(e) = self.skip_pending().await {
            warn!(error = %e, "Could not drop pending updates");
        }
        loop {
            if let Err(e) = self.poll_once().await {
                warn!(error = %e, "Polling failed, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}

async fn handle_update(client: &TelegramClient, supervisor: &SupervisorHandle, update: Update) {
    let Some(message) = update.message else {
        debug!(update_id = update.update_id, "Ignoring non-message update");
        return;
    };
    let Some(text) = message.text else {
        debug!(update_id = update.update_id, "Ignoring message without text");
        return;
    };

    let chat_id = message.chat.id;
    let first_name = message
        .from
        .map(|user| user.first_name)
        .unwrap_or_default();

    if let Some(answer) = respond(supervisor, chat_id, &first_name, &text).await {
        if let Err(e) = client.send_message(chat_id, &answer).await {
            error!(chat_id, error = %e, "Failed to deliver answer");
        }
    }
}
