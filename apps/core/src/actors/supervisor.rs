use crate::actors::messages::{ActorError, AppError, SupervisorMessage};
use crate::actors::traits::EncyclopediaActor;
use crate::brain::assistant::{Assistant, INTERNAL_ERROR_MESSAGE};
use crate::brain::format::preview;
use crate::status::{self, StatusInputs, StatusReport};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, info_span, instrument, Instrument};
use uuid::Uuid;

/// Upper bound for answering one message, lookup included.
pub const PROCESSING_TIMEOUT: Duration = Duration::from_secs(30);

/// A handle to the `SupervisorActor`.
///
/// This is the entry point the transports talk to. Every user message is
/// answered on its own task, so a slow lookup in one chat never delays another.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    processing_timeout: Duration,
}

impl SupervisorHandle {
    /// Spawns the supervisor around a shared assistant.
    ///
    /// `encyclopedia_endpoint` is only reported by `/status`.
    pub fn new<E: EncyclopediaActor>(
        assistant: Arc<Assistant<E>>,
        encyclopedia_endpoint: String,
    ) -> Self {
        Self::with_timeout(assistant, encyclopedia_endpoint, PROCESSING_TIMEOUT)
    }

    /// Same as [`SupervisorHandle::new`] with a custom per-message deadline.
    pub fn with_timeout<E: EncyclopediaActor>(
        assistant: Arc<Assistant<E>>,
        encyclopedia_endpoint: String,
        processing_timeout: Duration,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(64);
        let actor = SupervisorRunner {
            receiver,
            assistant,
            encyclopedia_endpoint,
            started_at: Utc::now(),
            processed: Arc::new(AtomicU64::new(0)),
            processing_timeout,
        };
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            processing_timeout,
        }
    }

    async fn send(&self, msg: SupervisorMessage) -> Result<(), AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("Supervisor closed".to_string())))
    }

    /// Answers a user's text message.
    ///
    /// Always resolves to an answer text unless the supervisor itself is gone;
    /// panics and timeouts while answering become the internal-error message.
    #[instrument(skip(self, content))]
    pub async fn process_message(&self, chat_id: i64, content: String) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        self.send(SupervisorMessage::ProcessUserMessage {
            chat_id,
            content,
            responder: send,
        })
        .await?;

        // The runner enforces the real deadline; this only guards a stuck actor.
        timeout(self.processing_timeout + Duration::from_secs(5), recv)
            .await
            .map_err(ActorError::from)?
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?
    }

    /// Builds the `/status` report.
    pub async fn status(&self) -> Result<StatusReport, AppError> {
        let (send, recv) = oneshot::channel();
        self.send(SupervisorMessage::Status { responder: send }).await?;
        timeout(Duration::from_secs(5), recv)
            .await
            .map_err(ActorError::from)?
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))
    }

    /// Stops the supervisor loop. Messages already being answered still complete.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.send(SupervisorMessage::Shutdown).await
    }
}

// --- Actor Runner ---
struct SupervisorRunner<E: EncyclopediaActor> {
    receiver: mpsc::Receiver<SupervisorMessage>,
    assistant: Arc<Assistant<E>>,
    encyclopedia_endpoint: String,
    started_at: DateTime<Utc>,
    processed: Arc<AtomicU64>,
    processing_timeout: Duration,
}

impl<E: EncyclopediaActor> SupervisorRunner<E> {
    async fn run(mut self) {
        info!("Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if !self.handle_message(msg) {
                break;
            }
        }
        info!("Supervisor stopped");
    }

    /// Returns `false` once the loop should stop.
    fn handle_message(&self, msg: SupervisorMessage) -> bool {
        match msg {
            SupervisorMessage::ProcessUserMessage {
                chat_id,
                content,
                responder,
            } => {
                let request_id = Uuid::new_v4();
                info!(%request_id, chat_id, text = %preview(&content, 50), "Message received");

                let assistant = self.assistant.clone();
                let processed = self.processed.clone();
                let deadline = self.processing_timeout;
                let span = info_span!("user_message", %request_id, chat_id);
                tokio::spawn(
                    async move {
                        let answer = answer_guarded(assistant, content, deadline).await;
                        processed.fetch_add(1, Ordering::Relaxed);
                        let _ = responder.send(Ok(answer));
                    }
                    .instrument(span),
                );
                true
            }
            SupervisorMessage::Status { responder } => {
                let report = status::build_report(StatusInputs {
                    cache_entries: self.assistant.cache_len(),
                    encyclopedia_endpoint: &self.encyclopedia_endpoint,
                    started_at: self.started_at,
                    processed_messages: self.processed.load(Ordering::Relaxed),
                });
                let _ = responder.send(report);
                true
            }
            SupervisorMessage::Shutdown => {
                info!("Supervisor shutting down...");
                false
            }
        }
    }
}

/// Answers on a separate task so a panic surfaces as a `JoinError` instead of
/// tearing down the caller.
async fn answer_guarded<E: EncyclopediaActor>(
    assistant: Arc<Assistant<E>>,
    content: String,
    deadline: Duration,
) -> String {
    let mut task = tokio::spawn(async move { assistant.answer(&content).await });
    match timeout(deadline, &mut task).await {
        Ok(Ok(answer)) => answer,
        Ok(Err(join_error)) => {
            error!(error = %join_error, "Answer task failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        }
        Err(_) => {
            task.abort();
            error!(timeout = ?deadline, "Answer timed out");
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }
}
