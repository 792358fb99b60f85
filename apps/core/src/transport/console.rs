use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

use super::respond;
use crate::actors::supervisor::SupervisorHandle;
use crate::error::AppError;

/// Chat id used for every console message.
pub const CONSOLE_CHAT_ID: i64 = 0;

const CONSOLE_USER: &str = "друг";

/// Answers one line at a time until `input` is exhausted.
///
/// Each answer is followed by a blank line.
pub async fn run<R, W>(supervisor: &SupervisorHandle, input: R, mut output: W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Console transport started");
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(answer) = respond(supervisor, CONSOLE_CHAT_ID, CONSOLE_USER, &line).await {
            output.write_all(answer.as_bytes()).await?;
            output.write_all(b"\n\n").await?;
            output.flush().await?;
        }
    }
    info!("Console input closed");
    Ok(())
}
