// Smartbot entry point
// Wires config, logging, the lookup actor and the supervisor to a transport.

mod actors;
mod brain;
mod config;
mod error;
mod status;
mod telemetry;
mod transport;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;
use tracing::{error, info};

use actors::supervisor::SupervisorHandle;
use actors::wikipedia::{WikipediaActorHandle, WikipediaSettings};
use brain::Assistant;
use config::BotConfig;
use transport::telegram::{TelegramClient, TelegramTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing("smartbot").context("Failed to initialize logging")?;

    let config = BotConfig::load().context("Invalid configuration")?;
    info!(
        wikipedia = %config.wikipedia_api_url,
        lookup_timeout_secs = config.lookup_timeout_secs,
        max_answer_chars = config.max_answer_chars,
        telegram = config.telegram_token.is_some(),
        "Configuration loaded"
    );

    let wikipedia = WikipediaActorHandle::new(WikipediaSettings {
        api_url: config.wikipedia_api_url.clone(),
        page_url: config.wikipedia_page_url.clone(),
        timeout: config.lookup_timeout(),
    })
    .context("Failed to start the Wikipedia actor")?;

    let assistant = Arc::new(Assistant::from_config(&config, Arc::new(wikipedia)));
    let supervisor = SupervisorHandle::new(assistant, config.wikipedia_api_url.clone());

    let telegram = match &config.telegram_token {
        Some(token) => Some(
            TelegramClient::new(&config.telegram_api_url, token)
                .context("Failed to create the Telegram client")?,
        ),
        None => None,
    };

    let transport = async {
        match telegram {
            Some(client) => TelegramTransport::new(client, supervisor.clone()).run().await,
            None => {
                info!("TELEGRAM_TOKEN not set, reading questions from stdin");
                let stdin = BufReader::new(tokio::io::stdin());
                transport::console::run(&supervisor, stdin, tokio::io::stdout()).await
            }
        }
    };

    tokio::select! {
        result = transport => {
            if let Err(e) = &result {
                error!(error = %e, "Transport stopped");
            }
            result.context("Transport failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received");
        }
    }

    supervisor.shutdown().await.ok();
    info!("Smartbot stopped");
    Ok(())
}
