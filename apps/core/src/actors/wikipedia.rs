use crate::actors::messages::{ActorError, AppError, Article, LookupMessage};
use crate::actors::traits::EncyclopediaActor;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

/// Connection settings for the Wikipedia actor.
#[derive(Debug, Clone)]
pub struct WikipediaSettings {
    /// MediaWiki API endpoint, e.g. `https://ru.wikipedia.org/w/api.php`.
    pub api_url: String,
    /// Base used to build a page URL when the API omits `fullurl`.
    pub page_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// A handle to the `WikipediaActor`.
///
/// This struct provides a public, cloneable interface for sending lookups to
/// the running actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct WikipediaActorHandle {
    sender: mpsc::Sender<LookupMessage>,
    timeout: Duration,
}

impl WikipediaActorHandle {
    /// Creates a new `WikipediaActor` and returns a handle to it.
    ///
    /// This will spawn the `WikipediaActorRunner` in a new Tokio task.
    pub fn new(settings: WikipediaSettings) -> Result<Self, AppError> {
        let (sender, receiver) = mpsc::channel(32);
        let request_timeout = settings.timeout;
        let client = WikipediaClient::new(settings)?;
        let actor = WikipediaActorRunner { receiver, client };
        tokio::spawn(async move { actor.run().await });
        Ok(Self {
            sender,
            timeout: request_timeout,
        })
    }
}

#[async_trait]
impl EncyclopediaActor for WikipediaActorHandle {
    async fn lookup(&self, query: String) -> Result<Option<Article>, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LookupMessage::Lookup {
            query,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("Wikipedia actor closed".to_string())))?;

        // The HTTP client enforces the real timeout; this only guards a stuck actor.
        let grace = self.timeout + Duration::from_secs(2);
        timeout(grace, recv)
            .await
            .map_err(|_| {
                AppError::Actor(ActorError::LookupTimeout(format!(
                    "no answer within {:?}",
                    grace
                )))
            })?
            .map_err(|_| {
                AppError::Actor(ActorError::Internal(
                    "Wikipedia actor failed to respond".to_string(),
                ))
            })?
    }
}

// --- Actor Runner (Internal Logic) ---
struct WikipediaActorRunner {
    receiver: mpsc::Receiver<LookupMessage>,
    client: WikipediaClient,
}

impl WikipediaActorRunner {
    async fn run(mut self) {
        info!("WikipediaActor started");
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg);
        }
        info!("WikipediaActor stopped");
    }

    fn handle_message(&self, msg: LookupMessage) {
        match msg {
            LookupMessage::Lookup { query, responder } => {
                // Lookups run concurrently; one slow query must not hold up the others.
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client.fetch(&query).await;
                    let _ = responder.send(result);
                });
            }
        }
    }
}

// --- MediaWiki response shapes ---

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    missing: Option<serde_json::Value>,
    #[serde(default)]
    invalid: Option<serde_json::Value>,
}

#[derive(Clone)]
struct WikipediaClient {
    client: Client,
    api_url: String,
    page_url: Url,
}

fn lookup_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Actor(ActorError::LookupTimeout(err.to_string()))
    } else {
        AppError::Actor(ActorError::LookupFailed(err.to_string()))
    }
}

impl WikipediaClient {
    fn new(settings: WikipediaSettings) -> Result<Self, AppError> {
        let page_url = Url::parse(&settings.page_url)?;
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("smartbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: settings.api_url,
            page_url,
        })
    }

    fn page_link(&self, title: &str) -> String {
        let mut url = self.page_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&title.replace(' ', "_"));
        }
        url.to_string()
    }

    async fn fetch(&self, query: &str) -> Result<Option<Article>, AppError> {
        debug!(query = %query, "Querying Wikipedia");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("titles", query),
                ("prop", "extracts|info"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("redirects", "1"),
            ])
            .send()
            .await
            .map_err(lookup_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Wikipedia returned an error status");
            return Err(AppError::Actor(ActorError::LookupFailed(format!(
                "Wikipedia request failed with status {}",
                status
            ))));
        }

        let body: QueryResponse = response.json().await.map_err(lookup_error)?;
        let pages = body.query.map(|q| q.pages).unwrap_or_default();

        let found = pages
            .into_iter()
            .find(|(id, page)| id != "-1" && page.missing.is_none() && page.invalid.is_none());

        Ok(found.map(|(_, page)| {
            let url = page
                .fullurl
                .clone()
                .unwrap_or_else(|| self.page_link(&page.title));
            Article {
                summary: page.extract.unwrap_or_default().trim().to_string(),
                title: page.title,
                url,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer, timeout: Duration) -> WikipediaSettings {
        WikipediaSettings {
            api_url: format!("{}/w/api.php", server.uri()),
            page_url: "https://ru.wikipedia.org/wiki/".to_string(),
            timeout,
        }
    }

    #[tokio::test]
    async fn test_lookup_found_article() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        let handle = WikipediaActorHandle::new(settings(&mock_server, Duration::from_secs(5))).unwrap();

        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("titles", "rust"))
            .and(query_param("action", "query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": {
                    "pages": {
                        "123": {
                            "pageid": 123,
                            "title": "Rust (язык программирования)",
                            "extract": "Rust — мультипарадигменный язык программирования.",
                            "fullurl": "https://ru.wikipedia.org/wiki/Rust_(язык_программирования)"
                        }
                    }
                }
            })))
            .mount(&mock_server)
            .await;

        // 2. Act
        let result = handle.lookup("rust".to_string()).await;

        // 3. Assert
        let article = result.unwrap().unwrap();
        assert_eq!(article.title, "Rust (язык программирования)");
        assert!(article.summary.starts_with("Rust"));
        assert_eq!(
            article.url,
            "https://ru.wikipedia.org/wiki/Rust_(язык_программирования)"
        );
    }

    #[tokio::test]
    async fn test_lookup_missing_page_is_not_found() {
        let mock_server = MockServer::start().await;
        let handle = WikipediaActorHandle::new(settings(&mock_server, Duration::from_secs(5))).unwrap();

        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": {
                    "pages": {
                        "-1": { "ns": 0, "title": "Несуществующая статья", "missing": "" }
                    }
                }
            })))
            .mount(&mock_server)
            .await;

        let result = handle.lookup("несуществующая статья".to_string()).await;
        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lookup_builds_url_without_fullurl() {
        let mock_server = MockServer::start().await;
        let handle = WikipediaActorHandle::new(settings(&mock_server, Duration::from_secs(5))).unwrap();

        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": { "pages": { "42": { "title": "Hello World", "extract": "" } } }
            })))
            .mount(&mock_server)
            .await;

        let article = handle.lookup("hello world".to_string()).await.unwrap().unwrap();
        assert_eq!(article.url, "https://ru.wikipedia.org/wiki/Hello_World");
        assert!(article.summary.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_server_error() {
        let mock_server = MockServer::start().await;
        let handle = WikipediaActorHandle::new(settings(&mock_server, Duration::from_secs(5))).unwrap();

        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let result = handle.lookup("rust".to_string()).await;
        match result {
            Err(AppError::Actor(ActorError::LookupFailed(msg))) => {
                assert!(msg.contains("500"));
            }
            other => panic!("Expected LookupFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lookup_timeout_is_distinct() {
        let mock_server = MockServer::start().await;
        let handle =
            WikipediaActorHandle::new(settings(&mock_server, Duration::from_millis(200))).unwrap();

        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "query": { "pages": {} } }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let result = handle.lookup("rust".to_string()).await;
        assert!(
            matches!(result, Err(AppError::Actor(ActorError::LookupTimeout(_)))),
            "Expected LookupTimeout, got {:?}",
            result
        );
    }
}
