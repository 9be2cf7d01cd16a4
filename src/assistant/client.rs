use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::AssistantConfig;
use crate::error::{BargainError, BargainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionMessage {
    pub role: Role,
    pub content: String,
}

impl ChatCompletionMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatCompletionMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: String,
}

impl ChatCompletionResponse {
    /// First choice's text, rejecting blank output
    pub fn into_text(self) -> BargainResult<String> {
        let text = self
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| BargainError::CompletionMalformed { reason: "no choices".to_string() })?;

        if text.trim().is_empty() {
            return Err(BargainError::CompletionMalformed { reason: "empty content".to_string() });
        }
        Ok(text)
    }
}

/// Result of a completion call; callers must handle both arms
#[derive(Debug)]
pub enum CompletionOutcome {
    Generated(String),
    Failed(BargainError),
}

impl From<BargainResult<String>> for CompletionOutcome {
    fn from(result: BargainResult<String>) -> Self {
        match result {
            Ok(text) => CompletionOutcome::Generated(text),
            Err(e) => CompletionOutcome::Failed(e),
        }
    }
}

/// Text generation collaborator
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatCompletionMessage]) -> CompletionOutcome;
}

/// OpenRouter-compatible chat-completions client
pub struct OpenRouterClient {
    client: Client,
    config: AssistantConfig,
}

impl OpenRouterClient {
    pub fn new(config: &AssistantConfig) -> BargainResult<Self> {
        if !config.is_configured() {
            return Err(BargainError::CompletionNotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn request(&self, messages: &[ChatCompletionMessage]) -> BargainResult<String> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.openrouter_api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BargainError::CompletionHttp {
                endpoint: self.config.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        parsed.into_text()
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, messages: &[ChatCompletionMessage]) -> CompletionOutcome {
        debug!("Requesting completion from {} ({} messages)", self.config.endpoint, messages.len());
        self.request(messages).await.into()
    }
}

/// What the assistant can use for generation
#[derive(Clone)]
pub enum Backend {
    Ready(Arc<dyn CompletionClient>),
    Unavailable { reason: String },
}

impl Backend {
    pub fn is_ready(&self) -> bool {
        matches!(self, Backend::Ready(_))
    }
}

/// Lazily initialized completion backend.
///
/// The first `get` builds the backend; concurrent first calls wait on the same
/// initialization instead of starting their own.
pub struct BackendState {
    config: AssistantConfig,
    cell: OnceCell<Backend>,
    init_attempts: AtomicUsize,
}

impl BackendState {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            config: config.clone(),
            cell: OnceCell::new(),
            init_attempts: AtomicUsize::new(0),
        }
    }

    /// Already initialized with the given client
    pub fn with_client(config: &AssistantConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            config: config.clone(),
            cell: OnceCell::new_with(Some(Backend::Ready(client))),
            init_attempts: AtomicUsize::new(0),
        }
    }

    pub async fn get(&self) -> &Backend {
        self.cell.get_or_init(|| self.initialize()).await
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    pub fn init_attempts(&self) -> usize {
        self.init_attempts.load(Ordering::SeqCst)
    }

    async fn initialize(&self) -> Backend {
        self.init_attempts.fetch_add(1, Ordering::SeqCst);

        if !self.config.is_configured() {
            info!("Completion API key not configured, using templated answers");
            return Backend::Unavailable {
                reason: "API key not configured".to_string(),
            };
        }

        match OpenRouterClient::new(&self.config) {
            Ok(client) => {
                info!("Completion backend ready: {} ({})", self.config.endpoint, self.config.model);
                Backend::Ready(Arc::new(client))
            }
            Err(e) => {
                warn!("Completion backend unavailable: {}", e);
                Backend::Unavailable { reason: e.to_string() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(endpoint: &str) -> AssistantConfig {
        AssistantConfig {
            openrouter_api_key: "sk-or-test".to_string(),
            endpoint: endpoint.to_string(),
            request_timeout_seconds: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"id":"gen-1","choices":[{"index":0,"message":{"role":"assistant","content":"Walmart has them for $179."}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "Walmart has them for $179.");
    }

    #[test]
    fn test_empty_choices_and_blank_content_are_failures() {
        let parsed: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(parsed.into_text(), Err(BargainError::CompletionMalformed { .. })));

        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(parsed.into_text().is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatCompletionMessage::new(Role::User, "hi")];
        let body = ChatCompletionRequest {
            model: "anthropic/claude-3-opus:beta",
            messages: &messages,
            temperature: 0.7,
            max_tokens: 500,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn test_client_requires_key() {
        let result = OpenRouterClient::new(&AssistantConfig::default());
        assert!(matches!(result, Err(BargainError::CompletionNotConfigured)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_failure() {
        let client = OpenRouterClient::new(&configured("http://127.0.0.1:9/v1/chat/completions")).unwrap();
        let outcome = client.complete(&[ChatCompletionMessage::new(Role::User, "hi")]).await;
        match outcome {
            CompletionOutcome::Failed(e) => assert!(e.is_recoverable()),
            CompletionOutcome::Generated(text) => panic!("unexpected completion: {}", text),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_backend_is_unavailable() {
        let state = BackendState::new(&AssistantConfig::default());
        assert!(!state.is_initialized());
        assert!(!state.get().await.is_ready());
        assert!(state.is_initialized());
    }

    #[tokio::test]
    async fn test_concurrent_init_runs_once() {
        let state = BackendState::new(&configured("https://openrouter.ai/api/v1/chat/completions"));
        let (a, b, c) = tokio::join!(state.get(), state.get(), state.get());
        assert!(a.is_ready() && b.is_ready() && c.is_ready());
        assert_eq!(state.init_attempts(), 1);

        state.get().await;
        assert_eq!(state.init_attempts(), 1);
    }
}
