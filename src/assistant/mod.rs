use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub mod classifier;
pub mod client;
pub mod fallback;
pub mod prompts;
pub mod scraping;

pub use classifier::{classify, classify_with_decision, ClassificationDecision, QueryKind};
pub use client::{Backend, BackendState, CompletionClient, CompletionOutcome};

use crate::config::AssistantConfig;
use crate::logging::{LogContext, PerformanceLogger};
use crate::{log_info, log_warn};
use scraping::ScrapeSimulator;

/// Where an answer's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrigin {
    Generated,
    Templated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub sources: Vec<String>,
    pub origin: AnswerOrigin,
}

/// Answers product questions from simulated scrape findings
pub struct Assistant {
    scraper: ScrapeSimulator,
    backend: BackendState,
}

impl Assistant {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            scraper: ScrapeSimulator::new(Duration::from_millis(config.scrape_latency_ms)),
            backend: BackendState::new(config),
        }
    }

    /// Use an already constructed completion client
    pub fn with_client(config: &AssistantConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            scraper: ScrapeSimulator::new(Duration::from_millis(config.scrape_latency_ms)),
            backend: BackendState::with_client(config, client),
        }
    }

    pub fn backend(&self) -> &BackendState {
        &self.backend
    }

    /// Never fails: backend problems fall back to templated text
    pub async fn answer_question(&self, query: &str) -> AnswerResponse {
        let context = LogContext::new("assistant", "answer_question").with_query(query);
        let perf = PerformanceLogger::new(context.clone());

        let sources = self.scraper.gather(query).await;
        let scraped = context.clone().with_number_field("sources", sources.len() as i64);
        log_info!(scraped, "Collected scrape findings");

        let outcome = match self.backend.get().await {
            Backend::Ready(client) => {
                let messages = prompts::build_messages(query, &sources);
                Some(client.complete(&messages).await)
            }
            Backend::Unavailable { reason } => {
                let unavailable = context.clone().with_string_field("reason", reason.clone());
                log_info!(unavailable, "Completion backend unavailable");
                None
            }
        };

        let (answer, origin) = match outcome {
            Some(CompletionOutcome::Generated(text)) => (text, AnswerOrigin::Generated),
            Some(CompletionOutcome::Failed(e)) => {
                let failed = context.clone().with_error_category(e.category());
                log_warn!(failed, e, "Completion failed, using templated answer");
                (fallback::templated_answer(query, &sources), AnswerOrigin::Templated)
            }
            None => (fallback::templated_answer(query, &sources), AnswerOrigin::Templated),
        };

        perf.finish_with_status("Answer ready", format!("{:?}", origin).to_lowercase());

        AnswerResponse { answer, sources, origin }
    }
}

#[cfg(test)]
mod tests {
    use super::client::ChatCompletionMessage;
    use super::*;
    use crate::error::BargainError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn fast_config() -> AssistantConfig {
        AssistantConfig {
            scrape_latency_ms: 0,
            ..Default::default()
        }
    }

    struct CannedClient {
        reply: Option<String>,
        seen: Mutex<Vec<ChatCompletionMessage>>,
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(&self, messages: &[ChatCompletionMessage]) -> CompletionOutcome {
            self.seen.lock().unwrap().extend_from_slice(messages);
            match &self.reply {
                Some(text) => CompletionOutcome::Generated(text.clone()),
                None => CompletionOutcome::Failed(BargainError::CompletionHttp {
                    endpoint: "test".to_string(),
                    status: 503,
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_unconfigured_uses_templated_answer() {
        let assistant = Assistant::new(&fast_config());
        let response = assistant.answer_question("which standing desk is good").await;

        assert_eq!(response.origin, AnswerOrigin::Templated);
        assert_eq!(response.sources.len(), 4);
        assert!(response.answer.starts_with("Based on what I found across different sites:"));
        // Site prefix stripped from the first finding
        let (_, detail) = response.sources[0].split_once(": ").unwrap();
        assert!(response.answer.contains(detail));
        assert!(!response.answer.contains("PriceRunner: "));
    }

    #[tokio::test]
    async fn test_templated_answers_quote_a_finding() {
        let assistant = Assistant::new(&fast_config());

        for query in ["best airpods", "which gaming laptop", "best kitchen appliance", "what desk"] {
            let response = assistant.answer_question(query).await;
            assert_eq!(response.origin, AnswerOrigin::Templated, "{}", query);
            assert!(!response.answer.is_empty());

            let quoted = response.sources.iter().any(|source| {
                let detail = source.split_once(": ").map_or(source.as_str(), |(_, rest)| rest);
                response.answer.contains(detail)
            });
            assert!(quoted, "no finding quoted for {:?}", query);
        }
    }

    #[tokio::test]
    async fn test_generated_answer_passes_through() {
        let client = Arc::new(CannedClient {
            reply: Some("Go with Walmart.".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let assistant = Assistant::with_client(&fast_config(), client.clone());
        let response = assistant.answer_question("best airpods deal?").await;

        assert_eq!(response.origin, AnswerOrigin::Generated);
        assert_eq!(response.answer, "Go with Walmart.");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[1].content.starts_with("Web search results:\nPriceRunner:"));
    }

    #[tokio::test]
    async fn test_failed_completion_falls_back() {
        let client = Arc::new(CannedClient {
            reply: None,
            seen: Mutex::new(Vec::new()),
        });
        let assistant = Assistant::with_client(&fast_config(), client);
        let response = assistant.answer_question("what's the best gaming laptop").await;

        assert_eq!(response.origin, AnswerOrigin::Templated);
        assert!(response.answer.contains("MSI Katana"));
    }

    #[test]
    fn test_answer_json_shape() {
        let response = AnswerResponse {
            answer: "a".to_string(),
            sources: vec![],
            origin: AnswerOrigin::Generated,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["origin"], "generated");
    }
}
