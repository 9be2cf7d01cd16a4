use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

pub mod session;

pub use session::{ChatMessage, ChatReply, ChatSession, MessageSender};

use crate::assistant::{self, AnswerResponse, Assistant, ClassificationDecision, CompletionClient, QueryKind};
use crate::catalog::Catalog;
use crate::config::{AppConfig, BrandConfig};
use crate::error::BargainResult;
use crate::logging::{LogContext, RequestIdGenerator};
use crate::search::{DealsResponse, SearchEngine, SearchParams, SearchProgress};

/// Application facade tying the catalog, search engine and assistant together
pub struct BargainHunter {
    config: AppConfig,
    catalog: Arc<Catalog>,
    search: Arc<SearchEngine>,
    assistant: Arc<Assistant>,
}

impl BargainHunter {
    /// Build from configuration, loading the catalog file when one is set
    pub async fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing {}", config.brand.name);

        let catalog = match &config.catalog.path {
            Some(path) => Catalog::load_json(path).await.map_err(|e| {
                crate::contextual_error!(e, "load_catalog", "core", "path" => path.display().to_string())
            })?,
            None => Catalog::builtin(),
        };

        Ok(Self::with_catalog(config, catalog))
    }

    pub fn with_catalog(config: AppConfig, catalog: Catalog) -> Self {
        let assistant = Assistant::new(&config.assistant);
        Self::assemble(config, catalog, assistant)
    }

    /// Use a specific completion client instead of the configured endpoint
    pub fn with_completion_client(config: AppConfig, catalog: Catalog, client: Arc<dyn CompletionClient>) -> Self {
        let assistant = Assistant::with_client(&config.assistant, client);
        Self::assemble(config, catalog, assistant)
    }

    fn assemble(config: AppConfig, catalog: Catalog, assistant: Assistant) -> Self {
        let catalog = Arc::new(catalog);
        let search = SearchEngine::new(catalog.clone(), &config.search, config.catalog.affiliate_tag.clone());
        info!(
            "Catalog ready: {} deals, sort policy {:?}",
            catalog.len(),
            search.sort_policy()
        );

        Self {
            config,
            catalog,
            search: Arc::new(search),
            assistant: Arc::new(assistant),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn brand(&self) -> &BrandConfig {
        &self.config.brand
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn categories(&self) -> Vec<String> {
        self.catalog.categories()
    }

    pub fn classify(&self, message: &str) -> QueryKind {
        assistant::classify(message)
    }

    /// Classification plus the keyword that decided it
    pub fn classify_with_decision(&self, message: &str) -> ClassificationDecision {
        assistant::classify_with_decision(message)
    }

    pub async fn search_deals(&self, params: &SearchParams) -> DealsResponse {
        self.search.search(params, None).await
    }

    pub async fn search_deals_with_progress(
        &self,
        params: &SearchParams,
        progress: &UnboundedSender<SearchProgress>,
    ) -> DealsResponse {
        self.search.search(params, Some(progress)).await
    }

    pub async fn answer_question(&self, query: &str) -> AnswerResponse {
        self.assistant.answer_question(query).await
    }

    pub fn new_session(&self) -> ChatSession {
        ChatSession::new(&self.config.brand, &self.config.chat)
    }

    /// Reply to one message without session state
    pub async fn reply_to(&self, message: &str) -> ChatReply {
        let query = message.trim();
        let decision = self.classify_with_decision(query);

        let context = LogContext::new("chat", "reply")
            .with_request_id(RequestIdGenerator::generate())
            .with_query(query)
            .with_string_field("kind", format!("{:?}", decision.kind))
            .with_string_field("keyword", decision.keyword.unwrap_or("-"));
        crate::log_debug!(context, "Message classified");

        match decision.kind {
            QueryKind::ProductQuestion => {
                let answer = self.answer_question(query).await;
                ChatReply {
                    kind: QueryKind::ProductQuestion,
                    content: answer.answer,
                    total: 0,
                    deals: Vec::new(),
                    sources: answer.sources,
                    origin: Some(answer.origin),
                }
            }
            QueryKind::DealSearch => {
                let response = self.search_deals(&SearchParams::new(query)).await;
                let content = if response.deals.is_empty() {
                    session::not_found_message(query)
                } else {
                    session::found_message(response.total, query)
                };
                ChatReply {
                    kind: QueryKind::DealSearch,
                    content,
                    total: response.total,
                    deals: response.deals,
                    sources: Vec::new(),
                    origin: None,
                }
            }
        }
    }

    /// Record the user's message and the reply in `session`; blank input yields `None`
    pub async fn handle_message(&self, session: &mut ChatSession, text: &str) -> BargainResult<Option<ChatReply>> {
        let query = match session.accept_input(text)? {
            Some(query) => query,
            None => return Ok(None),
        };

        session.push_user(query);
        let reply = self.reply_to(query).await;
        session.push_reply(&reply);

        Ok(Some(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::AnswerOrigin;
    use crate::error::BargainError;

    fn fast_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.search.latency_ms = 0;
        config.assistant.scrape_latency_ms = 0;
        config
    }

    fn hunter() -> BargainHunter {
        BargainHunter::with_catalog(fast_config(), Catalog::builtin())
    }

    #[tokio::test]
    async fn test_deal_search_reply() {
        let hunter = hunter();
        let reply = hunter.reply_to("amazon").await;

        assert_eq!(reply.kind, QueryKind::DealSearch);
        assert_eq!(reply.total, 8);
        assert_eq!(reply.deals.len(), 8);
        assert_eq!(reply.content, "I found 8 deals for \"amazon\". Here are the best ones:");
    }

    #[tokio::test]
    async fn test_default_config_keeps_affiliate_placeholder() {
        let response = hunter().search_deals(&SearchParams::new("kindle")).await;
        assert_eq!(response.deals[0].url, "https://amazon.com/deal/kindle?tag=AFFILIATE_ID");

        let mut config = fast_config();
        config.catalog.affiliate_tag = "bargains-20".to_string();
        let tagged = BargainHunter::with_catalog(config, Catalog::builtin());
        let response = tagged.search_deals(&SearchParams::new("kindle")).await;
        assert_eq!(response.deals[0].url, "https://amazon.com/deal/kindle?tag=bargains-20");
    }

    #[tokio::test]
    async fn test_no_results_reply() {
        let reply = hunter().reply_to("unicorn saddles").await;
        assert_eq!(reply.total, 0);
        assert!(reply.content.starts_with("I couldn't find any deals matching \"unicorn saddles\""));
    }

    #[tokio::test]
    async fn test_question_reply_is_templated_without_key() {
        let reply = hunter().reply_to("What's the best price for AirPods Pro?").await;
        assert_eq!(reply.kind, QueryKind::ProductQuestion);
        assert_eq!(reply.origin, Some(AnswerOrigin::Templated));
        assert_eq!(reply.sources.len(), 4);
        assert!(reply.content.contains("AUDIO20"));
    }

    #[tokio::test]
    async fn test_session_flow() {
        let hunter = hunter();
        let mut session = hunter.new_session();

        assert!(hunter.handle_message(&mut session, "   ").await.unwrap().is_none());
        assert_eq!(session.messages().len(), 1);

        let reply = hunter.handle_message(&mut session, "kitchen").await.unwrap().unwrap();
        assert_eq!(reply.total, 2);

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, MessageSender::User);
        assert_eq!(messages[1].content, "kitchen");
        assert_eq!(messages[2].deals.len(), 2);
    }

    #[tokio::test]
    async fn test_overlong_input_rejected() {
        let mut config = fast_config();
        config.chat.max_input_length = 5;
        let hunter = BargainHunter::with_catalog(config, Catalog::builtin());
        let mut session = hunter.new_session();

        let result = hunter.handle_message(&mut session, "gaming laptops").await;
        assert!(matches!(result, Err(BargainError::InputValidation { .. })));
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_new_loads_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deals.json");
        let deals = vec![crate::catalog::tests::deal("a", "Target", "Toys")];
        tokio::fs::write(&path, serde_json::to_string(&deals).unwrap()).await.unwrap();

        let mut config = fast_config();
        config.catalog.path = Some(path);
        let hunter = BargainHunter::new(config).await.unwrap();

        assert_eq!(hunter.catalog().len(), 1);
        assert_eq!(hunter.categories(), vec!["Toys".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_catalog_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fast_config();
        config.catalog.path = Some(dir.path().join("missing.json"));

        let err = BargainHunter::new(config).await.err().unwrap();
        assert!(err.to_string().contains("core::load_catalog"));
    }
}
