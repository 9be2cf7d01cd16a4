use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assistant::{AnswerOrigin, QueryKind};
use crate::catalog::Deal;
use crate::config::{BrandConfig, ChatConfig};
use crate::error::{BargainError, BargainResult};

pub const WELCOME_ID: &str = "welcome";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: MessageSender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deals: Vec<Deal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl ChatMessage {
    fn new(sender: MessageSender, content: impl Into<String>) -> Self {
        let prefix = match sender {
            MessageSender::User => "user",
            MessageSender::Assistant => "bot",
        };
        Self {
            id: format!("{}-{}", prefix, crate::utils::generate_id()),
            sender,
            content: content.into(),
            timestamp: Utc::now(),
            deals: Vec::new(),
            sources: Vec::new(),
        }
    }
}

/// Assistant's answer to one user message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub kind: QueryKind,
    pub content: String,
    /// Total matches for a deal search; `deals` holds the first page
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub deals: Vec<Deal>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<AnswerOrigin>,
}

pub fn found_message(total: usize, query: &str) -> String {
    format!("I found {} deals for \"{}\". Here are the best ones:", total, query)
}

pub fn not_found_message(query: &str) -> String {
    format!(
        "I couldn't find any deals matching \"{}\". Try searching for something else or check back later!",
        query
    )
}

/// Ordered conversation, opened by the brand's welcome message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    history_limit: usize,
    max_input_length: usize,
}

impl ChatSession {
    pub fn new(brand: &BrandConfig, chat: &ChatConfig) -> Self {
        let mut welcome = ChatMessage::new(MessageSender::Assistant, brand.welcome.clone());
        welcome.id = WELCOME_ID.to_string();

        Self {
            messages: vec![welcome],
            history_limit: chat.history_limit,
            max_input_length: chat.max_input_length,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Trimmed input, `None` when blank
    pub fn accept_input<'a>(&self, text: &'a str) -> BargainResult<Option<&'a str>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > self.max_input_length {
            return Err(BargainError::InputValidation {
                input: format!("message longer than {} characters", self.max_input_length),
            });
        }
        Ok(Some(trimmed))
    }

    pub fn push_user(&mut self, content: &str) {
        self.push(ChatMessage::new(MessageSender::User, content));
    }

    pub fn push_reply(&mut self, reply: &ChatReply) {
        let mut message = ChatMessage::new(MessageSender::Assistant, reply.content.clone());
        message.deals = reply.deals.clone();
        message.sources = reply.sources.clone();
        self.push(message);
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);

        // Welcome stays at index 0; drop the oldest after it
        let limit = self.history_limit.max(2);
        while self.messages.len() > limit {
            self.messages.remove(1);
        }
    }
}
