//! Bargain Hunter - a shopping-deal assistant
//!
//! This library provides:
//! - A static deal catalog with keyword and rule based search
//! - Routing of chat messages into deal searches or product questions
//! - Product answers from an OpenAI-compatible chat-completion endpoint,
//!   with a templated local fallback
//! - Chat sessions, a CLI and an optional HTTP API

pub mod assistant;
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod search;
pub mod utils;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for convenience
pub use crate::assistant::{AnswerOrigin, AnswerResponse, QueryKind};
pub use crate::catalog::{Catalog, Deal};
pub use crate::config::AppConfig;
pub use crate::core::{BargainHunter, ChatReply, ChatSession};
pub use crate::error::{BargainError, BargainResult, ContextualError};
pub use crate::search::{DealsResponse, SearchParams};
