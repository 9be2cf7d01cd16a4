use serde::{Deserialize, Serialize};

/// Words that mark a message as a question about a product rather than a deal lookup
pub const PRODUCT_QUESTION_KEYWORDS: &[&str] = &[
    "what", "how", "which", "when", "where", "why", "best", "compare", "vs", "versus",
    "difference", "review", "opinion",
];

/// How a chat message should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    ProductQuestion,
    DealSearch,
}

/// Classification with the keyword that triggered it, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationDecision {
    pub kind: QueryKind,
    pub keyword: Option<&'static str>,
}

/// Classify a message. Plain substring containment, so "show" and "somehow"
/// both count as questions through "how".
pub fn classify(message: &str) -> QueryKind {
    classify_with_decision(message).kind
}

pub fn is_product_question(message: &str) -> bool {
    classify(message) == QueryKind::ProductQuestion
}

pub fn classify_with_decision(message: &str) -> ClassificationDecision {
    let lower = message.to_lowercase();

    match PRODUCT_QUESTION_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| lower.contains(keyword))
    {
        Some(keyword) => ClassificationDecision {
            kind: QueryKind::ProductQuestion,
            keyword: Some(keyword),
        },
        None => ClassificationDecision {
            kind: QueryKind::DealSearch,
            keyword: None,
        },
    }
}
