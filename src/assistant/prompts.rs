//! Prompt templates for the chat-completion backend
use super::client::{ChatCompletionMessage, Role};

/// System prompt defining the assistant's role
pub fn system_prompt() -> &'static str {
    r#"You are a helpful shopping assistant that helps users find deals and answer product questions.
You respond in a natural, conversational way. Be helpful and informative but concise.
Provide specific product recommendations based on the web search results provided.
If the search results mention prices, retailers, or discounts, include those details in your response.
Don't mention that you're an AI or that you've received search results."#
}

/// System prompt, then the scraped findings (if any), then the user's question
pub fn build_messages(query: &str, sources: &[String]) -> Vec<ChatCompletionMessage> {
    let mut messages = vec![ChatCompletionMessage::new(Role::System, system_prompt())];

    if !sources.is_empty() {
        messages.push(ChatCompletionMessage::new(
            Role::System,
            format!("Web search results:\n{}", sources.join("\n")),
        ));
    }

    messages.push(ChatCompletionMessage::new(Role::User, query));
    messages
}
