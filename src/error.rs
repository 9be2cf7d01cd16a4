use std::fmt;
use thiserror::Error;

/// Error types for Bargain Hunter
#[derive(Error, Debug)]
pub enum BargainError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Catalog errors
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Invalid deal {id}: {reason}")]
    InvalidDeal { id: String, reason: String },

    // Search errors
    #[error("Invalid pagination: page {page}, limit {limit}")]
    InvalidPagination { page: usize, limit: usize },

    // Completion backend errors
    #[error("Completion backend not configured")]
    CompletionNotConfigured,

    #[error("Completion request failed: {endpoint} - {status}")]
    CompletionHttp { endpoint: String, status: u16 },

    #[error("Completion response malformed: {reason}")]
    CompletionMalformed { reason: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Connection timeout: {endpoint}")]
    Timeout { endpoint: String },

    // Input errors
    #[error("Input validation failed: {input}")]
    InputValidation { input: String },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BargainError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog { message: message.into() }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network { .. }
            | Self::CompletionHttp { .. }
            | Self::Timeout { .. } => true,

            Self::Configuration { .. }
            | Self::Catalog { .. }
            | Self::InvalidDeal { .. }
            | Self::CompletionNotConfigured => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Catalog { .. } | Self::InvalidDeal { .. } => "catalog",
            Self::InvalidPagination { .. } => "search",
            Self::CompletionNotConfigured
            | Self::CompletionHttp { .. }
            | Self::CompletionMalformed { .. } => "completion",
            Self::Network { .. } | Self::Timeout { .. } => "network",
            Self::InputValidation { .. } => "input",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Result type alias for Bargain Hunter
pub type BargainResult<T> = std::result::Result<T, BargainError>;

/// Error context for enhanced debugging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub component: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub request_id: Option<String>,
    pub additional_data: std::collections::HashMap<String, String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            component: component.into(),
            timestamp: chrono::Utc::now(),
            request_id: None,
            additional_data: std::collections::HashMap::new(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_data.insert(key.into(), value.into());
        self
    }
}

/// Error annotated with where it happened
#[derive(Debug)]
pub struct ContextualError {
    pub error: BargainError,
    pub context: ErrorContext,
}

impl ContextualError {
    pub fn new(error: BargainError, context: ErrorContext) -> Self {
        Self { error, context }
    }
}

impl fmt::Display for ContextualError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}::{}", self.error, self.context.component, self.context.operation)?;

        if let Some(request_id) = &self.context.request_id {
            write!(f, " [req: {}]", request_id)?;
        }

        Ok(())
    }
}

impl std::error::Error for ContextualError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Macro for creating contextual errors
#[macro_export]
macro_rules! contextual_error {
    ($error:expr, $operation:expr, $component:expr) => {
        $crate::error::ContextualError::new(
            $error,
            $crate::error::ErrorContext::new($operation, $component)
        )
    };

    ($error:expr, $operation:expr, $component:expr, $($key:expr => $value:expr),*) => {
        {
            let mut context = $crate::error::ErrorContext::new($operation, $component);
            $(
                context = context.with_data($key, $value);
            )*
            $crate::error::ContextualError::new($error, context)
        }
    };
}

impl From<reqwest::Error> for BargainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                endpoint: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            Self::Network { message: err.to_string() }
        }
    }
}

impl From<serde_json::Error> for BargainError {
    fn from(err: serde_json::Error) -> Self {
        Self::CompletionMalformed { reason: err.to_string() }
    }
}

impl From<anyhow::Error> for BargainError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal { message: err.to_string() }
    }
}
