use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::LoggingConfig;

/// Initialize logging system
///
/// `RUST_LOG` wins over the configured level. The file layer rotates daily
/// under `log_directory` and keeps at most `max_files` files.
pub fn init_logging(config: &LoggingConfig, log_directory: &Path) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let mut layers = Vec::new();

    if config.console_enabled {
        let console_layer = fmt::layer()
            .with_target(config.include_targets)
            .with_writer(std::io::stderr)
            .boxed();

        layers.push(console_layer);
    }

    if config.file_enabled {
        std::fs::create_dir_all(log_directory)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("bargain-hunter")
            .filename_suffix("log")
            .max_log_files(config.max_files.max(1))
            .build(log_directory)?;

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_target(config.include_targets)
            .with_writer(file_appender)
            .boxed();

        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if config.file_enabled {
        info!("Log directory: {}", log_directory.display());
    }

    Ok(())
}

/// Structured logging context
#[derive(Debug, Clone, Serialize)]
pub struct LogContext {
    pub component: String,
    pub operation: String,
    pub request_id: Option<String>,
    pub query: Option<String>,
    pub category: Option<String>,
    pub duration_ms: Option<u64>,
    pub status: Option<String>,
    pub error_category: Option<String>,
    pub additional_fields: HashMap<String, serde_json::Value>,
}

impl LogContext {
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            operation: operation.into(),
            request_id: None,
            query: None,
            category: None,
            duration_ms: None,
            status: None,
            error_category: None,
            additional_fields: HashMap::new(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_duration(mut self, duration: std::time::Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_error_category(mut self, category: impl Into<String>) -> Self {
        self.error_category = Some(category.into());
        self
    }

    pub fn with_string_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_fields.insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    pub fn with_number_field(mut self, key: impl Into<String>, value: impl Into<i64>) -> Self {
        self.additional_fields.insert(key.into(), serde_json::Value::Number(serde_json::Number::from(value.into())));
        self
    }

    pub fn with_bool_field(mut self, key: impl Into<String>, value: bool) -> Self {
        self.additional_fields.insert(key.into(), serde_json::Value::Bool(value));
        self
    }
}

/// Structured logging macros
#[macro_export]
macro_rules! log_info {
    ($context:expr, $message:expr) => {
        tracing::info!(
            component = $context.component.as_str(),
            operation = $context.operation.as_str(),
            request_id = $context.request_id.as_deref(),
            query = $context.query.as_deref(),
            category = $context.category.as_deref(),
            duration_ms = $context.duration_ms,
            status = $context.status.as_deref(),
            additional_fields = ?$context.additional_fields,
            $message
        );
    };
}

#[macro_export]
macro_rules! log_warn {
    ($context:expr, $message:expr) => {
        tracing::warn!(
            component = $context.component.as_str(),
            operation = $context.operation.as_str(),
            request_id = $context.request_id.as_deref(),
            query = $context.query.as_deref(),
            status = $context.status.as_deref(),
            error_category = $context.error_category.as_deref(),
            additional_fields = ?$context.additional_fields,
            $message
        );
    };

    ($context:expr, $error:expr, $message:expr) => {
        tracing::warn!(
            component = $context.component.as_str(),
            operation = $context.operation.as_str(),
            request_id = $context.request_id.as_deref(),
            query = $context.query.as_deref(),
            status = $context.status.as_deref(),
            error_category = $context.error_category.as_deref(),
            additional_fields = ?$context.additional_fields,
            error = %$error,
            $message
        );
    };
}

#[macro_export]
macro_rules! log_debug {
    ($context:expr, $message:expr) => {
        tracing::debug!(
            component = $context.component.as_str(),
            operation = $context.operation.as_str(),
            request_id = $context.request_id.as_deref(),
            additional_fields = ?$context.additional_fields,
            $message
        );
    };
}

/// Times an operation and logs its duration when finished
pub struct PerformanceLogger {
    context: LogContext,
    start_time: std::time::Instant,
}

impl PerformanceLogger {
    pub fn new(context: LogContext) -> Self {
        Self {
            context,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    pub fn finish_with_status(self, message: &str, status: impl Into<String>) {
        let duration = self.start_time.elapsed();
        let context = self.context
            .with_duration(duration)
            .with_status(status);
        tracing::info!(
            component = context.component.as_str(),
            operation = context.operation.as_str(),
            request_id = context.request_id.as_deref(),
            query = context.query.as_deref(),
            category = context.category.as_deref(),
            duration_ms = context.duration_ms,
            status = context.status.as_deref(),
            additional_fields = ?context.additional_fields,
            "{}", message
        );
    }

    pub fn finish_with_error(self, message: &str, error: &crate::error::BargainError) {
        let duration = self.start_time.elapsed();
        let context = self.context
            .with_duration(duration)
            .with_status("error")
            .with_error_category(error.category());
        tracing::warn!(
            component = context.component.as_str(),
            operation = context.operation.as_str(),
            request_id = context.request_id.as_deref(),
            query = context.query.as_deref(),
            category = context.category.as_deref(),
            duration_ms = context.duration_ms,
            status = context.status.as_deref(),
            error_category = context.error_category.as_deref(),
            additional_fields = ?context.additional_fields,
            error = %error,
            "{}", message
        );
    }
}

/// Request ID generator
pub struct RequestIdGenerator;

impl RequestIdGenerator {
    pub fn generate() -> String {
        format!("req-{}", uuid::Uuid::new_v4().simple())
    }
}
