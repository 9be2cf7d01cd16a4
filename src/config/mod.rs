use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::search::SortPolicy;

/// Placeholder values shipped in sample env files; treated as "not configured".
pub const OPENROUTER_KEY_PLACEHOLDER: &str = "your_openrouter_api_key_here";
pub const GEMINI_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub assistant: AssistantConfig,
    pub chat: ChatConfig,
    pub brand: BrandConfig,
    #[cfg(feature = "api")]
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional JSON file replacing the built-in deals.
    pub path: Option<PathBuf>,
    pub affiliate_tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub latency_ms: u64,
    pub default_limit: usize,
    pub sort_policy: SortPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub openrouter_api_key: String,
    pub gemini_api_key: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_seconds: u64,
    pub scrape_latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub history_limit: usize,
    pub max_input_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    pub name: String,
    pub tagline: String,
    pub welcome: String,
}

#[cfg(feature = "api")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    pub console_enabled: bool,
    /// Defaults to `logs/` under the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_directory: Option<PathBuf>,
    pub max_files: usize,
    pub include_targets: bool,
}

impl LoggingConfig {
    pub fn log_directory(&self) -> PathBuf {
        self.log_directory
            .clone()
            .unwrap_or_else(|| get_data_directory().join("logs"))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            latency_ms: 600,
            default_limit: 10,
            sort_policy: SortPolicy::CatalogOrder,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: OPENROUTER_KEY_PLACEHOLDER.to_string(),
            gemini_api_key: GEMINI_KEY_PLACEHOLDER.to_string(),
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "anthropic/claude-3-opus:beta".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            request_timeout_seconds: 30,
            scrape_latency_ms: 800,
        }
    }
}

impl AssistantConfig {
    /// True when a real OpenRouter key is present.
    pub fn is_configured(&self) -> bool {
        key_is_set(&self.openrouter_api_key, OPENROUTER_KEY_PLACEHOLDER)
    }

    pub fn gemini_configured(&self) -> bool {
        key_is_set(&self.gemini_api_key, GEMINI_KEY_PLACEHOLDER)
    }
}

fn key_is_set(value: &str, placeholder: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != placeholder
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            max_input_length: 2000,
        }
    }
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "Bargain Hunter".to_string(),
            tagline: "Finding the best deals for you".to_string(),
            welcome: "Hi there! I'm your Bargain Hunter assistant. What products are you looking for today?".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            console_enabled: true,
            log_directory: None,
            max_files: 5,
            include_targets: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                path: None,
                affiliate_tag: String::new(),
            },
            search: SearchConfig::default(),
            assistant: AssistantConfig::default(),
            chat: ChatConfig::default(),
            brand: BrandConfig::default(),
            #[cfg(feature = "api")]
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, applying env overrides
    pub async fn load() -> Result<Self> {
        let config_path = get_config_path();

        let mut config = if config_path.exists() {
            Self::read_file(&config_path).await?
        } else {
            info!("No configuration file found, using defaults");
            let config = Self::default();
            config.save().await?;
            config
        };

        ConfigOverrides::apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from specific file, applying env overrides
    pub async fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let mut config = Self::read_file(path).await?;
        ConfigOverrides::apply(&mut config);
        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    async fn read_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to default location
    pub async fn save(&self) -> Result<()> {
        self.save_to(get_config_path()).await
    }

    pub async fn save_to<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;

        info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.search.default_limit == 0 {
            return Err(anyhow::anyhow!("Search default_limit must be > 0"));
        }

        if !(0.0..=2.0).contains(&self.assistant.temperature) {
            return Err(anyhow::anyhow!("Assistant temperature must be between 0.0 and 2.0"));
        }

        if self.assistant.max_tokens == 0 {
            return Err(anyhow::anyhow!("Assistant max_tokens must be > 0"));
        }

        url::Url::parse(&self.assistant.endpoint)
            .map_err(|e| anyhow::anyhow!("Invalid completion endpoint '{}': {}", self.assistant.endpoint, e))?;

        if self.chat.max_input_length == 0 {
            return Err(anyhow::anyhow!("Chat max_input_length must be > 0"));
        }

        if self.brand.name.trim().is_empty() {
            return Err(anyhow::anyhow!("Brand name must not be empty"));
        }

        #[cfg(feature = "api")]
        {
            if self.api.port == 0 {
                return Err(anyhow::anyhow!("API port must be > 0"));
            }
        }

        Ok(())
    }
}

/// Get the default data directory
pub fn get_data_directory() -> PathBuf {
    directories::ProjectDirs::from("com", "bargainhunter", "bargain-hunter")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default().join("data"))
}

/// Get the configuration file path
fn get_config_path() -> PathBuf {
    directories::ProjectDirs::from("com", "bargainhunter", "bargain-hunter")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default().join("config.toml"))
}

/// Environment-based configuration overrides
pub struct ConfigOverrides;

impl ConfigOverrides {
    /// Apply environment variable overrides to configuration
    pub fn apply(config: &mut AppConfig) {
        Self::apply_from(config, |name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary lookup (env in production, a map in tests)
    pub fn apply_from<F>(config: &mut AppConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENROUTER_API_KEY") {
            config.assistant.openrouter_api_key = key;
        }

        if let Some(key) = lookup("GEMINI_API_KEY") {
            config.assistant.gemini_api_key = key;
        }

        if let Some(endpoint) = lookup("BH_COMPLETION_ENDPOINT") {
            config.assistant.endpoint = endpoint;
        }

        if let Some(model) = lookup("BH_COMPLETION_MODEL") {
            config.assistant.model = model;
        }

        if let Some(latency) = lookup("BH_SEARCH_LATENCY_MS").and_then(|v| v.parse::<u64>().ok()) {
            config.search.latency_ms = latency;
        }

        if let Some(latency) = lookup("BH_SCRAPE_LATENCY_MS").and_then(|v| v.parse::<u64>().ok()) {
            config.assistant.scrape_latency_ms = latency;
        }

        if let Some(policy) = lookup("BH_SORT_POLICY").and_then(|v| v.parse::<SortPolicy>().ok()) {
            config.search.sort_policy = policy;
        }

        #[cfg(feature = "api")]
        {
            if let Some(host) = lookup("BH_API_HOST") {
                config.api.host = host;
            }

            if let Some(port) = lookup("BH_API_PORT").and_then(|v| v.parse::<u16>().ok()) {
                config.api.port = port;
            }
        }

        if let Some(level) = lookup("BH_LOG_LEVEL") {
            config.logging.level = level;
        }
    }
}
