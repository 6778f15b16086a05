use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub brief: BriefConfig,
    pub summarizer: SummarizerConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub max_upload_mb: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BriefConfig {
    /// Maximum characters per chunk handed to the summarizer.
    pub chunk_width: usize,
    /// Chunks past this count are never summarized.
    pub max_chunks_per_brief: usize,
    pub extraction_timeout_secs: u64,
    /// Prepended verbatim to the extracted text; carries its own trailing newlines.
    pub prompt_prefix: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerBackend {
    Huggingface,
    Rig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummarizerConfig {
    pub backend: SummarizerBackend,
    pub model: String,
    /// Base URL of the Hugging Face inference router; the model id is appended.
    pub endpoint: String,
    pub api_key: String,
    /// rig provider name, only read by the `rig` backend.
    pub provider: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeatureFlags {
    pub ui_enabled: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());
        Self::load_with(&environment, "APP")
    }

    pub fn load_with(environment: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(Environment::with_prefix(env_prefix).separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brief.chunk_width == 0 {
            return Err(ConfigError::Message(
                "brief.chunk_width must be greater than zero".into(),
            ));
        }
        if self.brief.max_chunks_per_brief == 0 {
            return Err(ConfigError::Message(
                "brief.max_chunks_per_brief must be greater than zero".into(),
            ));
        }
        if self.summarizer.backend == SummarizerBackend::Huggingface {
            url::Url::parse(&self.summarizer.endpoint).map_err(|e| {
                ConfigError::Message(format!(
                    "summarizer.endpoint is not a valid URL ({}): {e}",
                    self.summarizer.endpoint
                ))
            })?;
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb * 1024 * 1024
    }
}
