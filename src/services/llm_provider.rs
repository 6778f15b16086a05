use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rig::client::completion::CompletionClientDyn;
use rig::client::ProviderClient;
use rig::completion::Prompt;
use rig::providers::{anthropic, gemini, groq, mistral, ollama, openai, openrouter};

use crate::config::SummarizerConfig;
use crate::services::length_policy::LengthBounds;
use crate::services::summarizer::{Summarizer, SummarizerError};

/// Provider ids accepted by `summarizer.provider` when the `rig` backend is selected.
pub const SUPPORTED_PROVIDERS: &[&str] = &[
    "openai",
    "anthropic",
    "groq",
    "gemini",
    "mistral",
    "openrouter",
    "ollama",
];

fn create_provider_boxed(
    provider: &str,
    api_key: &str,
    http_client: reqwest::Client,
) -> Result<Box<dyn ProviderClient>> {
    let boxed: Box<dyn ProviderClient> = match provider.to_lowercase().as_str() {
        "openai" => openai::Client::builder(api_key)
            .with_client(http_client)
            .build()
            .boxed(),
        "anthropic" => anthropic::Client::builder(api_key)
            .with_client(http_client)
            .build()?
            .boxed(),
        "groq" => groq::Client::builder(api_key)
            .with_client(http_client)
            .build()
            .boxed(),
        "gemini" | "google" => gemini::Client::builder(api_key)
            .with_client(http_client)
            .build()?
            .boxed(),
        "mistral" => mistral::Client::builder(api_key)
            .with_client(http_client)
            .build()
            .boxed(),
        "openrouter" => openrouter::Client::builder(api_key)
            .with_client(http_client)
            .build()
            .boxed(),
        "ollama" => ollama::Client::builder()
            .with_client(http_client)
            .build()
            .boxed(),
        other => anyhow::bail!(
            "Unsupported provider: {other} (expected one of {})",
            SUPPORTED_PROVIDERS.join(", ")
        ),
    };

    Ok(boxed)
}

pub fn create_completion_client(
    provider: &str,
    api_key: &str,
    http_client: reqwest::Client,
) -> Result<Box<dyn CompletionClientDyn>> {
    let boxed = create_provider_boxed(provider, api_key, http_client)?;
    boxed
        .as_completion()
        .context(format!("Provider '{provider}' does not support completions"))
}

/// System prompt that pins the model to plain-language summaries of the given size.
pub fn summary_preamble(bounds: LengthBounds) -> String {
    format!(
        "You summarize documents for parents. Rewrite the text you are given as a plain-language \
         summary of at least {min} and at most {max} words. Reply with the summary only, \
         no headings or preamble.",
        min = bounds.min_length,
        max = bounds.max_length,
    )
}

/// Summarization through a chat LLM via rig. Temperature is pinned to zero.
pub struct RigSummarizer {
    client: Box<dyn CompletionClientDyn>,
    provider: String,
    model: String,
}

impl RigSummarizer {
    /// Builds the provider client once; each call only builds an agent on it.
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let provider = config.provider.to_lowercase();
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        let client = create_completion_client(&provider, &config.api_key, http_client)?;

        Ok(Self {
            client,
            provider,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for RigSummarizer {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, SummarizerError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(&summary_preamble(bounds))
            .temperature(0.0)
            .max_tokens(u64::from(bounds.max_length))
            .build();

        let response = agent
            .prompt(text)
            .await
            .map_err(|e| SummarizerError::Provider(e.to_string()))?;

        let summary = response.trim().to_string();
        if summary.is_empty() {
            return Err(SummarizerError::EmptyResponse);
        }
        Ok(summary)
    }

    fn name(&self) -> String {
        format!("rig:{}:{}", self.provider, self.model)
    }
}
