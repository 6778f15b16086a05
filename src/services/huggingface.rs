use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::SummarizerConfig;
use crate::services::length_policy::LengthBounds;
use crate::services::summarizer::{Summarizer, SummarizerError};

/// Summarization through the Hugging Face inference API
/// (`facebook/bart-large-cnn` by default), greedy decoding.
#[derive(Clone)]
pub struct HuggingFaceSummarizer {
    client: reqwest::Client,
    url: Url,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: SummarizationParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct SummarizationParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct SummarizationOutput {
    summary_text: String,
}

impl HuggingFaceSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let api_key = Some(config.api_key.trim().to_string()).filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!("No summarizer API key configured, calling the inference API anonymously");
        }

        Ok(Self {
            client,
            url: model_url(&config.endpoint, &config.model)?,
            model: config.model.clone(),
            api_key,
        })
    }
}

fn model_url(endpoint: &str, model: &str) -> Result<Url> {
    let mut base = endpoint.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)
        .and_then(|b| b.join(model))
        .with_context(|| format!("Invalid summarizer endpoint '{endpoint}' for model '{model}'"))
}

/// The first summary, exactly as the model returned it.
fn parse_summary(outputs: Vec<SummarizationOutput>) -> Result<String, SummarizerError> {
    outputs
        .into_iter()
        .next()
        .map(|o| o.summary_text)
        .filter(|s| !s.trim().is_empty())
        .ok_or(SummarizerError::EmptyResponse)
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, SummarizerError> {
        let request = SummarizationRequest {
            inputs: text,
            parameters: SummarizationParameters {
                max_length: bounds.max_length,
                min_length: bounds.min_length,
                do_sample: false,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut builder = self.client.post(self.url.clone()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Inference API returned {status} for {}", self.model);
            return Err(SummarizerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let outputs: Vec<SummarizationOutput> = response.json().await?;
        parse_summary(outputs)
    }

    fn name(&self) -> String {
        format!("huggingface:{}", self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummarizerBackend;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    fn config_for(endpoint: &str) -> SummarizerConfig {
        SummarizerConfig {
            backend: SummarizerBackend::Huggingface,
            model: "facebook/bart-large-cnn".into(),
            endpoint: endpoint.into(),
            api_key: String::new(),
            provider: "openai".into(),
            request_timeout_secs: 5,
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/models")
    }

    #[test]
    fn test_model_url_appends_model() {
        let url = model_url(
            "https://router.huggingface.co/hf-inference/models/",
            "facebook/bart-large-cnn",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://router.huggingface.co/hf-inference/models/facebook/bart-large-cnn"
        );

        let url = model_url("http://localhost:8080/models", "bart").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/models/bart");
    }

    #[test]
    fn test_parse_summary_rejects_empty() {
        assert!(matches!(parse_summary(vec![]), Err(SummarizerError::EmptyResponse)));
        assert!(matches!(
            parse_summary(vec![SummarizationOutput { summary_text: "  ".into() }]),
            Err(SummarizerError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_summary_keeps_text_verbatim() {
        let summary = parse_summary(vec![
            SummarizationOutput { summary_text: " Parents may review records.\n".into() },
            SummarizationOutput { summary_text: "ignored".into() },
        ])
        .unwrap();
        assert_eq!(summary, " Parents may review records.\n");
    }

    #[tokio::test]
    async fn test_sends_bounds_with_sampling_disabled() {
        let app = Router::new().route(
            "/models/facebook/bart-large-cnn",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["inputs"], "Schools must respond within 45 days.");
                assert_eq!(body["parameters"]["max_length"], 250);
                assert_eq!(body["parameters"]["min_length"], 100);
                assert_eq!(body["parameters"]["do_sample"], false);
                Json(json!([{ "summary_text": "Schools have 45 days to respond." }]))
            }),
        );
        let endpoint = serve(app).await;

        let summarizer = HuggingFaceSummarizer::new(&config_for(&endpoint)).unwrap();
        let summary = summarizer
            .summarize(
                "Schools must respond within 45 days.",
                LengthBounds { max_length: 250, min_length: 100 },
            )
            .await
            .unwrap();

        assert_eq!(summary, "Schools have 45 days to respond.");
    }

    #[tokio::test]
    async fn test_error_status_propagates() {
        let app = Router::new().route(
            "/models/facebook/bart-large-cnn",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
        );
        let endpoint = serve(app).await;

        let summarizer = HuggingFaceSummarizer::new(&config_for(&endpoint)).unwrap();
        let err = summarizer
            .summarize("text", LengthBounds { max_length: 150, min_length: 60 })
            .await
            .unwrap_err();

        match err {
            SummarizerError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "model loading");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
