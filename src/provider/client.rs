// OpenAI-compatible chat-completions client

use super::{ChatMessage, ChatRequest, ChatResponse};
use crate::config::ProviderConfig;
use crate::error::{GateError, Result};
use crate::gate::Generator;
use crate::metrics;
use crate::utils::logging::sanitize;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for an OpenAI-compatible chat-completions API.
///
/// One short, bounded completion per call: `max_tokens` and `temperature`
/// are fixed configuration, not caller-controllable. The configured request
/// timeout is the only cancellation mechanism; a timed-out call surfaces as
/// a provider error and is never retried here.
pub struct OpenAiClient {
    http_client: Client,
    config: ProviderConfig,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = match config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        {
            Some(key) => key,
            // dev mode never reaches the provider
            None if config.dev_mode => String::new(),
            None => {
                return Err(GateError::Config(
                    "no provider API key: set provider.api_key or OPENAI_API_KEY".to_string(),
                ))
            }
        };

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| GateError::Config(format!("failed to create HTTP client: {}", e)))?;

        debug!("created provider HTTP client with connection pooling");

        Ok(Self {
            http_client,
            config: config.clone(),
            api_key,
        })
    }

    /// Extract the error message from an API error response body.
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            #[serde(rename = "type")]
            error_type: Option<String>,
        }

        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(response_text) {
            if let Some(error) = error_resp.error {
                return error.message.or(error.error_type);
            }
        }
        None
    }
}

impl Generator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.api_base_url);
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        };

        let started = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                metrics::record_provider_call(&self.config.model, 0, started.elapsed().as_secs_f64());
                GateError::Provider(sanitize(&e.to_string()))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GateError::Provider(format!("failed to read response body: {}", e)))?;
        metrics::record_provider_call(
            &self.config.model,
            status.as_u16(),
            started.elapsed().as_secs_f64(),
        );

        if !status.is_success() {
            let message = Self::extract_error_message(&body).unwrap_or(body);
            error!("provider call failed: {} {}", status, sanitize(&message));
            return Err(GateError::Provider(format!(
                "HTTP {}: {}",
                status.as_u16(),
                message
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GateError::Provider(format!("invalid response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GateError::Provider("response contained no choices".to_string()))
    }
}
