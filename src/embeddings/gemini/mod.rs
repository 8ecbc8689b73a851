
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use url::Url;

use crate::config::Config;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

/// Fallback text returned by [`GeminiClient::generate`] when the provider
/// cannot be reached or its response is unusable. Always parses as an
/// empty quiz.
pub const EMPTY_GENERATION: &str = "[]";

/// Client for the Gemini embedding and generation endpoints.
///
/// Requests are blocking with a global timeout; 5xx and transport errors
/// are retried with exponential backoff, client errors are not.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: Url,
    api_key: String,
    embedding_model: String,
    generation_model: String,
    agent: ureq::Agent,
    retry_attempts: u32,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GeminiClient {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config
            .gemini
            .api_base_url()
            .context("Failed to parse Gemini base URL from config")?;

        let api_key = config.gemini.resolved_api_key().context(
            "Gemini API key is not configured; set it with 'quizsmith config' or GEMINI_API_KEY",
        )?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.gemini.timeout_seconds)))
            .build()
            .into();

        Ok(Self {
            base_url,
            api_key,
            embedding_model: config.gemini.embedding_model.clone(),
            generation_model: config.gemini.generation_model.clone(),
            agent,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        self
    }

    #[inline]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Generate an embedding vector for a single text.
    ///
    /// Failures surface as errors; callers treat a failed or empty result
    /// as "no embedding" for the affected text (skip the chunk on
    /// ingestion, score zero on retrieval).
    #[inline]
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(
            "Requesting embedding from {} ({} characters)",
            self.embedding_model,
            text.len()
        );

        let request = EmbedContentRequest {
            model: format!("models/{}", self.embedding_model),
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };

        let url = self.endpoint(&self.embedding_model, "embedContent")?;
        let request_json =
            serde_json::to_string(&request).context("Failed to serialize embedding request")?;

        let response_text = self
            .make_request_with_retry(|| {
                self.agent
                    .post(url.as_str())
                    .header("Content-Type", "application/json")
                    .send(&request_json)
                    .and_then(|mut resp| resp.body_mut().read_to_string())
            })
            .context("Failed to call embedContent")?;

        let response: EmbedContentResponse =
            serde_json::from_str(&response_text).context("Failed to parse embedding response")?;

        debug!(
            "Received embedding with {} dimensions",
            response.embedding.values.len()
        );

        Ok(response.embedding.values)
    }

    /// Generate text for a prompt.
    ///
    /// Never fails: an unreachable provider, a non-OK response, or a
    /// response with no candidate text all yield the literal `"[]"` so
    /// downstream parsing always has well-formed input.
    #[inline]
    pub fn generate(&self, prompt: &str) -> String {
        match self.generate_inner(prompt) {
            Ok(text) => text,
            Err(e) => {
                error!("Generation request failed, substituting empty quiz: {:#}", e);
                EMPTY_GENERATION.to_string()
            }
        }
    }

    fn generate_inner(&self, prompt: &str) -> Result<String> {
        debug!(
            "Requesting generation from {} ({} character prompt)",
            self.generation_model,
            prompt.len()
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = self.endpoint(&self.generation_model, "generateContent")?;
        let request_json =
            serde_json::to_string(&request).context("Failed to serialize generation request")?;

        let response_text = self
            .make_request_with_retry(|| {
                self.agent
                    .post(url.as_str())
                    .header("Content-Type", "application/json")
                    .send(&request_json)
                    .and_then(|mut resp| resp.body_mut().read_to_string())
            })
            .context("Failed to call generateContent")?;

        let response: GenerateContentResponse =
            serde_json::from_str(&response_text).context("Failed to parse generation response")?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Generation response contained no candidate text"))
    }

    fn endpoint(&self, model: &str, method: &str) -> Result<Url> {
        let url = format!(
            "{}/{}:{}?key={}",
            self.base_url.as_str().trim_end_matches('/'),
            model,
            method,
            self.api_key
        );

        Url::parse(&url).context("Failed to build Gemini endpoint URL")
    }

    fn make_request_with_retry<F>(&self, mut request_fn: F) -> Result<String>
    where
        F: FnMut() -> Result<String, ureq::Error>,
    {
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!("HTTP request attempt {}/{}", attempt, self.retry_attempts);

            match request_fn() {
                Ok(response_text) => {
                    debug!("Request succeeded on attempt {}", attempt);
                    return Ok(response_text);
                }
                Err(error) => {
                    let should_retry = match &error {
                        ureq::Error::StatusCode(status) => {
                            if *status >= 500 {
                                warn!(
                                    "Server error (status {}), attempt {}/{}",
                                    status, attempt, self.retry_attempts
                                );
                                true
                            } else {
                                warn!("Client error (status {}), not retrying", status);
                                return Err(anyhow::anyhow!("Client error: HTTP {}", status));
                            }
                        }
                        ureq::Error::ConnectionFailed
                        | ureq::Error::HostNotFound
                        | ureq::Error::Timeout(_)
                        | ureq::Error::Io(_) => {
                            warn!(
                                "Transport error: {}, attempt {}/{}",
                                error, attempt, self.retry_attempts
                            );
                            true
                        }
                        _ => {
                            warn!("Non-retryable error: {}", error);
                            false
                        }
                    };

                    if !should_retry {
                        return Err(anyhow::anyhow!("Non-retryable error: {}", error));
                    }

                    last_error = Some(anyhow::anyhow!("Request error: {}", error));

                    if attempt < self.retry_attempts {
                        let delay_ms = EXPONENTIAL_BACKOFF_BASE.pow(attempt - 1) * 1000;
                        let delay = Duration::from_millis(delay_ms);
                        debug!("Waiting {:?} before retry", delay);
                        std::thread::sleep(delay);
                    }
                }
            }
        }

        error!("All retry attempts failed for request to {}", self.base_url);

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Request failed after retries")))
    }
}
