//! The single point of entry for all Gemini API calls.
//!
//! No other module talks to the generative-text endpoint directly; the
//! analyzer depends on the `TextGenerator` trait, which this client implements.
//!
//! Every failure mode (transport error, timeout, HTTP error status, malformed
//! envelope, blocked candidate) is a failed attempt. After the last attempt
//! the caller receives `Generation::Failed`, never an `Err` or a panic.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 2048;
const TOP_P: f32 = 0.95;
const TOP_K: u32 = 40;

/// Professional resume/job text trips default safety filters on words like
/// "kill", "attack", "exploit"; all categories are relaxed.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Text returned in place of generated content once retries are exhausted.
pub const GENERATION_FAILED: &str = "Unable to generate response after retries.";

/// Why a single attempt failed. Logged, then folded into `Generation::Failed`.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response contained no candidates")]
    NoCandidates,

    #[error("Candidate finished with {0} and no content")]
    Blocked(String),

    #[error("Candidate had no content parts")]
    EmptyContent,
}

/// Outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// The model answered. The text may be empty if the model produced nothing.
    Text(String),
    /// Every attempt failed; `reason` is the last attempt's error.
    Failed { attempts: u32, reason: String },
}

impl Generation {
    /// Generated text, or `GENERATION_FAILED` for a failed generation.
    pub fn into_text(self) -> String {
        match self {
            Generation::Text(text) => text,
            Generation::Failed { .. } => GENERATION_FAILED.to_string(),
        }
    }
}

/// Anything that turns a prompt into a `Generation`. The analyzer holds an
/// `Arc<dyn TextGenerator>` so tests can swap in a canned backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Generation;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting<'a> {
    category: &'a str,
    threshold: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Extracts the first candidate's text (parts joined by a space, trimmed).
    ///
    /// A candidate without parts is a failure; if it carries a finish reason
    /// other than `STOP` or `MAX_TOKENS` the failure names it.
    pub fn text(&self) -> Result<String, LlmError> {
        let candidate = self.candidates.first().ok_or(LlmError::NoCandidates)?;

        if let Some(parts) = candidate.content.as_ref().and_then(|c| c.parts.as_ref()) {
            let joined = parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            return Ok(joined.trim().to_string());
        }

        match candidate.finish_reason.as_deref() {
            Some(reason) if reason != "STOP" && reason != "MAX_TOKENS" => {
                Err(LlmError::Blocked(reason.to_string()))
            }
            _ => Err(LlmError::EmptyContent),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client with bounded retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    max_retries: u32,
    backoff: Duration,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Base delay before the second attempt; doubles on each further attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Generates text with an explicit attempt bound.
    pub async fn generate_with_retries(&self, prompt: &str, max_retries: u32) -> Generation {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                top_p: TOP_P,
                top_k: TOP_K,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..max_retries {
            if attempt > 0 && !self.backoff.is_zero() {
                let delay = self.backoff * (1 << (attempt - 1).min(16));
                tokio::time::sleep(delay).await;
            }

            match self.attempt(&request_body).await {
                Ok(text) => {
                    debug!("LLM call succeeded on attempt {}", attempt + 1);
                    return Generation::Text(text);
                }
                Err(e) => {
                    warn!("LLM attempt {}/{} failed: {e}", attempt + 1, max_retries);
                    last_error = Some(e);
                }
            }
        }

        Generation::Failed {
            attempts: max_retries,
            reason: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".to_string()),
        }
    }

    async fn attempt(&self, request_body: &GenerateContentRequest<'_>) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM usage: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text()
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Generation {
        self.generate_with_retries(prompt, self.max_retries).await
    }
}
