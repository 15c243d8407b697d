//! Google Gemini `generateContent` client.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    check_error_response, log_response_success, require_api_key, resolve_base_url, AiClient,
    AiClientMetadata, AiError, HttpSession, ProviderConfig,
};

const PROVIDER: &str = "Gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const RATE_LIMIT_HINT: &str = "Please try again later or check your Gemini API quota at https://ai.google.dev/gemini-api/docs/rate-limits";

/// Harm categories that block only high-probability content.
const RELAXED_CATEGORIES: [&str; 3] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_ONLY_HIGH";

#[derive(Serialize, Deserialize, Debug, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Serialize, Debug)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    finish_reason: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    session: HttpSession,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
    max_tokens: u32,
}

impl GeminiClient {
    /// Creates a client, validating the key and base URL.
    pub fn new(config: &ProviderConfig) -> Result<Self, AiError> {
        let api_key = require_api_key(PROVIDER, &config.api_key)?;
        let base_url = resolve_base_url(PROVIDER, config.base_url.as_deref(), DEFAULT_BASE_URL)?;
        let model = if config.model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.model.trim().to_string()
        };
        Ok(Self {
            session: HttpSession::new(PROVIDER)?,
            api_key,
            model,
            base_url,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
            safety_settings: RELAXED_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }
}

impl AiClient for GeminiClient {
    fn send_request<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiError>> + Send + 'a>> {
        Box::pin(async move {
            let request = self.build_request(prompt);
            let api_url = self.api_url();
            info!(url = %api_url, model = %self.model, prompt_len = prompt.len(), "Sending request to Gemini API");

            let response = self
                .session
                .client()?
                .post(&api_url)
                .header(API_KEY_HEADER, &self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| AiError::provider(PROVIDER, format!("failed to send request: {e}")))?;

            let response = check_error_response(PROVIDER, response).await?;

            let body: GenerateResponse =
                response.json().await.map_err(|e| AiError::InvalidResponse {
                    provider: PROVIDER.to_string(),
                    message: e.to_string(),
                })?;

            debug!(
                candidate_count = body.candidates.len(),
                finish_reason = ?body.candidates.first().and_then(|c| c.finish_reason.as_deref()),
                "Received Gemini API response"
            );

            let result = body
                .candidates
                .into_iter()
                .next()
                .filter(|candidate| !candidate.content.parts.is_empty())
                .map(|candidate| {
                    candidate
                        .content
                        .parts
                        .into_iter()
                        .map(|part| part.text)
                        .collect::<String>()
                })
                .ok_or_else(|| AiError::NoResponse(PROVIDER.to_string()));

            log_response_success(PROVIDER, &result);
            result
        })
    }

    fn get_metadata(&self) -> AiClientMetadata {
        AiClientMetadata {
            provider: PROVIDER.to_string(),
            model: self.model.clone(),
            rate_limit_hint: RATE_LIMIT_HINT.to_string(),
        }
    }

    fn close(&self) -> Result<(), AiError> {
        self.session.close();
        Ok(())
    }
}
