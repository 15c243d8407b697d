//! OpenAI chat completions client.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    check_error_response, log_response_success, require_api_key, resolve_base_url, AiClient,
    AiClientMetadata, AiError, HttpSession, ProviderConfig,
};

const PROVIDER: &str = "OpenAI";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const RATE_LIMIT_HINT: &str =
    "Please check your OpenAI API quota and billing at https://platform.openai.com/usage";

#[derive(Serialize, Debug)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the OpenAI chat completions endpoint.
pub struct OpenAiClient {
    session: HttpSession,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiClient {
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
        format!("{}{COMPLETIONS_PATH}", self.base_url)
    }
}

impl AiClient for OpenAiClient {
    fn send_request<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiError>> + Send + 'a>> {
        Box::pin(async move {
            let request = ChatRequest {
                model: &self.model,
                messages: vec![Message {
                    role: "user",
                    content: prompt,
                }],
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let api_url = self.api_url();
            info!(url = %api_url, model = %self.model, prompt_len = prompt.len(), "Sending request to OpenAI API");

            let response = self
                .session
                .client()?
                .post(&api_url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| AiError::provider(PROVIDER, format!("failed to send request: {e}")))?;

            let response = check_error_response(PROVIDER, response).await?;

            let body: ChatResponse = response.json().await.map_err(|e| AiError::InvalidResponse {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;

            debug!(
                choice_count = body.choices.len(),
                model = ?body.model,
                "Received OpenAI API response"
            );

            let result = body
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
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
