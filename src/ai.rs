//! Language model providers and the operations built on them.

pub mod assistant;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod prompts;
pub mod retry;
#[cfg(test)]
pub(crate) mod test_utils;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

pub use assistant::Assistant;
pub use error::AiError;

/// HTTP request timeout for a single provider call.
///
/// The command deadline usually fires first; this only guards against a
/// stalled connection when no deadline applies.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Providers accepted by [`create_client`].
pub const SUPPORTED_PROVIDERS: [&str; 2] = ["openai", "gemini"];

/// API key values shipped in sample configs that must be treated as unset.
const PLACEHOLDER_KEYS: [&str; 2] = ["your-openai-api-key-here", "your-gemini-api-key-here"];

/// Metadata about an AI client implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiClientMetadata {
    /// Service provider name.
    pub provider: String,
    /// Model identifier.
    pub model: String,
    /// What to tell the user when retries run out on rate limits.
    pub rate_limit_hint: String,
}

/// Connection settings for one provider, fixed for an invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderConfig {
    /// `openai` or `gemini`.
    pub provider: String,
    /// API key.
    pub api_key: String,
    /// Model name; empty selects the provider default.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum response tokens.
    pub max_tokens: u32,
    /// Override for the API base URL.
    pub base_url: Option<String>,
}

/// Trait for AI service clients.
///
/// Implementations send a single user-role prompt and return the raw text of
/// the first response candidate. Rate limiting must surface as
/// [`AiError::RateLimited`] so callers can retry.
pub trait AiClient: Send + Sync {
    /// Sends a prompt and returns the raw response text.
    fn send_request<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiError>> + Send + 'a>>;

    /// Returns metadata about the AI client implementation.
    fn get_metadata(&self) -> AiClientMetadata;

    /// Releases held connections. Calling it again is a no-op.
    fn close(&self) -> Result<(), AiError>;
}

/// Creates the client for `config.provider`.
pub fn create_client(config: &ProviderConfig) -> Result<Box<dyn AiClient>, AiError> {
    match config.provider.trim().to_lowercase().as_str() {
        "openai" => Ok(Box::new(openai::OpenAiClient::new(config)?)),
        "gemini" => Ok(Box::new(gemini::GeminiClient::new(config)?)),
        other => Err(AiError::Configuration(format!(
            "unsupported AI provider: {other}. Supported providers: {}",
            SUPPORTED_PROVIDERS.join(", ")
        ))),
    }
}

/// Returns true for empty keys, sample placeholders and unexpanded `${VAR}`
/// references.
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty()
        || PLACEHOLDER_KEYS.contains(&key)
        || (key.starts_with("${") && key.ends_with('}'))
}

// ── Shared helpers for AI client implementations ────────────────────

/// Validates the API key for `provider`.
pub(crate) fn require_api_key(provider: &str, key: &str) -> Result<String, AiError> {
    if is_placeholder_key(key) {
        return Err(AiError::Configuration(format!("{provider} API key is required")));
    }
    Ok(key.trim().to_string())
}

/// Normalises and validates a base URL, stripping any trailing slash.
pub(crate) fn resolve_base_url(provider: &str, base_url: Option<&str>, default: &str) -> Result<String, AiError> {
    let raw = base_url.filter(|u| !u.trim().is_empty()).unwrap_or(default).trim();
    url::Url::parse(raw).map_err(|e| {
        AiError::Configuration(format!("invalid {provider} base URL '{raw}': {e}"))
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// HTTP client that can be closed.
///
/// Dropping the inner client releases its connection pool.
pub(crate) struct HttpSession {
    provider: &'static str,
    client: Mutex<Option<Client>>,
}

impl HttpSession {
    /// Builds an HTTP client with the standard request timeout.
    pub(crate) fn new(provider: &'static str) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AiError::provider(provider, format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            provider,
            client: Mutex::new(Some(client)),
        })
    }

    /// Returns a handle to the client, or an error once closed.
    pub(crate) fn client(&self) -> Result<Client, AiError> {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| AiError::provider(self.provider, "client has been closed"))
    }

    /// Drops the client. Returns whether it was still open.
    pub(crate) fn close(&self) -> bool {
        let was_open = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        tracing::debug!(provider = self.provider, was_open, "Closed HTTP session");
        was_open
    }
}

/// Returns true when an error body signals quota exhaustion.
fn mentions_quota(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("resource_exhausted") || lower.contains("quota")
}

/// Checks an HTTP response for error status and classifies failures.
///
/// HTTP 429 and quota messages become [`AiError::RateLimited`]; every other
/// non-success status becomes [`AiError::Provider`].
pub(crate) async fn check_error_response(
    provider: &str,
    response: Response,
) -> Result<Response, AiError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_else(|e| {
        tracing::debug!("Failed to read error response body: {e}");
        String::new()
    });
    let message = format!("HTTP {status}: {error_text}");
    if status == StatusCode::TOO_MANY_REQUESTS || mentions_quota(&error_text) {
        Err(AiError::RateLimited {
            provider: provider.to_string(),
            message,
        })
    } else {
        Err(AiError::provider(provider, message))
    }
}

/// Logs successful text extraction from an AI API response.
pub(crate) fn log_response_success(provider: &str, result: &Result<String, AiError>) {
    if let Ok(text) = result {
        tracing::debug!(
            response_len = text.len(),
            "Successfully extracted text content from {} API response",
            provider
        );
        tracing::debug!(
            response_content = %text,
            "{} API response content",
            provider
        );
    }
}
