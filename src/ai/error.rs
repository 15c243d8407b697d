//! Provider error taxonomy.

use thiserror::Error;

/// Errors raised while talking to a language model provider.
#[derive(Error, Debug)]
pub enum AiError {
    /// Missing or invalid settings: unknown provider, absent API key, bad URL.
    #[error("{0}")]
    Configuration(String),

    /// Transport failure or non-success response other than rate limiting.
    #[error("{provider} API error: {message}")]
    Provider {
        /// Provider display name.
        provider: String,
        /// Failure details.
        message: String,
    },

    /// A single attempt was rate limited. Retried by the caller.
    #[error("{provider} rate limit hit: {message}")]
    RateLimited {
        /// Provider display name.
        provider: String,
        /// Failure details.
        message: String,
    },

    /// Every retry was rate limited.
    #[error("rate limit exceeded after {attempts} attempts. {hint}")]
    RateLimitExceeded {
        /// Attempts made, including the first.
        attempts: u32,
        /// Provider-specific remediation advice.
        hint: String,
    },

    /// The provider answered without any candidate text.
    #[error("no response from {0}")]
    NoResponse(String),

    /// The response envelope could not be decoded.
    #[error("invalid response format from {provider}: {message}")]
    InvalidResponse {
        /// Provider display name.
        provider: String,
        /// Decoder error.
        message: String,
    },

    /// The command deadline passed before the provider answered.
    #[error("request cancelled: deadline exceeded")]
    DeadlineExceeded,
}

impl AiError {
    pub(crate) fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// True for quota and rate-limit failures, whether or not retries ran.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::RateLimitExceeded { .. })
    }

    /// True when another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
