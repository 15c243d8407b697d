//! Shared test utilities for the `ai` module.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use super::{AiClient, AiClientMetadata, AiError};

/// Mock AI client with a pre-programmed queue of responses.
///
/// Responses are returned in FIFO order. When the queue is exhausted,
/// subsequent calls return [`AiError::NoResponse`].
///
/// Every call to [`send_request`](AiClient::send_request) records the prompt
/// so tests can inspect what was dispatched. Use
/// [`prompt_handle`](Self::prompt_handle) to read the recorded prompts after
/// the client has been moved into an [`Assistant`](super::Assistant).
pub(crate) struct ConfigurableMockAiClient {
    responses: Arc<Mutex<VecDeque<Result<String, AiError>>>>,
    metadata: AiClientMetadata,
    recorded_prompts: Arc<Mutex<Vec<String>>>,
    closed: Arc<Mutex<u32>>,
}

impl ConfigurableMockAiClient {
    /// Creates a new mock client that will return the given responses in order.
    pub(crate) fn new(responses: Vec<Result<String, AiError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            metadata: AiClientMetadata {
                provider: "Mock".to_string(),
                model: "mock-model".to_string(),
                rate_limit_hint: "Check the mock quota.".to_string(),
            },
            recorded_prompts: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(0)),
        }
    }

    /// Mock that answers every request with the same text, up to `n` times.
    pub(crate) fn repeating(text: &str, n: usize) -> Self {
        Self::new((0..n).map(|_| Ok(text.to_string())).collect())
    }

    /// Returns a handle for inspecting the response queue.
    pub(crate) fn response_handle(&self) -> ResponseQueueHandle {
        ResponseQueueHandle {
            responses: self.responses.clone(),
        }
    }

    /// Returns a handle for inspecting which prompts were sent.
    pub(crate) fn prompt_handle(&self) -> PromptRecordHandle {
        PromptRecordHandle {
            recorded_prompts: self.recorded_prompts.clone(),
            closed: self.closed.clone(),
        }
    }
}

/// Rate-limit error as a provider would raise it.
pub(crate) fn rate_limited() -> AiError {
    AiError::RateLimited {
        provider: "Mock".to_string(),
        message: "HTTP 429 Too Many Requests".to_string(),
    }
}

/// Shared handle to a mock client's response queue.
pub(crate) struct ResponseQueueHandle {
    responses: Arc<Mutex<VecDeque<Result<String, AiError>>>>,
}

impl ResponseQueueHandle {
    /// Returns the number of unconsumed responses remaining in the queue.
    pub(crate) fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

/// Shared handle to a mock client's recorded prompts.
pub(crate) struct PromptRecordHandle {
    recorded_prompts: Arc<Mutex<Vec<String>>>,
    closed: Arc<Mutex<u32>>,
}

impl PromptRecordHandle {
    /// Returns all recorded prompts.
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.recorded_prompts.lock().unwrap().clone()
    }

    /// Returns the number of AI requests that were made.
    pub(crate) fn request_count(&self) -> usize {
        self.recorded_prompts.lock().unwrap().len()
    }

    /// Returns how many times `close` was called.
    pub(crate) fn close_count(&self) -> u32 {
        *self.closed.lock().unwrap()
    }
}

impl AiClient for ConfigurableMockAiClient {
    fn send_request<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiError>> + Send + 'a>> {
        let responses = self.responses.clone();
        let recorded = self.recorded_prompts.clone();
        let prompt = prompt.to_string();
        Box::pin(async move {
            recorded.lock().unwrap().push(prompt);
            responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AiError::NoResponse("Mock".to_string())))
        })
    }

    fn get_metadata(&self) -> AiClientMetadata {
        self.metadata.clone()
    }

    fn close(&self) -> Result<(), AiError> {
        *self.closed.lock().unwrap() += 1;
        Ok(())
    }
}
