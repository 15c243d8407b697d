//! One method per assistant operation: prompt, provider call, normalization.

use tokio::time::Instant;
use tracing::{debug, warn};

use super::prompts;
use super::retry::retry_rate_limited;
use super::{create_client, AiClient, AiClientMetadata, AiError, ProviderConfig};
use crate::analysis::pr::complete_description;
use crate::data::{
    CommitMessage, CommitOptions, CommitRecord, PrAnalysis, PrDescription, ReviewOptions,
    ReviewResult, Summary, SummaryOptions,
};
use crate::normalize::{
    fallback_commit_message, group_commits, parse_commit_message, parse_pr_description,
    parse_review, parse_summary,
};

/// Runs assistant operations against one provider.
pub struct Assistant {
    client: Box<dyn AiClient>,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant").finish_non_exhaustive()
    }
}

impl Assistant {
    /// Wraps an existing client.
    pub fn new(client: Box<dyn AiClient>) -> Self {
        Self { client }
    }

    /// Builds the client named by `config.provider`.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, AiError> {
        Ok(Self::new(create_client(config)?))
    }

    /// Provider and model in use.
    pub fn metadata(&self) -> AiClientMetadata {
        self.client.get_metadata()
    }

    async fn complete(&self, prompt: &str, deadline: Instant) -> Result<String, AiError> {
        let metadata = self.client.get_metadata();
        debug!(
            provider = %metadata.provider,
            model = %metadata.model,
            prompt_len = prompt.len(),
            "Dispatching prompt"
        );
        retry_rate_limited(deadline, &metadata.rate_limit_hint, || {
            self.client.send_request(prompt)
        })
        .await
    }

    /// Generates a commit message for a staged diff.
    ///
    /// A response that normalizes to nothing is replaced by the local
    /// heuristic so the result always has a full message.
    pub async fn generate_commit_message(
        &self,
        diff: &str,
        options: &CommitOptions,
        deadline: Instant,
    ) -> Result<CommitMessage, AiError> {
        let prompt = prompts::commit_message_prompt(diff, options);
        let text = self.complete(&prompt, deadline).await?;
        let message = parse_commit_message(&text, options.conventional);
        if message.is_blank() {
            warn!("Provider returned an empty commit message, using local heuristic");
            return Ok(fallback_commit_message(diff, options));
        }
        Ok(message)
    }

    /// Summarizes a list of commits.
    pub async fn generate_summary(
        &self,
        commits: &[CommitRecord],
        options: &SummaryOptions,
        deadline: Instant,
    ) -> Result<Summary, AiError> {
        let prompt = prompts::summary_prompt(commits, options);
        let text = self.complete(&prompt, deadline).await?;
        let mut summary = parse_summary(&text, options.format);
        if options.group_by_type && summary.groups.is_empty() {
            summary.groups = group_commits(commits);
        }
        Ok(summary)
    }

    /// Reviews a diff.
    pub async fn review_code(
        &self,
        diff: &str,
        options: &ReviewOptions,
        deadline: Instant,
    ) -> Result<ReviewResult, AiError> {
        let prompt = prompts::review_prompt(diff, options);
        let text = self.complete(&prompt, deadline).await?;
        Ok(parse_review(&text))
    }

    /// Generates a PR description, filling gaps from local analysis.
    pub async fn generate_pr_description(
        &self,
        analysis: &PrAnalysis,
        deadline: Instant,
    ) -> Result<PrDescription, AiError> {
        let prompt = prompts::pr_description_prompt(analysis);
        let text = self.complete(&prompt, deadline).await?;
        Ok(complete_description(parse_pr_description(&text), analysis))
    }

    /// Releases the provider connection.
    pub fn close(&self) -> Result<(), AiError> {
        self.client.close()
    }
}
