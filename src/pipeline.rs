//! The repository context assembly pipeline.
//!
//! One invocation turns one repository URL into one summary. All
//! per-invocation state (the checkout, the candidate list, the assembled
//! document) lives and dies inside [`Pipeline::process_repo`]; the only
//! shared state is the read-only configuration and the tokenizer, owned by
//! the [`Pipeline`] and passed by reference into every component.

use std::time::Duration;

use camino::Utf8Path;
use tracing::{debug, info};

use reposcribe_config::Config;
use reposcribe_git::{clone_shallow, parse_github_url};
use reposcribe_llm::prompts::SUMMARIZE_PROMPT;
use reposcribe_llm::{LlmBackend, LlmRequest, Message, backend_from_config};
use reposcribe_packet::{ContextBuilder, ContextDocument};
use reposcribe_scan::{Scanner, classify, render_tree};
use reposcribe_select::select_important;
use reposcribe_utils::error::ReposcribeError;
use reposcribe_utils::tokens::TokenCounter;
use reposcribe_utils::types::PriorityMode;

/// Sampling temperature for the summarization call.
const SUMMARY_TEMPERATURE: f32 = 0.3;

/// The boundary object consumed by the CLI and the HTTP layer.
///
/// Owns process-wide immutable state: configuration and the tokenizer.
/// Everything else is created and destroyed within a single
/// [`process_repo`](Self::process_repo) invocation.
pub struct Pipeline {
    config: Config,
    counter: TokenCounter,
}

impl Pipeline {
    /// Create a pipeline, loading the tokenizer once.
    ///
    /// # Errors
    ///
    /// Returns [`ReposcribeError::Tokenizer`] if the tokenizer vocabulary
    /// fails to load.
    pub fn new(config: Config) -> Result<Self, ReposcribeError> {
        let counter = TokenCounter::new()?;
        Ok(Self { config, counter })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Summarize one repository end-to-end.
    ///
    /// Sequencing: validate URL and priority mode → construct the backend →
    /// shallow-clone into a scoped temp dir → scan/classify → render tree →
    /// select → assemble under the token ceiling → summarize. The checkout
    /// is removed on every exit path, including all failure paths.
    ///
    /// `override_api_key` is the request-level credential; when absent the
    /// backend reads the environment variable named in configuration.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any clone or network cost is
    /// spent. Clone and summarization failures are fatal. A degraded
    /// selection (unusable ranking reply) is not an error: the run
    /// continues on the deterministic path.
    pub async fn process_repo(
        &self,
        url: &str,
        priority: &str,
        override_api_key: Option<&str>,
    ) -> Result<String, ReposcribeError> {
        let repo = parse_github_url(url)?;
        let mode = PriorityMode::parse(priority)?;
        let backend = backend_from_config(&self.config.llm, override_api_key)?;

        info!(repo = %repo, mode = %mode, "processing repository");

        let checkout = clone_shallow(&repo).await?;
        let document = self
            .assemble_context(checkout.path(), mode, backend.as_ref())
            .await?;
        let summary = self.summarize(backend.as_ref(), &document.text).await?;

        Ok(summary)
    }

    /// Assemble the bounded context document for an already-materialized
    /// checkout. Exposed for callers that manage their own checkouts.
    ///
    /// # Errors
    ///
    /// Returns [`ReposcribeError::BudgetOverrun`] only if the budgeter's
    /// final truncation pass cannot bring the document under the ceiling.
    pub async fn assemble_context(
        &self,
        root: &Utf8Path,
        mode: PriorityMode,
        backend: &dyn LlmBackend,
    ) -> Result<ContextDocument, ReposcribeError> {
        let limits = &self.config.limits;

        let scanner = Scanner::new(limits.max_file_bytes());
        let candidates = scanner.scan(root);
        let tiers = classify(candidates).retain_for_mode(mode);
        debug!(
            high = tiers.high.len(),
            medium = tiers.medium.len(),
            low = tiers.low.len(),
            "candidates classified"
        );

        let tree = render_tree(tiers.ordered());

        let timeout = Duration::from_secs(self.config.llm.timeout_secs());
        let selection =
            select_important(&tiers, backend, limits.selection_cap(), timeout).await;
        debug!(
            delegated = selection.is_delegated(),
            count = selection.as_slice().len(),
            "selection complete"
        );
        let selected = selection.into_ordered();

        let builder = ContextBuilder::new(
            &self.counter,
            limits.max_context_tokens(),
            limits.share_floor_tokens(),
        );
        builder.build(&tree, &selected, SUMMARIZE_PROMPT)
    }

    /// Hand the assembled document to the summarization oracle. The reply
    /// is the system's final output, passed through unmodified.
    async fn summarize(
        &self,
        backend: &dyn LlmBackend,
        context: &str,
    ) -> Result<String, ReposcribeError> {
        let timeout = Duration::from_secs(self.config.llm.timeout_secs());
        let request = LlmRequest::new(
            timeout,
            vec![
                Message::system(SUMMARIZE_PROMPT),
                Message::user(format!("Summarize this repository:\n\n{context}")),
            ],
        )
        .with_temperature(SUMMARY_TEMPERATURE);

        let reply = backend.invoke(request).await?;
        debug!(
            provider = %reply.provider,
            tokens_input = ?reply.tokens_input,
            tokens_output = ?reply.tokens_output,
            "summary produced"
        );
        Ok(reply.text)
    }
}
