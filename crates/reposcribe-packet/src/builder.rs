//! Context builder with token-budgeted allocation.

use tracing::{debug, warn};

use reposcribe_utils::error::ReposcribeError;
use reposcribe_utils::tokens::TokenCounter;
use reposcribe_utils::types::FileCandidate;

use crate::BudgetUsage;

/// Marker appended wherever content was cut, so the consumer knows the
/// chunk is incomplete.
pub const TRUNCATION_MARKER: &str = "\n\n... [truncated] ...";

/// Canonical entry-point and README names that are always rendered in full,
/// never truncated, even when they consume most of the budget.
pub const FULL_READ_NAMES: &[&str] = &[
    "README",
    "README.md",
    "README.rst",
    "README.txt",
    "main.py",
    "main.rs",
    "index.js",
    "index.ts",
    "app.py",
];

/// Budget allocation strategy.
///
/// `FairShare` is the canonical mode. `DropFromEnd` reproduces the older
/// whole-file eviction behavior and is kept as a legacy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationStrategy {
    /// Reserve full content for canonical entry files, divide the remaining
    /// budget evenly across the rest, truncating oversized chunks to their
    /// share.
    #[default]
    FairShare,
    /// Evict whole files from the end of the selection until the total
    /// fits.
    DropFromEnd,
}

/// The assembled document plus accounting metadata.
#[derive(Debug)]
pub struct ContextDocument {
    /// Tree rendering followed by file chunks, joined by blank lines.
    pub text: String,
    /// Final token usage against the net budget.
    pub budget: BudgetUsage,
    /// Files whose chunk made it into the document.
    pub files_included: usize,
    /// Files included but cut at a line boundary.
    pub files_truncated: usize,
    /// Files left out entirely.
    pub files_omitted: usize,
}

struct Chunk {
    text: String,
    tokens: usize,
    full_read: bool,
}

/// Assembles tree rendering and selected file contents into one document
/// whose token count never exceeds the configured ceiling net of the
/// instruction text that accompanies it downstream.
#[derive(Debug)]
pub struct ContextBuilder<'a> {
    counter: &'a TokenCounter,
    max_context_tokens: usize,
    share_floor_tokens: usize,
    strategy: AllocationStrategy,
}

impl<'a> ContextBuilder<'a> {
    /// Create a builder with the fair-share strategy.
    #[must_use]
    pub fn new(
        counter: &'a TokenCounter,
        max_context_tokens: usize,
        share_floor_tokens: usize,
    ) -> Self {
        Self {
            counter,
            max_context_tokens,
            share_floor_tokens,
            strategy: AllocationStrategy::default(),
        }
    }

    /// Select the allocation strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: AllocationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Assemble the context document.
    ///
    /// `instruction` is the fixed text that will accompany the document
    /// downstream; its token cost is subtracted from the ceiling before any
    /// allocation. Files that cannot be read are skipped; undecodable bytes
    /// are replaced, not fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ReposcribeError::BudgetOverrun`] only when the document
    /// still exceeds the budget after the final global truncation pass.
    /// That is a guard against accounting drift, not an expected outcome.
    pub fn build(
        &self,
        tree: &str,
        files: &[FileCandidate],
        instruction: &str,
    ) -> Result<ContextDocument, ReposcribeError> {
        let instruction_tokens = self.counter.count(instruction);
        let budget = self.max_context_tokens.saturating_sub(instruction_tokens);
        let tree_tokens = self.counter.count(tree);

        let mut chunks = Vec::with_capacity(files.len());
        for file in files {
            let Ok(bytes) = std::fs::read(file.abs_path.as_std_path()) else {
                warn!(path = %file.rel_path, "skipping unreadable file");
                continue;
            };
            let content = String::from_utf8_lossy(&bytes);
            let text = format!("## File: {}\n```\n{}\n```", file.rel_path, content);
            let tokens = self.counter.count(&text);
            chunks.push(Chunk {
                text,
                tokens,
                full_read: FULL_READ_NAMES.contains(&file.file_name()),
            });
        }

        let (parts, included, truncated, omitted) = match self.strategy {
            AllocationStrategy::FairShare => self.fair_share(budget, tree, tree_tokens, chunks),
            AllocationStrategy::DropFromEnd => {
                self.drop_from_end(budget, tree, tree_tokens, chunks)
            }
        };

        let mut text = parts.join("\n\n");
        let mut total_tokens = self.counter.count(&text);

        if total_tokens > budget {
            // Accounting drift (join separators, oversized full-reads):
            // one global token-level truncation pass, then a hard guard.
            text = self.cut_at_line_boundary(&text, budget);
            total_tokens = self.counter.count(&text);
            if total_tokens > budget {
                return Err(ReposcribeError::BudgetOverrun {
                    used: total_tokens,
                    budget,
                });
            }
        }

        debug!(
            tokens = total_tokens,
            budget = budget,
            included = included,
            truncated = truncated,
            omitted = omitted,
            strategy = ?self.strategy,
            "context assembled"
        );

        let mut final_usage = BudgetUsage::new(budget);
        final_usage.add(total_tokens);

        Ok(ContextDocument {
            text,
            budget: final_usage,
            files_included: included,
            files_truncated: truncated,
            files_omitted: omitted,
        })
    }

    /// Fair-share allocation: tree and full-read chunks are accounted
    /// first and never shortened; the remaining budget is divided evenly
    /// across trimmable chunks with an enforced per-file floor.
    fn fair_share(
        &self,
        budget: usize,
        tree: &str,
        tree_tokens: usize,
        chunks: Vec<Chunk>,
    ) -> (Vec<String>, usize, usize, usize) {
        let reserved: usize = tree_tokens
            + chunks
                .iter()
                .filter(|c| c.full_read)
                .map(|c| c.tokens)
                .sum::<usize>();
        let trimmable_count = chunks.iter().filter(|c| !c.full_read).count();

        let share = if trimmable_count == 0 {
            0
        } else {
            (budget.saturating_sub(reserved) / trimmable_count).max(self.share_floor_tokens)
        };

        let mut usage = BudgetUsage::new(budget);
        usage.add(tree_tokens);

        let mut parts = vec![tree.to_string()];
        let mut included = 0;
        let mut truncated = 0;
        let mut omitted = 0;
        let mut exhausted = false;

        for chunk in chunks {
            if chunk.full_read {
                // Reserved up front; appended even when the running total
                // is already past the ceiling (the final pass covers that)
                usage.add(chunk.tokens);
                parts.push(chunk.text);
                included += 1;
                continue;
            }

            if exhausted {
                omitted += 1;
                continue;
            }

            let (text, tokens, was_cut) = if chunk.tokens > share {
                let cut = self.cut_at_line_boundary(&chunk.text, share);
                let cut_tokens = self.counter.count(&cut);
                (cut, cut_tokens, true)
            } else {
                (chunk.text, chunk.tokens, false)
            };

            if usage.would_exceed(tokens) {
                exhausted = true;
                omitted += 1;
                continue;
            }

            usage.add(tokens);
            parts.push(text);
            included += 1;
            if was_cut {
                truncated += 1;
            }
        }

        (parts, included, truncated, omitted)
    }

    /// Legacy allocation: evict whole chunks from the end of the selection
    /// until the running total fits.
    fn drop_from_end(
        &self,
        budget: usize,
        tree: &str,
        tree_tokens: usize,
        mut chunks: Vec<Chunk>,
    ) -> (Vec<String>, usize, usize, usize) {
        let mut total = tree_tokens + chunks.iter().map(|c| c.tokens).sum::<usize>();
        let mut omitted = 0;

        while total > budget {
            let Some(chunk) = chunks.pop() else { break };
            total -= chunk.tokens;
            omitted += 1;
        }

        let included = chunks.len();
        let mut parts = vec![tree.to_string()];
        parts.extend(chunks.into_iter().map(|c| c.text));

        (parts, included, 0, omitted)
    }

    /// Truncate `text` to at most `max_tokens` tokens, backing off to the
    /// nearest preceding line boundary and appending the truncation marker.
    /// The marker's own cost is budgeted inside `max_tokens`.
    fn cut_at_line_boundary(&self, text: &str, max_tokens: usize) -> String {
        let marker_tokens = self.counter.count(TRUNCATION_MARKER);
        let cut = self
            .counter
            .truncate(text, max_tokens.saturating_sub(marker_tokens));

        let mut body = match cut.rfind('\n') {
            Some(pos) if pos > 0 => &cut[..pos],
            _ => "",
        };

        // Token counts are not additive across concatenation; trim trailing
        // lines until the marker fits inside the allowance too.
        loop {
            let candidate = format!("{body}{TRUNCATION_MARKER}");
            if self.counter.count(&candidate) <= max_tokens || body.is_empty() {
                return candidate;
            }
            body = match body.rfind('\n') {
                Some(pos) if pos > 0 => &body[..pos],
                _ => "",
            };
        }
    }
}
