//! Importance selection for reposcribe
//!
//! Narrows the classified candidate list to at most a fixed cap of files,
//! either by delegating the ranking to the LLM or by deterministic tier
//! truncation. Selection never aborts the pipeline: an unusable ranking
//! reply degrades transparently to the deterministic path.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use reposcribe_llm::prompts::SELECTOR_PROMPT;
use reposcribe_llm::{LlmBackend, LlmRequest, Message};
use reposcribe_scan::TieredCandidates;
use reposcribe_utils::types::FileCandidate;

/// Selection outcome, tagged by the path that produced it.
///
/// The tag exists so the fallback is explicit and testable; callers collapse
/// it with [`into_ordered`](Self::into_ordered) immediately.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Ordering came back from the ranking oracle.
    Delegated(Vec<FileCandidate>),
    /// Deterministic tier-order truncation (identity pass or fallback).
    Deterministic(Vec<FileCandidate>),
}

impl Selection {
    /// Collapse into the ordered candidate list, most important first.
    #[must_use]
    pub fn into_ordered(self) -> Vec<FileCandidate> {
        match self {
            Self::Delegated(files) | Self::Deterministic(files) => files,
        }
    }

    /// Selected candidates, most important first.
    #[must_use]
    pub fn as_slice(&self) -> &[FileCandidate] {
        match self {
            Self::Delegated(files) | Self::Deterministic(files) => files,
        }
    }

    /// Whether the ordering came from the oracle.
    #[must_use]
    pub fn is_delegated(&self) -> bool {
        matches!(self, Self::Delegated(_))
    }
}

/// Select the at most `cap` most important candidates.
///
/// When the input already fits the cap this is an identity pass: order
/// preserved, no oracle call spent. Otherwise the full relative-path list
/// is handed to the oracle; its reply is parsed as a JSON path list, mapped
/// back to known candidates in the oracle's order (unknown paths dropped
/// silently), and a malformed or empty result falls back to the cap
/// truncation of the tier ordering.
pub async fn select_important(
    tiers: &TieredCandidates,
    backend: &dyn LlmBackend,
    cap: usize,
    timeout: Duration,
) -> Selection {
    let ordered: Vec<&FileCandidate> = tiers.ordered().collect();

    if ordered.len() <= cap {
        debug!(count = ordered.len(), cap = cap, "selection is identity pass");
        return Selection::Deterministic(ordered.into_iter().cloned().collect());
    }

    let payload: String = ordered
        .iter()
        .map(|c| c.rel_path.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    // Ranking wants determinism, not creativity
    let request = LlmRequest::new(
        timeout,
        vec![Message::system(SELECTOR_PROMPT), Message::user(payload)],
    )
    .with_temperature(0.0);

    match backend.invoke(request).await {
        Ok(reply) => {
            if let Some(paths) = parse_path_reply(&reply.text) {
                let mapped = map_to_candidates(&paths, &ordered, cap);
                if !mapped.is_empty() {
                    debug!(count = mapped.len(), "ranking delegated to oracle");
                    return Selection::Delegated(mapped);
                }
            }
            warn!("ranking reply unusable; falling back to deterministic selection");
        }
        Err(error) => {
            warn!(%error, "ranking call failed; falling back to deterministic selection");
        }
    }

    Selection::Deterministic(ordered.into_iter().take(cap).cloned().collect())
}

/// Deterministic cap truncation of the tier ordering. Exposed so the
/// fallback can be exercised without an oracle in reach.
#[must_use]
pub fn deterministic_selection(tiers: &TieredCandidates, cap: usize) -> Vec<FileCandidate> {
    tiers.ordered().take(cap).cloned().collect()
}

/// Extract a path list from a ranking reply.
///
/// Accepts a bare JSON array of strings or an object with a `"files"` key
/// holding one; markdown fences around the JSON are tolerated. Returns
/// `None` when no such structure is present.
fn parse_path_reply(raw: &str) -> Option<Vec<String>> {
    let body = strip_fences(raw);
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let array = match &value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map.get("files")?.as_array()?,
        _ => return None,
    };

    // Non-string entries are noise, not a failure
    Some(
        array
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
    )
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Map oracle-returned paths back to known candidates, preserving the
/// oracle's order and dropping unmatched or duplicate paths.
fn map_to_candidates(
    paths: &[String],
    known: &[&FileCandidate],
    cap: usize,
) -> Vec<FileCandidate> {
    let by_path: HashMap<&str, &FileCandidate> = known
        .iter()
        .map(|c| (c.rel_path.as_str(), *c))
        .collect();

    let mut selected: Vec<FileCandidate> = Vec::new();
    for path in paths {
        if selected.len() >= cap {
            break;
        }
        if let Some(candidate) = by_path.get(path.as_str())
            && !selected.iter().any(|c| c.rel_path == candidate.rel_path)
        {
            selected.push((*candidate).clone());
        }
    }
    selected
}
