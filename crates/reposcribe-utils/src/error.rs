//! Library error taxonomy.
//!
//! `ReposcribeError` is the primary error type returned by library
//! operations. Validation errors are raised before any clone or network cost
//! is spent; everything downstream unwinds through the pipeline, which still
//! removes its temporary checkout before propagating.
//!
//! Selection degradation (a ranking reply that cannot be used) is
//! deliberately absent from this taxonomy: the selector falls back to its
//! deterministic path and the run continues.

use thiserror::Error;

/// Library-level error type.
///
/// # Exit Code Mapping
///
/// Use [`exit_code()`](Self::exit_code) to map errors to CLI exit codes:
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Input validation / configuration errors |
/// | 3 | Repository clone failures |
/// | 4 | LLM backend failures |
/// | 5 | Budget overrun guard |
/// | 1 | Other errors |
///
/// Library code returns `ReposcribeError` and does NOT call
/// `std::process::exit()`; only the CLI maps errors to process exits.
#[derive(Error, Debug)]
pub enum ReposcribeError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("repository clone failed: {0}")]
    Clone(#[from] CloneError),

    #[error("LLM backend error: {0}")]
    Llm(#[from] LlmError),

    /// The assembled document still exceeds the ceiling after every
    /// allocation strategy and the final truncation pass. This is a defect
    /// guard, not an expected outcome: oversized output is never returned.
    #[error("context document exceeds the token ceiling: {used} tokens > budget {budget}")]
    BudgetOverrun { used: usize, budget: usize },

    #[error("tokenizer initialization failed: {0}")]
    Tokenizer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReposcribeError {
    /// Map this error to a CLI exit code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input(_) | Self::Config(_) => 2,
            Self::Clone(_) => 3,
            Self::Llm(_) => 4,
            Self::BudgetOverrun { .. } => 5,
            Self::Tokenizer(_) | Self::Io(_) => 1,
        }
    }
}

/// Input validation errors, raised before any external call.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("not a GitHub URL: {url}")]
    NotGitHub { url: String },

    #[error("URL must include owner and repository: {url}")]
    MissingSegments { url: String },

    #[error("unknown priority mode '{mode}' (expected 'all', 'high+medium', or 'high')")]
    UnknownPriorityMode { mode: String },
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found at {path}")]
    NotFound { path: String },

    #[error("invalid configuration file {path}: {reason}")]
    InvalidFile { path: String, reason: String },
}

/// Repository materialization errors. Fatal to the run; no partial document
/// is returned.
#[derive(Error, Debug)]
pub enum CloneError {
    #[error("git binary not found on PATH")]
    GitNotFound,

    #[error("failed to spawn git: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("git clone exited with {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("failed to create temporary checkout directory: {0}")]
    TempDir(#[source] std::io::Error),
}

/// LLM backend errors.
///
/// Oracle calls are never retried inside the core: a failed selection call
/// triggers the deterministic fallback, a failed summarization call is
/// terminal.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("misconfiguration: {0}")]
    Misconfiguration(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider authentication failed: {0}")]
    ProviderAuth(String),

    #[error("provider quota exceeded: {0}")]
    ProviderQuota(String),

    #[error("provider outage: {0}")]
    ProviderOutage(String),

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("unsupported provider: {0}")]
    Unsupported(String),
}
