//! reposcribe - GitHub repository summarization over a bounded context
//!
//! reposcribe takes a GitHub repository URL, materializes a shallow clone,
//! assembles a token-bounded context document from the most informative
//! files, and asks an LLM for a human-readable summary.
//!
//! The pipeline: scan → classify → render tree → select (≤ 20 files) →
//! budget → summarize, with the temporary checkout removed on every exit
//! path.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # One-shot summary
//! reposcribe summarize https://github.com/rust-lang/cargo
//!
//! # Keep only the highest-priority tiers
//! reposcribe summarize https://github.com/rust-lang/cargo --priority high+medium
//!
//! # Run the HTTP service
//! reposcribe serve --listen 127.0.0.1:8000
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use reposcribe::{Config, Pipeline};
//!
//! # async fn example() -> Result<(), reposcribe::ReposcribeError> {
//! let pipeline = Pipeline::new(Config::default())?;
//! let summary = pipeline
//!     .process_repo("https://github.com/rust-lang/cargo", "all", None)
//!     .await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub use reposcribe_config::Config;
pub use reposcribe_utils::error::ReposcribeError;
pub use reposcribe_utils::types::{PriorityMode, PriorityTier};

pub use pipeline::Pipeline;

pub mod pipeline;
pub mod server;

// CLI module - internal implementation detail, used by main.rs
#[doc(hidden)]
pub mod cli;
