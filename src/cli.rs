//! reposcribe CLI.
//!
//! All logic lives in the library; this module parses arguments, sets up
//! logging, and maps errors to exit codes.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reposcribe_config::Config;
use reposcribe_utils::error::ReposcribeError;

use crate::pipeline::Pipeline;
use crate::server;

#[derive(Debug, Parser)]
#[command(name = "reposcribe", version, about = "Summarize a GitHub repository with an LLM")]
struct Cli {
    /// Path to a configuration file (defaults to ./reposcribe.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summarize one repository and print the result
    Summarize {
        /// GitHub repository URL
        url: String,

        /// Priority mode: all, high+medium, or high
        #[arg(long, default_value = "all")]
        priority: String,

        /// Environment variable holding the API key to use for this run
        #[arg(long)]
        api_key_env: Option<String>,
    },
    /// Run the HTTP service
    Serve {
        /// Bind address (overrides configuration)
        #[arg(long)]
        listen: Option<String>,
    },
}

/// Run the CLI. Returns the process exit code on failure; all error output
/// goes to stderr here.
///
/// # Errors
///
/// Returns the exit code mapped from the underlying [`ReposcribeError`].
pub fn run() -> Result<(), i32> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reposcribe=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref()).map_err(|e| {
        eprintln!("error: {e}");
        2
    })?;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("error: failed to start runtime: {e}");
        1
    })?;

    runtime.block_on(run_command(cli.command, config)).map_err(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    })
}

async fn run_command(command: Command, config: Config) -> Result<(), ReposcribeError> {
    match command {
        Command::Summarize {
            url,
            priority,
            api_key_env,
        } => {
            let api_key = match api_key_env {
                Some(var) => Some(std::env::var(&var).map_err(|_| {
                    ReposcribeError::Llm(reposcribe_utils::error::LlmError::Misconfiguration(
                        format!("API key environment variable '{var}' is not set"),
                    ))
                })?),
                None => None,
            };

            let pipeline = Pipeline::new(config)?;
            let summary = pipeline
                .process_repo(&url, &priority, api_key.as_deref())
                .await?;
            println!("{summary}");
            Ok(())
        }
        Command::Serve { listen } => {
            let addr = listen.unwrap_or_else(|| config.server.listen().to_string());
            let pipeline = Arc::new(Pipeline::new(config)?);
            server::serve(&addr, pipeline).await?;
            Ok(())
        }
    }
}
