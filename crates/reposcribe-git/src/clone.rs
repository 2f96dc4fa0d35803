//! Shallow clone into a scoped temporary directory.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

use reposcribe_utils::error::CloneError;

use crate::github::RepoId;

/// A repository checkout scoped to a single pipeline run.
///
/// Dropping the checkout removes the directory and everything under it;
/// holding it in the pipeline guarantees cleanup on every exit path,
/// including clone-adjacent failures, without explicit teardown code.
#[derive(Debug)]
pub struct RepoCheckout {
    path: Utf8PathBuf,
    dir: TempDir,
}

impl RepoCheckout {
    /// Root of the checked-out tree.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Persist the checkout instead of removing it, returning its path.
    /// The caller takes over deletion; the pipeline itself never does this.
    #[must_use]
    pub fn keep(self) -> std::path::PathBuf {
        self.dir.keep()
    }
}

/// Shallow-clone `repo`'s default branch into a fresh temporary directory.
///
/// # Errors
///
/// Returns [`CloneError::GitNotFound`] when no `git` binary is on PATH,
/// [`CloneError::TempDir`]/[`CloneError::Spawn`] for local failures, and
/// [`CloneError::Failed`] with git's stderr when the clone itself fails
/// (repository missing, access denied, network failure). All of these are
/// fatal to the run.
pub async fn clone_shallow(repo: &RepoId) -> Result<RepoCheckout, CloneError> {
    let git = which::which("git").map_err(|_| CloneError::GitNotFound)?;

    let dir = tempfile::Builder::new()
        .prefix("reposcribe-")
        .tempdir()
        .map_err(CloneError::TempDir)?;

    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).map_err(|p| {
        CloneError::TempDir(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("temp dir path is not UTF-8: {}", p.display()),
        ))
    })?;

    debug!(repo = %repo, dest = %path, "cloning repository");

    let output = Command::new(git)
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(repo.clone_url())
        .arg(dir.path())
        // A missing or private repository must fail, not prompt
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .await
        .map_err(CloneError::Spawn)?;

    if !output.status.success() {
        // TempDir drop removes the partial checkout
        return Err(CloneError::Failed {
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(RepoCheckout { path, dir })
}
