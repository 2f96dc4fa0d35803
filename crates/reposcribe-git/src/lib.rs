//! Repository materialization for reposcribe
//!
//! Turns a GitHub URL into a local shallow checkout held in a temporary
//! directory whose lifetime is scoped to the pipeline run: the checkout is
//! removed on every exit path, success or failure.

mod clone;
mod github;

pub use clone::{RepoCheckout, clone_shallow};
pub use github::{RepoId, parse_github_url};
