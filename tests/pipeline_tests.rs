//! End-to-end pipeline tests over local checkouts with a scripted oracle.
//!
//! The clone step needs a network, so these tests drive
//! `Pipeline::assemble_context` against fixture directories; URL and mode
//! validation are exercised through `process_repo`, which rejects bad input
//! before any clone is attempted.

use std::fs;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use tempfile::TempDir;

use reposcribe::{Config, Pipeline, PriorityMode, ReposcribeError};
use reposcribe_llm::{LlmBackend, LlmError, LlmReply, LlmRequest};
use reposcribe_utils::error::InputError;

/// Oracle stand-in with a scripted behavior.
enum ScriptedBackend {
    /// Return this text.
    Reply(String),
    /// Fail with a transport error.
    Fail,
    /// Panic when invoked; used where no oracle call may happen.
    Unreachable,
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn invoke(&self, _request: LlmRequest) -> Result<LlmReply, LlmError> {
        match self {
            Self::Reply(text) => Ok(LlmReply {
                text: text.clone(),
                provider: "scripted".to_string(),
                model: "scripted".to_string(),
                tokens_input: None,
                tokens_output: None,
            }),
            Self::Fail => Err(LlmError::Transport("scripted failure".to_string())),
            Self::Unreachable => panic!("oracle must not be called"),
        }
    }
}

fn fixture_repo(entries: &[(&str, &str)]) -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    for (rel, content) in entries {
        let abs = root.join(rel);
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&abs, content).unwrap();
    }
    (dir, root)
}

fn pipeline() -> Pipeline {
    Pipeline::new(Config::default()).unwrap()
}

#[tokio::test]
async fn readme_survives_exclusion_and_lands_in_full() {
    // One real file, one file inside an excluded dependency cache. The
    // candidate count is under the cap, so no oracle call is made.
    let readme = "# Demo\n".repeat(50);
    let noise = "var x = 1;\n".repeat(900);
    let (_dir, root) = fixture_repo(&[("README.md", &readme), ("node_modules/x.js", &noise)]);

    let doc = pipeline()
        .assemble_context(&root, PriorityMode::All, &ScriptedBackend::Unreachable)
        .await
        .unwrap();

    assert!(doc.text.contains(&readme), "README must appear in full");
    assert!(!doc.text.contains("x.js"));
    assert_eq!(doc.files_included, 1);
    assert_eq!(doc.files_omitted, 0);
}

#[tokio::test]
async fn prose_oracle_reply_falls_back_to_tier_order() {
    // 50 candidates force a delegation attempt; a prose reply degrades to
    // the deterministic tier-then-depth-then-lexical prefix.
    let mut entries: Vec<(String, String)> = vec![("README.md".to_string(), "# top".to_string())];
    for i in 0..30 {
        entries.push((format!("src/a{i:02}.py"), format!("a = {i}\n")));
    }
    for i in 0..19 {
        entries.push((format!("tests/t{i:02}.py"), format!("t = {i}\n")));
    }
    let borrowed: Vec<(&str, &str)> = entries
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .collect();
    let (_dir, root) = fixture_repo(&borrowed);

    let backend = ScriptedBackend::Reply(
        "I think the important files are mostly in the src directory.".to_string(),
    );
    let doc = pipeline()
        .assemble_context(&root, PriorityMode::All, &backend)
        .await
        .unwrap();

    // Cap of 20: README (high) plus the first 19 medium files; no
    // low-tier test file makes the cut
    assert_eq!(doc.files_included, 20);
    assert!(doc.text.contains("## File: README.md"));
    assert!(doc.text.contains("## File: src/a00.py"));
    assert!(doc.text.contains("## File: src/a18.py"));
    assert!(!doc.text.contains("## File: src/a19.py"));
    assert!(!doc.text.contains("## File: tests/"));
}

#[tokio::test]
async fn oracle_failure_degrades_without_erroring() {
    let mut entries: Vec<(String, String)> = Vec::new();
    for i in 0..25 {
        entries.push((format!("src/m{i:02}.py"), format!("m = {i}\n")));
    }
    let borrowed: Vec<(&str, &str)> = entries
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .collect();
    let (_dir, root) = fixture_repo(&borrowed);

    let doc = pipeline()
        .assemble_context(&root, PriorityMode::All, &ScriptedBackend::Fail)
        .await
        .unwrap();

    assert_eq!(doc.files_included, 20);
}

#[tokio::test]
async fn delegated_ranking_orders_the_document() {
    let mut entries: Vec<(String, String)> = Vec::new();
    for i in 0..25 {
        entries.push((format!("src/m{i:02}.py"), format!("m = {i}\n")));
    }
    let borrowed: Vec<(&str, &str)> = entries
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .collect();
    let (_dir, root) = fixture_repo(&borrowed);

    let backend = ScriptedBackend::Reply(
        r#"{"files": ["src/m24.py", "src/m00.py", "src/m12.py"]}"#.to_string(),
    );
    let doc = pipeline()
        .assemble_context(&root, PriorityMode::All, &backend)
        .await
        .unwrap();

    assert_eq!(doc.files_included, 3);
    let m24 = doc.text.find("## File: src/m24.py").unwrap();
    let m00 = doc.text.find("## File: src/m00.py").unwrap();
    let m12 = doc.text.find("## File: src/m12.py").unwrap();
    assert!(m24 < m00 && m00 < m12, "oracle order must be preserved");
}

#[tokio::test]
async fn high_mode_drops_everything_else() {
    let (_dir, root) = fixture_repo(&[
        ("README.md", "# top"),
        ("src/util.py", "u = 1"),
        ("tests/test_util.py", "t = 1"),
    ]);

    let doc = pipeline()
        .assemble_context(&root, PriorityMode::High, &ScriptedBackend::Unreachable)
        .await
        .unwrap();

    assert!(doc.text.contains("## File: README.md"));
    assert!(!doc.text.contains("util.py"));
}

#[tokio::test]
async fn tree_rendering_heads_the_document() {
    let (_dir, root) = fixture_repo(&[("README.md", "# top"), ("src/app.py", "a = 1")]);

    let doc = pipeline()
        .assemble_context(&root, PriorityMode::All, &ScriptedBackend::Unreachable)
        .await
        .unwrap();

    assert!(doc.text.starts_with("# Directory Structure\n```\n"));
    assert!(doc.text.contains("src/"));
}

#[tokio::test]
async fn invalid_url_is_rejected_before_any_clone() {
    let err = pipeline()
        .process_repo("https://gitlab.com/group/project", "all", Some("sk-test"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReposcribeError::Input(InputError::NotGitHub { .. })
    ));
}

#[tokio::test]
async fn unknown_priority_mode_is_rejected_before_any_clone() {
    let err = pipeline()
        .process_repo("https://github.com/rust-lang/cargo", "urgent", Some("sk-test"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReposcribeError::Input(InputError::UnknownPriorityMode { .. })
    ));
}

#[tokio::test]
async fn unknown_provider_is_rejected_before_any_clone() {
    let config = Config::from_toml_str("[llm]\nprovider = \"mystery\"\n").unwrap();
    let pipeline = Pipeline::new(config).unwrap();

    let err = pipeline
        .process_repo("https://github.com/rust-lang/cargo", "all", Some("sk-test"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReposcribeError::Llm(_)));
}
