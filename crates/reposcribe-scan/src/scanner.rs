//! Filesystem scanner.
//!
//! Walks a checkout and returns every file worth showing to the oracle,
//! in lexical order of the relative path string. That ordering is the
//! tie-break every later stage relies on unless a tier re-sorts.

use camino::Utf8Path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use reposcribe_utils::types::FileCandidate;

/// Directory names that are never descended into: version-control metadata,
/// dependency caches, build output, editor state.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    ".venv",
    "venv",
    "env",
    "dist",
    "build",
    "target",
    ".next",
    ".nuxt",
    "vendor",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    "coverage",
    ".idea",
    ".vscode",
];

/// Filename suffixes that are dropped: binary and media formats, archives,
/// lockfiles, minified assets, compiled artifacts.
pub const SKIP_SUFFIXES: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".webp",
    ".mp4", ".mp3", ".wav", ".mov",
    ".woff", ".woff2", ".ttf", ".eot",
    ".pdf", ".zip", ".tar", ".gz", ".bz2",
    ".lock", ".min.js", ".min.css",
    ".pyc", ".pyo", ".so", ".dll", ".dylib",
    ".DS_Store", ".gitignore",
];

/// Files that almost certainly contain secrets, excluded regardless of the
/// suffix rules above. The oracle never sees key material.
const SECRET_EXCLUDE_PATTERNS: &[&str] = &[
    "**/.env",
    "**/.env.*",
    "**/*.pem",
    "**/*.key",
    "**/id_rsa",
    "**/id_ed25519",
    "**/secrets.yaml",
    "**/secrets.yml",
];

/// Walks a repository subtree and produces the candidate list.
#[derive(Debug)]
pub struct Scanner {
    secret_excludes: GlobSet,
    max_file_bytes: u64,
}

impl Scanner {
    /// Create a scanner with the given per-file byte ceiling.
    #[must_use]
    pub fn new(max_file_bytes: u64) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in SECRET_EXCLUDE_PATTERNS {
            // Static patterns; a failure here is a programming error
            builder.add(Glob::new(pattern).unwrap());
        }
        Self {
            secret_excludes: builder.build().unwrap(),
            max_file_bytes,
        }
    }

    /// Collect all eligible files under `root`.
    ///
    /// Files over the byte ceiling are dropped, not truncated; unreadable
    /// files (stat error) and non-UTF-8 paths are dropped silently. A
    /// missing or empty root yields an empty list.
    #[must_use]
    pub fn scan(&self, root: &Utf8Path) -> Vec<FileCandidate> {
        let mut candidates = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e));

        for entry in walker {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if SKIP_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if metadata.len() > self.max_file_bytes {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let Some(rel) = Utf8Path::from_path(rel) else {
                continue;
            };
            if self.secret_excludes.is_match(rel.as_std_path()) {
                continue;
            }
            candidates.push(FileCandidate::new(root, rel.to_owned()));
        }

        candidates.sort_by(|a, b| a.rel_path.as_str().cmp(b.rel_path.as_str()));

        debug!(root = %root, count = candidates.len(), "scan complete");
        candidates
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}
