//! Priority classification.
//!
//! Every candidate lands in exactly one tier. Precedence: an exact
//! high-value filename match wins, then a low-value ancestor directory,
//! then medium. Within a tier, shallower and earlier-alphabetical files
//! surface first.

use reposcribe_utils::types::{FileCandidate, PriorityMode, PriorityTier};

/// Filenames that reliably carry the most information about a project:
/// READMEs, entry points, dependency manifests, build files.
pub const HIGH_VALUE_NAMES: &[&str] = &[
    "README",
    "README.md",
    "README.rst",
    "README.txt",
    "main.py",
    "main.rs",
    "main.go",
    "main.c",
    "main.cpp",
    "index.js",
    "index.ts",
    "app.py",
    "app.js",
    "server.js",
    "lib.rs",
    "package.json",
    "pyproject.toml",
    "setup.py",
    "requirements.txt",
    "Cargo.toml",
    "go.mod",
    "Gemfile",
    "pom.xml",
    "build.gradle",
    "Makefile",
    "CMakeLists.txt",
    "Dockerfile",
    "docker-compose.yml",
];

/// Directory names whose contents rarely explain a project.
pub const LOW_VALUE_DIRS: &[&str] = &[
    "test",
    "tests",
    "testing",
    "spec",
    "specs",
    "example",
    "examples",
    "bench",
    "benches",
    "benchmark",
    "benchmarks",
    "script",
    "scripts",
    "fixture",
    "fixtures",
];

/// Candidates partitioned into ordered tiers.
///
/// Each tier is sorted by `(path depth ascending, full path lexical)`.
#[derive(Debug, Clone, Default)]
pub struct TieredCandidates {
    pub high: Vec<FileCandidate>,
    pub medium: Vec<FileCandidate>,
    pub low: Vec<FileCandidate>,
}

impl TieredCandidates {
    /// Total number of retained candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All candidates in tier order: high, then medium, then low.
    pub fn ordered(&self) -> impl Iterator<Item = &FileCandidate> {
        self.high
            .iter()
            .chain(self.medium.iter())
            .chain(self.low.iter())
    }

    /// Consume into a single tier-ordered list.
    #[must_use]
    pub fn into_ordered(mut self) -> Vec<FileCandidate> {
        let mut out = Vec::with_capacity(self.len());
        out.append(&mut self.high);
        out.append(&mut self.medium);
        out.append(&mut self.low);
        out
    }

    /// Drop tiers not retained under `mode`.
    #[must_use]
    pub fn retain_for_mode(mut self, mode: PriorityMode) -> Self {
        if !mode.retains(PriorityTier::Medium) {
            self.medium.clear();
        }
        if !mode.retains(PriorityTier::Low) {
            self.low.clear();
        }
        self
    }
}

/// Tier assignment for a single candidate. Pure function of the filename
/// and the ancestor directory names.
#[must_use]
pub fn tier_of(candidate: &FileCandidate) -> PriorityTier {
    if HIGH_VALUE_NAMES.contains(&candidate.file_name()) {
        return PriorityTier::High;
    }

    let mut components: Vec<&str> = candidate
        .rel_path
        .components()
        .map(|c| c.as_str())
        .collect();
    components.pop(); // ancestors only, not the filename itself

    if components
        .iter()
        .any(|dir| LOW_VALUE_DIRS.contains(&dir.to_ascii_lowercase().as_str()))
    {
        return PriorityTier::Low;
    }

    PriorityTier::Medium
}

/// Partition `candidates` into tiers and sort each tier.
#[must_use]
pub fn classify(candidates: Vec<FileCandidate>) -> TieredCandidates {
    let mut tiers = TieredCandidates::default();

    for candidate in candidates {
        match tier_of(&candidate) {
            PriorityTier::High => tiers.high.push(candidate),
            PriorityTier::Medium => tiers.medium.push(candidate),
            PriorityTier::Low => tiers.low.push(candidate),
        }
    }

    for tier in [&mut tiers.high, &mut tiers.medium, &mut tiers.low] {
        tier.sort_by(|a, b| {
            a.depth()
                .cmp(&b.depth())
                .then_with(|| a.rel_path.as_str().cmp(b.rel_path.as_str()))
        });
    }

    tiers
}
