//! Core data model shared across the pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Priority tier assigned to a candidate file.
///
/// Assignment is a pure function of the filename and its ancestor directory
/// names; every candidate lands in exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    /// Exact match against the high-value filename set (READMEs, entry
    /// points, manifests, build files).
    High,
    /// Everything that is neither high nor low.
    Medium,
    /// Any ancestor directory matches the low-value directory set (tests,
    /// specs, examples, benchmarks, scripts).
    Low,
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Caller-selected retention mode: which tiers survive classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityMode {
    /// Retain high, medium, and low.
    All,
    /// Retain high and medium.
    HighMedium,
    /// Retain high only.
    High,
}

impl PriorityMode {
    /// Parse a caller-supplied mode string.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnknownPriorityMode`] for anything other than
    /// `all`, `high+medium`, or `high`; unknown modes are a validation
    /// error, never silently defaulted.
    pub fn parse(mode: &str) -> Result<Self, InputError> {
        match mode {
            "all" => Ok(Self::All),
            "high+medium" => Ok(Self::HighMedium),
            "high" => Ok(Self::High),
            other => Err(InputError::UnknownPriorityMode {
                mode: other.to_string(),
            }),
        }
    }

    /// Whether candidates of `tier` are retained under this mode.
    #[must_use]
    pub fn retains(&self, tier: PriorityTier) -> bool {
        match self {
            Self::All => true,
            Self::HighMedium => tier != PriorityTier::Low,
            Self::High => tier == PriorityTier::High,
        }
    }
}

impl std::fmt::Display for PriorityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::HighMedium => write!(f, "high+medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A file discovered by the scanner.
///
/// Identity is the relative path string; content stays on disk until the
/// budgeter reads it. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Path relative to the repository root.
    pub rel_path: Utf8PathBuf,
    /// Absolute path of the file on disk.
    pub abs_path: Utf8PathBuf,
}

impl FileCandidate {
    /// Create a candidate from a repository root and a relative path.
    #[must_use]
    pub fn new(root: &Utf8Path, rel_path: Utf8PathBuf) -> Self {
        let abs_path = root.join(&rel_path);
        Self { rel_path, abs_path }
    }

    /// Number of path components in the relative path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.rel_path.components().count()
    }

    /// Final path component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.rel_path.file_name().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_mode_parses_known_values() {
        assert_eq!(PriorityMode::parse("all").unwrap(), PriorityMode::All);
        assert_eq!(
            PriorityMode::parse("high+medium").unwrap(),
            PriorityMode::HighMedium
        );
        assert_eq!(PriorityMode::parse("high").unwrap(), PriorityMode::High);
    }

    #[test]
    fn priority_mode_rejects_unknown_values() {
        for bad in ["", "ALL", "medium", "high,medium", "low"] {
            let err = PriorityMode::parse(bad).unwrap_err();
            assert!(matches!(err, InputError::UnknownPriorityMode { .. }));
        }
    }

    #[test]
    fn retention_follows_mode() {
        assert!(PriorityMode::All.retains(PriorityTier::Low));
        assert!(PriorityMode::HighMedium.retains(PriorityTier::Medium));
        assert!(!PriorityMode::HighMedium.retains(PriorityTier::Low));
        assert!(PriorityMode::High.retains(PriorityTier::High));
        assert!(!PriorityMode::High.retains(PriorityTier::Medium));
    }

    #[test]
    fn candidate_depth_and_name() {
        let root = Utf8Path::new("/tmp/checkout");
        let c = FileCandidate::new(root, Utf8PathBuf::from("src/core/engine.rs"));
        assert_eq!(c.depth(), 3);
        assert_eq!(c.file_name(), "engine.rs");
        assert_eq!(c.abs_path, Utf8PathBuf::from("/tmp/checkout/src/core/engine.rs"));
    }
}
