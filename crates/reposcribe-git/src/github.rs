//! GitHub URL validation.
//!
//! Validation runs before any clone or network cost is spent: a rejected URL
//! never reaches git.

use reposcribe_utils::error::InputError;

/// Owner and repository name extracted from a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// HTTPS clone URL for this repository.
    #[must_use]
    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.name)
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Extract owner and repository name from a GitHub URL.
///
/// Accepts `http` and `https` URLs on `github.com` or `www.github.com`; a
/// trailing `.git` on the repository segment is stripped. Extra path
/// segments (`/tree/main`, `/blob/...`) are ignored.
///
/// # Errors
///
/// Returns [`InputError::NotGitHub`] for other hosts or schemes and
/// [`InputError::MissingSegments`] when owner or repository is absent.
pub fn parse_github_url(url: &str) -> Result<RepoId, InputError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| InputError::NotGitHub {
            url: url.to_string(),
        })?;

    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
    let host = host.split(':').next().unwrap_or(host);
    if !matches!(host, "github.com" | "www.github.com") {
        return Err(InputError::NotGitHub {
            url: url.to_string(),
        });
    }

    // Drop query string and fragment before splitting segments
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .trim_matches('/');
    let mut segments = path.split('/');

    let owner = segments.next().unwrap_or("");
    let raw_name = segments.next().unwrap_or("");
    let name = raw_name.strip_suffix(".git").unwrap_or(raw_name);

    if owner.is_empty() || name.is_empty() {
        return Err(InputError::MissingSegments {
            url: url.to_string(),
        });
    }

    Ok(RepoId {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_repo_url() {
        let id = parse_github_url("https://github.com/rust-lang/cargo").unwrap();
        assert_eq!(id.owner, "rust-lang");
        assert_eq!(id.name, "cargo");
        assert_eq!(id.clone_url(), "https://github.com/rust-lang/cargo.git");
    }

    #[test]
    fn strips_dot_git_suffix() {
        let id = parse_github_url("https://github.com/rust-lang/cargo.git").unwrap();
        assert_eq!(id.name, "cargo");
    }

    #[test]
    fn accepts_www_host_and_extra_segments() {
        let id = parse_github_url("https://www.github.com/rust-lang/cargo/tree/master/src").unwrap();
        assert_eq!(id.to_string(), "rust-lang/cargo");
    }

    #[test]
    fn accepts_trailing_slash_and_query() {
        let id = parse_github_url("https://github.com/rust-lang/cargo/?tab=readme").unwrap();
        assert_eq!(id.name, "cargo");
    }

    #[test]
    fn rejects_non_github_hosts() {
        for url in [
            "https://gitlab.com/group/project",
            "https://example.com/a/b",
            "https://github.com.evil.com/a/b",
        ] {
            assert!(matches!(
                parse_github_url(url),
                Err(InputError::NotGitHub { .. })
            ));
        }
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(matches!(
            parse_github_url("git@github.com:rust-lang/cargo.git"),
            Err(InputError::NotGitHub { .. })
        ));
        assert!(matches!(
            parse_github_url("github.com/rust-lang/cargo"),
            Err(InputError::NotGitHub { .. })
        ));
    }

    #[test]
    fn rejects_missing_segments() {
        for url in [
            "https://github.com",
            "https://github.com/",
            "https://github.com/only-owner",
            "https://github.com/owner/.git",
        ] {
            assert!(matches!(
                parse_github_url(url),
                Err(InputError::MissingSegments { .. })
            ));
        }
    }
}
