//! Repository reference parsing.
//!
//! Extracts an `(owner, name)` pair from free text containing a hosting URL:
//! - HTTPS: `https://github.com/acme/widget.git`
//! - Path suffixes: `https://github.com/acme/widget/tree/main/src`
//! - SSH: `git@github.com:acme/widget.git`
//! - Scheme-less: `github.com/acme/widget`
//!
//! Parsing never fails loudly: anything that does not yield a pair is `None`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Default host used when building canonical URLs.
pub const DEFAULT_HOST: &str = "github.com";

/// Locates the first URL-looking token inside arbitrary text.
#[expect(
    clippy::expect_used,
    reason = "Regex literal is compile-time constant and cannot fail"
)]
static URL_TOKEN_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?:https?://[^\s<>()\[\]'`]+|git@[^\s<>()\[\]'`]+|[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+/[^\s<>()\[\]'`]+)",
    )
    .expect("URL_TOKEN_REGEX is a valid regex literal")
});

/// A remote repository identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// The owning user or organization (first path segment)
    pub owner: String,
    /// The repository name (second path segment, without .git)
    pub name: String,
}

impl RepoRef {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Canonical HTTPS URL on the default host.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        self.url_on(DEFAULT_HOST)
    }

    /// Canonical HTTPS URL on a specific host.
    #[must_use]
    pub fn url_on(&self, host: &str) -> String {
        format!("https://{host}/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse the first repository reference found in `text`.
///
/// Returns `None` when no owner/repo pair can be extracted. Callers treat
/// `None` as "not a trackable reference".
#[must_use]
pub fn parse_reference(text: &str) -> Option<RepoRef> {
    let token = URL_TOKEN_REGEX.find(text.trim())?.as_str();
    let token = token.trim_end_matches(['.', ',', ';', ':', '!', '?']);

    if let Some(ssh_part) = token.strip_prefix("git@") {
        let (_host, path) = ssh_part.split_once(':')?;
        return parse_path_segments(path);
    }

    let without_scheme = token
        .strip_prefix("https://")
        .or_else(|| token.strip_prefix("http://"))
        .unwrap_or(token);
    let (_host, path) = without_scheme.split_once('/')?;
    parse_path_segments(path)
}

fn parse_path_segments(path: &str) -> Option<RepoRef> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let mut parts = path.split('/').filter(|s| !s.is_empty());
    let owner = parts.next()?;
    let repo = parts.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if !is_valid_segment(owner) || !is_valid_segment(repo) {
        return None;
    }
    Some(RepoRef::new(owner, repo))
}

/// Whether `segment` can stand as an owner or repository name in a URL path.
pub(crate) fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
