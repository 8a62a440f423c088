// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fixed catalog of supported social platforms.
//!
//! Used for link validation and icon lookup only; nothing here is persisted.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A known social platform.
#[derive(Debug)]
pub struct Platform {
    pub name: &'static str,
    /// Iconify icon name
    pub icon: &'static str,
    pattern: Regex,
}

impl Platform {
    fn new(name: &'static str, icon: &'static str, host: &str) -> Self {
        let pattern = format!(r"https://(www\.)?{}/.+", regex::escape(host));
        Self {
            name,
            icon,
            pattern: Regex::new(&pattern).expect("platform pattern must compile"),
        }
    }

    /// Whether `url` looks like a profile URL on this platform.
    ///
    /// Unanchored: the pattern may appear anywhere in the URL.
    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn summary(&self) -> PlatformSummary {
        PlatformSummary {
            name: self.name.to_string(),
            icon: self.icon.to_string(),
            pattern: self.pattern().to_string(),
        }
    }
}

static PLATFORMS: LazyLock<Vec<Platform>> = LazyLock::new(|| {
    vec![
        Platform::new("GitHub", "mdi:github", "github.com"),
        Platform::new("Facebook", "mdi:facebook", "facebook.com"),
        Platform::new("Twitter", "mdi:twitter", "twitter.com"),
        Platform::new("Codewars", "mdi:codepen", "codewars.com"),
        Platform::new("StackOverflow", "mdi:stack-overflow", "stackoverflow.com"),
        Platform::new("Instagram", "mdi:instagram", "instagram.com"),
        Platform::new("YouTube", "mdi:youtube", "youtube.com"),
        Platform::new("GitLab", "mdi:gitlab", "gitlab.com"),
        Platform::new("Dev", "mdi:dev-to", "dev.to"),
    ]
});

/// All platforms, in display order.
pub fn all() -> &'static [Platform] {
    &PLATFORMS
}

/// Look up a platform by its exact display name.
pub fn find(name: &str) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|p| p.name == name)
}

/// Platform entry for API responses.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlatformSummary {
    pub name: String,
    pub icon: String,
    pub pattern: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_nine_platforms() {
        let names: Vec<_> = all().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            [
                "GitHub",
                "Facebook",
                "Twitter",
                "Codewars",
                "StackOverflow",
                "Instagram",
                "YouTube",
                "GitLab",
                "Dev"
            ]
        );
    }

    #[test]
    fn test_github_pattern() {
        let github = find("GitHub").unwrap();
        assert!(github.matches("https://github.com/octocat"));
        assert!(github.matches("https://www.github.com/octocat"));
        assert!(!github.matches("https://example.com"));
        assert!(!github.matches("https://github.com/"));
        assert!(!github.matches("http://github.com/octocat"));
    }

    #[test]
    fn test_dot_is_literal() {
        let dev = find("Dev").unwrap();
        assert!(dev.matches("https://dev.to/someone"));
        assert!(!dev.matches("https://devxto/someone"));
    }

    #[test]
    fn test_unknown_platform() {
        assert!(find("MySpace").is_none());
        assert!(find("github").is_none());
    }
}
