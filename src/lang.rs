//! Supported source languages.
//!
//! Each language maps to a set of file extensions and a test-file naming
//! convention. The declaration order of the enum is the detection order,
//! so scans are deterministic across runs.

use serde::{Deserialize, Serialize};

/// A supported source language family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Go,
    Rust,
}

/// All languages in fixed detection order.
pub const ALL_LANGUAGES: &[Language] = &[
    Language::TypeScript,
    Language::JavaScript,
    Language::Python,
    Language::Go,
    Language::Rust,
];

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
        }
    }

    /// File extensions (with leading dot) belonging to this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &[".ts", ".tsx"],
            Language::JavaScript => &[".js", ".jsx", ".mjs", ".cjs"],
            Language::Python => &[".py"],
            Language::Go => &[".go"],
            Language::Rust => &[".rs"],
        }
    }

    /// Test-file naming markers. A file whose name contains any of these
    /// is treated as a test file and excluded from source-only scans.
    pub fn test_markers(&self) -> &'static [&'static str] {
        match self {
            Language::TypeScript | Language::JavaScript => &[".test.", ".spec."],
            Language::Python => &["test_", "_test."],
            Language::Go => &["_test."],
            Language::Rust => &["_test.", "tests.rs"],
        }
    }

    /// Whether a file name matches this language's extensions.
    pub fn matches_file(&self, name: &str) -> bool {
        self.extensions().iter().any(|ext| name.ends_with(ext))
    }

    /// Whether a file name matches this language's test conventions.
    /// Prefix markers (`test_`) anchor at the start; the rest match anywhere.
    pub fn is_test_file(&self, name: &str) -> bool {
        self.test_markers().iter().any(|m| {
            if m.ends_with('_') {
                name.starts_with(m)
            } else {
                name.contains(m)
            }
        })
    }

    /// The Semgrep ruleset identifier for shared-mode linting, or `None`
    /// for the first-party family (routed to ESLint instead).
    pub fn semgrep_ruleset(&self) -> Option<&'static str> {
        match self {
            Language::TypeScript | Language::JavaScript => None,
            Language::Python => Some("p/python"),
            Language::Go => Some("p/golang"),
            Language::Rust => Some("p/rust"),
        }
    }

    /// The first-party family gets the full proxy-check tier.
    pub fn is_first_party(&self) -> bool {
        matches!(self, Language::TypeScript | Language::JavaScript)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matching() {
        assert!(Language::TypeScript.matches_file("api.ts"));
        assert!(Language::TypeScript.matches_file("view.tsx"));
        assert!(!Language::TypeScript.matches_file("api.js"));
        assert!(Language::Go.matches_file("main.go"));
    }

    #[test]
    fn test_test_file_conventions() {
        assert!(Language::TypeScript.is_test_file("api.test.ts"));
        assert!(Language::TypeScript.is_test_file("api.spec.ts"));
        assert!(!Language::TypeScript.is_test_file("api.ts"));
        assert!(Language::Go.is_test_file("main_test.go"));
        assert!(Language::Python.is_test_file("test_api.py"));
        assert!(!Language::Python.is_test_file("api.py"));
    }

    #[test]
    fn test_detection_order_is_fixed() {
        let names: Vec<&str> = ALL_LANGUAGES.iter().map(|l| l.as_str()).collect();
        assert_eq!(
            names,
            vec!["typescript", "javascript", "python", "go", "rust"]
        );
    }
}
