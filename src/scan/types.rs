//! Core types for pattern-check results.

use serde::{Deserialize, Serialize};

/// Identifiers for the pattern and proxy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckId {
    #[serde(rename = "hardcoded-secret")]
    HardcodedSecret,
    #[serde(rename = "shell-injection")]
    ShellInjection,
    #[serde(rename = "path-traversal")]
    PathTraversal,
    #[serde(rename = "circular-import")]
    CircularImport,
    #[serde(rename = "raw-error-leak")]
    RawErrorLeak,
    // Proxy tier (first-party family only)
    #[serde(rename = "naming-convention")]
    NamingConvention,
    #[serde(rename = "oversized-unit")]
    OversizedUnit,
    #[serde(rename = "missing-test-file")]
    MissingTestFile,
    #[serde(rename = "magic-literal")]
    MagicLiteral,
    #[serde(rename = "toctou-race")]
    ToctouRace,
    #[serde(rename = "unescaped-html")]
    UnescapedHtml,
    #[serde(rename = "falsy-optional")]
    FalsyOptional,
    #[serde(rename = "obvious-comment")]
    ObviousComment,
}

impl CheckId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckId::HardcodedSecret => "hardcoded-secret",
            CheckId::ShellInjection => "shell-injection",
            CheckId::PathTraversal => "path-traversal",
            CheckId::CircularImport => "circular-import",
            CheckId::RawErrorLeak => "raw-error-leak",
            CheckId::NamingConvention => "naming-convention",
            CheckId::OversizedUnit => "oversized-unit",
            CheckId::MissingTestFile => "missing-test-file",
            CheckId::MagicLiteral => "magic-literal",
            CheckId::ToctouRace => "toctou-race",
            CheckId::UnescapedHtml => "unescaped-html",
            CheckId::FalsyOptional => "falsy-optional",
            CheckId::ObviousComment => "obvious-comment",
        }
    }
}

impl std::fmt::Display for CheckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected issue. Line 0 means file-level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub file: String,
    pub line: usize,
    pub check: CheckId,
    pub message: String,
}

/// Accumulated output of a scan pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub violations: Vec<Violation>,
    /// Number of files scanned.
    pub scanned: usize,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ScanResult) {
        self.violations.extend(other.violations);
        self.scanned += other.scanned;
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}
