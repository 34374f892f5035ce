//! Pattern check engine.
//!
//! Each check is a pure scan over a set of source files producing zero or
//! more violations. Checks implement the [`Check`] trait and register in
//! [`all_checks`], so new checks compose without touching dispatch logic.

mod circular;
mod proxy;
mod rules;
mod secrets;
mod traversal;
mod types;

pub use types::{CheckId, ScanResult, Violation};

use std::path::{Path, PathBuf};

use crate::lang::Language;

/// A pattern check: scan source files, return violations.
pub trait Check {
    /// Stable identifier reported on each violation.
    fn id(&self) -> CheckId;

    /// Languages this check applies to.
    fn languages(&self) -> &'static [Language];

    /// Scan the given source files. `base` is the target root, used to
    /// report paths relative to it.
    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>>;
}

/// The fixed check registry, security tier first.
pub fn all_checks() -> Vec<Box<dyn Check>> {
    let mut checks: Vec<Box<dyn Check>> = vec![
        Box::new(secrets::HardcodedSecrets),
        Box::new(traversal::PathTraversal),
        Box::new(circular::CircularImports),
    ];
    checks.extend(rules::line_rules());
    checks.extend(proxy::proxy_checks());
    checks
}

/// Run every applicable check for one language over its source files.
pub fn run_checks(
    lang: Language,
    files: &[PathBuf],
    base: &Path,
) -> anyhow::Result<ScanResult> {
    let mut result = ScanResult::new();
    result.scanned = files.len();

    for check in all_checks() {
        if !check.languages().contains(&lang) {
            continue;
        }
        let violations = check.scan(files, base)?;
        result.violations.extend(violations);
    }

    Ok(result)
}

/// Report a path relative to the scan base when possible.
pub(crate) fn relative_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// True if a trimmed line is a comment in any supported language.
pub(crate) fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with('#') || trimmed.starts_with('*')
}
