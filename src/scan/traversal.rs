//! Detection of path traversal from user-controlled input.
//!
//! Flags path-join/resolve calls whose arguments reference request-like
//! identifiers, unless a guard appears in the preceding few lines. This
//! is a heuristic lookback window, not a data-flow analysis.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::lang::{Language, ALL_LANGUAGES};

use super::{is_comment_line, relative_path, Check, CheckId, Violation};

/// How many preceding lines are searched for guard vocabulary.
const GUARD_WINDOW: usize = 5;

lazy_static! {
    static ref PATH_JOIN: Regex = Regex::new(
        r"\b(path\.(join|resolve)|os\.path\.join|filepath\.Join|Path::new|PathBuf::from)\s*\("
    )
    .unwrap();
    static ref USER_INPUT: Regex = Regex::new(
        r"\b(req\.|request\.|params|query|body|input|user[A-Z_][a-zA-Z_]*)\b|\buser\b"
    )
    .unwrap();
    static ref GUARD: Regex = Regex::new(
        r#"(?i)sanitiz|normaliz|\.\.|startsWith|starts_with|HasPrefix"#
    )
    .unwrap();
}

/// Scanner for unguarded path joins on request-like values.
pub struct PathTraversal;

impl Check for PathTraversal {
    fn id(&self) -> CheckId {
        CheckId::PathTraversal
    }

    fn languages(&self) -> &'static [Language] {
        ALL_LANGUAGES
    }

    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>> {
        let mut violations = Vec::new();

        for file in files {
            let content = match fs::read_to_string(file) {
                Ok(c) => c,
                Err(_) => continue,
            };
            let rel = relative_path(file, base);
            let lines: Vec<&str> = content.lines().collect();

            for (idx, line) in lines.iter().enumerate() {
                let trimmed = line.trim_start();
                if is_comment_line(trimmed) {
                    continue;
                }
                let Some(m) = PATH_JOIN.find(line) else {
                    continue;
                };
                // Only the call's argument list matters for taint.
                let args = &line[m.end()..];
                if !USER_INPUT.is_match(args) {
                    continue;
                }
                let window_start = idx.saturating_sub(GUARD_WINDOW);
                let guarded = lines[window_start..idx]
                    .iter()
                    .any(|prev| GUARD.is_match(prev));
                if guarded {
                    continue;
                }
                violations.push(Violation {
                    file: rel.clone(),
                    line: idx + 1,
                    check: CheckId::PathTraversal,
                    message: "path constructed from request input without a traversal guard"
                        .to_string(),
                });
            }
        }

        Ok(violations)
    }
}
