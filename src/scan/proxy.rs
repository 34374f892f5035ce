//! Second-tier proxy checks for the first-party language family.
//!
//! These are the structural heuristics that need more than a single
//! regex per line (naming, size, test presence, magic literals, TOCTOU
//! windows, restating-the-obvious comments); the single-pattern tier
//! lives in the `rules` table. They only run for TypeScript and
//! JavaScript, where a parser-free regex approach stays accurate enough
//! to be worth the complexity.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::lang::Language;

use super::{is_comment_line, relative_path, Check, CheckId, Violation};

const FIRST_PARTY: &[Language] = &[Language::TypeScript, Language::JavaScript];

/// Size limits for the oversized-unit check.
const MAX_FILE_LINES: usize = 400;
const MAX_FUNCTION_LINES: usize = 60;
const MAX_PARAMS: usize = 5;

/// All proxy-tier checks, in reporting order.
pub fn proxy_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(NamingConvention),
        Box::new(OversizedUnit),
        Box::new(MissingTestFile),
        Box::new(MagicLiteral),
        Box::new(ToctouRace),
        Box::new(ObviousComment),
    ]
}

fn read_lines(file: &Path) -> Option<Vec<String>> {
    let content = fs::read_to_string(file).ok()?;
    Some(content.lines().map(|l| l.to_string()).collect())
}

// ---------------------------------------------------------------------------
// Naming conventions
// ---------------------------------------------------------------------------

lazy_static! {
    static ref FUNCTION_DECL: Regex =
        Regex::new(r"\bfunction\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap();
    static ref TYPE_DECL: Regex =
        Regex::new(r"\b(?:class|interface|type|enum)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

fn is_camel_case(name: &str) -> bool {
    !name.contains('_') && name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

fn is_pascal_case(name: &str) -> bool {
    !name.contains('_') && name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Functions should be camelCase, types PascalCase.
pub struct NamingConvention;

impl Check for NamingConvention {
    fn id(&self) -> CheckId {
        CheckId::NamingConvention
    }

    fn languages(&self) -> &'static [Language] {
        FIRST_PARTY
    }

    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for file in files {
            let Some(lines) = read_lines(file) else {
                continue;
            };
            let rel = relative_path(file, base);
            for (idx, line) in lines.iter().enumerate() {
                if is_comment_line(line.trim_start()) {
                    continue;
                }
                if let Some(caps) = FUNCTION_DECL.captures(line) {
                    let name = &caps[1];
                    if !is_camel_case(name) {
                        violations.push(Violation {
                            file: rel.clone(),
                            line: idx + 1,
                            check: CheckId::NamingConvention,
                            message: format!("function {:?} is not camelCase", name),
                        });
                    }
                }
                if let Some(caps) = TYPE_DECL.captures(line) {
                    let name = &caps[1];
                    if !is_pascal_case(name) {
                        violations.push(Violation {
                            file: rel.clone(),
                            line: idx + 1,
                            check: CheckId::NamingConvention,
                            message: format!("type {:?} is not PascalCase", name),
                        });
                    }
                }
            }
        }
        Ok(violations)
    }
}

// ---------------------------------------------------------------------------
// Oversized files / functions / parameter lists
// ---------------------------------------------------------------------------

lazy_static! {
    static ref FUNCTION_START: Regex = Regex::new(
        r"\b(?:function\s+[A-Za-z_][A-Za-z0-9_]*|(?:const|let)\s+[A-Za-z_][A-Za-z0-9_]*\s*=\s*(?:async\s*)?\()"
    )
    .unwrap();
}

fn brace_delta(line: &str) -> i32 {
    let mut delta = 0;
    for ch in line.chars() {
        match ch {
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

fn count_params(line: &str) -> usize {
    let Some(open) = line.find('(') else { return 0 };
    let close = line[open..].find(')').map(|i| open + i).unwrap_or(line.len());
    let inner = line[open + 1..close].trim();
    if inner.is_empty() {
        0
    } else {
        inner.matches(',').count() + 1
    }
}

/// Oversized files, functions, and parameter lists.
pub struct OversizedUnit;

impl Check for OversizedUnit {
    fn id(&self) -> CheckId {
        CheckId::OversizedUnit
    }

    fn languages(&self) -> &'static [Language] {
        FIRST_PARTY
    }

    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for file in files {
            let Some(lines) = read_lines(file) else {
                continue;
            };
            let rel = relative_path(file, base);

            if lines.len() > MAX_FILE_LINES {
                violations.push(Violation {
                    file: rel.clone(),
                    line: 0,
                    check: CheckId::OversizedUnit,
                    message: format!("file has {} lines (max {})", lines.len(), MAX_FILE_LINES),
                });
            }

            for (idx, line) in lines.iter().enumerate() {
                if !FUNCTION_START.is_match(line) || is_comment_line(line.trim_start()) {
                    continue;
                }

                let params = count_params(line);
                if params > MAX_PARAMS {
                    violations.push(Violation {
                        file: rel.clone(),
                        line: idx + 1,
                        check: CheckId::OversizedUnit,
                        message: format!("{} parameters (max {})", params, MAX_PARAMS),
                    });
                }

                // Measure body length by brace balance from the opening line.
                if !line.contains('{') {
                    continue;
                }
                let mut depth = 0i32;
                let mut length = 0usize;
                for body_line in &lines[idx..] {
                    depth += brace_delta(body_line);
                    length += 1;
                    if depth <= 0 {
                        break;
                    }
                }
                if length > MAX_FUNCTION_LINES {
                    violations.push(Violation {
                        file: rel.clone(),
                        line: idx + 1,
                        check: CheckId::OversizedUnit,
                        message: format!(
                            "function body spans {} lines (max {})",
                            length, MAX_FUNCTION_LINES
                        ),
                    });
                }
            }
        }
        Ok(violations)
    }
}

// ---------------------------------------------------------------------------
// Missing test files
// ---------------------------------------------------------------------------

/// Every source file should have a sibling test file.
pub struct MissingTestFile;

impl Check for MissingTestFile {
    fn id(&self) -> CheckId {
        CheckId::MissingTestFile
    }

    fn languages(&self) -> &'static [Language] {
        FIRST_PARTY
    }

    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for file in files {
            let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(ext) = file.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            // index files and type declaration files get a pass
            if stem == "index" || stem.ends_with(".d") {
                continue;
            }
            let dir = file.parent().unwrap_or(base);
            let candidates = [
                dir.join(format!("{}.test.{}", stem, ext)),
                dir.join(format!("{}.spec.{}", stem, ext)),
                dir.join("__tests__").join(format!("{}.test.{}", stem, ext)),
            ];
            if candidates.iter().any(|c| c.exists()) {
                continue;
            }
            violations.push(Violation {
                file: relative_path(file, base),
                line: 0,
                check: CheckId::MissingTestFile,
                message: format!("no test file found for {}.{}", stem, ext),
            });
        }
        Ok(violations)
    }
}

// ---------------------------------------------------------------------------
// Magic literals
// ---------------------------------------------------------------------------

lazy_static! {
    static ref NUMERIC_LITERAL: Regex = Regex::new(r"[^\w.'\x22](\d{2,})\b").unwrap();
}

/// Values that read fine inline.
const ALLOWED_LITERALS: &[&str] = &["10", "100", "1000", "24", "60"];

/// Bare numeric literals outside const declarations.
pub struct MagicLiteral;

impl Check for MagicLiteral {
    fn id(&self) -> CheckId {
        CheckId::MagicLiteral
    }

    fn languages(&self) -> &'static [Language] {
        FIRST_PARTY
    }

    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for file in files {
            let Some(lines) = read_lines(file) else {
                continue;
            };
            let rel = relative_path(file, base);
            for (idx, line) in lines.iter().enumerate() {
                let trimmed = line.trim_start();
                if is_comment_line(trimmed)
                    || trimmed.starts_with("const ")
                    || trimmed.starts_with("enum ")
                    || trimmed.starts_with("export const ")
                {
                    continue;
                }
                for caps in NUMERIC_LITERAL.captures_iter(line) {
                    let lit = &caps[1];
                    if ALLOWED_LITERALS.contains(&lit) {
                        continue;
                    }
                    violations.push(Violation {
                        file: rel.clone(),
                        line: idx + 1,
                        check: CheckId::MagicLiteral,
                        message: format!("magic literal {}; name it as a const", lit),
                    });
                }
            }
        }
        Ok(violations)
    }
}

// ---------------------------------------------------------------------------
// TOCTOU races
// ---------------------------------------------------------------------------

/// How many following lines form the race window after an existence check.
const TOCTOU_WINDOW: usize = 5;

lazy_static! {
    static ref EXISTS_CHECK: Regex = Regex::new(r"\bexistsSync\s*\(").unwrap();
    static ref FS_USE: Regex =
        Regex::new(r"\b(readFileSync|writeFileSync|unlinkSync|renameSync|rmSync)\s*\(").unwrap();
}

/// Check-then-use on the filesystem within a short window.
pub struct ToctouRace;

impl Check for ToctouRace {
    fn id(&self) -> CheckId {
        CheckId::ToctouRace
    }

    fn languages(&self) -> &'static [Language] {
        FIRST_PARTY
    }

    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for file in files {
            let Some(lines) = read_lines(file) else {
                continue;
            };
            let rel = relative_path(file, base);
            for (idx, line) in lines.iter().enumerate() {
                if !EXISTS_CHECK.is_match(line) {
                    continue;
                }
                let window_end = (idx + 1 + TOCTOU_WINDOW).min(lines.len());
                if lines[idx + 1..window_end].iter().any(|l| FS_USE.is_match(l)) {
                    violations.push(Violation {
                        file: rel.clone(),
                        line: idx + 1,
                        check: CheckId::ToctouRace,
                        message: "existence check followed by use races the filesystem; \
                                  handle the error from the operation instead"
                            .to_string(),
                    });
                }
            }
        }
        Ok(violations)
    }
}

// ---------------------------------------------------------------------------
// Restating-the-obvious comments
// ---------------------------------------------------------------------------

lazy_static! {
    static ref OBVIOUS_OPENER: Regex = Regex::new(
        r"(?i)^//\s*(set|sets|get|gets|return|returns|increment|decrement|loop|call|calls|create|creates|initialize|init)\b"
    )
    .unwrap();
}

/// Comments that restate the line below them.
pub struct ObviousComment;

impl Check for ObviousComment {
    fn id(&self) -> CheckId {
        CheckId::ObviousComment
    }

    fn languages(&self) -> &'static [Language] {
        FIRST_PARTY
    }

    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for file in files {
            let Some(lines) = read_lines(file) else {
                continue;
            };
            let rel = relative_path(file, base);
            for (idx, line) in lines.iter().enumerate() {
                let trimmed = line.trim_start();
                if !OBVIOUS_OPENER.is_match(trimmed) {
                    continue;
                }
                let Some(next) = lines.get(idx + 1) else {
                    continue;
                };
                let next_lower = next.to_lowercase();
                // Restating iff a meaningful comment word reappears in the code.
                let restates = trimmed
                    .trim_start_matches('/')
                    .split_whitespace()
                    .filter(|w| w.len() >= 4)
                    .any(|w| next_lower.contains(&w.to_lowercase()));
                if restates {
                    violations.push(Violation {
                        file: rel.clone(),
                        line: idx + 1,
                        check: CheckId::ObviousComment,
                        message: "comment restates the code below it".to_string(),
                    });
                }
            }
        }
        Ok(violations)
    }
}
