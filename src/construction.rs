//! Construction validator.
//!
//! Parses a fixed-format directive block from a plan document and checks
//! each directive against the filesystem: required files must exist and
//! required exports must be declared in the named file. A single missing
//! directive fails the whole check; an unparseable directive line fails
//! fast before any checking happens.

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

/// A single plan directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    File(String),
    ExportFunction { name: String, file: String },
    ExportType { name: String, file: String },
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::File(path) => write!(f, "FILE: {}", path),
            Directive::ExportFunction { name, file } => {
                write!(f, "EXPORT_FUNCTION: {} IN {}", name, file)
            }
            Directive::ExportType { name, file } => {
                write!(f, "EXPORT_TYPE: {} IN {}", name, file)
            }
        }
    }
}

/// One directive's verification outcome.
#[derive(Debug, Clone)]
pub struct ConstructionCheck {
    pub directive: Directive,
    pub satisfied: bool,
    pub detail: String,
}

lazy_static! {
    static ref EXPORT_IN: Regex = Regex::new(r"^(\S+)\s+IN\s+(\S+)$").unwrap();
}

/// Parse every directive line from a plan document. Lines that do not
/// start with a directive keyword are prose and skipped; a line that
/// starts with one but does not parse is a hard error.
pub fn parse_plan(content: &str) -> anyhow::Result<Vec<Directive>> {
    let mut directives = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        let directive = if let Some(rest) = trimmed.strip_prefix("FILE:") {
            let path = rest.trim();
            if path.is_empty() {
                anyhow::bail!("line {}: FILE directive missing a path", idx + 1);
            }
            Directive::File(path.to_string())
        } else if let Some(rest) = trimmed.strip_prefix("EXPORT_FUNCTION:") {
            let caps = EXPORT_IN.captures(rest.trim()).with_context(|| {
                format!("line {}: expected EXPORT_FUNCTION: <name> IN <file>", idx + 1)
            })?;
            Directive::ExportFunction {
                name: caps[1].to_string(),
                file: caps[2].to_string(),
            }
        } else if let Some(rest) = trimmed.strip_prefix("EXPORT_TYPE:") {
            let caps = EXPORT_IN.captures(rest.trim()).with_context(|| {
                format!("line {}: expected EXPORT_TYPE: <name> IN <file>", idx + 1)
            })?;
            Directive::ExportType {
                name: caps[1].to_string(),
                file: caps[2].to_string(),
            }
        } else {
            continue;
        };
        directives.push(directive);
    }

    Ok(directives)
}

fn export_function_regex(name: &str) -> Regex {
    // export function name( | export const name = | export default function name(
    Regex::new(&format!(
        r"export\s+(default\s+)?(async\s+)?(function\s+{n}\s*\(|const\s+{n}\s*=)",
        n = regex::escape(name)
    ))
    .unwrap_or_else(|_| Regex::new("$^").unwrap())
}

fn export_type_regex(name: &str) -> Regex {
    Regex::new(&format!(
        r"export\s+(declare\s+)?(abstract\s+)?(class|interface|type|enum)\s+{}\b",
        regex::escape(name)
    ))
    .unwrap_or_else(|_| Regex::new("$^").unwrap())
}

fn check_export(project: &Path, file: &str, regex: &Regex) -> (bool, String) {
    let path = project.join(file);
    if !path.exists() {
        return (false, format!("{} does not exist", file));
    }
    match fs::read_to_string(&path) {
        Ok(content) if content.lines().any(|l| regex.is_match(l)) => {
            (true, "declared".to_string())
        }
        Ok(_) => (false, format!("no matching export declaration in {}", file)),
        Err(e) => (false, format!("cannot read {}: {}", file, e)),
    }
}

/// Verify every directive against the project directory.
pub fn validate_construction(
    plan_path: &Path,
    project: &Path,
) -> anyhow::Result<Vec<ConstructionCheck>> {
    let content = fs::read_to_string(plan_path)
        .with_context(|| format!("reading plan {}", plan_path.display()))?;
    let directives = parse_plan(&content)?;

    let mut checks = Vec::new();
    for directive in directives {
        let (satisfied, detail) = match &directive {
            Directive::File(file) => {
                let path = project.join(file);
                if path.is_file() {
                    (true, "exists".to_string())
                } else {
                    (false, format!("{} does not exist", file))
                }
            }
            Directive::ExportFunction { name, file } => {
                check_export(project, file, &export_function_regex(name))
            }
            Directive::ExportType { name, file } => {
                check_export(project, file, &export_type_regex(name))
            }
        };
        checks.push(ConstructionCheck {
            directive,
            satisfied,
            detail,
        });
    }

    Ok(checks)
}
