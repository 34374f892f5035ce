//! Table-driven single-regex line checks.
//!
//! Several checks reduce to exactly one regex applied per non-comment
//! line: shell injection via interpolated exec calls, raw error-object
//! leakage into logging/response sinks, dynamic content in HTML sinks,
//! and falsy checks on optional numerics. They share one [`Check`]
//! implementation driven from a rule table, so adding another
//! single-pattern check is one table entry.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::lang::Language;

use super::{is_comment_line, relative_path, Check, CheckId, Violation};

const FIRST_PARTY: &[Language] = &[Language::TypeScript, Language::JavaScript];

lazy_static! {
    // exec(`...${...}...`) or execSync(`...${...}...`)
    static ref EXEC_TEMPLATE: Regex =
        Regex::new(r"\b(exec|execSync)\s*\(\s*`[^`]*\$\{").unwrap();
    // console.error(err) / res.send(err) with the bare object as the
    // sole argument.
    static ref RAW_ERROR: Regex = Regex::new(
        r"\b(console\.(error|log|warn)|res\.(send|json))\s*\(\s*(err|error|e)\s*\)"
    )
    .unwrap();
    static ref HTML_SINK: Regex = Regex::new(
        r"(\binnerHTML\s*=.*(\$\{|\+)|document\.write\s*\(.*(\$\{|\+))"
    )
    .unwrap();
    static ref FALSY_NUMERIC: Regex = Regex::new(
        r"(?i)(if\s*\(\s*!\s*[a-z_$][\w.]*(count|index|idx|amount|total|offset|size|port|limit)\b|\b[a-z_$][\w.]*(count|index|idx|amount|total|offset|size|port|limit)\s*\|\|)"
    )
    .unwrap();
}

/// One single-regex line check.
pub(crate) struct LineRule {
    id: CheckId,
    languages: &'static [Language],
    regex: &'static Regex,
    message: &'static str,
}

/// The rule table, in reporting order.
pub(crate) fn line_rules() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(LineRule {
            id: CheckId::ShellInjection,
            languages: FIRST_PARTY,
            regex: &EXEC_TEMPLATE,
            message: "exec invoked with an interpolated template literal; \
                      use execFile with an argument array",
        }),
        Box::new(LineRule {
            id: CheckId::RawErrorLeak,
            languages: FIRST_PARTY,
            regex: &RAW_ERROR,
            message: "raw error object logged; log err.message instead",
        }),
        Box::new(LineRule {
            id: CheckId::UnescapedHtml,
            languages: FIRST_PARTY,
            regex: &HTML_SINK,
            message: "dynamic content assigned to an HTML sink without escaping",
        }),
        Box::new(LineRule {
            id: CheckId::FalsyOptional,
            languages: FIRST_PARTY,
            regex: &FALSY_NUMERIC,
            message: "falsy check on an optional numeric conflates 0 with absent; \
                      use ?? or an explicit undefined comparison",
        }),
    ]
}

impl Check for LineRule {
    fn id(&self) -> CheckId {
        self.id
    }

    fn languages(&self) -> &'static [Language] {
        self.languages
    }

    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>> {
        let mut violations = Vec::new();

        for file in files {
            let content = match fs::read_to_string(file) {
                Ok(c) => c,
                Err(_) => continue,
            };
            let rel = relative_path(file, base);

            for (idx, line) in content.lines().enumerate() {
                if is_comment_line(line.trim_start()) {
                    continue;
                }
                if self.regex.is_match(line) {
                    violations.push(Violation {
                        file: rel.clone(),
                        line: idx + 1,
                        check: self.id,
                        message: self.message.to_string(),
                    });
                }
            }
        }

        Ok(violations)
    }
}
