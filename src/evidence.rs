//! Evidence validator.
//!
//! Review phases leave behind Markdown checklists asserting a verdict per
//! reviewed location. This module cross-checks those checklists against
//! mechanical counts derived from the codebase: a reviewer who claims to
//! have audited every export must produce at least as many rows as there
//! are exports. Checklists with no known counter are reported but never
//! fail the check.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::collect::collect_source_files;
use crate::config::Config;
use crate::lang::{Language, ALL_LANGUAGES};
use crate::state::RunSession;

/// One parsed checklist row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceRow {
    pub location: String,
    pub item: String,
    pub verdict: String,
    pub reasoning: String,
}

/// A parsed checklist file.
#[derive(Debug, Clone)]
pub struct Checklist {
    /// Derived from the filename: `<phase>-<id>.md` -> `<id>`. Phase
    /// names may themselves contain dashes; see [`split_stem`].
    pub id: String,
    pub phase: String,
    pub path: PathBuf,
    pub rows: Vec<EvidenceRow>,
}

/// Validation outcome for one checklist.
#[derive(Debug, Clone)]
pub struct ChecklistReport {
    pub id: String,
    pub observed: usize,
    /// `None` when no counter is known for this id.
    pub expected: Option<usize>,
}

impl ChecklistReport {
    pub fn passed(&self) -> bool {
        match self.expected {
            Some(expected) => self.observed >= expected,
            None => true,
        }
    }
}

static SOURCE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w./-]+\.(ts|tsx|js|jsx|mjs|cjs|py|go|rs)(:\d+)?\b").unwrap());
static EXPORT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*export\s+(default\s+)?(async\s+)?(function|const|let|class|interface|type|enum)\b",
    )
    .unwrap()
});
static CATCH_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcatch\b\s*[({]").unwrap());
static LOG_OR_THROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"console\.(log|error|warn|info)\s*\(|\bthrow\s").unwrap());
static IO_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(fs\.\w+|readFileSync|writeFileSync|createReadStream|createWriteStream|fetch|axios\.\w+)\s*\(",
    )
    .unwrap()
});

/// Parse all pipe-table rows that reference a source path.
pub fn parse_rows(content: &str) -> Vec<EvidenceRow> {
    let mut rows = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if !trimmed.starts_with('|') {
            continue;
        }
        // Separator rows are all dashes and pipes.
        if trimmed.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ')) {
            continue;
        }
        let cells: Vec<&str> = trimmed
            .trim_matches('|')
            .split('|')
            .map(|c| c.trim())
            .collect();
        if cells.len() < 3 {
            continue;
        }
        if !SOURCE_PATH.is_match(cells[0]) {
            continue;
        }
        rows.push(EvidenceRow {
            location: cells[0].to_string(),
            item: cells[1].to_string(),
            verdict: cells[2].to_string(),
            reasoning: cells.get(3).unwrap_or(&"").to_string(),
        });
    }
    rows
}

/// Load every checklist for one phase from the evidence directory.
pub fn load_phase_checklists(session: &RunSession, phase: &str) -> anyhow::Result<Vec<Checklist>> {
    load_checklists(session, Some(phase))
}

/// Load every checklist regardless of phase.
pub fn load_all_checklists(session: &RunSession) -> anyhow::Result<Vec<Checklist>> {
    load_checklists(session, None)
}

fn load_checklists(session: &RunSession, phase: Option<&str>) -> anyhow::Result<Vec<Checklist>> {
    let dir = session.evidence_dir();
    let mut checklists = Vec::new();
    if !dir.exists() {
        return Ok(checklists);
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|e| e == "md").unwrap_or(false))
        .collect();
    entries.sort();

    for path in entries {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        // The reconciler's own output is not reviewer evidence.
        if name == "vote-disagreements" {
            continue;
        }
        let Some((file_phase, id)) = split_stem(&name, phase) else {
            continue;
        };
        let content = fs::read_to_string(&path)?;
        checklists.push(Checklist {
            id: id.to_string(),
            phase: file_phase.to_string(),
            path,
            rows: parse_rows(&content),
        });
    }

    Ok(checklists)
}

/// Checklist ids with a known mechanical counter.
const COUNTER_IDS: &[&str] = &["error-handling", "exports", "logging", "io"];

/// Split a checklist stem into `(phase, id)`. Phase names may contain
/// dashes, so `pre-review-exports` is ambiguous on its own: with a phase
/// filter the phase is matched as an exact prefix; without one, a known
/// counter id is matched as the suffix first, and only then does the
/// last dash split.
fn split_stem<'a>(stem: &'a str, phase: Option<&'a str>) -> Option<(&'a str, &'a str)> {
    if let Some(wanted) = phase {
        let id = stem.strip_prefix(wanted)?.strip_prefix('-')?;
        return Some((wanted, id));
    }
    for &id in COUNTER_IDS {
        if let Some(p) = stem.strip_suffix(id).and_then(|p| p.strip_suffix('-')) {
            if !p.is_empty() {
                return Some((p, id));
            }
        }
    }
    stem.rsplit_once('-')
}

/// Count occurrences of a regex across all source files of the target.
fn count_matches(target: &Path, config: &Config, regex: &Regex) -> usize {
    let mut count = 0;
    for &lang in ALL_LANGUAGES {
        for file in collect_source_files(target, lang, config) {
            let Ok(content) = fs::read_to_string(&file) else {
                continue;
            };
            for line in content.lines() {
                count += regex.find_iter(line).count();
            }
        }
    }
    count
}

fn count_exports(target: &Path, config: &Config) -> usize {
    let mut count = 0;
    for lang in [Language::TypeScript, Language::JavaScript] {
        for file in collect_source_files(target, lang, config) {
            let Ok(content) = fs::read_to_string(&file) else {
                continue;
            };
            count += content
                .lines()
                .filter(|l| EXPORT_DECL.is_match(l))
                .count();
        }
    }
    count
}

/// Expected row count for a checklist id, when the id has a known meaning.
pub fn expected_count(id: &str, target: &Path, config: &Config) -> Option<usize> {
    match id {
        "exports" => Some(count_exports(target, config)),
        "error-handling" => Some(count_matches(target, config, &CATCH_BLOCK)),
        "logging" => Some(count_matches(target, config, &LOG_OR_THROW)),
        "io" => Some(count_matches(target, config, &IO_ENTRY)),
        _ => None,
    }
}

/// Validate every checklist of one phase against mechanical counts.
pub fn validate_evidence(
    session: &RunSession,
    phase: &str,
    config: &Config,
) -> anyhow::Result<Vec<ChecklistReport>> {
    let checklists = load_phase_checklists(session, phase)?;
    let mut reports = Vec::new();

    for checklist in checklists {
        let expected = expected_count(&checklist.id, session.target(), config);
        reports.push(ChecklistReport {
            id: checklist.id,
            observed: checklist.rows.len(),
            expected,
        });
    }

    Ok(reports)
}
