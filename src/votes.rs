//! Vote reconciler.
//!
//! Compares verdicts for the same location across independently produced
//! evidence checklists. The reconciler never decides who is right; it
//! only surfaces that dissent exists so a human or a later phase resolves
//! it.

use std::collections::BTreeMap;
use std::fs;

use crate::evidence::load_all_checklists;
use crate::state::RunSession;

/// One vote: a phase's verdict for a location.
#[derive(Debug, Clone)]
pub struct Vote {
    pub phase: String,
    pub verdict: String,
}

/// A location reviewed by two or more phases with conflicting verdicts.
#[derive(Debug, Clone)]
pub struct Disagreement {
    pub location: String,
    pub votes: Vec<Vote>,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    pub agreements: usize,
    pub disagreements: Vec<Disagreement>,
}

impl ReconcileOutcome {
    pub fn passed(&self) -> bool {
        self.disagreements.is_empty()
    }
}

/// Strip a trailing `:NN` line suffix so `api.ts:10` and `api.ts:12`
/// group as the same location.
fn normalize_location(location: &str) -> String {
    match location.rsplit_once(':') {
        Some((path, suffix)) if suffix.chars().all(|c| c.is_ascii_digit()) => path.to_string(),
        _ => location.to_string(),
    }
}

/// Group every checklist row by location and diff the verdict sets.
pub fn reconcile_votes(session: &RunSession) -> anyhow::Result<ReconcileOutcome> {
    let checklists = load_all_checklists(session)?;

    // BTreeMap keeps report order stable across runs.
    let mut by_location: BTreeMap<String, Vec<Vote>> = BTreeMap::new();
    for checklist in &checklists {
        for row in &checklist.rows {
            by_location
                .entry(normalize_location(&row.location))
                .or_default()
                .push(Vote {
                    phase: checklist.phase.clone(),
                    verdict: row.verdict.clone(),
                });
        }
    }

    let mut outcome = ReconcileOutcome::default();
    for (location, votes) in by_location {
        let mut phases: Vec<&str> = votes.iter().map(|v| v.phase.as_str()).collect();
        phases.sort();
        phases.dedup();
        if phases.len() < 2 {
            continue;
        }

        let mut verdicts: Vec<String> =
            votes.iter().map(|v| v.verdict.to_lowercase()).collect();
        verdicts.sort();
        verdicts.dedup();

        if verdicts.len() > 1 {
            outcome.disagreements.push(Disagreement { location, votes });
        } else {
            outcome.agreements += 1;
        }
    }

    if !outcome.disagreements.is_empty() {
        write_report(session, &outcome)?;
    }

    Ok(outcome)
}

/// Write the disagreement table under the evidence directory.
fn write_report(session: &RunSession, outcome: &ReconcileOutcome) -> anyhow::Result<()> {
    session.ensure_dir(Some("evidence"))?;

    let mut report = String::from("# Vote disagreements\n\n");
    report.push_str("| Location | Phase | Verdict |\n|---|---|---|\n");
    for d in &outcome.disagreements {
        for vote in &d.votes {
            report.push_str(&format!(
                "| {} | {} | {} |\n",
                d.location, vote.phase, vote.verdict
            ));
        }
    }

    fs::write(session.disagreements_path(), report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed(session: &RunSession, name: &str, rows: &[(&str, &str)]) {
        let dir = session.ensure_dir(Some("evidence")).unwrap();
        let mut content =
            String::from("| Location | Item | Verdict |\n|---|---|---|\n");
        for (location, verdict) in rows {
            content.push_str(&format!("| {} | item | {} |\n", location, verdict));
        }
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_disagreement_requires_two_phases() {
        let temp = TempDir::new().unwrap();
        let session = RunSession::open(temp.path());
        // Conflicting verdicts within one phase are not a disagreement.
        seed(
            &session,
            "review-checks.md",
            &[("src/a.ts:1", "PASS"), ("src/a.ts:9", "FAIL")],
        );

        let outcome = reconcile_votes(&session).unwrap();
        assert!(outcome.passed());
        assert!(outcome.disagreements.is_empty());
    }

    #[test]
    fn test_case_insensitive_agreement() {
        let temp = TempDir::new().unwrap();
        let session = RunSession::open(temp.path());
        seed(&session, "review-checks.md", &[("src/a.ts:1", "PASS")]);
        seed(&session, "audit-checks.md", &[("src/a.ts:30", "pass")]);

        let outcome = reconcile_votes(&session).unwrap();
        assert!(outcome.passed());
        assert_eq!(outcome.agreements, 1);
    }

    #[test]
    fn test_cross_phase_conflict_is_reported() {
        let temp = TempDir::new().unwrap();
        let session = RunSession::open(temp.path());
        seed(&session, "review-checks.md", &[("src/a.ts:1", "PASS")]);
        seed(&session, "audit-checks.md", &[("src/a.ts:30", "FAIL")]);

        let outcome = reconcile_votes(&session).unwrap();
        assert!(!outcome.passed());
        assert_eq!(outcome.disagreements.len(), 1);
        assert_eq!(outcome.disagreements[0].location, "src/a.ts");

        let report =
            std::fs::read_to_string(session.disagreements_path()).unwrap();
        assert!(report.contains("src/a.ts"));
        assert!(report.contains("review"));
        assert!(report.contains("audit"));
    }

    #[test]
    fn test_hyphenated_phases_count_as_distinct() {
        let temp = TempDir::new().unwrap();
        let session = RunSession::open(temp.path());
        seed(&session, "pre-review-checks.md", &[("src/a.ts:1", "PASS")]);
        seed(&session, "pre-audit-checks.md", &[("src/a.ts:30", "FAIL")]);

        let outcome = reconcile_votes(&session).unwrap();
        assert!(!outcome.passed());
        assert_eq!(outcome.disagreements.len(), 1);
    }

    #[test]
    fn test_normalize_strips_line_suffix_only() {
        assert_eq!(normalize_location("src/a.ts:42"), "src/a.ts");
        assert_eq!(normalize_location("src/a.ts"), "src/a.ts");
        assert_eq!(normalize_location("c:/weird"), "c:/weird");
    }
}
