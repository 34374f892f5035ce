//! Terminal output formatting.
//!
//! Colored, human-readable output for gate runs and for the phase tools
//! (canary, evidence, votes, metrics, construction).

use colored::*;

use crate::canary::CanaryReport;
use crate::construction::ConstructionCheck;
use crate::evidence::ChecklistReport;
use crate::lint::LintResult;
use crate::metrics::PipelineMetrics;
use crate::scan::Violation;
use crate::votes::ReconcileOutcome;

/// Print the gate-run header.
pub fn write_header(target: &str) {
    println!();
    println!("  {} v{}", "reviewgate".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!();
    println!("  {}{}", "Target: ".dimmed(), target);
    println!();
}

/// Print one line per linted language.
pub fn write_lint_results(results: &[LintResult]) {
    if results.is_empty() {
        return;
    }
    println!("  {}:", "Linters".bold());
    for r in results {
        let status = if r.skipped {
            "SKIP".dimmed()
        } else if r.passed {
            "PASS".green()
        } else {
            "FAIL".red()
        };
        let summary = r.output.lines().next().unwrap_or("").trim();
        println!("    {}  {:<12} {}", status, r.language.to_string(), summary);
    }
    println!();
}

/// Print all violations, file:line first.
pub fn write_violations(violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }
    println!("  {} ({}):", "Violations".bold(), violations.len());
    println!();
    for v in violations {
        let location = if v.line > 0 {
            format!("{}:{}", v.file, v.line)
        } else {
            v.file.clone()
        };
        println!("    {:<20}{}", v.check.as_str().dimmed(), location.blue());
        println!("            {}", v.message);
    }
    println!();
}

/// Print the final pass/fail line for a gate run.
pub fn write_gate_status(passed: bool, violation_count: usize, lint_failures: usize) {
    if passed {
        println!("  {}  no violations, no lint failures", "✓ PASS".green());
    } else {
        println!(
            "  {}  {} violation(s), {} lint failure(s)",
            "✗ FAIL".red(),
            violation_count,
            lint_failures
        );
    }
    println!();
}

/// Print the caught/missed table for a canary validation.
pub fn write_canary_report(report: &CanaryReport) {
    println!();
    println!(
        "  {} canaries for phase {:?}",
        report.caught.len() + report.missed.len(),
        report.phase
    );
    let groups = [("CAUGHT".green(), &report.caught), ("MISSED".red(), &report.missed)];
    for (status, entries) in &groups {
        for entry in entries.iter() {
            println!(
                "    {}  {:<18} {}:{}",
                status,
                entry.category.as_str(),
                entry.file.blue(),
                entry.line
            );
        }
    }
    println!();
    if report.all_caught() {
        println!("  {}  the phase caught every injected defect", "✓ PASS".green());
    } else {
        println!(
            "  {}  {} canary(ies) survived review",
            "✗ FAIL".red(),
            report.missed.len()
        );
    }
    println!();
}

/// Print one line per evidence checklist.
pub fn write_evidence_reports(reports: &[ChecklistReport]) {
    println!();
    for r in reports {
        let (status, detail) = match r.expected {
            Some(expected) if r.passed() => {
                ("PASS".green(), format!("{} rows (expected >= {})", r.observed, expected))
            }
            Some(expected) => {
                ("FAIL".red(), format!("{} rows, expected >= {}", r.observed, expected))
            }
            None => ("INFO".blue(), format!("{} rows (no counter for this checklist)", r.observed)),
        };
        println!("    {}  {:<16} {}", status, r.id, detail);
    }
    println!();
}

/// Print the reconciliation summary.
pub fn write_reconcile_outcome(outcome: &ReconcileOutcome, report_path: &str) {
    println!();
    println!("  {} location(s) in cross-phase agreement", outcome.agreements);
    if outcome.passed() {
        println!("  {}  no verdict disagreements", "✓ PASS".green());
    } else {
        println!(
            "  {}  {} disagreement(s); see {}",
            "✗ FAIL".red(),
            outcome.disagreements.len(),
            report_path.blue()
        );
    }
    println!();
}

/// Print the per-phase and totals summary after archiving.
pub fn write_metrics_summary(metrics: &PipelineMetrics, archive: &str) {
    println!();
    println!("  {} pipeline {:?}", "Metrics:".bold(), metrics.pipeline);
    for p in &metrics.phases {
        println!(
            "    {:<16} found {:>3}  fixed {:>3}  {}s",
            p.phase, p.issues_found, p.issues_fixed, p.duration_secs
        );
    }
    println!(
        "    {:<16} found {:>3}  fixed {:>3}  {}s",
        "total".bold(),
        metrics.total_found(),
        metrics.total_fixed(),
        metrics.total_duration_secs()
    );
    println!("  archived to {}", archive.blue());
    println!();
}

/// Print one line per construction directive.
pub fn write_construction_checks(checks: &[ConstructionCheck]) {
    println!();
    for c in checks {
        let status = if c.satisfied { "OK  ".green() } else { "MISS".red() };
        println!("    {}  {}  {}", status, c.directive, c.detail.dimmed());
    }
    println!();
}
