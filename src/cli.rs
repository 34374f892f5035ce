//! Command-line interface for reviewgate.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::canary;
use crate::collect;
use crate::config::Config;
use crate::construction;
use crate::evidence;
use crate::lint;
use crate::metrics::{self, PhaseMetric};
use crate::report;
use crate::scan;
use crate::state::RunSession;
use crate::votes;

/// Exit codes. The whole surface is uniform: 0 = pass, 1 = fail.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;

/// Quality gate for multi-phase code review pipelines.
///
/// Reviewgate scans a target for defect patterns and dispatches external
/// linters; its phase tools verify that other review steps actually did
/// their job: canaries measure reviewer thoroughness, evidence validation
/// cross-checks checklists against mechanical counts, and vote
/// reconciliation surfaces cross-phase verdict conflicts.
#[derive(Parser)]
#[command(name = "reviewgate")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Target directory for the default gate run
    pub target: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inject 3-5 synthetic defects and write the canary manifest
    InsertCanaries {
        /// Review phase the canaries are planted for
        phase: String,
        /// Target directory
        dir: PathBuf,
    },
    /// Check which canaries the phase caught, restore files, delete manifest
    ValidateCanaries {
        phase: String,
        dir: PathBuf,
    },
    /// Cross-check a phase's evidence checklists against codebase counts
    ValidateEvidence {
        phase: String,
        dir: PathBuf,
    },
    /// Diff verdicts for the same location across review phases
    ReconcileVotes {
        dir: PathBuf,
    },
    /// Create the active metrics file for a pipeline run
    StartMetrics {
        pipeline: String,
        dir: PathBuf,
    },
    /// Append one phase's stats to the active metrics file
    RecordMetrics {
        phase: String,
        dir: PathBuf,
        /// Issues the phase found
        #[arg(long, default_value_t = 0)]
        found: usize,
        /// Issues the phase fixed
        #[arg(long, default_value_t = 0)]
        fixed: usize,
        /// Phase duration in seconds
        #[arg(long, default_value_t = 0)]
        duration: u64,
    },
    /// Finalize, archive, and summarize the active metrics file
    ReportMetrics {
        dir: PathBuf,
    },
    /// Verify a plan's required files and exports exist
    ValidateConstruction {
        /// Plan document containing FILE / EXPORT_* directives
        plan: PathBuf,
        /// Project directory to check against
        project: PathBuf,
    },
}

/// Run the default gate: collect, lint, scan, report.
pub fn run_gate(target: Option<&Path>) -> anyhow::Result<i32> {
    let target = target.unwrap_or_else(|| Path::new("."));
    let target = target
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("cannot access target {:?}: {}", target, e))?;
    let config = Config::discover(&target)?;

    report::write_header(&target.display().to_string());

    let languages = collect::detect_languages(&target, &config);
    if languages.is_empty() {
        eprintln!("Warning: no supported source files under {}", target.display());
        return Ok(EXIT_SUCCESS);
    }

    let lint_results = lint::dispatch(&target, &languages, &config)?;
    report::write_lint_results(&lint_results);

    let mut result = scan::ScanResult::new();
    for &lang in &languages {
        let files = collect::collect_source_files(&target, lang, &config);
        result.merge(scan::run_checks(lang, &files, &target)?);
    }
    report::write_violations(&result.violations);

    let lint_failures = lint_results.iter().filter(|r| !r.passed).count();
    let passed = result.is_clean() && lint_failures == 0;
    report::write_gate_status(passed, result.violations.len(), lint_failures);

    Ok(if passed { EXIT_SUCCESS } else { EXIT_FAILED })
}

pub fn run_insert_canaries(phase: &str, dir: &Path) -> anyhow::Result<i32> {
    let config = Config::discover(dir)?;
    let session = RunSession::open(dir);
    let manifest = canary::insert_canaries(&session, phase, &config)?;

    println!(
        "Planted {} canaries for phase {:?} (manifest: {})",
        manifest.canaries.len(),
        phase,
        session.manifest_path().display()
    );
    Ok(EXIT_SUCCESS)
}

pub fn run_validate_canaries(phase: &str, dir: &Path) -> anyhow::Result<i32> {
    let session = RunSession::open(dir);
    let canary_report = canary::validate_canaries(&session, phase)?;
    report::write_canary_report(&canary_report);

    Ok(if canary_report.all_caught() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    })
}

pub fn run_validate_evidence(phase: &str, dir: &Path) -> anyhow::Result<i32> {
    let config = Config::discover(dir)?;
    let session = RunSession::open(dir);
    let reports = evidence::validate_evidence(&session, phase, &config)?;

    if reports.is_empty() {
        eprintln!("Warning: no evidence checklists for phase {:?}", phase);
    }
    report::write_evidence_reports(&reports);

    Ok(if reports.iter().all(|r| r.passed()) {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    })
}

pub fn run_reconcile_votes(dir: &Path) -> anyhow::Result<i32> {
    let session = RunSession::open(dir);
    let outcome = votes::reconcile_votes(&session)?;
    report::write_reconcile_outcome(
        &outcome,
        &session.disagreements_path().display().to_string(),
    );

    Ok(if outcome.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    })
}

pub fn run_start_metrics(pipeline: &str, dir: &Path) -> anyhow::Result<i32> {
    let session = RunSession::open(dir);
    metrics::start_metrics(&session, pipeline)?;
    println!(
        "Started metrics for pipeline {:?} ({})",
        pipeline,
        session.active_metrics_path().display()
    );
    Ok(EXIT_SUCCESS)
}

pub fn run_record_metrics(
    phase: &str,
    dir: &Path,
    found: usize,
    fixed: usize,
    duration: u64,
) -> anyhow::Result<i32> {
    let session = RunSession::open(dir);
    let updated = metrics::record_metric(
        &session,
        PhaseMetric {
            phase: phase.to_string(),
            issues_found: found,
            issues_fixed: fixed,
            duration_secs: duration,
        },
    )?;
    println!(
        "Recorded phase {:?} ({} phase(s) so far)",
        phase,
        updated.phases.len()
    );
    Ok(EXIT_SUCCESS)
}

pub fn run_report_metrics(dir: &Path) -> anyhow::Result<i32> {
    let session = RunSession::open(dir);
    let (final_metrics, archive) = metrics::report_metrics(&session)?;
    report::write_metrics_summary(&final_metrics, &archive.display().to_string());
    Ok(EXIT_SUCCESS)
}

pub fn run_validate_construction(plan: &Path, project: &Path) -> anyhow::Result<i32> {
    let checks = construction::validate_construction(plan, project)?;
    report::write_construction_checks(&checks);

    Ok(if checks.iter().all(|c| c.satisfied) {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    })
}

/// Dispatch a parsed CLI invocation.
pub fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        None => run_gate(cli.target.as_deref()),
        Some(Commands::InsertCanaries { phase, dir }) => run_insert_canaries(&phase, &dir),
        Some(Commands::ValidateCanaries { phase, dir }) => run_validate_canaries(&phase, &dir),
        Some(Commands::ValidateEvidence { phase, dir }) => run_validate_evidence(&phase, &dir),
        Some(Commands::ReconcileVotes { dir }) => run_reconcile_votes(&dir),
        Some(Commands::StartMetrics { pipeline, dir }) => run_start_metrics(&pipeline, &dir),
        Some(Commands::RecordMetrics {
            phase,
            dir,
            found,
            fixed,
            duration,
        }) => run_record_metrics(&phase, &dir, found, fixed, duration),
        Some(Commands::ReportMetrics { dir }) => run_report_metrics(&dir),
        Some(Commands::ValidateConstruction { plan, project }) => {
            run_validate_construction(&plan, &project)
        }
    }
}
