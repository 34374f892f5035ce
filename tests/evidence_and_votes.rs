//! Evidence validation and vote reconciliation through the CLI entry points.

use std::path::Path;

use tempfile::TempDir;

use reviewgate::cli;
use reviewgate::state::RunSession;

fn seed_evidence(dir: &Path, name: &str, rows: &[(&str, &str, &str)]) {
    let session = RunSession::open(dir);
    let evidence = session.ensure_dir(Some("evidence")).unwrap();
    let mut content = String::from("| Location | Item | Verdict | Reasoning |\n|---|---|---|---|\n");
    for (location, item, verdict) in rows {
        content.push_str(&format!("| {} | {} | {} | checked |\n", location, item, verdict));
    }
    std::fs::write(evidence.join(name), content).unwrap();
}

#[test]
fn test_evidence_shortfall_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("api.ts"),
        "export function a() {}\nexport function b() {}\n",
    )
    .unwrap();
    seed_evidence(
        temp.path(),
        "review-exports.md",
        &[("api.ts:1", "a", "PASS")],
    );

    let code = cli::run_validate_evidence("review", temp.path()).unwrap();
    assert_eq!(code, cli::EXIT_FAILED);
}

#[test]
fn test_evidence_full_coverage_passes() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("api.ts"), "export function a() {}\n").unwrap();
    seed_evidence(
        temp.path(),
        "review-exports.md",
        &[("api.ts:1", "a", "PASS")],
    );

    let code = cli::run_validate_evidence("review", temp.path()).unwrap();
    assert_eq!(code, cli::EXIT_SUCCESS);
}

#[test]
fn test_hyphenated_phase_shortfall_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("api.ts"),
        "export function a() {}\nexport function b() {}\n",
    )
    .unwrap();
    seed_evidence(
        temp.path(),
        "pre-review-exports.md",
        &[("api.ts:1", "a", "PASS")],
    );

    let code = cli::run_validate_evidence("pre-review", temp.path()).unwrap();
    assert_eq!(code, cli::EXIT_FAILED);
}

#[test]
fn test_unknown_checklist_id_is_informational() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("api.ts"), "export function a() {}\n").unwrap();
    seed_evidence(
        temp.path(),
        "review-vibes.md",
        &[("api.ts:1", "a", "PASS")],
    );

    let code = cli::run_validate_evidence("review", temp.path()).unwrap();
    assert_eq!(code, cli::EXIT_SUCCESS);
}

#[test]
fn test_vote_disagreement_fails_and_writes_report() {
    let temp = TempDir::new().unwrap();
    seed_evidence(
        temp.path(),
        "review-checks.md",
        &[("src/pay.ts:10", "charge", "PASS")],
    );
    seed_evidence(
        temp.path(),
        "audit-checks.md",
        &[("src/pay.ts:14", "charge", "FAIL")],
    );

    let code = cli::run_reconcile_votes(temp.path()).unwrap();
    assert_eq!(code, cli::EXIT_FAILED);

    let session = RunSession::open(temp.path());
    let table = std::fs::read_to_string(session.disagreements_path()).unwrap();
    assert!(table.contains("src/pay.ts"));
}

#[test]
fn test_single_reviewer_is_never_a_disagreement() {
    let temp = TempDir::new().unwrap();
    seed_evidence(
        temp.path(),
        "review-checks.md",
        &[("src/pay.ts:10", "charge", "PASS"), ("src/db.ts:3", "query", "FAIL")],
    );

    let code = cli::run_reconcile_votes(temp.path()).unwrap();
    assert_eq!(code, cli::EXIT_SUCCESS);
}

#[test]
fn test_metrics_lifecycle_via_cli() {
    let temp = TempDir::new().unwrap();
    let session = RunSession::open(temp.path());

    assert_eq!(
        cli::run_start_metrics("nightly", temp.path()).unwrap(),
        cli::EXIT_SUCCESS
    );
    assert_eq!(
        cli::run_record_metrics("scan", temp.path(), 5, 2, 30).unwrap(),
        cli::EXIT_SUCCESS
    );
    assert_eq!(
        cli::run_report_metrics(temp.path()).unwrap(),
        cli::EXIT_SUCCESS
    );

    assert!(!session.active_metrics_path().exists());
    let archives: Vec<_> = std::fs::read_dir(session.metrics_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(archives.len(), 1);

    // A second report with nothing active is an error.
    assert!(cli::run_report_metrics(temp.path()).is_err());
}

#[test]
fn test_construction_validation_via_cli() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("api.ts"),
        "export function fetchUser(id) { return id; }\n",
    )
    .unwrap();
    let plan = temp.path().join("plan.md");
    std::fs::write(
        &plan,
        "FILE: api.ts\nEXPORT_FUNCTION: fetchUser IN api.ts\n",
    )
    .unwrap();

    assert_eq!(
        cli::run_validate_construction(&plan, temp.path()).unwrap(),
        cli::EXIT_SUCCESS
    );

    std::fs::write(&plan, "EXPORT_TYPE: User IN api.ts\n").unwrap();
    assert_eq!(
        cli::run_validate_construction(&plan, temp.path()).unwrap(),
        cli::EXIT_FAILED
    );
}
