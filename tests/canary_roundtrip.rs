//! Canary insert/validate round-trip through the CLI entry points.

use std::path::Path;

use tempfile::TempDir;

use reviewgate::cli;
use reviewgate::state::RunSession;

fn seed_project(dir: &Path) {
    for name in ["auth", "billing", "users", "orders", "search"] {
        std::fs::write(
            dir.join(format!("{}.ts", name)),
            format!(
                "export function {}Handler(input) {{\n  return input;\n}}\n",
                name
            ),
        )
        .unwrap();
    }
}

#[test]
fn test_unreviewed_canaries_fail_and_consume_manifest() {
    let temp = TempDir::new().unwrap();
    seed_project(temp.path());
    let session = RunSession::open(temp.path());

    let code = cli::run_insert_canaries("review", temp.path()).unwrap();
    assert_eq!(code, cli::EXIT_SUCCESS);
    assert!(session.manifest_path().exists());

    // No review happened: every canary is missed.
    let code = cli::run_validate_canaries("review", temp.path()).unwrap();
    assert_eq!(code, cli::EXIT_FAILED);
    assert!(!session.manifest_path().exists());
}

#[test]
fn test_thorough_review_passes_and_consumes_manifest() {
    let temp = TempDir::new().unwrap();
    seed_project(temp.path());
    let session = RunSession::open(temp.path());

    cli::run_insert_canaries("review", temp.path()).unwrap();

    // Act as a thorough reviewer: delete every mutated file.
    let json = std::fs::read_to_string(session.manifest_path()).unwrap();
    let manifest: reviewgate::CanaryManifest = serde_json::from_str(&json).unwrap();
    for entry in &manifest.canaries {
        let _ = std::fs::remove_file(temp.path().join(&entry.file));
    }

    let code = cli::run_validate_canaries("review", temp.path()).unwrap();
    assert_eq!(code, cli::EXIT_SUCCESS);
    assert!(!session.manifest_path().exists());
}

#[test]
fn test_validate_with_no_manifest_is_an_error() {
    let temp = TempDir::new().unwrap();
    seed_project(temp.path());
    assert!(cli::run_validate_canaries("review", temp.path()).is_err());
}

#[test]
fn test_phase_mismatch_is_an_error() {
    let temp = TempDir::new().unwrap();
    seed_project(temp.path());

    cli::run_insert_canaries("review", temp.path()).unwrap();
    assert!(cli::run_validate_canaries("audit", temp.path()).is_err());
}
