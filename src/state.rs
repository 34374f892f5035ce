//! State-directory layout and run session handle.
//!
//! All persisted state lives under a hidden `.reviewgate` directory inside
//! the target: the canary manifest, metrics files, and evidence checklists.
//! Manifests and active-metrics files are single-writer, single-active-
//! instance per target; a `RunSession` makes that assumption explicit by
//! carrying a run identifier and failing fast on conflicts instead of
//! silently overwriting another run's state.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the hidden state directory inside a target.
pub const STATE_DIR_NAME: &str = ".reviewgate";

/// Errors from state-directory operations.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("an active {kind} already exists at {path} (one run per target)")]
    ActiveRunExists { kind: &'static str, path: String },
    #[error("no active {kind} found at {path}")]
    NoActiveRun { kind: &'static str, path: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A handle over one run's state under a target directory.
#[derive(Debug, Clone)]
pub struct RunSession {
    target: PathBuf,
    run_id: String,
}

impl RunSession {
    /// Open a session for a target. The run id stamps archived artifacts
    /// so concurrent runs are at least distinguishable after the fact.
    pub fn open<P: AsRef<Path>>(target: P) -> Self {
        let run_id = format!(
            "{}-{}",
            chrono::Utc::now().format("%Y%m%dT%H%M%S"),
            std::process::id()
        );
        Self {
            target: target.as_ref().to_path_buf(),
            run_id,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn state_dir(&self) -> PathBuf {
        self.target.join(STATE_DIR_NAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.state_dir().join("canary-manifest.json")
    }

    pub fn metrics_dir(&self) -> PathBuf {
        self.state_dir().join("metrics")
    }

    pub fn active_metrics_path(&self) -> PathBuf {
        self.metrics_dir().join("active-metrics.json")
    }

    pub fn archived_metrics_path(&self, pipeline: &str, stamp: &str) -> PathBuf {
        self.metrics_dir().join(format!("{}-{}.json", pipeline, stamp))
    }

    pub fn evidence_dir(&self) -> PathBuf {
        self.state_dir().join("evidence")
    }

    pub fn disagreements_path(&self) -> PathBuf {
        self.evidence_dir().join("vote-disagreements.md")
    }

    /// Ensure the state directory (and a subdirectory, if given) exists.
    pub fn ensure_dir(&self, sub: Option<&str>) -> Result<PathBuf, StateError> {
        let dir = match sub {
            Some(s) => self.state_dir().join(s),
            None => self.state_dir(),
        };
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Fail if an active single-instance file already exists.
    pub fn check_not_active(&self, kind: &'static str, path: &Path) -> Result<(), StateError> {
        if path.exists() {
            return Err(StateError::ActiveRunExists {
                kind,
                path: path.display().to_string(),
            });
        }
        Ok(())
    }

    /// Fail if an expected active single-instance file is missing.
    pub fn check_active(&self, kind: &'static str, path: &Path) -> Result<(), StateError> {
        if !path.exists() {
            return Err(StateError::NoActiveRun {
                kind,
                path: path.display().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let temp = TempDir::new().unwrap();
        let session = RunSession::open(temp.path());

        assert_eq!(session.state_dir(), temp.path().join(".reviewgate"));
        assert!(session
            .manifest_path()
            .ends_with(".reviewgate/canary-manifest.json"));
        assert!(session
            .active_metrics_path()
            .ends_with(".reviewgate/metrics/active-metrics.json"));
        assert!(session
            .disagreements_path()
            .ends_with(".reviewgate/evidence/vote-disagreements.md"));
    }

    #[test]
    fn test_active_file_conflict_detection() {
        let temp = TempDir::new().unwrap();
        let session = RunSession::open(temp.path());
        let manifest = session.manifest_path();

        assert!(session.check_not_active("canary manifest", &manifest).is_ok());
        assert!(session.check_active("canary manifest", &manifest).is_err());

        session.ensure_dir(None).unwrap();
        std::fs::write(&manifest, "{}").unwrap();
        assert!(session.check_not_active("canary manifest", &manifest).is_err());
        assert!(session.check_active("canary manifest", &manifest).is_ok());
    }

    #[test]
    fn test_run_ids_carry_pid() {
        let temp = TempDir::new().unwrap();
        let session = RunSession::open(temp.path());
        assert!(session
            .run_id()
            .ends_with(&std::process::id().to_string()));
    }
}
