//! Pipeline metrics tracking.
//!
//! One active metrics file per target, created by `start`, appended to by
//! `record`, then stamped, archived under a timestamp-qualified name, and
//! deleted by `report`. Archives are never overwritten.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::RunSession;

/// Stats for one completed pipeline phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseMetric {
    pub phase: String,
    pub issues_found: usize,
    pub issues_fixed: usize,
    pub duration_secs: u64,
}

/// The persisted metrics record for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetrics {
    pub pipeline: String,
    pub target: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub phases: Vec<PhaseMetric>,
}

impl PipelineMetrics {
    pub fn total_found(&self) -> usize {
        self.phases.iter().map(|p| p.issues_found).sum()
    }

    pub fn total_fixed(&self) -> usize {
        self.phases.iter().map(|p| p.issues_fixed).sum()
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }
}

fn read_active(session: &RunSession) -> anyhow::Result<PipelineMetrics> {
    let path = session.active_metrics_path();
    session.check_active("metrics file", &path)?;
    let json = fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let metrics = serde_json::from_str(&json).context("active metrics file is corrupt")?;
    Ok(metrics)
}

fn write_active(session: &RunSession, metrics: &PipelineMetrics) -> anyhow::Result<()> {
    session.ensure_dir(Some("metrics"))?;
    let json = serde_json::to_string_pretty(metrics)?;
    fs::write(session.active_metrics_path(), json)?;
    Ok(())
}

/// Create the active metrics file. Fails fast if one already exists.
pub fn start_metrics(session: &RunSession, pipeline: &str) -> anyhow::Result<PipelineMetrics> {
    session.check_not_active("metrics file", &session.active_metrics_path())?;

    let metrics = PipelineMetrics {
        pipeline: pipeline.to_string(),
        target: session.target().display().to_string(),
        started_at: Utc::now(),
        completed_at: None,
        phases: Vec::new(),
    };
    write_active(session, &metrics)?;
    Ok(metrics)
}

/// Append one phase's stats to the active metrics file.
pub fn record_metric(session: &RunSession, metric: PhaseMetric) -> anyhow::Result<PipelineMetrics> {
    let mut metrics = read_active(session)?;
    metrics.phases.push(metric);
    write_active(session, &metrics)?;
    Ok(metrics)
}

/// Stamp completion, archive the file, delete the active copy.
/// Returns the final record and the archive path.
pub fn report_metrics(session: &RunSession) -> anyhow::Result<(PipelineMetrics, PathBuf)> {
    let mut metrics = read_active(session)?;
    let completed = Utc::now();
    metrics.completed_at = Some(completed);

    // Timestamp-qualified archive name; bump a suffix rather than ever
    // overwriting an existing archive.
    let stamp = completed.format("%Y%m%dT%H%M%S").to_string();
    let mut archive = session.archived_metrics_path(&metrics.pipeline, &stamp);
    let mut bump = 1;
    while archive.exists() {
        archive = session.archived_metrics_path(&metrics.pipeline, &format!("{}-{}", stamp, bump));
        bump += 1;
    }

    let json = serde_json::to_string_pretty(&metrics)?;
    fs::write(&archive, json)
        .with_context(|| format!("archiving metrics to {}", archive.display()))?;
    fs::remove_file(session.active_metrics_path())?;

    Ok((metrics, archive))
}
