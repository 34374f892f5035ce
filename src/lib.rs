//! Reviewgate - meta-verification quality gate for code review pipelines.
//!
//! Reviewgate does two jobs. As a gate, it scans a target for defect
//! patterns (secrets, shell injection, path traversal, import cycles,
//! error leakage, plus structural proxy checks) and dispatches external
//! linters. As a meta-verifier, it checks that *other* review steps did
//! theirs: canaries are synthetic defects planted to measure reviewer
//! thoroughness, evidence validation cross-checks review checklists
//! against mechanically derived counts, and vote reconciliation surfaces
//! verdict conflicts between independent review phases.
//!
//! # Architecture
//!
//! - `collect` / `lang`: file collection and language detection
//! - `lint`: external checker dispatch with bounded timeouts
//! - `scan`: the pattern check engine and its checks
//! - `canary`: defect injection and validation
//! - `evidence` / `votes`: checklist validation and reconciliation
//! - `metrics` / `construction`: pipeline stats and plan verification
//! - `state`: the per-target state directory and run session handle
//!
//! # Adding a New Check
//!
//! Implement `scan::Check` and register it in `scan::all_checks`; the
//! engine handles language filtering and dispatch.

pub mod canary;
pub mod cli;
pub mod collect;
pub mod config;
pub mod construction;
pub mod evidence;
pub mod lang;
pub mod lint;
pub mod metrics;
pub mod report;
pub mod scan;
pub mod state;
pub mod votes;

pub use canary::{CanaryCategory, CanaryEntry, CanaryManifest, CanaryReport};
pub use config::Config;
pub use construction::{ConstructionCheck, Directive};
pub use evidence::{Checklist, ChecklistReport, EvidenceRow};
pub use lang::Language;
pub use lint::LintResult;
pub use metrics::{PhaseMetric, PipelineMetrics};
pub use scan::{Check, CheckId, ScanResult, Violation};
pub use state::{RunSession, StateError};
pub use votes::{Disagreement, ReconcileOutcome};
