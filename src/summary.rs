//! Run and layer summaries
//!
//! Aggregated outcome of one run, serializable for `--json` output and
//! rendered as a one-line human summary otherwise. Exit codes are
//! stable per status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version for the run summary
pub const RUN_SUMMARY_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for the run summary
pub const RUN_SUMMARY_SCHEMA_ID: &str = "values-hoist/run_summary@1";

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every write that was attempted succeeded
    Success,
    /// At least one document failed to persist; the rest were processed
    Partial,
    /// The run was cancelled between layers
    Cancelled,
    /// No layers with service documents were found
    NothingToDo,
}

impl RunStatus {
    /// Stable exit code for this status
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Partial => 40,
            RunStatus::Cancelled => 80,
            RunStatus::NothingToDo => 0,
        }
    }
}

/// Outcome of one layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSummary {
    /// Layer name
    pub layer: String,

    /// Number of service documents in the layer
    pub service_count: usize,

    /// Documents that failed to load (treated as empty)
    pub load_failures: usize,

    /// Common path/value pairs found across all service documents
    pub common_key_count: usize,

    /// Documents written (shared + pruned services); zero in dry runs
    pub documents_written: usize,

    /// Documents that failed to persist
    pub write_failures: usize,

    /// True when the layer had no common values and was left untouched
    pub noop: bool,
}

/// Aggregated outcome of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the summary was created
    pub created_at: DateTime<Utc>,

    /// Overall status
    pub status: RunStatus,

    /// Whether this was a dry run (no writes attempted)
    pub dry_run: bool,

    /// Layers processed (including no-op layers)
    pub layers_processed: usize,

    /// Layers that had nothing to hoist
    pub layers_noop: usize,

    /// Total documents written across all layers
    pub documents_written: usize,

    /// Total write failures across all layers
    pub write_failures: usize,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// One-line human-readable outcome
    pub human_summary: String,

    /// Per-layer outcomes
    pub layers: Vec<LayerSummary>,
}

impl RunSummary {
    /// Aggregate per-layer summaries into a run summary.
    pub fn from_layers(
        layers: Vec<LayerSummary>,
        dry_run: bool,
        cancelled: bool,
        duration_ms: u64,
    ) -> Self {
        let layers_processed = layers.len();
        let layers_noop = layers.iter().filter(|l| l.noop).count();
        let documents_written = layers.iter().map(|l| l.documents_written).sum();
        let write_failures = layers.iter().map(|l| l.write_failures).sum();

        let status = if cancelled {
            RunStatus::Cancelled
        } else if write_failures > 0 {
            RunStatus::Partial
        } else if layers_processed == 0 {
            RunStatus::NothingToDo
        } else {
            RunStatus::Success
        };

        let human_summary = Self::generate_human_summary(
            status,
            dry_run,
            layers_processed,
            layers_noop,
            documents_written,
            write_failures,
        );

        Self {
            schema_version: RUN_SUMMARY_SCHEMA_VERSION,
            schema_id: RUN_SUMMARY_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            status,
            dry_run,
            layers_processed,
            layers_noop,
            documents_written,
            write_failures,
            duration_ms,
            human_summary,
            layers,
        }
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn generate_human_summary(
        status: RunStatus,
        dry_run: bool,
        layers_processed: usize,
        layers_noop: usize,
        documents_written: usize,
        write_failures: usize,
    ) -> String {
        match status {
            RunStatus::NothingToDo => "no layers with service documents found".to_string(),
            RunStatus::Cancelled => format!(
                "cancelled after {} layer(s), {} document(s) written",
                layers_processed, documents_written
            ),
            RunStatus::Partial => format!(
                "processed {} layer(s), {} document(s) written, {} write failure(s)",
                layers_processed, documents_written, write_failures
            ),
            RunStatus::Success if dry_run => format!(
                "dry run over {} layer(s), {} with nothing to hoist, no files changed",
                layers_processed, layers_noop
            ),
            RunStatus::Success => format!(
                "processed {} layer(s), {} with nothing to hoist, {} document(s) written",
                layers_processed, layers_noop, documents_written
            ),
        }
    }
}
