//! Pipeline orchestration
//!
//! Drives the full run: discover layers, then per layer load the
//! service documents, intersect their flattened views, merge the common
//! values into the shared document and prune them from every service
//! document. Load and write failures are reported and counted but never
//! abort the run; only an invalid root directory is fatal, checked
//! before any layer is touched. Cancellation is honoured between
//! layers.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::config::{ConfigError, HoistConfig};
use crate::discover::{discover_layers, DiscoveryError, Layer};
use crate::document::{load_document, save_document};
use crate::flatten::{FlatPath, Flattener, PathConflict};
use crate::intersect::common_pairs;
use crate::merge::deep_merge;
use crate::node::ConfigNode;
use crate::progress::{ProgressEvent, Reporter};
use crate::prune::prune_paths;
use crate::summary::{LayerSummary, RunSummary};

/// Fatal pipeline errors; everything else degrades into summary counts
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("no layer named '{0}' was discovered")]
    UnknownLayer(String),
}

impl PipelineError {
    /// Stable exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Config(_) => 1,
            PipelineError::Discovery(DiscoveryError::InvalidRoot(_)) => 2,
            PipelineError::Discovery(_) => 1,
            PipelineError::UnknownLayer(_) => 1,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory holding the layer directories
    pub root: PathBuf,

    /// Effective tool configuration
    pub hoist: HoistConfig,

    /// Compute everything but never write a file
    pub dry_run: bool,
}

/// The hoist pipeline
pub struct Pipeline<'a> {
    config: PipelineConfig,
    reporter: &'a dyn Reporter,
    cancel: Arc<AtomicBool>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: PipelineConfig, reporter: &'a dyn Reporter) -> Self {
        Self {
            config,
            reporter,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use a shared cancellation flag; when set, the run stops before
    /// the next layer.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Discover the layers this pipeline would process.
    pub fn discover(&self) -> PipelineResult<Vec<Layer>> {
        Ok(discover_layers(&self.config.root, &self.config.hoist)?)
    }

    /// Run the full hoist over every discovered layer.
    pub fn run(&self) -> PipelineResult<RunSummary> {
        let started = Instant::now();
        let layers = self.discover()?;
        self.reporter.report(ProgressEvent::RunStarted {
            root: self.config.root.clone(),
            layer_count: layers.len(),
            dry_run: self.config.dry_run,
        });

        let flattener = Flattener::new(self.config.hoist.separator.clone());
        let mut summaries = Vec::with_capacity(layers.len());
        let mut cancelled = false;
        for layer in &layers {
            if self.cancel.load(Ordering::SeqCst) {
                cancelled = true;
                self.reporter.report(ProgressEvent::Cancelled);
                break;
            }
            summaries.push(self.process_layer(layer, &flattener));
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        Ok(RunSummary::from_layers(
            summaries,
            self.config.dry_run,
            cancelled,
            duration_ms,
        ))
    }

    /// Compute the common values of one layer without touching any file.
    pub fn common_values(&self, layer_name: &str) -> PipelineResult<ConfigNode> {
        let layers = self.discover()?;
        let layer = layers
            .iter()
            .find(|l| l.name == layer_name)
            .ok_or_else(|| PipelineError::UnknownLayer(layer_name.to_string()))?;

        let flattener = Flattener::new(self.config.hoist.separator.clone());
        let mut load_failures = 0;
        let flat_maps: Vec<_> = layer
            .service_paths
            .iter()
            .map(|path| {
                let doc = self.load_or_empty(path, &mut load_failures);
                flattener.flatten(&doc).0
            })
            .collect();

        let common = common_pairs(&flat_maps);
        let (hoisted, _) = flattener.unflatten(&common);
        Ok(hoisted)
    }

    fn process_layer(&self, layer: &Layer, flattener: &Flattener) -> LayerSummary {
        self.reporter.report(ProgressEvent::LayerStarted {
            layer: layer.name.clone(),
            service_count: layer.service_paths.len(),
        });

        let mut summary = LayerSummary {
            layer: layer.name.clone(),
            service_count: layer.service_paths.len(),
            load_failures: 0,
            common_key_count: 0,
            documents_written: 0,
            write_failures: 0,
            noop: false,
        };

        let mut documents = Vec::with_capacity(layer.service_paths.len());
        let mut flat_maps = Vec::with_capacity(layer.service_paths.len());
        for path in &layer.service_paths {
            let doc = self.load_or_empty(path, &mut summary.load_failures);
            let (flat, conflicts) = flattener.flatten(&doc);
            self.report_conflicts(&layer.name, &conflicts);
            self.reporter.report(ProgressEvent::DocumentLoaded {
                path: path.clone(),
                key_count: flat.len(),
            });
            documents.push((path.clone(), doc));
            flat_maps.push(flat);
        }

        let common = common_pairs(&flat_maps);
        if common.is_empty() {
            summary.noop = true;
            self.reporter.report(ProgressEvent::LayerNoOp {
                layer: layer.name.clone(),
            });
            return summary;
        }
        summary.common_key_count = common.len();
        self.reporter.report(ProgressEvent::CommonFound {
            layer: layer.name.clone(),
            pair_count: common.len(),
        });

        // Hoist into the shared document (created if absent).
        let shared = if layer.shared_path.exists() {
            self.load_or_empty(&layer.shared_path, &mut summary.load_failures)
        } else {
            ConfigNode::empty_mapping()
        };
        let (hoisted, conflicts) = flattener.unflatten(&common);
        self.report_conflicts(&layer.name, &conflicts);
        let merged = deep_merge(&shared, &hoisted);
        self.persist(&layer.shared_path, &merged, &mut summary);

        // Strip the hoisted paths from every service document. Saving
        // even when nothing was removed keeps the run idempotent: a
        // second pass finds no common values left and becomes a no-op.
        let removal: HashSet<FlatPath> = common.keys().cloned().collect();
        for (path, doc) in &documents {
            let pruned = prune_paths(doc, &removal, flattener.separator());
            self.persist(path, &pruned, &mut summary);
        }

        summary
    }

    fn load_or_empty(&self, path: &Path, load_failures: &mut usize) -> ConfigNode {
        match load_document(path) {
            Ok(doc) => doc,
            Err(err) => {
                *load_failures += 1;
                self.reporter.report(ProgressEvent::LoadFailed {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
                ConfigNode::empty_mapping()
            }
        }
    }

    fn persist(&self, path: &Path, document: &ConfigNode, summary: &mut LayerSummary) {
        if self.config.dry_run {
            self.reporter.report(ProgressEvent::SaveSkipped {
                path: path.to_path_buf(),
            });
            return;
        }
        match save_document(path, document) {
            Ok(()) => {
                summary.documents_written += 1;
                self.reporter.report(ProgressEvent::DocumentSaved {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => {
                summary.write_failures += 1;
                self.reporter.report(ProgressEvent::WriteFailed {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
            }
        }
    }

    fn report_conflicts(&self, layer: &str, conflicts: &[PathConflict]) {
        for conflict in conflicts {
            self.reporter.report(ProgressEvent::PathAmbiguity {
                layer: layer.to_string(),
                detail: conflict.to_string(),
            });
        }
    }
}
