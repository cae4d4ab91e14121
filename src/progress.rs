//! Progress reporting
//!
//! The pipeline reports structured events through a `Reporter` instead
//! of printing directly, so computation stays decoupled from
//! presentation. `ConsoleReporter` renders events for the CLI;
//! `NullReporter` swallows them in tests and library embeddings.

use std::path::PathBuf;

/// A structured progress event emitted by the pipeline
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    RunStarted {
        root: PathBuf,
        layer_count: usize,
        dry_run: bool,
    },
    LayerStarted {
        layer: String,
        service_count: usize,
    },
    DocumentLoaded {
        path: PathBuf,
        key_count: usize,
    },
    /// Document unreadable or unparseable; treated as empty
    LoadFailed {
        path: PathBuf,
        reason: String,
    },
    /// A flatten/unflatten path ambiguity, resolved by precedence
    PathAmbiguity {
        layer: String,
        detail: String,
    },
    CommonFound {
        layer: String,
        pair_count: usize,
    },
    /// No common pairs; the layer is left untouched
    LayerNoOp {
        layer: String,
    },
    DocumentSaved {
        path: PathBuf,
    },
    /// Dry-run: a save was computed but skipped
    SaveSkipped {
        path: PathBuf,
    },
    WriteFailed {
        path: PathBuf,
        reason: String,
    },
    Cancelled,
}

/// Sink for pipeline progress events
pub trait Reporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Console renderer for progress events
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::RunStarted {
                root,
                layer_count,
                dry_run,
            } => {
                let mode = if dry_run { " (dry run)" } else { "" };
                println!(
                    "Processing {} layer(s) under {}{}",
                    layer_count,
                    root.display(),
                    mode
                );
            }
            ProgressEvent::LayerStarted {
                layer,
                service_count,
            } => {
                println!("Layer {}: {} service document(s)", layer, service_count);
            }
            ProgressEvent::DocumentLoaded { path, key_count } => {
                if self.verbose {
                    println!("  loaded {} ({} keys)", path.display(), key_count);
                }
            }
            ProgressEvent::LoadFailed { path, reason } => {
                eprintln!(
                    "  warning: could not load {}, treating as empty: {}",
                    path.display(),
                    reason
                );
            }
            ProgressEvent::PathAmbiguity { layer, detail } => {
                eprintln!("  warning: ambiguous path in layer {}: {}", layer, detail);
            }
            ProgressEvent::CommonFound { layer, pair_count } => {
                println!("  {} common value(s) in layer {}", pair_count, layer);
            }
            ProgressEvent::LayerNoOp { layer } => {
                println!("  no common values in layer {}, skipping", layer);
            }
            ProgressEvent::DocumentSaved { path } => {
                if self.verbose {
                    println!("  saved {}", path.display());
                }
            }
            ProgressEvent::SaveSkipped { path } => {
                if self.verbose {
                    println!("  dry run, would save {}", path.display());
                }
            }
            ProgressEvent::WriteFailed { path, reason } => {
                eprintln!("  error: failed to save {}: {}", path.display(), reason);
            }
            ProgressEvent::Cancelled => {
                eprintln!("Cancelled, stopping before the next layer");
            }
        }
    }
}

/// Reporter that drops every event
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: ProgressEvent) {}
}
