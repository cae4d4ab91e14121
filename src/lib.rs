//! values-hoist - shared-value hoisting for layered values.yaml trees
//!
//! This crate deduplicates configuration values across sibling
//! Helm-style `values.yaml` documents. For every layer directory it
//! finds the path/value pairs identical in all of the layer's service
//! documents, merges them into the layer's shared document and prunes
//! them from each service document.

pub mod config;
pub mod discover;
pub mod document;
pub mod flatten;
pub mod intersect;
pub mod merge;
pub mod node;
pub mod pipeline;
pub mod progress;
pub mod prune;
pub mod summary;

pub use config::{ConfigError, ConfigOverrides, HoistConfig};
pub use discover::{discover_layers, DiscoveryError, Layer};
pub use document::{load_document, save_document, DocumentError};
pub use flatten::{FlatMap, FlatPath, Flattener, PathConflict, DEFAULT_SEPARATOR};
pub use intersect::common_pairs;
pub use merge::deep_merge;
pub use node::{Children, ConfigNode};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineResult};
pub use progress::{ConsoleReporter, NullReporter, ProgressEvent, Reporter};
pub use prune::prune_paths;
pub use summary::{LayerSummary, RunStatus, RunSummary};
