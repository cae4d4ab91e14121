//! Layer discovery
//!
//! Walks the root directory for the `<root>/<layer>/<service>/values.yaml`
//! convention: every matching service file groups under its layer, and
//! each layer owns a shared document at `<root>/<layer>/values.yaml`
//! (which may not exist yet). Layer directories are filtered by a glob
//! on the directory name; layers with no service documents are skipped.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use indexmap::IndexMap;
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::HoistConfig;

/// Errors during layer discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Fatal precondition: the root must be an existing directory
    #[error("root directory does not exist or is not a directory: {0}")]
    InvalidRoot(PathBuf),

    #[error("invalid layer glob pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A named group of service documents plus one shared document
#[derive(Debug, Clone)]
pub struct Layer {
    /// Layer directory name
    pub name: String,

    /// Path of the layer's shared document (may not exist yet)
    pub shared_path: PathBuf,

    /// Service document paths, sorted by path
    pub service_paths: Vec<PathBuf>,
}

/// Discover all layers under `root` per the configured conventions.
pub fn discover_layers(root: &Path, config: &HoistConfig) -> Result<Vec<Layer>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::InvalidRoot(root.to_path_buf()));
    }

    let matcher: GlobMatcher = Glob::new(&config.layer_glob)?.compile_matcher();
    let mut grouped: IndexMap<String, Vec<PathBuf>> = IndexMap::new();

    // Service documents sit exactly three levels deep:
    // root / layer / service / values.yaml
    for entry in WalkDir::new(root)
        .min_depth(3)
        .max_depth(3)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file()
            || entry.file_name() != std::ffi::OsStr::new(&config.shared_filename)
        {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let layer_name = match relative.components().next() {
            Some(component) => component.as_os_str().to_string_lossy().into_owned(),
            None => continue,
        };
        if !matcher.is_match(&layer_name) {
            continue;
        }

        grouped
            .entry(layer_name)
            .or_default()
            .push(entry.path().to_path_buf());
    }

    let layers = grouped
        .into_iter()
        .map(|(name, service_paths)| Layer {
            shared_path: root.join(&name).join(&config.shared_filename),
            name,
            service_paths,
        })
        .collect();
    Ok(layers)
}
