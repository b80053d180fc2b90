//! Loading JSON documents from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::analysis::{AnalysisInput, validate_input};
use crate::config::BmdsConfig;
use crate::error::{BmdsError, Result};

/// Read a JSON document.
pub fn load_json(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| BmdsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), "loaded document");
    Ok(value)
}

/// Read and validate an analysis document.
pub fn load_analysis(
    path: impl AsRef<Path>,
    partial: bool,
    config: &BmdsConfig,
) -> Result<AnalysisInput> {
    validate_input(&load_json(path)?, partial, config)
}
