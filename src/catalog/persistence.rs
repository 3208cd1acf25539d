//! Load/save of the catalog as a single JSON document.
//!
//! The index is excluded from serialization and rebuilt lazily after load.

use super::Catalog;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load the catalog from disk. A missing file yields an empty catalog.
pub fn load(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Ok(Catalog::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {path:?}"))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse catalog file: {path:?}"))
}

/// Write the catalog to disk as pretty-printed JSON.
pub fn save(path: &Path, catalog: &Catalog) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {parent:?}"))?;
    }
    let content = serde_json::to_string_pretty(catalog)?;
    fs::write(path, content).with_context(|| format!("Failed to write catalog file: {path:?}"))
}
