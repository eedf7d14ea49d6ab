//! Summary manifest of compiled tracks

use crate::error::{BatchError, BatchResult};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    /// Track path relative to the output root, `/`-separated
    pub relative_output_path: String,
    pub duration_seconds: f64,
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {:.2}",
            self.relative_output_path, self.duration_seconds
        )
    }
}

/// Entries in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One line per entry, newline-separated, no trailing newline
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the manifest, replacing any previous file at `path`
    pub fn write_to(&self, path: &Path) -> BatchResult<()> {
        std::fs::write(path, self.render()).map_err(|e| BatchError::io(path, e))?;
        log::info!("Audio files information saved to: {}", path.display());
        Ok(())
    }
}

impl IntoIterator for Manifest {
    type Item = ManifestEntry;
    type IntoIter = std::vec::IntoIter<ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
