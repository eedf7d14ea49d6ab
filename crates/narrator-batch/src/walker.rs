//! Input discovery: language batches and the text files inside them

use crate::config::{ExecutionMode, RunConfig};
use crate::error::{BatchError, BatchResult};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Text files sharing one language key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub language_key: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Prefix of manifest paths (`en/` in by-folder mode, empty otherwise)
    pub manifest_prefix: String,
}

impl Batch {
    /// Manifest-relative path of a compiled track; always `/`-separated
    pub fn relative_output_path(&self, file_name: &str) -> String {
        format!("{}{}", self.manifest_prefix, file_name)
    }
}

/// Work out the batches for this run.
///
/// In by-folder mode an input root without subdirectories yields no batches
/// and a warning, not an error.
pub fn discover_batches(config: &RunConfig) -> BatchResult<Vec<Batch>> {
    if !config.input_dir.is_dir() {
        return Err(BatchError::MissingInput(config.input_dir.clone()));
    }

    match &config.mode {
        ExecutionMode::ByFolder => {
            log::info!("Running in 'by_folder' mode");
            let batches: Vec<Batch> = list_entries(&config.input_dir)?
                .into_iter()
                .filter(|path| path.is_dir())
                .filter_map(|path| {
                    let Some(key) = path.file_name().and_then(OsStr::to_str) else {
                        log::warn!(
                            "Skipping folder {}: name is not valid UTF-8",
                            path.display()
                        );
                        return None;
                    };
                    let key = key.to_string();
                    Some(Batch {
                        output_dir: config.output_dir.join(&key),
                        manifest_prefix: format!("{key}/"),
                        language_key: key,
                        input_dir: path,
                    })
                })
                .collect();

            if batches.is_empty() {
                log::warn!(
                    "No language subfolders found in {}. To use 'by_folder' mode, create \
                     subdirectories named after language keys (e.g. 'pt', 'en', 'es') holding \
                     the .{} files to narrate.",
                    config.input_dir.display(),
                    config.text_extension()
                );
            }
            Ok(batches)
        }
        ExecutionMode::Single(key) => {
            log::info!("Running in single language mode: {key}");
            Ok(vec![Batch {
                language_key: key.clone(),
                input_dir: config.input_dir.clone(),
                output_dir: config.output_dir.clone(),
                manifest_prefix: String::new(),
            }])
        }
    }
}

/// Immediate files of `dir` with the given extension, sorted by file name
pub fn list_text_files(dir: &Path, extension: &str) -> BatchResult<Vec<PathBuf>> {
    let files = list_entries(dir)?
        .into_iter()
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(OsStr::to_str) == Some(extension))
        .collect();
    Ok(files)
}

/// Create `dir` if it does not exist yet. The parent must already exist.
pub fn ensure_dir(dir: &Path) -> BatchResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    match std::fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(err) => Err(BatchError::io(dir, err)),
    }
}

fn list_entries(dir: &Path) -> BatchResult<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| BatchError::io(dir, std::io::Error::other(err)))?;
        entries.push(entry.into_path());
    }
    Ok(entries)
}
