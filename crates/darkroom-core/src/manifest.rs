//! Append-only manifest of derived artifacts.
//!
//! The manifest is the durable record of every (source, full, thumb)
//! triple ever derived. It is loaded once per run, merged in memory, and
//! rewritten whole at the end; entries are never removed by the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// One derived-artifact record.
///
/// All paths are relative to the project root with POSIX separators.
/// Manifest membership is keyed on the full (source, hash, full, thumb)
/// quadruple: the same bytes under two source names yield two entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Source file path, the durable identity key
    pub source: String,
    /// Content fingerprint of the source bytes
    pub hash: String,
    /// Path of the full-size artifact
    pub full: String,
    /// Path of the thumbnail artifact
    pub thumb: String,
    /// When this entry was first recorded
    pub generated_at: DateTime<Utc>,
}

/// Output directory layout recorded in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDirs {
    pub full_dir: String,
    pub thumb_dir: String,
}

/// The whole manifest document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// When the document was last persisted
    pub generated_at: DateTime<Utc>,
    /// Every input root ever ingested from (relative paths)
    pub input_dirs: Vec<String>,
    /// Output directory layout
    pub output: OutputDirs,
    /// Ordered sequence of entries, canonically sorted on persist
    pub items: Vec<ManifestEntry>,
}

/// Owns the manifest document for the duration of one run.
///
/// Constructed by [`ManifestStore::load`], mutated only through
/// [`merge`](ManifestStore::merge) and
/// [`record_input_root`](ManifestStore::record_input_root), and written back
/// only by [`persist`](ManifestStore::persist).
pub struct ManifestStore {
    path: PathBuf,
    manifest: Manifest,
}

impl ManifestStore {
    /// Load the manifest at `path`, or start a fresh document.
    ///
    /// A missing file starts fresh silently. A file that fails strict
    /// parsing also starts fresh, with a warning: manifest corruption must
    /// never block ingestion, it only loses prior bookkeeping. Artifacts on
    /// disk are untouched and re-ingestion is idempotent by content hash.
    pub fn load(path: &Path, output: OutputDirs) -> Self {
        let manifest = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Manifest>(&content) {
                Ok(mut existing) => {
                    tracing::debug!(
                        "Loaded manifest with {} items from {:?}",
                        existing.items.len(),
                        path
                    );
                    existing.output = output.clone();
                    existing
                }
                Err(e) => {
                    tracing::warn!(
                        "Manifest at {:?} is corrupt ({e}); starting a fresh document",
                        path
                    );
                    Self::fresh(output.clone())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::fresh(output.clone()),
            Err(e) => {
                tracing::warn!(
                    "Manifest at {:?} is unreadable ({e}); starting a fresh document",
                    path
                );
                Self::fresh(output.clone())
            }
        };

        Self {
            path: path.to_path_buf(),
            manifest,
        }
    }

    fn fresh(output: OutputDirs) -> Manifest {
        Manifest {
            generated_at: Utc::now(),
            input_dirs: Vec::new(),
            output,
            items: Vec::new(),
        }
    }

    /// Append an entry unless its (source, hash, full, thumb) quadruple is
    /// already present. Returns whether the entry was inserted.
    pub fn merge(&mut self, entry: ManifestEntry) -> bool {
        let exists = self.manifest.items.iter().any(|it| {
            it.source == entry.source
                && it.hash == entry.hash
                && it.full == entry.full
                && it.thumb == entry.thumb
        });
        if exists {
            return false;
        }
        self.manifest.items.push(entry);
        true
    }

    /// Record an input root (relative path) in the `inputDirs` set.
    pub fn record_input_root(&mut self, rel: &str) {
        if !rel.is_empty() && !self.manifest.input_dirs.iter().any(|d| d == rel) {
            self.manifest.input_dirs.push(rel.to_string());
        }
    }

    /// Sort items canonically and rewrite the whole document.
    ///
    /// The only point where manifest state becomes visible outside the
    /// process. Callers skip this entirely in dry-run mode.
    pub fn persist(&mut self) -> Result<(), PipelineError> {
        self.manifest
            .items
            .sort_by(|a, b| a.source.cmp(&b.source).then_with(|| a.hash.cmp(&b.hash)));
        self.manifest.generated_at = Utc::now();

        let json = serde_json::to_string_pretty(&self.manifest).map_err(|e| {
            PipelineError::ManifestWrite {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        std::fs::write(&self.path, json + "\n").map_err(|e| PipelineError::ManifestWrite {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(
            "Persisted manifest with {} items to {:?}",
            self.manifest.items.len(),
            self.path
        );
        Ok(())
    }

    /// Number of entries currently in the document.
    pub fn len(&self) -> usize {
        self.manifest.items.len()
    }

    /// Whether the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.manifest.items.is_empty()
    }

    /// Read access to the in-memory document.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}
