//! Pipeline orchestration: one ingestion run end to end.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::manifest::{ManifestEntry, ManifestStore, OutputDirs};

use super::derive::DerivationEngine;
use super::discovery::{to_posix, SourceDiscovery, SourceFile};
use super::hash;
use super::sanitize::safe_base;
use super::validate::Validator;

/// Options for one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Input root override; defaults to the configured input directory
    pub input: Option<PathBuf>,
    /// Explicit allowlist of files (relative path from the input root, or
    /// bare filename)
    pub files: Option<Vec<String>>,
    /// Check and count, but write no artifacts and no manifest
    pub dry_run: bool,
}

/// Counts reported after a run.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Sources considered after discovery and allowlist filtering
    pub considered: u64,
    /// Artifacts generated (or, in dry-run, that would be generated)
    pub generated: u64,
    /// Artifacts skipped because they already existed
    pub skipped: u64,
    /// Manifest entries newly merged this run
    pub merged: u64,
    /// Allowlist entries that matched nothing
    pub unmatched: Vec<String>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

/// The ingestion pipeline: discovery, hashing, derivation, manifest.
///
/// One instance drives one run at a time; the manifest store it creates is
/// consumed within the run. Sources are processed strictly sequentially
/// and the first failure aborts the run before the manifest is persisted.
pub struct IngestPipeline {
    config: Config,
}

impl IngestPipeline {
    /// Create a pipeline over the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run one ingestion pass.
    pub async fn run(&self, opts: &IngestOptions) -> Result<IngestReport> {
        self.run_with_progress(opts, |_, _, _| {}).await
    }

    /// Run one ingestion pass, reporting per-file progress.
    ///
    /// The callback receives (files done, files total, current path) before
    /// each source is processed.
    pub async fn run_with_progress<F>(
        &self,
        opts: &IngestOptions,
        mut on_file: F,
    ) -> Result<IngestReport>
    where
        F: FnMut(u64, u64, &Path),
    {
        let paths = &self.config.paths;
        let input_root = match &opts.input {
            Some(dir) => paths.resolve_input(dir),
            None => paths.input_root(),
        };
        let full_dir = paths.full_out_dir();
        let thumb_dir = paths.thumb_out_dir();
        let manifest_path = paths.manifest_path();

        // Output directories are created if absent and never wiped:
        // previously generated artifacts may be referenced by published
        // content.
        std::fs::create_dir_all(&full_dir)?;
        std::fs::create_dir_all(&thumb_dir)?;

        let discovery = SourceDiscovery::new(
            self.config.processing.clone(),
            vec![full_dir.clone(), thumb_dir.clone()],
            manifest_path.clone(),
        );
        let discovered = discovery.discover(&input_root)?;
        tracing::debug!(
            "Discovered {} candidate source(s) under {:?}",
            discovered.len(),
            input_root
        );

        // Unmatched names are reported through the returned IngestReport;
        // user-facing warnings are the caller's concern.
        let (sources, unmatched) = match &opts.files {
            Some(allow) => SourceDiscovery::apply_allowlist(&input_root, discovered, allow),
            None => (discovered, Vec::new()),
        };

        let mut store = ManifestStore::load(
            &manifest_path,
            OutputDirs {
                full_dir: to_posix(&paths.full_dir),
                thumb_dir: to_posix(&paths.thumb_dir),
            },
        );
        store.record_input_root(&self.rel_from_root(&input_root));

        let validator = Validator::new(self.config.limits.clone());
        let engine = DerivationEngine::new(
            self.config.derive.clone(),
            full_dir.clone(),
            thumb_dir.clone(),
        );

        let mut report = IngestReport {
            considered: sources.len() as u64,
            dry_run: opts.dry_run,
            ..Default::default()
        };
        report.unmatched = unmatched;

        let total = sources.len() as u64;
        for (idx, source) in sources.iter().enumerate() {
            on_file(idx as u64, total, &source.path);
            self.ingest_one(source, &validator, &engine, &mut store, opts.dry_run, &mut report)
                .await?;
        }

        if opts.dry_run {
            tracing::info!("Dry run: manifest not written");
        } else {
            store.persist()?;
        }

        tracing::info!(
            considered = report.considered,
            generated = report.generated,
            skipped = report.skipped,
            merged = report.merged,
            dry_run = report.dry_run,
            "Run complete"
        );
        Ok(report)
    }

    /// Hash, sanitize, derive, and merge a single source. Fail-fast: any
    /// error propagates and aborts the run.
    async fn ingest_one(
        &self,
        source: &SourceFile,
        validator: &Validator,
        engine: &DerivationEngine,
        store: &mut ManifestStore,
        dry_run: bool,
        report: &mut IngestReport,
    ) -> Result<()> {
        validator.check_size(&source.path, source.size)?;
        let bytes = tokio::fs::read(&source.path)
            .await
            .map_err(|e| PipelineError::Read {
                path: source.path.clone(),
                message: e.to_string(),
            })?;
        validator.validate(&source.path, &bytes)?;

        let fingerprint = hash::fingerprint(&bytes);
        let base = safe_base(
            &source
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        let outcome = engine
            .derive(&source.path, bytes, &fingerprint, &base, dry_run)
            .await?;
        report.generated += outcome.generated;
        report.skipped += outcome.skipped;

        let paths = &self.config.paths;
        let entry = ManifestEntry {
            source: self.rel_from_root(&source.path),
            hash: fingerprint,
            full: format!("{}/{}", to_posix(&paths.full_dir), outcome.full_name),
            thumb: format!("{}/{}", to_posix(&paths.thumb_dir), outcome.thumb_name),
            generated_at: Utc::now(),
        };
        if store.merge(entry) {
            report.merged += 1;
        }

        Ok(())
    }

    /// Render a path relative to the project root with POSIX separators.
    ///
    /// Paths outside the root (absolute input overrides) fall back to their
    /// full rendering rather than failing.
    fn rel_from_root(&self, path: &Path) -> String {
        let root = &self.config.paths.root;
        match path.strip_prefix(root) {
            Ok(rel) => to_posix(rel),
            Err(_) => to_posix(path),
        }
    }
}
