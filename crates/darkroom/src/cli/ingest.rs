//! The `darkroom ingest` command.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use darkroom_core::{Config, IngestOptions, IngestPipeline};

/// Arguments for the `ingest` command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Input root to read sources from (defaults to the configured incoming
    /// directory)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Comma-separated list of files to ingest (relative path from the
    /// input root, or bare filename)
    #[arg(long, value_delimiter = ',')]
    pub files: Option<Vec<String>>,

    /// Check and report without writing artifacts or the manifest
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the ingest command.
pub async fn execute(config: Config, args: IngestArgs) -> anyhow::Result<()> {
    let manifest_path = config.paths.manifest_path();
    let pipeline = IngestPipeline::new(config);

    let options = IngestOptions {
        input: args.input,
        files: args
            .files
            .map(|fs| fs.into_iter().map(|f| f.trim().to_string()).filter(|f| !f.is_empty()).collect()),
        dry_run: args.dry_run,
    };

    let progress = create_progress_bar();
    let report = pipeline
        .run_with_progress(&options, |done, total, path| {
            if done == 0 {
                progress.set_length(total);
            }
            progress.set_position(done);
            if let Some(name) = path.file_name() {
                progress.set_message(name.to_string_lossy().into_owned());
            }
        })
        .await?;
    progress.finish_and_clear();

    for name in &report.unmatched {
        tracing::warn!("Requested file not found: {}", name);
    }

    let dry_note = if report.dry_run { " (dry-run)" } else { "" };
    println!("Sources considered: {}", report.considered);
    println!("Artifacts generated: {}{dry_note}", report.generated);
    println!("Artifacts skipped (already existed): {}", report.skipped);
    println!("Manifest entries merged: {}{dry_note}", report.merged);
    if report.dry_run {
        println!("Manifest: not written (dry-run)");
    } else {
        println!("Manifest: {}", manifest_path.display());
    }

    Ok(())
}

/// Progress bar over the source loop; length is set once discovery knows
/// the total.
fn create_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("=>-"),
    );
    bar
}
