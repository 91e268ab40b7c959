//! Derivation of full-size and thumbnail artifacts.
//!
//! Artifact names are deterministic (`{base}-{hash}-{kind}.webp`), so a
//! target that already exists on disk is always skipped, never re-encoded
//! or overwritten. Published content may reference artifacts by path.

use exif::{In, Tag, Value};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::config::DeriveConfig;
use crate::error::PipelineError;

/// Produces the two derived artifacts for a source image.
pub struct DerivationEngine {
    config: DeriveConfig,
    full_dir: PathBuf,
    thumb_dir: PathBuf,
}

/// Result of deriving one source.
#[derive(Debug, Clone)]
pub struct DeriveOutcome {
    /// Filename of the full-size artifact
    pub full_name: String,
    /// Filename of the thumbnail artifact
    pub thumb_name: String,
    /// Artifacts newly written (0..=2); in dry-run, artifacts that would be
    /// written
    pub generated: u64,
    /// Artifacts skipped because the target already existed (0..=2)
    pub skipped: u64,
}

impl DerivationEngine {
    /// Create a new engine writing into the given output directories.
    pub fn new(config: DeriveConfig, full_dir: PathBuf, thumb_dir: PathBuf) -> Self {
        Self {
            config,
            full_dir,
            thumb_dir,
        }
    }

    /// Deterministic artifact names for a sanitized base and fingerprint.
    pub fn artifact_names(base: &str, hash: &str) -> (String, String) {
        (
            format!("{base}-{hash}-full.webp"),
            format!("{base}-{hash}-thumb.webp"),
        )
    }

    /// Derive the full and thumb artifacts for one source.
    ///
    /// Each target is handled independently: an existing file is skipped.
    /// Decoding happens at most once, only when at least one target is
    /// missing, and runs on the blocking pool. In dry-run mode existence
    /// checks and counting still happen but nothing is decoded or written.
    pub async fn derive(
        &self,
        source: &Path,
        bytes: Vec<u8>,
        hash: &str,
        base: &str,
        dry_run: bool,
    ) -> Result<DeriveOutcome, PipelineError> {
        let (full_name, thumb_name) = Self::artifact_names(base, hash);
        let full_out = self.full_dir.join(&full_name);
        let thumb_out = self.thumb_dir.join(&thumb_name);

        let need_full = !full_out.exists();
        let need_thumb = !thumb_out.exists();
        let generated = need_full as u64 + need_thumb as u64;
        let skipped = 2 - generated;

        if dry_run || generated == 0 {
            tracing::debug!(
                "Derive {:?}: {} to generate, {} existing (dry_run={})",
                source,
                generated,
                skipped,
                dry_run
            );
            return Ok(DeriveOutcome {
                full_name,
                thumb_name,
                generated,
                skipped,
            });
        }

        let config = self.config.clone();
        let source_owned = source.to_path_buf();
        tokio::task::spawn_blocking(move || {
            Self::derive_sync(
                bytes,
                &source_owned,
                &config,
                need_full.then_some(full_out),
                need_thumb.then_some(thumb_out),
            )
        })
        .await
        .map_err(|e| PipelineError::Decode {
            path: source.to_path_buf(),
            message: format!("task join error: {e}"),
        })??;

        tracing::debug!("Derived {:?}: {} generated, {} skipped", source, generated, skipped);
        Ok(DeriveOutcome {
            full_name,
            thumb_name,
            generated,
            skipped,
        })
    }

    /// Decode once, then encode whichever targets are missing.
    fn derive_sync(
        bytes: Vec<u8>,
        source: &Path,
        config: &DeriveConfig,
        full_out: Option<PathBuf>,
        thumb_out: Option<PathBuf>,
    ) -> Result<(), PipelineError> {
        let image = decode_upright(&bytes, source)?;

        if let Some(out) = full_out {
            let full = scale_full(&image, config.full_max_width);
            write_webp(&full, &out, source)?;
        }

        if let Some(out) = thumb_out {
            // Cover fit: fill the square and center-crop the overflow.
            // Sources smaller than the target edge are upscaled to fill.
            let thumb =
                image.resize_to_fill(config.thumb_size, config.thumb_size, FilterType::Lanczos3);
            write_webp(&thumb, &out, source)?;
        }

        Ok(())
    }
}

/// Decode source bytes with format sniffed from content and the EXIF
/// orientation tag applied, so output pixels are upright.
fn decode_upright(bytes: &[u8], source: &Path) -> Result<DynamicImage, PipelineError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode {
            path: source.to_path_buf(),
            message: format!("cannot detect image format: {e}"),
        })?;
    let image = reader.decode().map_err(|e| PipelineError::Decode {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(match read_orientation(bytes) {
        Some(orientation) => apply_orientation(image, orientation),
        None => image,
    })
}

/// Read the EXIF orientation tag, if any.
fn read_orientation(bytes: &[u8]) -> Option<u32> {
    let mut cursor = Cursor::new(bytes);
    let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Short(v) => v.first().map(|&x| x as u32),
            Value::Long(v) => v.first().copied(),
            _ => None,
        })
}

/// Apply an EXIF orientation (1-8) to the decoded pixels.
fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

/// Scale to at most `max_width`, preserving aspect ratio, never upscaling.
fn scale_full(image: &DynamicImage, max_width: u32) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    if w <= max_width {
        return image.clone();
    }
    let new_h = ((h as u64 * max_width as u64 + w as u64 / 2) / w as u64).max(1) as u32;
    image.resize_exact(max_width, new_h, FilterType::Lanczos3)
}

/// Encode as WebP and write the target file.
fn write_webp(image: &DynamicImage, out: &Path, source: &Path) -> Result<(), PipelineError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::WebP)
        .map_err(|e| PipelineError::Encode {
            path: source.to_path_buf(),
            message: format!("webp encode for {:?}: {e}", out),
        })?;
    std::fs::write(out, buffer.into_inner()).map_err(|e| PipelineError::Encode {
        path: source.to_path_buf(),
        message: format!("write {:?}: {e}", out),
    })
}
