//! Sub-configuration structs with defaults matching the stock gallery layout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-relative path layout.
///
/// All paths except `root` are interpreted relative to `root`; the resolved
/// accessors join them. Manifest paths are recorded with these relative
/// values (POSIX separators), so they stay stable across machines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Project root all other paths hang off
    pub root: PathBuf,

    /// Default directory raw sources are read from
    pub input_dir: PathBuf,

    /// Directory full-size derivatives are written to
    pub full_dir: PathBuf,

    /// Directory thumbnails are written to
    pub thumb_dir: PathBuf,

    /// Manifest document path
    pub manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            input_dir: PathBuf::from("incoming"),
            full_dir: PathBuf::from("gallery/full"),
            thumb_dir: PathBuf::from("gallery/thumb"),
            manifest: PathBuf::from("gallery/manifest.json"),
        }
    }
}

impl PathsConfig {
    /// Resolved default input root.
    pub fn input_root(&self) -> PathBuf {
        self.root.join(&self.input_dir)
    }

    /// Resolved full-size output directory.
    pub fn full_out_dir(&self) -> PathBuf {
        self.root.join(&self.full_dir)
    }

    /// Resolved thumbnail output directory.
    pub fn thumb_out_dir(&self) -> PathBuf {
        self.root.join(&self.thumb_dir)
    }

    /// Resolved manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }

    /// Resolve an input override against the project root.
    ///
    /// Absolute overrides are taken as-is; relative ones are joined to root.
    pub fn resolve_input(&self, input: &Path) -> PathBuf {
        if input.is_absolute() {
            input.to_path_buf()
        } else {
            self.root.join(input)
        }
    }
}

/// Derivation settings for both artifact kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveConfig {
    /// Maximum width of the full-size variant (never upscaled)
    pub full_max_width: u32,

    /// WebP quality for the full-size variant
    pub full_quality: u8,

    /// Edge length of the square thumbnail (cover + center crop)
    pub thumb_size: u32,

    /// WebP quality for the thumbnail
    pub thumb_quality: u8,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            full_max_width: 1600,
            full_quality: 82,
            thumb_size: 600,
            thumb_quality: 78,
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Supported input formats (extension, case-insensitive).
    ///
    /// AVIF is absent from the defaults: the image stack has no AVIF
    /// decoder, and under the fail-fast policy one undecodable source
    /// would abort the whole run. Add "avif" here only with a build that
    /// can decode it.
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "tif".to_string(),
                "tiff".to_string(),
            ],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum source file size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    pub level: String,

    /// Log format ("pretty" or "json")
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
