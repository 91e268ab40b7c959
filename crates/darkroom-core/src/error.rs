//! Error types for the darkroom ingestion pipeline.
//!
//! Errors are organized by stage so failures carry the file path and the
//! specific stage that rejected it.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for darkroom operations.
#[derive(Error, Debug)]
pub enum DarkroomError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
///
/// Any of these aborts the run before the manifest is persisted.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading a source file failed
    #[error("Read error for {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Encoding or writing a derived artifact failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Source file exceeds the size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Source file is not a recognizable image container
    #[error("Invalid image for {path}: {message}")]
    InvalidImage { path: PathBuf, message: String },

    /// Writing the manifest document failed
    #[error("Manifest write error for {path}: {message}")]
    ManifestWrite { path: PathBuf, message: String },
}

/// Convenience type alias for darkroom results.
pub type Result<T> = std::result::Result<T, DarkroomError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
