//! darkroom-core - Image ingestion and derivation library.
//!
//! darkroom takes raw source images, derives a full-size variant and a
//! square thumbnail from each, and records the result in a durable,
//! append-only JSON manifest. Repeated runs over growing or overlapping
//! input sets never duplicate work, never overwrite previously published
//! artifacts, and never lose the record of what was derived from what.
//!
//! # Architecture
//!
//! ```text
//! Discover → Fingerprint + Sanitize → Derive (full, thumb) → Manifest
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use darkroom_core::{Config, IngestOptions, IngestPipeline};
//!
//! #[tokio::main]
//! async fn main() -> darkroom_core::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = IngestPipeline::new(config);
//!     let report = pipeline.run(&IngestOptions::default()).await?;
//!     println!("generated {} artifact(s)", report.generated);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, DarkroomError, PipelineError, PipelineResult, Result};
pub use manifest::{Manifest, ManifestEntry, ManifestStore, OutputDirs};
pub use pipeline::{IngestOptions, IngestPipeline, IngestReport};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
