//! Ingestion pipeline components.
//!
//! Stages, leaf first:
//! - **hash**: content fingerprints for dedup and naming
//! - **sanitize**: filesystem-safe base tokens from source filenames
//! - **discovery**: find candidate sources, excluding our own outputs
//! - **validate**: size and magic-byte checks before decoding
//! - **derive**: full-size and thumbnail artifact generation
//! - **runner**: orchestrates one run end to end

pub mod derive;
pub mod discovery;
pub mod hash;
pub mod runner;
pub mod sanitize;
pub mod validate;

// Re-exports for convenient access
pub use derive::{DerivationEngine, DeriveOutcome};
pub use discovery::{SourceDiscovery, SourceFile};
pub use runner::{IngestOptions, IngestPipeline, IngestReport};
pub use sanitize::safe_base;
pub use validate::Validator;
