//! Squarecrop - Photo ingest and square-variant upload library
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (crop, resize, encode, sizes and keys)
//! - ports/: Trait definitions (object storage)
//! - adapters/: Concrete implementations (S3, local filesystem, HTTP)
//! - application/: The ingest lane and the variant pipeline
//! - config: Environment configuration
//!
//! # Features
//! - `aws` (default): S3 storage adapter

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports for convenience
pub use application::{IngestHandle, IngestWorker, VariantPipeline};
pub use config::Config;
pub use domain::jobs::PhotoJob;
pub use domain::sizes::{KeyScheme, SizeSpec, VariantSize};
pub use ports::storage::{StoragePort, Visibility};
