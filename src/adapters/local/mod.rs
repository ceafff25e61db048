//! Local adapters for development without an S3 bucket.

pub mod fs;

pub use fs::FsAdapter;
