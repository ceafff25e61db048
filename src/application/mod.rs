//! Application layer - The ingest lane and the variant pipeline it drives.

pub mod pipeline;
pub mod worker;


pub use pipeline::{upload_variant, VariantError, VariantPipeline};
pub use worker::{IngestHandle, IngestWorker, JobHandler, SubmitError};
