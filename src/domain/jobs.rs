use image::DynamicImage;

/// A decoded photo waiting for the ingest lane.
///
/// Built by the request layer once decoding succeeded, consumed exactly once
/// by the worker and dropped when the pipeline returns.
#[derive(Debug, Clone)]
pub struct PhotoJob {
    pub image: DynamicImage,
    /// Base name used to derive every storage key of this photo.
    pub filename: String,
}

impl PhotoJob {
    pub fn new(image: DynamicImage, filename: impl Into<String>) -> Self {
        Self {
            image,
            filename: filename.into(),
        }
    }
}
