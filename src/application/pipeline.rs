use crate::application::worker::JobHandler;
use crate::domain::imaging::{crop_square, resize_square, EncodeError, VariantEncoder};
use crate::domain::jobs::PhotoJob;
use crate::domain::sizes::{KeyScheme, SizeSpec, VariantSize};
use crate::ports::storage::{StoragePort, Visibility};
use image::{DynamicImage, GenericImageView};
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum VariantError {
    #[error("couldn't encode: {0}")]
    Encode(#[from] EncodeError),
    #[error("encode task failed: {0}")]
    EncodeTask(#[from] tokio::task::JoinError),
    #[error("error uploading: {0}")]
    Storage(Box<dyn Error + Send + Sync>),
}

/// Turns one photo into every configured variant and hands each to storage.
///
/// Crop and resize run on the caller's thread (the ingest lane). Encoding and
/// uploading are detached onto `runtime` and never joined.
pub struct VariantPipeline<S: ?Sized, E> {
    storage: Arc<S>,
    encoder: Arc<E>,
    sizes: SizeSpec,
    key_scheme: KeyScheme,
    runtime: Handle,
}

impl<S, E> VariantPipeline<S, E>
where
    S: StoragePort + ?Sized + 'static,
    E: VariantEncoder + 'static,
{
    pub fn new(
        storage: Arc<S>,
        encoder: Arc<E>,
        sizes: SizeSpec,
        key_scheme: KeyScheme,
        runtime: Handle,
    ) -> Self {
        Self {
            storage,
            encoder,
            sizes,
            key_scheme,
            runtime,
        }
    }

    /// Build the variants of `job` and dispatch their uploads.
    ///
    /// Returns the keys dispatched, in configured order. Returning says nothing
    /// about whether any upload finished or succeeded.
    pub fn run(&self, job: PhotoJob) -> Vec<String> {
        let PhotoJob { image, filename } = job;

        // One crop per photo, shared by every square size.
        let square = crop_square(&image);
        debug!(
            filename = %filename,
            original = ?image.dimensions(),
            side = square.width(),
            "computed square crop"
        );

        let original = Arc::new(image);
        let mut keys = Vec::with_capacity(self.sizes.len());
        for size in self.sizes.iter() {
            let variant = match size {
                VariantSize::Full => Arc::clone(&original),
                VariantSize::Square(side) => Arc::new(resize_square(&square, side)),
            };
            let key = self.key_scheme.key(&filename, size);
            self.dispatch(key.clone(), variant);
            keys.push(key);
        }
        keys
    }

    fn dispatch(&self, key: String, variant: Arc<DynamicImage>) {
        let storage = Arc::clone(&self.storage);
        let encoder = Arc::clone(&self.encoder);
        debug!(key = %key, "dispatching variant");

        self.runtime.spawn(async move {
            if let Err(e) = upload_variant(storage.as_ref(), encoder, &key, variant).await {
                error!(key = %key, "variant skipped: {}", e);
            }
        });
    }
}

impl<S, E> JobHandler for VariantPipeline<S, E>
where
    S: StoragePort + ?Sized + 'static,
    E: VariantEncoder + 'static,
{
    fn handle(&self, job: PhotoJob) {
        self.run(job);
    }
}

/// Encode `variant` off the async threads, then store it publicly under `key`.
pub async fn upload_variant<S, E>(
    storage: &S,
    encoder: Arc<E>,
    key: &str,
    variant: Arc<DynamicImage>,
) -> Result<(), VariantError>
where
    S: StoragePort + ?Sized,
    E: VariantEncoder + 'static,
{
    let encoded = tokio::task::spawn_blocking(move || encoder.encode(&variant)).await??;

    info!(key, bytes = encoded.bytes.len(), "starting upload");
    storage
        .put(key, encoded.bytes, encoded.content_type, Visibility::PublicRead)
        .await
        .map_err(VariantError::Storage)?;
    info!(key, "done uploading");
    Ok(())
}
