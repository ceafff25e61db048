//! Photo ingest server.
//!
//! Wires up:
//! - Storage adapter (S3 or local filesystem)
//! - The variant pipeline on a dedicated ingest thread
//! - HTTP upload form and route

use squarecrop::adapters::http::{router, AppState};
use squarecrop::adapters::local::FsAdapter;
use squarecrop::application::{IngestWorker, VariantPipeline};
use squarecrop::config::{Config, StorageConfig};
use squarecrop::domain::imaging::JpegVariantEncoder;
use squarecrop::ports::storage::StoragePort;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // 1. Storage adapter
    let storage: Arc<dyn StoragePort> = match &config.storage {
        #[cfg(feature = "aws")]
        StorageConfig::S3(s3) => {
            info!(bucket = %s3.bucket, region = %s3.region, "using S3 storage");
            Arc::new(squarecrop::adapters::aws::S3Adapter::from_config(s3).await)
        }
        #[cfg(not(feature = "aws"))]
        StorageConfig::S3(_) => {
            error!("S3 storage requested but built without the `aws` feature");
            std::process::exit(1);
        }
        StorageConfig::Local(root) => {
            info!(root = %root.display(), "using local filesystem storage");
            Arc::new(FsAdapter::new(root.clone()))
        }
    };

    // 2. Pipeline on the dedicated ingest lane
    let pipeline = VariantPipeline::new(
        storage,
        Arc::new(JpegVariantEncoder::new()),
        config.sizes.clone(),
        config.key_scheme,
        Handle::current(),
    );
    let (ingest, _worker) = match IngestWorker::start(pipeline) {
        Ok(lane) => lane,
        Err(e) => {
            error!("failed to start ingest worker: {}", e);
            std::process::exit(1);
        }
    };

    // 3. HTTP layer
    let app = router(AppState {
        ingest,
        sizes: config.sizes.clone(),
        key_scheme: config.key_scheme,
    });

    let addr = format!("{}:{}", config.addr, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    info!("starting server on {}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {}", e);
        std::process::exit(1);
    }
}
