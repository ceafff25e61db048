//! Configuration loaded once at startup from the environment.

use crate::domain::sizes::{KeyScheme, SizeSpec, SizeSpecError};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing S3 parameter {0}")]
    MissingS3Param(&'static str),
    #[error("UPLOAD_SIZES: {0}")]
    Sizes(#[from] SizeSpecError),
    #[error("KEY_SCHEME: {0}")]
    KeyScheme(String),
    #[error("unknown STORAGE_BACKEND {0:?} (expected \"s3\" or \"local\")")]
    Backend(String),
}

/// Credentials and location of the destination bucket.
#[derive(Clone, Debug)]
pub struct S3Config {
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Endpoint of an S3-compatible store, if not AWS itself.
    pub endpoint: Option<String>,
}

#[derive(Clone, Debug)]
pub enum StorageConfig {
    S3(S3Config),
    /// Write objects below a local directory.
    Local(PathBuf),
}

#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Variants produced for every photo
    pub sizes: SizeSpec,
    /// How storage keys are built
    pub key_scheme: KeyScheme,
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if any).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let sizes = match var("UPLOAD_SIZES") {
            Some(list) => SizeSpec::parse(&list)?,
            None => SizeSpec::default(),
        };
        let key_scheme = match var("KEY_SCHEME") {
            Some(scheme) => scheme.parse::<KeyScheme>().map_err(ConfigError::KeyScheme)?,
            None => KeyScheme::default(),
        };

        let backend = var("STORAGE_BACKEND").unwrap_or_else(|| String::from("s3"));
        let storage = match backend.to_ascii_lowercase().as_str() {
            "s3" => StorageConfig::S3(S3Config {
                bucket: var("S3_BUCKET_NAME").ok_or(ConfigError::MissingS3Param("S3_BUCKET_NAME"))?,
                access_key: var("S3_ACCESS_KEY").ok_or(ConfigError::MissingS3Param("S3_ACCESS_KEY"))?,
                secret_key: var("S3_SECRET_KEY").ok_or(ConfigError::MissingS3Param("S3_SECRET_KEY"))?,
                region: var("S3_REGION").unwrap_or_else(|| String::from("us-east-1")),
                endpoint: var("S3_ENDPOINT"),
            }),
            "local" => StorageConfig::Local(PathBuf::from(
                var("STORAGE_DIR").unwrap_or_else(|| String::from("./uploads")),
            )),
            _ => return Err(ConfigError::Backend(backend)),
        };

        Ok(Self {
            addr: var("ADDR").unwrap_or_else(|| String::from("127.0.0.1")),
            port: var("PORT").unwrap_or_else(|| String::from("8080")),
            sizes,
            key_scheme,
            storage,
        })
    }
}
