use crate::config::S3Config;
use crate::ports::storage::{StoragePort, Visibility};
use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use std::error::Error;

/// S3Adapter implements StoragePort for AWS S3 and S3-compatible stores.
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    bucket: String,
}

impl S3Adapter {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Build a client from static credentials, region and optional endpoint.
    pub async fn from_config(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "squarecrop-env",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        // Custom endpoints (MinIO and friends) usually need path-style addressing.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        Self::new(Client::from_conf(s3_config), config.bucket.clone())
    }
}

fn canned_acl(visibility: Visibility) -> ObjectCannedAcl {
    match visibility {
        Visibility::PublicRead => ObjectCannedAcl::PublicRead,
    }
}

#[async_trait]
impl StoragePort for S3Adapter {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        visibility: Visibility,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .acl(canned_acl(visibility))
            .body(ByteStream::from(bytes))
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_acl() {
        assert_eq!(canned_acl(Visibility::PublicRead), ObjectCannedAcl::PublicRead);
    }
}
