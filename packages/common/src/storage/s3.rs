use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tracing::debug;

use super::error::StorageError;
use super::traits::{BoxReader, ObjectAttrs, ObjectStore, public_object_url};
use crate::config::StorageConfig;

/// Object store backed by any S3-compatible service.
///
/// Google Cloud Storage is reachable through its interoperability endpoint
/// (`https://storage.googleapis.com`) with HMAC keys.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    bucket_name: String,
    public_base_url: String,
}

impl S3ObjectStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        let mut bucket =
            Bucket::new(&config.bucket, region, credentials).map_err(backend_error)?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            bucket_name: config.bucket.clone(),
            public_base_url: config.public_base_url.clone(),
        })
    }
}

fn backend_error(err: S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket_name
    }

    async fn put_stream(
        &self,
        key: &str,
        mut reader: BoxReader,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket
            .put_object_stream_with_content_type(&mut reader, key, content_type)
            .await
            .map_err(backend_error)?;

        let status = response.status_code();
        if !is_success(status) {
            return Err(StorageError::Backend(format!(
                "upload of {key} returned HTTP {status}"
            )));
        }

        debug!(key, status, "Object stream closed");
        Ok(())
    }

    async fn attrs(&self, key: &str) -> Result<ObjectAttrs, StorageError> {
        let (head, status) = self.bucket.head_object(key).await.map_err(|e| match e {
            S3Error::HttpFailWithBody(404, _) => StorageError::NotFound(key.to_string()),
            other => backend_error(other),
        })?;

        if status == 404 {
            return Err(StorageError::NotFound(key.to_string()));
        }
        if !is_success(status) {
            return Err(StorageError::Backend(format!(
                "head of {key} returned HTTP {status}"
            )));
        }

        Ok(ObjectAttrs {
            name: key.to_string(),
            size: head
                .content_length
                .and_then(|len| u64::try_from(len).ok())
                .unwrap_or(0),
            content_type: head.content_type,
        })
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self.bucket.get_object(key).await.map_err(|e| match e {
            S3Error::HttpFailWithBody(404, _) => StorageError::NotFound(key.to_string()),
            other => backend_error(other),
        })?;

        match response.status_code() {
            404 => Err(StorageError::NotFound(key.to_string())),
            status if is_success(status) => Ok(response.bytes().to_vec()),
            status => Err(StorageError::Backend(format!(
                "get of {key} returned HTTP {status}"
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let response = self.bucket.delete_object(key).await.map_err(|e| match e {
            S3Error::HttpFailWithBody(404, _) => StorageError::NotFound(key.to_string()),
            other => backend_error(other),
        });

        match response {
            Ok(r) if r.status_code() == 404 => Ok(false),
            Ok(r) if is_success(r.status_code()) => Ok(true),
            Ok(r) => Err(StorageError::Backend(format!(
                "delete of {key} returned HTTP {}",
                r.status_code()
            ))),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn public_url(&self, name: &str) -> String {
        public_object_url(&self.public_base_url, &self.bucket_name, name)
    }
}
