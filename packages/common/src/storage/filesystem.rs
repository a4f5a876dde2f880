use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::error::StorageError;
use super::traits::{BoxReader, ObjectAttrs, ObjectStore, public_object_url, validate_object_key};

/// Filesystem-backed object store.
///
/// Objects live at `{root}/{bucket}/{key}`. Writes go to `{root}/.tmp` first and are
/// renamed into place, so readers never observe a partially written object.
pub struct FilesystemObjectStore {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(
        root: PathBuf,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        let bucket = bucket.into();
        validate_object_key(&bucket)?;
        fs::create_dir_all(root.join(&bucket)).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            bucket,
            public_base_url: public_base_url.into(),
            max_size,
        })
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let key = validate_object_key(key)?;
        Ok(self.root.join(&self.bucket).join(key))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_stream(
        &self,
        key: &str,
        mut reader: BoxReader,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let object_path = self.object_path(key)?;
        let temp_path = self.temp_path();
        let mut total_bytes: u64 = 0;

        let mut buf = vec![0u8; 64 * 1024];
        let mut temp_file = fs::File::create(&temp_path).await?;

        let copied = async {
            loop {
                let n = reader.read(&mut buf).await?;
                if n == 0 {
                    break;
                }

                total_bytes += n as u64;
                if total_bytes > self.max_size {
                    return Err(StorageError::SizeLimitExceeded {
                        actual: total_bytes,
                        limit: self.max_size,
                    });
                }

                temp_file.write_all(&buf[..n]).await?;
            }
            temp_file.flush().await?;
            Ok(())
        }
        .await;
        drop(temp_file);

        if let Err(e) = copied {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn attrs(&self, key: &str) -> Result<ObjectAttrs, StorageError> {
        let object_path = self.object_path(key)?;
        match fs::metadata(&object_path).await {
            Ok(meta) => Ok(ObjectAttrs {
                name: key.to_string(),
                size: meta.len(),
                content_type: None,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let object_path = self.object_path(key)?;
        match fs::read(&object_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(key)?;
        match fs::remove_file(&object_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, name: &str) -> String {
        public_object_url(&self.public_base_url, &self.bucket, name)
    }
}
