use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Metadata of a stored object as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAttrs {
    /// Canonical name of the object inside its bucket.
    pub name: String,
    pub size: u64,
    pub content_type: Option<String>,
}

/// Key-addressed object storage bound to a single bucket.
///
/// Writing to an existing key replaces the previous object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket (or container) this store writes into.
    fn bucket(&self) -> &str;

    /// Store bytes under `key`.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(key, reader, content_type).await
    }

    /// Stream the reader into a new object under `key`. The object is only
    /// visible once the write has been closed successfully.
    async fn put_stream(
        &self,
        key: &str,
        reader: BoxReader,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Fetch the attributes of a stored object.
    async fn attrs(&self, key: &str) -> Result<ObjectAttrs, StorageError>;

    /// Retrieve all bytes of an object.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Publicly resolvable location of an object in this store's bucket.
    fn public_url(&self, name: &str) -> String;
}

/// `{base}/{bucket}/{name}`, tolerating a trailing slash on `base`.
pub fn public_object_url(base: &str, bucket: &str, name: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), bucket, name)
}

/// Validates a flat object key (no directory components allowed).
pub fn validate_object_key(key: &str) -> Result<&str, StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key cannot be empty".into()));
    }
    if key.chars().any(|c| c.is_ascii_control()) {
        return Err(StorageError::InvalidKey(
            "control characters are not allowed".into(),
        ));
    }
    if key.contains('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "path separators are not allowed".into(),
        ));
    }
    if key.starts_with('.') {
        return Err(StorageError::InvalidKey(
            "keys starting with '.' are not allowed".into(),
        ));
    }
    Ok(key)
}
