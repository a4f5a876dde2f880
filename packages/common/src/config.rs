use serde::Deserialize;

/// Which object storage backend the server writes trace files to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Any S3-compatible service (AWS S3, MinIO, GCS interoperability).
    #[default]
    S3,
    /// Local directory, for development.
    Filesystem,
}

/// Object storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Bucket that receives uploaded traces. Default: "bucket_name".
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Region name. Default: "auto".
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom S3 endpoint (MinIO, GCS interoperability, ...).
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Use path-style bucket addressing. Default: false.
    #[serde(default)]
    pub path_style: bool,
    /// Base of the public object URL recorded on each trace.
    /// Default: "https://storage.googleapis.com".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Root directory for the filesystem backend. Default: "./data/objects".
    #[serde(default = "default_root")]
    pub root: String,
    /// Maximum accepted upload size in bytes. Default: 10 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_bucket() -> String {
    "bucket_name".into()
}
fn default_region() -> String {
    "auto".into()
}
fn default_public_base_url() -> String {
    "https://storage.googleapis.com".into()
}
fn default_root() -> String {
    "./data/objects".into()
}
fn default_max_upload_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: default_bucket(),
            region: default_region(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            path_style: false,
            public_base_url: default_public_base_url(),
            root: default_root(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// App-level MQ configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct MqAppConfig {
    /// Whether trace notifications are published. Default: true.
    #[serde(default = "default_mq_enabled")]
    pub enabled: bool,
    /// Redis connection URL. Default: "redis://localhost:6379".
    #[serde(default = "default_mq_url")]
    pub url: String,
    /// Connection pool size. Default: 5.
    #[serde(default = "default_mq_pool_size")]
    pub pool_size: u8,
}

fn default_mq_enabled() -> bool {
    true
}
fn default_mq_url() -> String {
    "redis://localhost:6379".into()
}
fn default_mq_pool_size() -> u8 {
    5
}

impl Default for MqAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_mq_enabled(),
            url: default_mq_url(),
            pool_size: default_mq_pool_size(),
        }
    }
}
