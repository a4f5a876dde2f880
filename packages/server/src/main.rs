use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use common::config::StorageBackend;
use common::storage::ObjectStore;
use common::storage::filesystem::FilesystemObjectStore;
use common::storage::s3::S3ObjectStore;
use mq::{EventPublisher, MqConfig, QueuePublisher, init_mq};
use tracing::{Level, info, warn};

use course_api::config::AppConfig;
use course_api::database;
use course_api::seed;
use course_api::state::AppState;
use course_api::telemetry::HttpMetrics;
use course_api::trace::TraceUploadService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    let level = config.log.level.parse().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let store = database::connect_store(&config.database)
        .await
        .context("Failed to connect to the database")?;

    seed::ensure_admin(store.as_ref(), &config.auth)
        .await
        .context("Failed to seed bootstrap admin")?;

    let objects = build_object_store(&config).await?;
    info!(bucket = objects.bucket(), backend = ?config.storage.backend, "Object storage ready");

    let publisher = connect_publisher(&config).await;

    let uploads = Arc::new(TraceUploadService::new(
        store.clone(),
        objects,
        publisher,
    ));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        config: Arc::new(config),
        store,
        uploads,
        metrics: HttpMetrics::new(),
    };
    let app = course_api::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_object_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let storage = &config.storage;
    let store: Arc<dyn ObjectStore> = match storage.backend {
        StorageBackend::S3 => Arc::new(
            S3ObjectStore::new(storage).context("Failed to configure S3 object storage")?,
        ),
        StorageBackend::Filesystem => Arc::new(
            FilesystemObjectStore::new(
                PathBuf::from(&storage.root),
                storage.bucket.clone(),
                storage.public_base_url.clone(),
                storage.max_upload_size,
            )
            .await
            .context("Failed to prepare filesystem object storage")?,
        ),
    };
    Ok(store)
}

/// Trace notifications are optional: without a queue the server still serves uploads.
async fn connect_publisher(config: &AppConfig) -> Option<Arc<dyn EventPublisher>> {
    if !config.mq.enabled {
        info!("MQ disabled, trace notifications are off");
        return None;
    }

    match init_mq(MqConfig::from(&config.mq)).await {
        Ok(queue) => {
            info!(url = %config.mq.url, "MQ connected");
            Some(Arc::new(QueuePublisher::new(Arc::new(queue))))
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to MQ, trace notifications are off");
            None
        }
    }
}
