pub use broccoli_queue::{error::BroccoliError, queue::BroccoliQueue};

use crate::config::MqConfig;
use crate::error::MqError;

pub type MqQueue = BroccoliQueue;

pub async fn init_mq(config: MqConfig) -> Result<MqQueue, MqError> {
    BroccoliQueue::builder(&config.url)
        .pool_connections(config.pool_size)
        .build()
        .await
        .map_err(MqError::from)
}
