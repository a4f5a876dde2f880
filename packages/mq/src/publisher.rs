use std::sync::Arc;

use async_trait::async_trait;
use common::GenericEvent;
use tracing::debug;

use crate::error::MqError;
use crate::models::MqQueue;

/// Broker acknowledgement for a published message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub topic: String,
    /// Broker-assigned message id.
    pub message_id: String,
}

/// Fire-and-forget message emission to a named topic.
///
/// Delivery is at-least-once; a single attempt is made per call.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn send(&self, topic: &str, payload: serde_json::Value) -> Result<Delivery, MqError>;

    /// Serialize an [`Event`] and send it to its own topic.
    async fn publish_event(&self, event: &GenericEvent) -> Result<Delivery, MqError> {
        self.send(&event.topic, event.payload.clone()).await
    }
}

/// Publisher backed by the Redis queue.
#[derive(Clone)]
pub struct QueuePublisher {
    queue: Arc<MqQueue>,
}

impl QueuePublisher {
    pub fn new(queue: Arc<MqQueue>) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl EventPublisher for QueuePublisher {
    async fn send(&self, topic: &str, payload: serde_json::Value) -> Result<Delivery, MqError> {
        let message = self.queue.publish(topic, None, &payload, None).await?;
        let message_id = message.task_id.to_string();

        debug!(topic, message_id = %message_id, "Message published");

        Ok(Delivery {
            topic: topic.to_string(),
            message_id,
        })
    }
}
