pub mod config;
pub mod error;
pub mod models;
pub mod publisher;

pub use config::MqConfig;
pub use error::MqError;
pub use models::{BroccoliError, MqQueue, init_mq};
pub use publisher::{Delivery, EventPublisher, QueuePublisher};
