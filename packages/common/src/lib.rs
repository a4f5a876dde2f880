pub mod config;
pub mod event;
pub mod storage;
pub mod trace_status;

pub use event::{Event, GenericEvent, TRACE_UPLOAD_TOPIC, TraceUploadedEvent};
pub use trace_status::TraceStatus;
