//! Trace upload orchestration.

mod service;

pub use service::{TraceUpload, TraceUploadError, TraceUploadService, trace_uploaded_event};
