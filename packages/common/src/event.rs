use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Topic that receives a notification for every stored trace file.
pub const TRACE_UPLOAD_TOPIC: &str = "pdf-upload";

/// Core event trait
pub trait Event: Send + Sync + Sized + Serialize + DeserializeOwned {
    /// Get the event topic (e.g., "pdf-upload")
    fn topic(&self) -> &str;

    /// Convert event to a generic event
    fn to_generic_event(&self) -> Result<GenericEvent, serde_json::Error> {
        Ok(GenericEvent {
            topic: self.topic().to_string(),
            payload: serde_json::to_value(self)?,
        })
    }

    /// Create an event from a generic event
    fn from_generic_event(e: &GenericEvent) -> Result<Self, serde_json::Error> {
        serde_json::from_value(e.payload.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Flat notification emitted after a trace file reached object storage.
///
/// Every value is a string. Downstream indexers match on the lower-cased
/// descriptive fields, so build it through [`TraceUploadedEvent::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceUploadedEvent {
    pub instructor_name: String,
    /// Subject code and course number separated by a space, e.g. "cs 101".
    pub course_code: String,
    pub semester_term: String,
    pub semester_year: String,
    pub course_name: String,
    pub credit_hours: String,
    /// Public location of the stored file, kept verbatim.
    pub bucket_path: String,
}

impl TraceUploadedEvent {
    /// Lower-case every descriptive field; `bucket_path` is left untouched.
    pub fn normalized(self) -> Self {
        Self {
            instructor_name: self.instructor_name.to_lowercase(),
            course_code: self.course_code.to_lowercase(),
            semester_term: self.semester_term.to_lowercase(),
            semester_year: self.semester_year.to_lowercase(),
            course_name: self.course_name.to_lowercase(),
            credit_hours: self.credit_hours.to_lowercase(),
            bucket_path: self.bucket_path,
        }
    }
}

impl Event for TraceUploadedEvent {
    fn topic(&self) -> &str {
        TRACE_UPLOAD_TOPIC
    }
}
