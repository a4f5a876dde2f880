use std::sync::Arc;

use common::storage::{BoxReader, ObjectStore, StorageError};
use common::{Event, TraceStatus, TraceUploadedEvent};
use mq::EventPublisher;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::entity::{course, instructor, trace};
use crate::store::{EntityStore, NewTrace, StoreError};
use crate::utils::filename::{TraceNameParts, derive_trace_filename};

/// One inbound upload attempt.
pub struct TraceUpload {
    pub course_id: Uuid,
    pub uploader_id: Uuid,
    pub payload: BoxReader,
    pub vector_id: Option<String>,
}

/// Failures that end an upload without a usable result.
///
/// A failed storage write is not among them: it is recorded on the trace row.
#[derive(Debug, Error)]
pub enum TraceUploadError {
    #[error("failed to fetch course: {0}")]
    Course(#[source] StoreError),
    #[error("failed to fetch instructor: {0}")]
    Instructor(#[source] StoreError),
    #[error("failed to insert trace record: {0}")]
    Persist(#[source] StoreError),
}

/// Coordinates course lookup, object storage, trace bookkeeping and the
/// downstream notification for a single upload.
pub struct TraceUploadService {
    store: Arc<dyn EntityStore>,
    objects: Arc<dyn ObjectStore>,
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl TraceUploadService {
    pub fn new(
        store: Arc<dyn EntityStore>,
        objects: Arc<dyn ObjectStore>,
        publisher: Option<Arc<dyn EventPublisher>>,
    ) -> Self {
        Self {
            store,
            objects,
            publisher,
        }
    }

    /// Run one upload attempt and return the trace row it produced.
    ///
    /// The row is written exactly once, after the storage attempt, whatever its
    /// outcome. Its `status` tells the caller whether the file was stored.
    #[instrument(
        skip(self, upload),
        fields(course_id = %upload.course_id, uploader_id = %upload.uploader_id)
    )]
    pub async fn upload(&self, upload: TraceUpload) -> Result<trace::Model, TraceUploadError> {
        let TraceUpload {
            course_id,
            uploader_id,
            payload,
            vector_id,
        } = upload;

        let course = self.store.get_course(course_id).await.map_err(|e| {
            error!(error = %e, "Failed to fetch course");
            TraceUploadError::Course(e)
        })?;

        let instructor = self
            .store
            .get_instructor(course.instructor_id)
            .await
            .map_err(|e| {
                error!(error = %e, instructor_id = %course.instructor_id, "Failed to fetch instructor");
                TraceUploadError::Instructor(e)
            })?;

        let file_name = derive_trace_filename(&name_parts(&course, &instructor));

        let (status, bucket_url) = match self.store_object(&file_name, payload).await {
            Ok(url) => (TraceStatus::Uploaded, url),
            Err(e) => {
                warn!(error = %e, key = %file_name, "Failed to upload trace to object storage");
                (TraceStatus::Failed, String::new())
            }
        };

        let trace = self
            .store
            .insert_trace(NewTrace {
                user_id: uploader_id,
                instructor_id: instructor.id,
                course_id: course.id,
                status,
                vector_id,
                file_name,
                bucket_url,
            })
            .await
            .map_err(|e| {
                error!(error = %e, status = %status, "Failed to insert trace record");
                TraceUploadError::Persist(e)
            })?;

        if trace.status == TraceStatus::Uploaded {
            self.notify(&course, &instructor, &trace.bucket_url).await;
        }

        Ok(trace)
    }

    /// Stream the payload under `key` and return the public location of the stored object.
    async fn store_object(&self, key: &str, payload: BoxReader) -> Result<String, StorageError> {
        let content_type = mime_guess::from_path(key).first_or_octet_stream();
        self.objects
            .put_stream(key, payload, content_type.essence_str())
            .await?;

        let attrs = self.objects.attrs(key).await?;
        debug!(name = %attrs.name, size = attrs.size, "Trace stored");

        Ok(self.objects.public_url(&attrs.name))
    }

    async fn notify(
        &self,
        course: &course::Model,
        instructor: &instructor::Model,
        bucket_url: &str,
    ) {
        let Some(publisher) = &self.publisher else {
            debug!("No publisher configured, skipping trace notification");
            return;
        };

        let event = trace_uploaded_event(course, instructor, bucket_url);
        let generic = match event.to_generic_event() {
            Ok(generic) => generic,
            Err(e) => {
                warn!(error = %e, "Failed to encode trace notification");
                return;
            }
        };

        match publisher.publish_event(&generic).await {
            Ok(delivery) => info!(
                topic = %delivery.topic,
                message_id = %delivery.message_id,
                "Trace notification published"
            ),
            Err(e) => warn!(error = %e, topic = %generic.topic, "Failed to publish trace notification"),
        }
    }
}

fn name_parts<'a>(
    course: &'a course::Model,
    instructor: &'a instructor::Model,
) -> TraceNameParts<'a> {
    TraceNameParts {
        course_name: &course.name,
        instructor_name: &instructor.name,
        subject_code: &course.subject_code,
        course_number: course.course_number,
        semester_term: &course.semester_term,
        semester_year: course.semester_year,
    }
}

/// Downstream notification for a stored trace file.
pub fn trace_uploaded_event(
    course: &course::Model,
    instructor: &instructor::Model,
    bucket_url: &str,
) -> TraceUploadedEvent {
    TraceUploadedEvent {
        instructor_name: instructor.name.clone(),
        course_code: format!("{} {}", course.subject_code, course.course_number),
        semester_term: course.semester_term.clone(),
        semester_year: course.semester_year.to_string(),
        course_name: course.name.clone(),
        credit_hours: course.credit_hours.to_string(),
        bucket_path: bucket_url.to_string(),
    }
    .normalized()
}
