use ::common::TraceStatus;
use serde_json::json;
use uuid::Uuid;

use crate::common::{ADMIN, Options, STUDENT, TestApp, routes};

const PDF: &[u8] = b"%PDF-1.4 syllabus";
const MAX_UPLOAD: usize = 10 * 1024 * 1024;
const EXPECTED_NAME: &str = "Intro_to_Computing_Ada_Lovelace_CS_101_Fall_2024.pdf";

fn expected_url() -> String {
    format!("https://storage.googleapis.com/bucket_name/{EXPECTED_NAME}")
}

mod upload {
    use super::*;

    #[tokio::test]
    async fn stores_file_records_row_and_notifies() {
        let app = TestApp::spawn().await;
        let course_id = app.create_course().await;

        let res = app
            .upload(&routes::traces(course_id), Some(PDF.to_vec()), None, Some(STUDENT))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["message"], "File uploaded successfully");
        assert_eq!(res.body["bucket_url"], expected_url());

        let traces = app.store.all_traces().await;
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].status, TraceStatus::Uploaded);
        assert_eq!(traces[0].course_id, course_id);
        assert_eq!(traces[0].file_name, EXPECTED_NAME);
        assert_eq!(traces[0].bucket_url, expected_url());

        assert_eq!(app.objects.get(EXPECTED_NAME).await.unwrap(), PDF);

        let sent = app.publisher.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, "pdf-upload");
        assert_eq!(
            sent[0].payload,
            json!({
                "instructor_name": "ada lovelace",
                "course_code": "cs 101",
                "semester_term": "fall",
                "semester_year": "2024",
                "course_name": "intro to computing",
                "credit_hours": "4",
                "bucket_path": expected_url(),
            })
        );
    }

    #[tokio::test]
    async fn keeps_vector_id() {
        let app = TestApp::spawn().await;
        let course_id = app.create_course().await;

        let res = app
            .upload(
                &routes::traces(course_id),
                Some(PDF.to_vec()),
                Some("vec-42"),
                Some(STUDENT),
            )
            .await;

        assert_eq!(res.status, 201);
        let traces = app.store.all_traces().await;
        assert_eq!(traces[0].vector_id.as_deref(), Some("vec-42"));
    }

    #[tokio::test]
    async fn keeps_vector_id_verbatim() {
        let app = TestApp::spawn().await;
        let course_id = app.create_course().await;

        let res = app
            .upload(
                &routes::traces(course_id),
                Some(PDF.to_vec()),
                Some(" vec 42 "),
                Some(STUDENT),
            )
            .await;

        assert_eq!(res.status, 201);
        let traces = app.store.all_traces().await;
        assert_eq!(traces[0].vector_id.as_deref(), Some(" vec 42 "));
    }

    #[tokio::test]
    async fn accepts_file_at_size_limit() {
        let app = TestApp::spawn().await;
        let course_id = app.create_course().await;

        let res = app
            .upload(
                &routes::traces(course_id),
                Some(vec![b'a'; MAX_UPLOAD]),
                None,
                Some(STUDENT),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(app.objects.get(EXPECTED_NAME).await.unwrap().len(), MAX_UPLOAD);
    }

    #[tokio::test]
    async fn rejects_file_one_byte_over_limit() {
        let app = TestApp::spawn().await;
        let course_id = app.create_course().await;

        let res = app
            .upload(
                &routes::traces(course_id),
                Some(vec![b'a'; MAX_UPLOAD + 1]),
                None,
                Some(STUDENT),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body,
            json!({"error": "File exceeds maximum size of 10485760 bytes"})
        );
        assert!(app.store.all_traces().await.is_empty());
        assert!(app.objects.get(EXPECTED_NAME).await.is_err());
        assert!(app.publisher.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn rejects_body_over_router_limit() {
        let app = TestApp::spawn().await;
        let course_id = app.create_course().await;

        let res = app
            .upload(
                &routes::traces(course_id),
                Some(vec![b'a'; 12 * 1024 * 1024]),
                None,
                Some(STUDENT),
            )
            .await;

        assert_eq!(res.status, 400);
        assert!(app.store.all_traces().await.is_empty());
        assert!(app.objects.get(EXPECTED_NAME).await.is_err());
    }

    #[tokio::test]
    async fn storage_failure_is_recorded_as_failed() {
        let app = TestApp::spawn_with(Options {
            storage_fails: true,
            ..Default::default()
        })
        .await;
        let course_id = app.create_course().await;

        let res = app
            .upload(&routes::traces(course_id), Some(PDF.to_vec()), None, Some(STUDENT))
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body, json!({"error": "Failed to upload file to storage"}));

        let traces = app.store.all_traces().await;
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].status, TraceStatus::Failed);
        assert_eq!(traces[0].bucket_url, "");
        assert!(app.publisher.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_course_writes_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(
                &routes::traces(Uuid::new_v4()),
                Some(PDF.to_vec()),
                None,
                Some(STUDENT),
            )
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body, json!({"error": "Failed to fetch course details"}));
        assert!(app.store.all_traces().await.is_empty());
        assert!(app.publisher.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn publisher_failure_does_not_change_response() {
        let app = TestApp::spawn_with(Options {
            publisher_fails: true,
            ..Default::default()
        })
        .await;
        let course_id = app.create_course().await;

        let res = app
            .upload(&routes::traces(course_id), Some(PDF.to_vec()), None, Some(STUDENT))
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["bucket_url"], expected_url());
        assert_eq!(app.store.all_traces().await.len(), 1);
        assert_eq!(app.publisher.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_uploads_each_get_a_row() {
        let app = TestApp::spawn().await;
        let course_id = app.create_course().await;
        let path = routes::traces(course_id);

        let (first, second) = tokio::join!(
            app.upload(&path, Some(PDF.to_vec()), None, Some(STUDENT)),
            app.upload(&path, Some(PDF.to_vec()), None, Some(ADMIN)),
        );

        assert_eq!(first.status, 201);
        assert_eq!(second.status, 201);
        assert_eq!(first.body["bucket_url"], second.body["bucket_url"]);

        let traces = app.store.all_traces().await;
        assert_eq!(traces.len(), 2);
        assert_ne!(traces[0].id, traces[1].id);
    }

    #[tokio::test]
    async fn missing_file_is_bad_request() {
        let app = TestApp::spawn().await;
        let course_id = app.create_course().await;

        let res = app
            .upload(&routes::traces(course_id), None, Some("vec-1"), Some(STUDENT))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body, json!({"error": "Missing 'file' field"}));
        assert!(app.store.all_traces().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_course_id_is_bad_request() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(&routes::traces("abc"), Some(PDF.to_vec()), None, Some(STUDENT))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "Invalid course_id format");
    }

    #[tokio::test]
    async fn requires_credentials() {
        let app = TestApp::spawn().await;
        let course_id = app.create_course().await;

        let res = app
            .upload(&routes::traces(course_id), Some(PDF.to_vec()), None, None)
            .await;

        assert_eq!(res.status, 401);
        assert!(res.www_authenticate.is_some());
        assert!(app.store.all_traces().await.is_empty());
    }
}

mod manage {
    use super::*;

    async fn uploaded(app: &TestApp) -> (Uuid, Uuid) {
        let course_id = app.create_course().await;
        let res = app
            .upload(&routes::traces(course_id), Some(PDF.to_vec()), None, Some(STUDENT))
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let trace_id = app.store.all_traces().await[0].id;
        (course_id, trace_id)
    }

    #[tokio::test]
    async fn admin_lists_traces() {
        let app = TestApp::spawn().await;
        let (course_id, trace_id) = uploaded(&app).await;

        let res = app.get(&routes::traces(course_id), Some(ADMIN)).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], trace_id.to_string());
        assert_eq!(data[0]["status"], "uploaded");
    }

    #[tokio::test]
    async fn student_cannot_list_traces() {
        let app = TestApp::spawn().await;
        let (course_id, _) = uploaded(&app).await;

        let res = app.get(&routes::traces(course_id), Some(STUDENT)).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body, json!({"error": "Insufficient permissions"}));
    }

    #[tokio::test]
    async fn listing_requires_credentials() {
        let app = TestApp::spawn().await;
        let (course_id, _) = uploaded(&app).await;

        let res = app.get(&routes::traces(course_id), None).await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn admin_gets_trace() {
        let app = TestApp::spawn().await;
        let (course_id, trace_id) = uploaded(&app).await;

        let res = app.get(&routes::trace(course_id, trace_id), Some(ADMIN)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["file_name"], EXPECTED_NAME);
        assert_eq!(res.body["bucket_url"], expected_url());
    }

    #[tokio::test]
    async fn student_cannot_get_or_delete() {
        let app = TestApp::spawn().await;
        let (course_id, trace_id) = uploaded(&app).await;

        let res = app.get(&routes::trace(course_id, trace_id), Some(STUDENT)).await;
        assert_eq!(res.status, 403);

        let res = app
            .delete(&routes::trace(course_id, trace_id), Some(STUDENT))
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(app.store.all_traces().await.len(), 1);
    }

    #[tokio::test]
    async fn trace_under_other_course_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, trace_id) = uploaded(&app).await;

        let res = app
            .get(&routes::trace(Uuid::new_v4(), trace_id), Some(ADMIN))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body, json!({"error": "Trace not found"}));
    }

    #[tokio::test]
    async fn malformed_trace_id_is_bad_request() {
        let app = TestApp::spawn().await;
        let (course_id, _) = uploaded(&app).await;

        let res = app.get(&routes::trace(course_id, "nope"), Some(ADMIN)).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "Invalid trace_id format");
    }

    #[tokio::test]
    async fn admin_deletes_trace_and_object_remains() {
        let app = TestApp::spawn().await;
        let (course_id, trace_id) = uploaded(&app).await;

        let res = app
            .delete(&routes::trace(course_id, trace_id), Some(ADMIN))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({"message": "Trace deleted successfully"}));

        assert!(app.store.all_traces().await.is_empty());
        assert!(app.objects.get(EXPECTED_NAME).await.is_ok());

        let res = app
            .delete(&routes::trace(course_id, trace_id), Some(ADMIN))
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn traces_outlive_their_course() {
        let app = TestApp::spawn().await;
        let (course_id, trace_id) = uploaded(&app).await;

        let res = app.delete(&routes::course(course_id), Some(ADMIN)).await;
        assert_eq!(res.status, 200);

        let res = app.get(&routes::traces(course_id), Some(ADMIN)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"][0]["id"], trace_id.to_string());
    }
}
