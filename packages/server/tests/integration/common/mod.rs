use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use ::common::GenericEvent;
use ::common::config::{MqAppConfig, StorageConfig};
use ::common::storage::filesystem::FilesystemObjectStore;
use ::common::storage::{BoxReader, ObjectAttrs, ObjectStore, StorageError};
use mq::{Delivery, EventPublisher, MqError};
use reqwest::Client;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::sync::Mutex;
use uuid::Uuid;

use course_api::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, LogConfig, ServerConfig,
};
use course_api::entity::user::DEFAULT_ROLE;
use course_api::state::AppState;
use course_api::store::{EntityStore, MemoryStore, NewUser, UserRepo};
use course_api::telemetry::HttpMetrics;
use course_api::trace::TraceUploadService;
use course_api::utils::hash;

pub const ADMIN: (&str, &str) = ("admin", "admin-password");
pub const STUDENT: (&str, &str) = ("student", "student-password");

pub const BUCKET: &str = "bucket_name";
pub const PUBLIC_BASE: &str = "https://storage.googleapis.com";

pub mod routes {
    use uuid::Uuid;

    pub const HEALTH: &str = "/healthz";
    pub const METRICS: &str = "/metrics";
    pub const USER: &str = "/v1/user";
    pub const INSTRUCTORS: &str = "/v1/instructor";
    pub const COURSES: &str = "/v1/course";

    pub fn instructor(id: Uuid) -> String {
        format!("/v1/instructor/{id}")
    }

    pub fn course(id: impl std::fmt::Display) -> String {
        format!("/v1/course/{id}")
    }

    pub fn traces(course_id: impl std::fmt::Display) -> String {
        format!("/v1/course/{course_id}/trace")
    }

    pub fn trace(course_id: Uuid, trace_id: impl std::fmt::Display) -> String {
        format!("/v1/course/{course_id}/trace/{trace_id}")
    }
}

/// Object store whose writes always fail.
pub struct UnavailableObjectStore;

#[async_trait]
impl ObjectStore for UnavailableObjectStore {
    fn bucket(&self) -> &str {
        BUCKET
    }

    async fn put_stream(
        &self,
        _key: &str,
        _reader: BoxReader,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        Err(StorageError::Backend("storage service unavailable".into()))
    }

    async fn attrs(&self, key: &str) -> Result<ObjectAttrs, StorageError> {
        Err(StorageError::NotFound(key.to_string()))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<bool, StorageError> {
        Ok(false)
    }

    fn public_url(&self, name: &str) -> String {
        ::common::storage::public_object_url(PUBLIC_BASE, BUCKET, name)
    }
}

/// Publisher that records every message and optionally fails the send.
#[derive(Default)]
pub struct RecordingPublisher {
    pub fail: bool,
    pub sent: Mutex<Vec<GenericEvent>>,
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn send(&self, topic: &str, payload: Value) -> Result<Delivery, MqError> {
        let mut sent = self.sent.lock().await;
        sent.push(GenericEvent {
            topic: topic.to_string(),
            payload,
        });
        if self.fail {
            return Err(MqError::Internal("broker unavailable".into()));
        }
        Ok(Delivery {
            topic: topic.to_string(),
            message_id: sent.len().to_string(),
        })
    }
}

/// Collaborator behavior for a spawned app.
#[derive(Default, Clone, Copy)]
pub struct Options {
    pub storage_fails: bool,
    pub publisher_fails: bool,
}

/// A running test server over in-memory collaborators.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemoryStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub publisher: Arc<RecordingPublisher>,
    _storage_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    pub www_authenticate: Option<String>,
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let www_authenticate = res
            .headers()
            .get(reqwest::header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            www_authenticate,
        }
    }

    pub fn id(&self) -> Uuid {
        self.body["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("response body should contain a UUID 'id'")
    }
}

fn test_config(storage: StorageConfig) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig::default(),
        },
        database: DatabaseConfig {
            url: "memory://".to_string(),
            max_connections: 5,
            min_connections: 1,
            timeout_secs: 8,
        },
        storage,
        mq: MqAppConfig {
            enabled: false,
            ..Default::default()
        },
        auth: AuthConfig {
            admin_username: Some(ADMIN.0.to_string()),
            admin_password: Some(ADMIN.1.to_string()),
        },
        log: LogConfig::default(),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Options::default()).await
    }

    pub async fn spawn_with(options: Options) -> Self {
        let storage_dir = TempDir::new().expect("Failed to create storage dir");
        let storage = StorageConfig {
            root: storage_dir.path().to_string_lossy().into_owned(),
            bucket: BUCKET.to_string(),
            public_base_url: PUBLIC_BASE.to_string(),
            ..Default::default()
        };
        let config = test_config(storage);

        let store = Arc::new(MemoryStore::new());
        course_api::seed::ensure_admin(store.as_ref(), &config.auth)
            .await
            .expect("Failed to seed admin");
        store
            .create_user(NewUser {
                username: STUDENT.0.to_string(),
                password_hash: hash::hash_password(STUDENT.1).expect("hash"),
                role: DEFAULT_ROLE.to_string(),
            })
            .await
            .expect("Failed to seed student");

        let objects: Arc<dyn ObjectStore> = if options.storage_fails {
            Arc::new(UnavailableObjectStore)
        } else {
            Arc::new(
                FilesystemObjectStore::new(
                    storage_dir.path().to_path_buf(),
                    BUCKET,
                    PUBLIC_BASE,
                    config.storage.max_upload_size,
                )
                .await
                .expect("Failed to create filesystem object store"),
            )
        };

        let publisher = Arc::new(RecordingPublisher {
            fail: options.publisher_fails,
            ..Default::default()
        });

        let entity_store: Arc<dyn EntityStore> = store.clone();
        let uploads = Arc::new(TraceUploadService::new(
            entity_store.clone(),
            objects.clone(),
            Some(publisher.clone() as Arc<dyn EventPublisher>),
        ));

        let state = AppState {
            config: Arc::new(config),
            store: entity_store,
            uploads,
            metrics: HttpMetrics::new(),
        };
        let app = course_api::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            store,
            objects,
            publisher,
            _storage_dir: storage_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        auth: Option<(&str, &str)>,
    ) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match auth {
            Some((username, password)) => builder.basic_auth(username, Some(password)),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, auth: Option<(&str, &str)>) -> TestResponse {
        let res = self
            .request(reqwest::Method::GET, path, auth)
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        auth: Option<(&str, &str)>,
    ) -> TestResponse {
        let res = self
            .request(reqwest::Method::POST, path, auth)
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_json(
        &self,
        path: &str,
        body: &Value,
        auth: Option<(&str, &str)>,
    ) -> TestResponse {
        let res = self
            .request(reqwest::Method::PATCH, path, auth)
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str, auth: Option<(&str, &str)>) -> TestResponse {
        let res = self
            .request(reqwest::Method::DELETE, path, auth)
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// POST a multipart form with an optional `file` part and `vector_id` field.
    pub async fn upload(
        &self,
        path: &str,
        file: Option<Vec<u8>>,
        vector_id: Option<&str>,
        auth: Option<(&str, &str)>,
    ) -> TestResponse {
        let mut form = reqwest::multipart::Form::new();
        if let Some(bytes) = file {
            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name("syllabus.pdf")
                .mime_str("application/pdf")
                .expect("Failed to set MIME type");
            form = form.part("file", part);
        }
        if let Some(vector_id) = vector_id {
            form = form.text("vector_id", vector_id.to_string());
        }

        let res = self
            .request(reqwest::Method::POST, path, auth)
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    /// Create an instructor as admin and return its id.
    pub async fn create_instructor(&self, name: &str) -> Uuid {
        let res = self
            .post_json(routes::INSTRUCTORS, &json!({"name": name}), Some(ADMIN))
            .await;
        assert_eq!(res.status, 201, "create instructor failed: {}", res.text);
        res.id()
    }

    /// Create an instructor and a course taught by them, returning the course id.
    pub async fn create_course(&self) -> Uuid {
        let instructor_id = self.create_instructor("Ada Lovelace").await;
        let res = self
            .post_json(routes::COURSES, &course_body(instructor_id), Some(ADMIN))
            .await;
        assert_eq!(res.status, 201, "create course failed: {}", res.text);
        res.id()
    }
}

pub fn course_body(instructor_id: Uuid) -> Value {
    json!({
        "name": "Intro to Computing",
        "subject_code": "CS",
        "course_number": 101,
        "semester_term": "Fall",
        "semester_year": 2024,
        "credit_hours": 4,
        "instructor_id": instructor_id,
    })
}
