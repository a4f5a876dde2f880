use serde_json::json;

use crate::common::{ADMIN, STUDENT, TestApp, routes};

#[tokio::test]
async fn new_user_can_register() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::USER,
            &json!({"username": "alice", "password": "securepass"}),
            None,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["username"], "alice");
    assert_eq!(res.body["role"], "user");
    assert!(res.body.get("password").is_none());
}

#[tokio::test]
async fn taken_username_conflicts() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::USER,
            &json!({"username": STUDENT.0, "password": "another-pass"}),
            None,
        )
        .await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body, json!({"error": "Username is already taken"}));
}

#[tokio::test]
async fn invalid_registration_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::USER,
            &json!({"username": "bob", "password": "short"}),
            None,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["error"], "Password must be 8-128 characters");
}

#[tokio::test]
async fn malformed_json_uses_error_body() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(routes::USER, &json!({"username": "bob"}), None)
        .await;

    assert_eq!(res.status, 400);
    assert!(res.body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn registered_user_can_authenticate() {
    let app = TestApp::spawn().await;
    app.post_json(
        routes::USER,
        &json!({"username": "carol", "password": "carol-password"}),
        None,
    )
    .await;
    let course_id = app.create_course().await;

    let res = app
        .upload(
            &routes::traces(course_id),
            Some(b"%PDF-1.4".to_vec()),
            None,
            Some(("carol", "carol-password")),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let res = app
        .upload(
            &routes::traces(course_id),
            Some(b"%PDF-1.4".to_vec()),
            None,
            Some(("carol", ADMIN.1)),
        )
        .await;
    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH, None).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"status": "ok"}));
}

#[tokio::test]
async fn metrics_count_requests_by_route_template() {
    let app = TestApp::spawn().await;
    app.get(routes::HEALTH, None).await;
    app.get(routes::HEALTH, None).await;
    app.get(&routes::course(uuid::Uuid::new_v4()), None).await;

    let res = app.get(routes::METRICS, None).await;

    assert_eq!(res.status, 200);
    assert!(res.text.contains("# TYPE http_requests_total counter"), "{}", res.text);
    let health = res
        .text
        .lines()
        .find(|l| l.starts_with("http_requests_total") && l.contains("path=\"/healthz\""))
        .expect("healthz counter missing");
    assert!(health.contains("method=\"GET\""));
    assert!(health.ends_with(" 2"), "{health}");
    assert!(
        res.text.contains("path=\"/v1/course/{course_id}\""),
        "{}",
        res.text
    );
    assert!(!res.text.contains("path=\"/metrics\""));
}
