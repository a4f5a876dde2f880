use serde_json::json;

use crate::common::{ADMIN, STUDENT, TestApp, routes};

#[tokio::test]
async fn admin_creates_and_anyone_reads_instructors() {
    let app = TestApp::spawn().await;
    let grace = app.create_instructor("Grace Hopper").await;
    app.create_instructor("Ada Lovelace").await;

    let res = app.get(routes::INSTRUCTORS, None).await;
    assert_eq!(res.status, 200);
    let names: Vec<_> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Ada Lovelace", "Grace Hopper"]);

    let res = app.get(&routes::instructor(grace), None).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["name"], "Grace Hopper");
}

#[tokio::test]
async fn non_admin_cannot_create_instructor() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(routes::INSTRUCTORS, &json!({"name": "Eve"}), Some(STUDENT))
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["error"], "Insufficient permissions");
}

#[tokio::test]
async fn blank_instructor_name_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(routes::INSTRUCTORS, &json!({"name": "   "}), Some(ADMIN))
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn unknown_instructor_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::instructor(uuid::Uuid::new_v4()), None).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body, json!({"error": "Instructor not found"}));
}
