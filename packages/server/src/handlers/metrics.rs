use axum::{extract::State, http::header, response::IntoResponse};

use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    operation_id = "metrics",
    summary = "Prometheus metrics",
    description = "Exposes `http_requests_total{path,method}` in the Prometheus text format.",
    responses(
        (status = 200, description = "Prometheus text exposition", body = String, content_type = "text/plain"),
    ),
)]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
