use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusRecorder};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Path served by the exporter; requests to it are not counted.
pub const METRICS_PATH: &str = "/metrics";

const UNMATCHED_PATH: &str = "unmatched";

/// Request counters held in a recorder owned by the app, not the process-global one.
#[derive(Clone)]
pub struct HttpMetrics {
    recorder: Arc<PrometheusRecorder>,
}

impl HttpMetrics {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        metrics::with_local_recorder(&recorder, || {
            metrics::describe_counter!(
                HTTP_REQUESTS_TOTAL,
                "Total number of HTTP requests per endpoint"
            );
        });
        Self {
            recorder: Arc::new(recorder),
        }
    }

    pub fn record_request(&self, path: &str, method: &str) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            metrics::counter!(
                HTTP_REQUESTS_TOTAL,
                "path" => path.to_string(),
                "method" => method.to_string()
            )
            .increment(1);
        });
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.recorder.handle().render()
    }
}

impl Default for HttpMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Count each request under its route template, e.g. `/v1/course/{course_id}`.
pub async fn track_requests(
    State(metrics): State<HttpMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_PATH.to_owned());

    if path != METRICS_PATH {
        metrics.record_request(&path, request.method().as_str());
    }

    next.run(request).await
}
