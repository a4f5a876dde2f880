use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/user", user_routes())
        .nest("/instructor", instructor_routes())
        .nest("/course", course_routes(config))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::user::create_user))
}

fn instructor_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::instructor::list_instructors,
            handlers::instructor::create_instructor
        ))
        .routes(routes!(handlers::instructor::get_instructor))
}

fn course_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::course::create_course))
        .routes(routes!(
            handlers::course::get_course,
            handlers::course::update_course,
            handlers::course::delete_course
        ))
        .nest("/{course_id}/trace", trace_routes(config))
}

fn trace_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::trace::list_traces,
            handlers::trace::upload_trace
        ))
        .routes(routes!(
            handlers::trace::get_trace,
            handlers::trace::delete_trace
        ))
        .layer(handlers::trace::trace_upload_body_limit(
            config.storage.max_upload_size,
        ))
}
