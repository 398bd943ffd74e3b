//! Web router using Axum

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use campusboard_core::models::{AttendanceRecord, Course, Exam, Faculty, ScheduleEntry, Student};
use campusboard_core::Record;
use serde::{de::DeserializeOwned, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Largest accepted request body (profile images included)
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create the web router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route("/api/dashboard", get(handlers::dashboard_summary));

    router = with_crud::<Student>(router);
    router = with_crud::<Faculty>(router);
    router = with_crud::<Course>(router);
    router = with_crud::<Exam>(router);
    router = with_crud::<ScheduleEntry>(router);

    router
        .route(
            "/api/attendance",
            get(handlers::list_records::<AttendanceRecord>)
                .post(handlers::submit_attendance),
        )
        .route(
            "/api/attendance/batch/{batch}/{date}",
            get(handlers::attendance_for_batch),
        )
        .route(
            "/api/attendance/{id}",
            get(handlers::get_record::<AttendanceRecord>)
                .delete(handlers::delete_record::<AttendanceRecord>),
        )
        .route(
            "/api/upload/faculty/{user_id}",
            post(handlers::upload_faculty_image),
        )
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `/api/<collection>` and `/api/<collection>/{id}` for one record type
fn with_crud<T>(router: Router<AppState>) -> Router<AppState>
where
    T: Record + Serialize + DeserializeOwned,
{
    let base = format!("/api/{}", T::COLLECTION);
    let item = format!("/api/{}/{{id}}", T::COLLECTION);
    router
        .route(
            &base,
            get(handlers::list_records::<T>).post(handlers::create_record::<T>),
        )
        .route(
            &item,
            get(handlers::get_record::<T>)
                .put(handlers::replace_record::<T>)
                .delete(handlers::delete_record::<T>),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusboard_core::ResourceStore;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Arc::new(ResourceStore::new()), "uploads");
        let _router = create_router(state);
    }
}
