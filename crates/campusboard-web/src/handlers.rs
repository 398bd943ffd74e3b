//! HTTP handlers for the REST API.
//!
//! Collection endpoints are generic over [`Record`], so every resource gets
//! the same list / create / read / replace / delete behavior.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use campusboard_core::client::UPLOAD_FIELD;
use campusboard_core::models::{is_date_key, AttendanceRecord, UploadResponse};
use campusboard_core::store::{Record, StoreSummary};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health
// =============================================================================

pub async fn index() -> &'static str {
    "campusboard API is running"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub collections: StoreSummary,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        collections: state.store.summary(),
    })
}

/// GET /api/dashboard
pub async fn dashboard_summary(State(state): State<AppState>) -> Json<StoreSummary> {
    Json(state.store.summary())
}

// =============================================================================
// Generic CRUD
// =============================================================================

/// GET /api/{collection}
pub async fn list_records<T>(State(state): State<AppState>) -> Json<Vec<T>>
where
    T: Record + Serialize,
{
    Json(T::collection(&state.store).list())
}

/// POST /api/{collection}
pub async fn create_record<T>(
    State(state): State<AppState>,
    Json(record): Json<T>,
) -> Result<(StatusCode, Json<T>), AppError>
where
    T: Record + Serialize + DeserializeOwned,
{
    let created = T::collection(&state.store).insert(record)?;
    debug!(collection = T::COLLECTION, id = created.id(), "Created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/{collection}/{id}
pub async fn get_record<T>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<T>
where
    T: Record + Serialize,
{
    Ok(Json(T::collection(&state.store).get(&id)?))
}

/// PUT /api/{collection}/{id}
pub async fn replace_record<T>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(record): Json<T>,
) -> HandlerResult<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    Ok(Json(T::collection(&state.store).replace(&id, record)?))
}

/// DELETE /api/{collection}/{id}
pub async fn delete_record<T>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    T: Record,
{
    T::collection(&state.store).remove(&id)?;
    debug!(collection = T::COLLECTION, id = %id, "Deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Attendance
// =============================================================================

/// A submission is either one record or a whole class at once
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AttendanceSubmission {
    Many(Vec<AttendanceRecord>),
    One(AttendanceRecord),
}

/// POST /api/attendance
///
/// A submission is stored whole or not at all.
pub async fn submit_attendance(
    State(state): State<AppState>,
    Json(submission): Json<AttendanceSubmission>,
) -> Result<(StatusCode, Json<Vec<AttendanceRecord>>), AppError> {
    let records = match submission {
        AttendanceSubmission::Many(records) => records,
        AttendanceSubmission::One(record) => vec![record],
    };
    if records.is_empty() {
        return Err(AppError::BadRequest("no attendance records submitted".to_string()));
    }
    let stored = state.store.attendance.insert_all(records)?;

    info!(
        batch = %stored[0].batch,
        date = %stored[0].date,
        count = stored.len(),
        "Attendance submitted"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/attendance/batch/{batch}/{date}
pub async fn attendance_for_batch(
    State(state): State<AppState>,
    Path((batch, date)): Path<(String, String)>,
) -> HandlerResult<Vec<AttendanceRecord>> {
    if !is_date_key(&date) {
        return Err(AppError::BadRequest(format!(
            "invalid date '{}', expected YYYY-MM-DD",
            date
        )));
    }
    Ok(Json(state.store.attendance_for(&batch, &date)))
}

// =============================================================================
// Uploads
// =============================================================================

/// POST /api/upload/faculty/{user_id}
///
/// Stores the `profileImg` part under the upload directory and points the
/// linked faculty record at it.
pub async fn upload_faculty_image(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    mut multipart: Multipart,
) -> HandlerResult<UploadResponse> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let original_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
        upload = Some((original_name, bytes));
    }

    let (original_name, bytes) = upload
        .ok_or_else(|| AppError::BadRequest(format!("missing '{}' field", UPLOAD_FIELD)))?;

    if state.store.faculty_by_account(&user_id).is_none() {
        return Err(AppError::NotFound(format!(
            "no faculty linked to user {}",
            user_id
        )));
    }

    let stored_name = stored_file_name(
        &user_id,
        original_name.as_deref(),
        chrono::Utc::now().timestamp_millis(),
    );
    tokio::fs::create_dir_all(&state.upload_dir).await?;
    tokio::fs::write(state.upload_dir.join(&stored_name), &bytes).await?;

    let file_path = format!("/uploads/{}", stored_name);
    state.store.set_faculty_image(&user_id, &file_path)?;

    info!(user = %user_id, path = %file_path, bytes = bytes.len(), "Profile image stored");
    Ok(Json(UploadResponse { file_path }))
}

/// `<user>-<millis>.<ext>`, restricted to characters safe in a path segment
pub fn stored_file_name(user_id: &str, original_name: Option<&str>, millis: i64) -> String {
    let user: String = user_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let user = if user.is_empty() { "user".to_string() } else { user };

    let ext = original_name
        .and_then(|name| std::path::Path::new(name).extension())
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string());

    format!("{}-{}.{}", user, millis, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name() {
        assert_eq!(stored_file_name("u1", Some("me.PNG"), 42), "u1-42.png");
        assert_eq!(stored_file_name("u1", None, 42), "u1-42.bin");
        assert_eq!(stored_file_name("u1", Some("archive.tar.gz"), 1), "u1-1.gz");
    }

    #[test]
    fn test_stored_file_name_strips_path_characters() {
        assert_eq!(stored_file_name("../../etc", Some("x.png"), 7), "etc-7.png");
        assert_eq!(stored_file_name("///", Some("x.p/ng"), 7), "user-7.bin");
        assert_eq!(stored_file_name("u1", Some("x.ph p"), 7), "u1-7.bin");
    }
}
