//! Resource API client
//!
//! [`ResourceApi`] is the seam between the dashboard logic and the REST
//! backend; [`HttpResourceClient`] implements it with reqwest.

use crate::error::{ClientError, ProfileError};
use crate::models::{AttendanceRecord, Exam, Faculty, ScheduleEntry, Student, UploadResponse};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default REST base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Multipart field carrying the profile image
pub const UPLOAD_FIELD: &str = "profileImg";

/// Reads the dashboard needs from the backend
#[allow(async_fn_in_trait)]
pub trait ResourceApi {
    /// GET /schedule
    async fn schedule(&self) -> Result<Vec<ScheduleEntry>, ClientError>;

    /// GET /attendance/batch/{batch}/{date}
    async fn attendance_for(
        &self,
        batch: &str,
        date: &str,
    ) -> Result<Vec<AttendanceRecord>, ClientError>;

    /// GET /students
    async fn students(&self) -> Result<Vec<Student>, ClientError>;

    /// GET /exams
    async fn exams(&self) -> Result<Vec<Exam>, ClientError>;

    /// GET /faculty
    async fn faculty(&self) -> Result<Vec<Faculty>, ClientError>;

    /// POST /upload/faculty/{user_id} (multipart)
    async fn upload_faculty_image(
        &self,
        user_id: &str,
        image: ImageUpload,
    ) -> Result<UploadResponse, ClientError>;
}

/// An image file selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image from disk, guessing its content type from the extension
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let bytes = std::fs::read(path).map_err(|source| ProfileError::ReadImage {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// reqwest-backed client for the campusboard REST API
#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpResourceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                message: "URL cannot carry a path".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "GET");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        decode(url, response).await
    }
}

async fn decode<T: DeserializeOwned>(url: Url, response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.json::<T>().await.map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}

impl ResourceApi for HttpResourceClient {
    async fn schedule(&self) -> Result<Vec<ScheduleEntry>, ClientError> {
        self.get_json(&["schedule"]).await
    }

    async fn attendance_for(
        &self,
        batch: &str,
        date: &str,
    ) -> Result<Vec<AttendanceRecord>, ClientError> {
        self.get_json(&["attendance", "batch", batch, date]).await
    }

    async fn students(&self) -> Result<Vec<Student>, ClientError> {
        self.get_json(&["students"]).await
    }

    async fn exams(&self) -> Result<Vec<Exam>, ClientError> {
        self.get_json(&["exams"]).await
    }

    async fn faculty(&self) -> Result<Vec<Faculty>, ClientError> {
        self.get_json(&["faculty"]).await
    }

    async fn upload_faculty_image(
        &self,
        user_id: &str,
        image: ImageUpload,
    ) -> Result<UploadResponse, ClientError> {
        let url = self.endpoint(&["upload", "faculty", user_id])?;
        debug!(url = %url, bytes = image.bytes.len(), "POST multipart");

        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ClientError::InvalidRequest {
                message: format!("invalid content type {}: {}", image.content_type, e),
            })?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        decode(url, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpResourceClient {
        HttpResourceClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:5000/api");
        let url = c.endpoint(&["attendance", "batch", "B1", "2024-05-01"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/attendance/batch/B1/2024-05-01"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let c = client("http://localhost:5000/api/");
        let url = c.endpoint(&["schedule"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/schedule");
    }

    #[test]
    fn test_endpoint_encodes_batch_names() {
        let c = client("http://localhost:5000/api");
        let url = c.endpoint(&["attendance", "batch", "CS A/1", "2024-05-01"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/attendance/batch/CS%20A%2F1/2024-05-01"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpResourceClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));

        let err = HttpResourceClient::new("mailto:someone", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn test_image_content_type() {
        assert_eq!(ImageUpload::new("me.PNG", vec![]).content_type, "image/png");
        assert_eq!(ImageUpload::new("me.jpeg", vec![]).content_type, "image/jpeg");
        assert_eq!(
            ImageUpload::new("me", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_image_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.webp");
        std::fs::write(&path, b"img").unwrap();

        let image = ImageUpload::from_path(&path).unwrap();
        assert_eq!(image.file_name, "avatar.webp");
        assert_eq!(image.content_type, "image/webp");
        assert_eq!(image.bytes, b"img");

        let err = ImageUpload::from_path(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, ProfileError::ReadImage { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) is not expected to run an HTTP server
        let c = HttpResourceClient::new("http://127.0.0.1:9/api", Duration::from_millis(500))
            .unwrap();
        let err = c.schedule().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }
}
