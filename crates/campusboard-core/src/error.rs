//! Error types for campusboard-core
//!
//! Provides the error hierarchy (thiserror) and the fetch report used for
//! graceful degradation of the dashboard.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ===================
// Store Errors
// ===================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{collection} record not found: {id}")]
    NotFound { collection: &'static str, id: String },

    #[error("{collection} record already exists: {id}")]
    Duplicate { collection: &'static str, id: String },

    #[error("Invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("Failed to read seed file: {path}")]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse seed file {path}: {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        StoreError::Invalid {
            field,
            message: message.into(),
        }
    }
}

// ===================
// Client Errors
// ===================

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid base URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

// ===================
// Session Errors
// ===================

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to write session file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove session file: {path}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize session")]
    Serialize(#[from] serde_json::Error),

    #[error("No user is signed in")]
    NotSignedIn,
}

// ===================
// Profile Errors
// ===================

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("No user is signed in")]
    NoSession,

    #[error("Failed to read image {path}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to upload image")]
    Upload(#[source] ClientError),

    #[error("Image uploaded but the local profile could not be updated")]
    Session(#[from] SessionError),
}

// ===================
// Config Errors
// ===================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ===================
// Dashboard conditions
// ===================

/// Degradation conditions surfaced by the dashboard orchestrator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// A required fetch failed; the affected section renders empty
    #[error("{resource} unavailable: {message}")]
    DataUnavailable { resource: String, message: String },

    /// Some members of an independent fetch group failed
    #[error("{failed} of {attempted} fetches failed")]
    PartialDataUnavailable { failed: usize, attempted: usize },
}

/// Which backend read a failure belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSource {
    Schedule,
    Attendance { batch: String },
    Students,
    Exams,
}

impl fmt::Display for FetchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchSource::Schedule => f.write_str("schedule"),
            FetchSource::Attendance { batch } => write!(f, "attendance ({batch})"),
            FetchSource::Students => f.write_str("students"),
            FetchSource::Exams => f.write_str("exams"),
        }
    }
}

/// Severity level for fetch failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Defaulted value shown, rest of the view unaffected
    Warning,
    /// A whole section is empty
    Error,
}

/// Individual failed fetch in a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub source: FetchSource,
    pub message: String,
    pub severity: ErrorSeverity,
}

impl FetchFailure {
    pub fn new(source: FetchSource, message: impl Into<String>) -> Self {
        let severity = match source {
            FetchSource::Schedule => ErrorSeverity::Error,
            _ => ErrorSeverity::Warning,
        };
        Self {
            source,
            message: message.into(),
            severity,
        }
    }
}

/// Report of fetches attempted during one dashboard load
///
/// Enables graceful degradation by tracking partial failures
/// instead of failing the whole view on any error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub attempted: usize,
    pub failures: Vec<FetchFailure>,
}

impl FetchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.attempted += 1;
    }

    pub fn record_failure(&mut self, source: FetchSource, message: impl Into<String>) {
        self.attempted += 1;
        self.failures.push(FetchFailure::new(source, message));
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self, source: &FetchSource) -> bool {
        self.failures.iter().any(|f| &f.source == source)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &FetchFailure> {
        self.failures
            .iter()
            .filter(|f| f.severity == ErrorSeverity::Warning)
    }

    /// The degradation condition this report represents, if any
    pub fn condition(&self) -> Option<DashboardError> {
        if let Some(failure) = self
            .failures
            .iter()
            .find(|f| f.source == FetchSource::Schedule)
        {
            return Some(DashboardError::DataUnavailable {
                resource: failure.source.to_string(),
                message: failure.message.clone(),
            });
        }
        if self.failures.is_empty() {
            None
        } else {
            Some(DashboardError::PartialDataUnavailable {
                failed: self.failures.len(),
                attempted: self.attempted,
            })
        }
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: FetchReport) {
        self.attempted += other.attempted;
        self.failures.extend(other.failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_failures_has_no_condition() {
        let mut report = FetchReport::new();
        report.record_success();
        report.record_success();
        assert!(report.is_complete());
        assert_eq!(report.condition(), None);
    }

    #[test]
    fn test_schedule_failure_is_data_unavailable() {
        let mut report = FetchReport::new();
        report.record_failure(FetchSource::Students, "HTTP 500");
        report.record_failure(FetchSource::Schedule, "connection refused");

        match report.condition() {
            Some(DashboardError::DataUnavailable { resource, message }) => {
                assert_eq!(resource, "schedule");
                assert_eq!(message, "connection refused");
            }
            other => panic!("unexpected condition: {other:?}"),
        }
    }

    #[test]
    fn test_partial_failure_counts() {
        let mut report = FetchReport::new();
        report.record_success();
        report.record_failure(
            FetchSource::Attendance {
                batch: "B1".to_string(),
            },
            "timeout",
        );

        let mut other = FetchReport::new();
        other.record_success();
        report.merge(other);

        assert_eq!(
            report.condition(),
            Some(DashboardError::PartialDataUnavailable {
                failed: 1,
                attempted: 3
            })
        );
        assert_eq!(report.warnings().count(), 1);
    }
}
