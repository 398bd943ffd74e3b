//! Data models for campusboard
//!
//! Wire format follows the document store the REST API was designed around:
//! camelCase fields and record identifiers serialized as `_id`.

pub mod academics;
pub mod attendance;
pub mod dashboard;
pub mod people;
pub mod schedule;

pub use academics::{Course, Exam};
pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use dashboard::{DashboardClassView, Stats};
pub use people::{AccountRef, Faculty, Student, UploadResponse, UserProfile};
pub use schedule::{is_clock_time, DayOfWeek, ScheduleEntry};

/// Canonical calendar date format used for attendance keys ("YYYY-MM-DD")
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Returns true if `s` is a canonical "YYYY-MM-DD" date
pub fn is_date_key(s: &str) -> bool {
    s.len() == 10 && chrono::NaiveDate::parse_from_str(s, DATE_KEY_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_date_key() {
        assert!(is_date_key("2024-05-01"));
        assert!(!is_date_key("2024-5-1"));
        assert!(!is_date_key("2024-02-30"));
        assert!(!is_date_key("01/05/2024"));
    }
}
