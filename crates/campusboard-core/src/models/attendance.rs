//! Attendance submissions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
}

/// One stored attendance mark for a student of a batch on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub batch: String,
    /// "YYYY-MM-DD"
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_name: Option<String>,
    pub student_id: String,
    #[serde(default)]
    pub status: AttendanceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_present() {
        let json = r#"{"batch":"B1","date":"2024-05-01","studentId":"s1"}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.id.is_empty());
    }
}
