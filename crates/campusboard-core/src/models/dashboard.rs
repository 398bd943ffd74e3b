//! Derived, non-persisted dashboard values

use super::schedule::ScheduleEntry;
use serde::{Deserialize, Serialize};

/// A schedule entry annotated for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardClassView {
    #[serde(flatten)]
    pub entry: ScheduleEntry,
    /// Attendance has been taken for this batch today
    pub is_marked: bool,
    pub time_range: String,
}

impl DashboardClassView {
    pub fn new(entry: ScheduleEntry, is_marked: bool) -> Self {
        let time_range = entry.time_range();
        Self {
            entry,
            is_marked,
            time_range,
        }
    }
}

/// Aggregate counts shown on the dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub classes_today: usize,
    pub total_students: usize,
    pub active_exams: usize,
}
