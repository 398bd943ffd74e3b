//! In-memory resource store with DashMap
//!
//! One DashMap per collection (per-entry locking). Records keep their
//! insertion sequence so listings are stable across calls.

use crate::error::StoreError;
use crate::models::{
    is_clock_time, is_date_key, AttendanceRecord, Course, Exam, Faculty, ScheduleEntry, Student,
};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

pub type StoreResult<T> = Result<T, StoreError>;

/// A document that lives in one of the store's collections
pub trait Record: Clone + Send + Sync + 'static {
    /// Collection name, also used as the REST path segment
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Reject records that would break readers (e.g. unsortable times)
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }

    fn collection(store: &ResourceStore) -> &Collection<Self>;
}

struct Slot<T> {
    seq: u64,
    record: T,
}

/// A single collection of records keyed by id
pub struct Collection<T> {
    entries: DashMap<String, Slot<T>>,
    next_seq: AtomicU64,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }
}

impl<T: Record> Collection<T> {
    /// All records in insertion order
    pub fn list(&self) -> Vec<T> {
        let mut slots: Vec<(u64, T)> = self
            .entries
            .iter()
            .map(|e| (e.seq, e.record.clone()))
            .collect();
        slots.sort_by_key(|(seq, _)| *seq);
        slots.into_iter().map(|(_, record)| record).collect()
    }

    /// Records matching a predicate, in insertion order
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut slots: Vec<(u64, T)> = self
            .entries
            .iter()
            .filter(|e| predicate(&e.record))
            .map(|e| (e.seq, e.record.clone()))
            .collect();
        slots.sort_by_key(|(seq, _)| *seq);
        slots.into_iter().map(|(_, record)| record).collect()
    }

    pub fn get(&self, id: &str) -> StoreResult<T> {
        self.entries
            .get(id)
            .map(|slot| slot.record.clone())
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })
    }

    /// Insert a record, assigning a new id unless one is provided
    pub fn insert(&self, mut record: T) -> StoreResult<T> {
        record.validate()?;

        if record.id().is_empty() {
            record.set_id(uuid::Uuid::new_v4().to_string());
        }
        let id = record.id().to_string();

        match self.entries.entry(id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::Duplicate {
                collection: T::COLLECTION,
                id,
            }),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(Slot {
                    seq,
                    record: record.clone(),
                });
                debug!(collection = T::COLLECTION, id = %id, "Record inserted");
                Ok(record)
            }
        }
    }

    /// Insert a group of records, all or none.
    ///
    /// Every record is validated and every provided id is checked against
    /// the group and the collection before anything is stored. If a
    /// concurrent writer still claims an id first, records already inserted
    /// by this call are removed again.
    pub fn insert_all(&self, records: Vec<T>) -> StoreResult<Vec<T>> {
        let mut seen = HashSet::new();
        for record in &records {
            record.validate()?;
            let id = record.id();
            if id.is_empty() {
                continue;
            }
            if !seen.insert(id.to_string()) || self.entries.contains_key(id) {
                return Err(StoreError::Duplicate {
                    collection: T::COLLECTION,
                    id: id.to_string(),
                });
            }
        }

        let mut stored: Vec<T> = Vec::with_capacity(records.len());
        for record in records {
            match self.insert(record) {
                Ok(record) => stored.push(record),
                Err(e) => {
                    for record in &stored {
                        self.entries.remove(record.id());
                    }
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    /// Replace an existing record, keeping its id and position
    pub fn replace(&self, id: &str, mut record: T) -> StoreResult<T> {
        record.set_id(id.to_string());
        record.validate()?;

        let mut slot = self
            .entries
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })?;
        slot.record = record.clone();
        Ok(record)
    }

    /// Apply an in-place change to the earliest inserted record matching
    /// `predicate`, the same one `filter` lists first
    pub fn update_where(
        &self,
        mut predicate: impl FnMut(&T) -> bool,
        change: impl FnOnce(&mut T),
    ) -> Option<T> {
        let id = self
            .entries
            .iter()
            .filter(|e| predicate(&e.record))
            .min_by_key(|e| e.seq)
            .map(|e| e.key().clone())?;
        let mut slot = self.entries.get_mut(&id)?;
        change(&mut slot.record);
        Some(slot.record.clone())
    }

    pub fn remove(&self, id: &str) -> StoreResult<T> {
        self.entries
            .remove(id)
            .map(|(_, slot)| slot.record)
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Record counts per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub students: usize,
    pub faculty: usize,
    pub courses: usize,
    pub exams: usize,
    pub schedule: usize,
    pub attendance: usize,
}

/// Initial data loaded from a JSON file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub students: Vec<Student>,
    pub faculty: Vec<Faculty>,
    pub courses: Vec<Course>,
    pub exams: Vec<Exam>,
    pub schedule: Vec<ScheduleEntry>,
    pub attendance: Vec<AttendanceRecord>,
}

/// Central resource store shared by all API handlers
#[derive(Default)]
pub struct ResourceStore {
    pub students: Collection<Student>,
    pub faculty: Collection<Faculty>,
    pub courses: Collection<Course>,
    pub exams: Collection<Exam>,
    pub schedule: Collection<ScheduleEntry>,
    pub attendance: Collection<AttendanceRecord>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attendance records for a batch on a "YYYY-MM-DD" date
    pub fn attendance_for(&self, batch: &str, date: &str) -> Vec<AttendanceRecord> {
        self.attendance
            .filter(|record| record.batch == batch && record.date == date)
    }

    /// Faculty record linked to a user account
    pub fn faculty_by_account(&self, account_id: &str) -> Option<Faculty> {
        self.faculty
            .filter(|faculty| faculty.is_linked_to(account_id))
            .into_iter()
            .next()
    }

    /// Point the linked faculty record at a new profile image
    pub fn set_faculty_image(&self, account_id: &str, file_path: &str) -> StoreResult<Faculty> {
        self.faculty
            .update_where(
                |faculty| faculty.is_linked_to(account_id),
                |faculty| faculty.profile_img = Some(file_path.to_string()),
            )
            .ok_or_else(|| StoreError::NotFound {
                collection: Faculty::COLLECTION,
                id: account_id.to_string(),
            })
    }

    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            students: self.students.len(),
            faculty: self.faculty.len(),
            courses: self.courses.len(),
            exams: self.exams.len(),
            schedule: self.schedule.len(),
            attendance: self.attendance.len(),
        }
    }

    /// Insert every record of a seed document
    pub fn seed(&self, data: SeedData) -> StoreResult<StoreSummary> {
        for record in data.students {
            self.students.insert(record)?;
        }
        for record in data.faculty {
            self.faculty.insert(record)?;
        }
        for record in data.courses {
            self.courses.insert(record)?;
        }
        for record in data.exams {
            self.exams.insert(record)?;
        }
        for record in data.schedule {
            self.schedule.insert(record)?;
        }
        for record in data.attendance {
            self.attendance.insert(record)?;
        }
        Ok(self.summary())
    }

    /// Load a JSON seed file
    pub fn load_seed(&self, path: &Path) -> StoreResult<StoreSummary> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;
        let data: SeedData =
            serde_json::from_str(&content).map_err(|source| StoreError::SeedParse {
                path: path.to_path_buf(),
                source,
            })?;
        let summary = self.seed(data)?;
        info!(
            path = %path.display(),
            students = summary.students,
            faculty = summary.faculty,
            schedule = summary.schedule,
            "Seed data loaded"
        );
        Ok(summary)
    }
}

// ===================
// Record impls
// ===================

impl Record for Student {
    const COLLECTION: &'static str = "students";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::invalid("name", "must not be empty"));
        }
        Ok(())
    }

    fn collection(store: &ResourceStore) -> &Collection<Self> {
        &store.students
    }
}

impl Record for Faculty {
    const COLLECTION: &'static str = "faculty";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::invalid("name", "must not be empty"));
        }
        Ok(())
    }

    fn collection(store: &ResourceStore) -> &Collection<Self> {
        &store.faculty
    }
}

impl Record for Course {
    const COLLECTION: &'static str = "courses";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection(store: &ResourceStore) -> &Collection<Self> {
        &store.courses
    }
}

impl Record for Exam {
    const COLLECTION: &'static str = "exams";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> StoreResult<()> {
        if !is_date_key(&self.date) {
            return Err(StoreError::invalid("date", "expected YYYY-MM-DD"));
        }
        Ok(())
    }

    fn collection(store: &ResourceStore) -> &Collection<Self> {
        &store.exams
    }
}

impl Record for ScheduleEntry {
    const COLLECTION: &'static str = "schedule";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> StoreResult<()> {
        if !is_clock_time(&self.start_time) {
            return Err(StoreError::invalid("startTime", "expected zero-padded HH:MM"));
        }
        if !is_clock_time(&self.end_time) {
            return Err(StoreError::invalid("endTime", "expected zero-padded HH:MM"));
        }
        if self.start_time >= self.end_time {
            return Err(StoreError::invalid("endTime", "must be after startTime"));
        }
        Ok(())
    }

    fn collection(store: &ResourceStore) -> &Collection<Self> {
        &store.schedule
    }
}

impl Record for AttendanceRecord {
    const COLLECTION: &'static str = "attendance";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> StoreResult<()> {
        if !is_date_key(&self.date) {
            return Err(StoreError::invalid("date", "expected YYYY-MM-DD"));
        }
        if self.batch.trim().is_empty() {
            return Err(StoreError::invalid("batch", "must not be empty"));
        }
        Ok(())
    }

    fn collection(store: &ResourceStore) -> &Collection<Self> {
        &store.attendance
    }
}
