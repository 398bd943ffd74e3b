//! Faculty dashboard orchestration
//!
//! Sequences the backend reads behind the "today" view: schedule, then one
//! attendance lookup per class, merged and ordered by start time; student
//! and exam counts are fetched alongside. Every fetch group degrades to a
//! default value instead of failing the view.

use crate::client::ResourceApi;
use crate::error::{FetchReport, FetchSource};
use crate::models::{DashboardClassView, DayOfWeek, ScheduleEntry, Stats, DATE_KEY_FORMAT};
use chrono::{DateTime, Datelike, TimeZone};
use futures::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Display-ready result of one dashboard load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayView {
    pub day: DayOfWeek,
    /// Local calendar date, "YYYY-MM-DD"
    pub date_key: String,
    pub schedule: Vec<DashboardClassView>,
    pub stats: Stats,
    #[serde(skip)]
    pub report: FetchReport,
}

impl TodayView {
    /// Empty view that still carries the day label
    pub fn empty(day: DayOfWeek, date_key: impl Into<String>) -> Self {
        Self {
            day,
            date_key: date_key.into(),
            schedule: Vec::new(),
            stats: Stats::default(),
            report: FetchReport::new(),
        }
    }
}

/// Day name and date key, both derived from the same instant in its own
/// timezone so they never straddle midnight differently.
pub fn day_and_date<Tz: TimeZone>(now: &DateTime<Tz>) -> (DayOfWeek, String) {
    let local_date = now.date_naive();
    (
        DayOfWeek::from(local_date.weekday()),
        local_date.format(DATE_KEY_FORMAT).to_string(),
    )
}

/// Entries taught by `faculty_name` on `day`, ordered by start time.
///
/// The sort is stable, so classes starting at the same time keep the
/// order the backend returned them in.
pub fn todays_classes(
    entries: Vec<ScheduleEntry>,
    faculty_name: &str,
    day: DayOfWeek,
) -> Vec<ScheduleEntry> {
    let mut mine: Vec<ScheduleEntry> = entries
        .into_iter()
        .filter(|entry| entry.faculty_name == faculty_name && entry.day == day)
        .collect();
    mine.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    mine
}

/// Load the faculty member's classes for today plus the aggregate counts.
///
/// Never fails: failures are recorded in [`TodayView::report`] and the
/// affected values fall back to empty / zero / not marked.
pub async fn load_today_view<A, Tz>(api: &A, faculty_name: &str, now: &DateTime<Tz>) -> TodayView
where
    A: ResourceApi,
    Tz: TimeZone,
{
    let (day, date_key) = day_and_date(now);
    debug!(faculty = faculty_name, day = %day, date = %date_key, "Loading today view");

    let (schedule_result, counts_result) = tokio::join!(
        load_schedule(api, faculty_name, day, &date_key),
        load_counts(api)
    );

    let (schedule, mut report) = schedule_result;
    let ((total_students, active_exams), counts_report) = counts_result;
    report.merge(counts_report);

    let stats = Stats {
        classes_today: schedule.len(),
        total_students,
        active_exams,
    };

    info!(
        day = %day,
        classes = stats.classes_today,
        marked = schedule.iter().filter(|c| c.is_marked).count(),
        failures = report.failures.len(),
        "Today view loaded"
    );

    TodayView {
        day,
        date_key,
        schedule,
        stats,
        report,
    }
}

async fn load_schedule<A: ResourceApi>(
    api: &A,
    faculty_name: &str,
    day: DayOfWeek,
    date_key: &str,
) -> (Vec<DashboardClassView>, FetchReport) {
    let mut report = FetchReport::new();

    let entries = match api.schedule().await {
        Ok(entries) => {
            report.record_success();
            entries
        }
        Err(e) => {
            warn!(error = %e, "Schedule unavailable");
            report.record_failure(FetchSource::Schedule, e.to_string());
            return (Vec::new(), report);
        }
    };

    let classes = todays_classes(entries, faculty_name, day);

    // One lookup per class, all in flight together; join_all keeps order.
    let lookups = classes.iter().map(|class| api.attendance_for(&class.batch, date_key));
    let results = join_all(lookups).await;

    let views = classes
        .into_iter()
        .zip(results)
        .map(|(class, result)| {
            let is_marked = match result {
                Ok(records) => {
                    report.record_success();
                    !records.is_empty()
                }
                Err(e) => {
                    debug!(batch = %class.batch, error = %e, "Attendance lookup failed, treating as not marked");
                    report.record_failure(
                        FetchSource::Attendance {
                            batch: class.batch.clone(),
                        },
                        e.to_string(),
                    );
                    false
                }
            };
            DashboardClassView::new(class, is_marked)
        })
        .collect();

    (views, report)
}

async fn load_counts<A: ResourceApi>(api: &A) -> ((usize, usize), FetchReport) {
    let mut report = FetchReport::new();
    let (students, exams) = tokio::join!(api.students(), api.exams());

    let total_students = match students {
        Ok(list) => {
            report.record_success();
            list.len()
        }
        Err(e) => {
            warn!(error = %e, "Student count unavailable");
            report.record_failure(FetchSource::Students, e.to_string());
            0
        }
    };

    let active_exams = match exams {
        Ok(list) => {
            report.record_success();
            list.len()
        }
        Err(e) => {
            warn!(error = %e, "Exam count unavailable");
            report.record_failure(FetchSource::Exams, e.to_string());
            0
        }
    };

    ((total_students, active_exams), report)
}

/// Ticket identifying one activation of the dashboard panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    generation: u64,
}

impl Activation {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owner of the dashboard's displayed state across activations.
///
/// Each activation gets a generation number; results are only applied while
/// their generation is current, so a slow load from an earlier activation
/// can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct DashboardPanel {
    generation: AtomicU64,
    view: RwLock<Option<TodayView>>,
}

impl DashboardPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The panel became visible; in-flight loads from earlier activations go stale
    pub fn activate(&self) -> Activation {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "Dashboard activated");
        Activation { generation }
    }

    /// The panel was left; pending loads are invalidated and the view dropped
    pub fn deactivate(&self) {
        let mut view = self.view.write();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *view = None;
        debug!(generation, "Dashboard deactivated");
    }

    pub fn is_current(&self, activation: &Activation) -> bool {
        self.generation.load(Ordering::SeqCst) == activation.generation
    }

    /// Store a loaded view if its activation is still current.
    ///
    /// Returns false when the result was discarded as stale.
    pub fn apply(&self, activation: &Activation, loaded: TodayView) -> bool {
        let mut view = self.view.write();
        if !self.is_current(activation) {
            debug!(
                generation = activation.generation,
                "Discarding stale dashboard result"
            );
            return false;
        }
        *view = Some(loaded);
        true
    }

    /// Currently displayed view, if any
    pub fn view(&self) -> Option<TodayView> {
        self.view.read().clone()
    }

    /// Activate, load and apply in one step
    pub async fn refresh<A, Tz>(&self, api: &A, faculty_name: &str, now: &DateTime<Tz>) -> bool
    where
        A: ResourceApi,
        Tz: TimeZone,
    {
        let activation = self.activate();
        let loaded = load_today_view(api, faculty_name, now).await;
        self.apply(&activation, loaded)
    }
}
