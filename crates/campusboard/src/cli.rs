//! Terminal rendering for the faculty dashboard
//!
//! Text output uses the selected locale's strings; `--json` prints the view
//! as the API-style camelCase document instead.

use campusboard_core::error::FetchReport;
use campusboard_core::locale::DashboardStrings;
use campusboard_core::models::{Stats, UserProfile};
use campusboard_core::{Locale, SyncOutcome, TodayView};
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

/// Render the today view as text tables or pretty JSON
pub fn format_today_view(
    view: &TodayView,
    user: &UserProfile,
    locale: Locale,
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string());
    }

    let s = locale.strings();
    let mut out = String::new();

    out.push_str(&format!("{} - {}\n", s.portal, user.name));
    out.push_str(&format!("{}\n", s.hello));
    out.push_str(&format!("{} {}, {}\n", s.today_is, view.day, view.date_key));
    out.push_str(&format!(
        "{} {} {}\n\n",
        s.you_have, view.stats.classes_today, s.classes_today
    ));

    out.push_str(&format_stats(&view.stats, s, no_color));
    out.push_str("\n\n");

    out.push_str(&format!("{}\n", s.todays_schedule));
    if view.schedule.is_empty() {
        out.push_str(&format!("{} {}.\n{}", s.no_classes, view.day, s.check_schedule));
        return out;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let headers = [s.class_time, s.subject, s.batch, s.room, s.attendance];
    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }

    for class in &view.schedule {
        let room = if class.entry.room.is_empty() {
            "-"
        } else {
            class.entry.room.as_str()
        };
        let marked = if class.is_marked { "✓" } else { "·" };
        let mut row = Row::new();
        row.add_cell(Cell::new(&class.time_range));
        row.add_cell(Cell::new(&class.entry.subject));
        row.add_cell(Cell::new(&class.entry.batch));
        row.add_cell(Cell::new(room));
        if no_color {
            row.add_cell(Cell::new(marked));
        } else if class.is_marked {
            row.add_cell(Cell::new(marked).fg(Color::Green));
        } else {
            row.add_cell(Cell::new(marked).fg(Color::Yellow));
        }
        table.add_row(row);
    }

    out.push_str(&table.to_string());
    out
}

fn format_stats(stats: &Stats, s: &DashboardStrings, no_color: bool) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let headers = [s.classes_today, s.total_students, s.active_exams];
    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table.add_row(vec![
        stats.classes_today.to_string(),
        stats.total_students.to_string(),
        stats.active_exams.to_string(),
    ]);
    table.to_string()
}

/// Lines describing degraded sections, empty when every fetch succeeded
pub fn format_report(report: &FetchReport) -> Vec<String> {
    let Some(condition) = report.condition() else {
        return Vec::new();
    };
    let mut lines = vec![format!("warning: {}", condition)];
    lines.extend(
        report
            .failures
            .iter()
            .map(|failure| format!("  - {}: {}", failure.source, failure.message)),
    );
    lines
}

pub fn format_profile(user: Option<&UserProfile>) -> String {
    match user {
        None => "Not signed in.".to_string(),
        Some(user) => {
            let mut out = format!("{} ({}) [{}]", user.name, user.id, user.role);
            if let Some(email) = &user.email {
                out.push_str(&format!("\n  email: {}", email));
            }
            if let Some(image) = &user.profile_img {
                out.push_str(&format!("\n  image: {}", image));
            }
            out
        }
    }
}

pub fn format_sync_outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Updated { profile_img } => format!("Profile image updated: {}", profile_img),
        SyncOutcome::Unchanged => "Profile image already up to date.".to_string(),
        SyncOutcome::NotFound => "No faculty record is linked to this account.".to_string(),
        SyncOutcome::NoSession => "Not signed in.".to_string(),
        SyncOutcome::Failed { reason } => format!("Profile image sync failed: {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusboard_core::error::FetchSource;
    use campusboard_core::models::{DashboardClassView, DayOfWeek, ScheduleEntry};

    fn user() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "Dr. Rao".to_string(),
            role: "faculty".to_string(),
            email: None,
            profile_img: None,
        }
    }

    fn view_with_class(marked: bool) -> TodayView {
        let mut view = TodayView::empty(DayOfWeek::Monday, "2024-04-29");
        view.schedule.push(DashboardClassView::new(
            ScheduleEntry {
                id: "s1".to_string(),
                faculty_name: "Dr. Rao".to_string(),
                day: DayOfWeek::Monday,
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
                subject: "Compilers".to_string(),
                batch: "CS-A".to_string(),
                room: String::new(),
            },
            marked,
        ));
        view.stats = Stats {
            classes_today: 1,
            total_students: 40,
            active_exams: 2,
        };
        view
    }

    #[test]
    fn test_text_output_uses_locale() {
        let view = view_with_class(true);
        let english = format_today_view(&view, &user(), Locale::English, false, true);
        assert!(english.contains("Today's Schedule"));
        assert!(english.contains("Compilers"));
        assert!(english.contains("09:00 - 10:00"));
        assert!(english.contains("✓"));

        let hindi = format_today_view(&view, &user(), Locale::Hindi, false, true);
        assert!(hindi.contains("आज की समय सारिणी"));
        assert!(hindi.contains("विषय"));
        assert!(!hindi.contains("Subject"));

        let marathi = format_today_view(&view, &user(), Locale::Marathi, false, true);
        assert!(marathi.contains("तुकडी"));
        assert!(!marathi.contains("Batch"));
    }

    #[test]
    fn test_empty_schedule_message() {
        let view = TodayView::empty(DayOfWeek::Sunday, "2024-04-28");
        let out = format_today_view(&view, &user(), Locale::English, false, true);
        assert!(out.contains("No classes scheduled for Sunday."));
    }

    #[test]
    fn test_json_output() {
        let view = view_with_class(false);
        let out = format_today_view(&view, &user(), Locale::English, true, true);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["dateKey"], "2024-04-29");
        assert_eq!(value["schedule"][0]["isMarked"], false);
        assert_eq!(value["stats"]["totalStudents"], 40);
    }

    #[test]
    fn test_report_lines() {
        assert!(format_report(&FetchReport::new()).is_empty());

        let mut report = FetchReport::new();
        report.record_success();
        report.record_failure(FetchSource::Exams, "timed out");
        let lines = format_report(&report);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1 of 2"));
        assert!(lines[1].contains("exams: timed out"));
    }
}
