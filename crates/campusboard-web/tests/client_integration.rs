//! The HTTP client and dashboard logic against a live server

use campusboard_core::error::ClientError;
use campusboard_core::models::{
    AccountRef, AttendanceRecord, AttendanceStatus, DayOfWeek, Exam, Faculty, ScheduleEntry,
    Student, UserProfile,
};
use campusboard_core::{
    load_today_view, sync_profile_image, upload_profile_image, HttpResourceClient, ImageUpload,
    ProfileError, ResourceStore, SessionContext, SyncOutcome,
};
use campusboard_web::{create_router, AppState};
use chrono::{FixedOffset, TimeZone};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

fn class(day: DayOfWeek, start: &str, end: &str, batch: &str) -> ScheduleEntry {
    ScheduleEntry {
        id: String::new(),
        faculty_name: "Dr. Rao".to_string(),
        day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        subject: format!("{batch} lecture"),
        batch: batch.to_string(),
        room: "101".to_string(),
    }
}

fn seeded_store() -> Arc<ResourceStore> {
    let store = Arc::new(ResourceStore::new());
    store
        .faculty
        .insert(Faculty {
            id: String::new(),
            name: "Dr. Rao".to_string(),
            department: None,
            email: None,
            user_id: Some(AccountRef::Id("u1".to_string())),
            profile_img: None,
        })
        .unwrap();
    store
        .schedule
        .insert(class(DayOfWeek::Monday, "14:00", "15:00", "CS-B"))
        .unwrap();
    store
        .schedule
        .insert(class(DayOfWeek::Monday, "09:00", "10:00", "CS-A"))
        .unwrap();
    store
        .schedule
        .insert(class(DayOfWeek::Tuesday, "11:00", "12:00", "CS-A"))
        .unwrap();
    store
        .attendance
        .insert(AttendanceRecord {
            id: String::new(),
            batch: "CS-A".to_string(),
            date: "2024-04-29".to_string(),
            subject: None,
            faculty_name: None,
            student_id: "st-1".to_string(),
            status: AttendanceStatus::Present,
        })
        .unwrap();
    for (i, batch) in ["CS-A", "CS-A", "CS-B"].iter().enumerate() {
        store
            .students
            .insert(Student {
                id: String::new(),
                name: format!("Student {i}"),
                roll_no: format!("R{i}"),
                batch: batch.to_string(),
                email: None,
                profile_img: None,
            })
            .unwrap();
    }
    store
        .exams
        .insert(Exam {
            id: String::new(),
            subject: "Algorithms".to_string(),
            batch: "CS-B".to_string(),
            date: "2024-05-10".to_string(),
            start_time: None,
            room: None,
        })
        .unwrap();
    store
}

async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> HttpResourceClient {
    HttpResourceClient::new(&format!("http://{addr}/api"), Duration::from_secs(5)).unwrap()
}

fn signed_in(image: Option<&str>) -> SessionContext {
    SessionContext::in_memory(Some(UserProfile {
        id: "u1".to_string(),
        name: "Dr. Rao".to_string(),
        role: "faculty".to_string(),
        email: None,
        profile_img: image.map(str::to_string),
    }))
}

#[tokio::test]
async fn test_today_view_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(AppState::new(seeded_store(), dir.path())).await;
    let api = client(addr);

    // Monday 2024-04-29, 10:00 at UTC+05:30
    let now = FixedOffset::east_opt(5 * 3600 + 1800)
        .unwrap()
        .with_ymd_and_hms(2024, 4, 29, 10, 0, 0)
        .unwrap();
    let view = load_today_view(&api, "Dr. Rao", &now).await;

    assert!(view.report.is_complete(), "{:?}", view.report);
    assert_eq!(view.day, DayOfWeek::Monday);
    assert_eq!(view.date_key, "2024-04-29");
    let starts: Vec<_> = view
        .schedule
        .iter()
        .map(|c| c.entry.start_time.as_str())
        .collect();
    assert_eq!(starts, ["09:00", "14:00"]);
    let marked: Vec<_> = view.schedule.iter().map(|c| c.is_marked).collect();
    assert_eq!(marked, [true, false]);
    assert_eq!(view.stats.classes_today, 2);
    assert_eq!(view.stats.total_students, 3);
    assert_eq!(view.stats.active_exams, 1);
}

#[tokio::test]
async fn test_upload_then_sync_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store();
    let addr = spawn_server(AppState::new(Arc::clone(&store), dir.path())).await;
    let api = client(addr);

    let mut session = signed_in(None);
    let path = upload_profile_image(&api, &mut session, ImageUpload::new("me.png", b"png".to_vec()))
        .await
        .unwrap();
    assert!(path.starts_with("/uploads/u1-"));
    assert_eq!(
        session.current().unwrap().profile_img.as_deref(),
        Some(path.as_str())
    );
    assert_eq!(
        store.faculty_by_account("u1").unwrap().profile_img.as_deref(),
        Some(path.as_str())
    );

    // Another device still has the old image cached
    let mut other = signed_in(Some("/uploads/old.png"));
    let outcome = sync_profile_image(&api, &mut other).await;
    assert_eq!(
        outcome,
        SyncOutcome::Updated {
            profile_img: path.clone()
        }
    );
    assert_eq!(sync_profile_image(&api, &mut other).await, SyncOutcome::Unchanged);
}

#[tokio::test]
async fn test_upload_for_unlinked_account_fails() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(AppState::new(seeded_store(), dir.path())).await;
    let api = client(addr);

    let mut session = SessionContext::in_memory(Some(UserProfile {
        id: "u404".to_string(),
        name: "Guest".to_string(),
        role: "faculty".to_string(),
        email: None,
        profile_img: Some("/uploads/keep.png".to_string()),
    }));
    let err = upload_profile_image(&api, &mut session, ImageUpload::new("me.png", b"x".to_vec()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProfileError::Upload(ClientError::Status { status: 404, .. })
    ));
    assert_eq!(
        session.current().unwrap().profile_img.as_deref(),
        Some("/uploads/keep.png")
    );
}
