//! campusboard-core - Core library for campusboard
//!
//! Provides models, the in-memory resource store, the REST client, and the
//! faculty dashboard logic (today view, profile image sync/upload, session).

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod locale;
pub mod models;
pub mod profile;
pub mod session;
pub mod store;

pub use client::{HttpResourceClient, ImageUpload, ResourceApi};
pub use config::AppConfig;
pub use dashboard::{load_today_view, DashboardPanel, TodayView};
pub use error::{ClientError, DashboardError, FetchReport, ProfileError, StoreError};
pub use locale::Locale;
pub use profile::{sync_profile_image, upload_profile_image, SyncOutcome};
pub use session::SessionContext;
pub use store::{Record, ResourceStore};
