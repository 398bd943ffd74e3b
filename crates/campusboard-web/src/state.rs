//! Shared state for API handlers

use campusboard_core::ResourceStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ResourceStore>,
    /// Directory uploaded profile images are written to
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<ResourceStore>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            upload_dir: upload_dir.into(),
        }
    }
}
