//! Profile image sync and upload

use crate::client::{ImageUpload, ResourceApi};
use crate::error::ProfileError;
use crate::session::SessionContext;
use tracing::{info, warn};

/// Result of a background profile image sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local cache now holds the backend's image
    Updated { profile_img: String },
    /// Local cache already matched (or the backend has no image)
    Unchanged,
    /// No faculty record is linked to the signed-in account
    NotFound,
    /// Nobody is signed in
    NoSession,
    /// The backend or the local write failed; cache left as it was
    Failed { reason: String },
}

/// Pull the profile image reference from the faculty directory into the
/// local session. One-directional: the backend value always wins and the
/// backend is never written. Failures are logged, never raised.
pub async fn sync_profile_image<A: ResourceApi>(
    api: &A,
    session: &mut SessionContext,
) -> SyncOutcome {
    let Some(user) = session.current() else {
        return SyncOutcome::NoSession;
    };
    let user_id = user.id.clone();
    let cached = user.profile_img.clone();

    let directory = match api.faculty().await {
        Ok(directory) => directory,
        Err(e) => {
            warn!(error = %e, "Profile image sync failed");
            return SyncOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    let Some(me) = directory.into_iter().find(|f| f.is_linked_to(&user_id)) else {
        return SyncOutcome::NotFound;
    };

    match me.profile_img {
        Some(image) if cached.as_deref() != Some(image.as_str()) => {
            if let Err(e) = session.set_profile_image(&image) {
                warn!(error = %e, "Profile image sync could not update the session");
                return SyncOutcome::Failed {
                    reason: e.to_string(),
                };
            }
            info!(user = %user_id, image = %image, "Profile image synced from backend");
            SyncOutcome::Updated { profile_img: image }
        }
        _ => SyncOutcome::Unchanged,
    }
}

/// Upload a new profile image for the signed-in user.
///
/// On success the returned storage path is written to the session; on any
/// failure the session is left untouched. No retries.
pub async fn upload_profile_image<A: ResourceApi>(
    api: &A,
    session: &mut SessionContext,
    image: ImageUpload,
) -> Result<String, ProfileError> {
    let user_id = session
        .current()
        .map(|user| user.id.clone())
        .ok_or(ProfileError::NoSession)?;

    let response = api
        .upload_faculty_image(&user_id, image)
        .await
        .map_err(ProfileError::Upload)?;

    session.set_profile_image(&response.file_path)?;
    info!(user = %user_id, path = %response.file_path, "Profile image uploaded");
    Ok(response.file_path)
}
