use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{handlers::is_valid_email, jwt::AuthUser},
    error::ApiError,
    profiles::{
        dto::{ProfileResponse, ResumeUploadResponse, UpdateProfileRequest},
        repo_types::JobSeekerProfile,
    },
    state::AppState,
    uploads::{collect_multipart, resume_key, validate_resume, PRESIGN_TTL_SECS},
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/resume", post(upload_resume))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    auth.require_jobseeker()?;
    let (profile, created) = JobSeekerProfile::get_or_create(&state.db, auth.user_id).await?;
    if created {
        info!(user_id = %auth.user_id, "empty job seeker profile created");
    }
    let resume_url = presign_resume(&state, &profile).await?;
    Ok(Json(ProfileResponse::from_profile(
        &profile, resume_url, created,
    )))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    auth.require_jobseeker()?;

    if payload.full_name.trim().is_empty() {
        return Err(ApiError::validation("Full name is required."));
    }
    if !is_valid_email(payload.email.trim()) {
        return Err(ApiError::validation("Invalid email"));
    }

    // A PUT before any GET still lands on a profile row.
    let (_, created) = JobSeekerProfile::get_or_create(&state.db, auth.user_id).await?;
    let profile = JobSeekerProfile::update(&state.db, auth.user_id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found."))?;
    info!(user_id = %auth.user_id, "job seeker profile updated");

    let resume_url = presign_resume(&state, &profile).await?;
    Ok(Json(ProfileResponse::from_profile(
        &profile, resume_url, created,
    )))
}

#[instrument(skip(state, multipart))]
pub async fn upload_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, ApiError> {
    auth.require_jobseeker()?;
    let (profile, _) = JobSeekerProfile::get_or_create(&state.db, auth.user_id).await?;

    let form = collect_multipart(multipart).await?;
    let file = form
        .file("resume")
        .ok_or_else(|| ApiError::validation("Resume is required."))?;
    validate_resume(file)?;

    let key = swap_resume(
        &state,
        auth.user_id,
        file.body.clone(),
        profile.resume_key.as_deref(),
    )
    .await?;

    let resume_url = state
        .storage
        .presign_get(&key, PRESIGN_TTL_SECS)
        .await
        .map_err(ApiError::storage)?;
    info!(user_id = %auth.user_id, "resume uploaded");
    Ok(Json(ResumeUploadResponse { resume_url }))
}

/// Store the new resume and repoint the row before the replaced object is
/// removed. The stored key always resolves, and so does every application
/// snapshot taken from it; a failed delete only leaves an orphan object.
async fn swap_resume(
    state: &AppState,
    user_id: Uuid,
    body: Bytes,
    old_key: Option<&str>,
) -> Result<String, ApiError> {
    let key = resume_key(user_id);
    state
        .storage
        .put_object(&key, body, "application/pdf")
        .await
        .map_err(ApiError::storage)?;

    JobSeekerProfile::set_resume(&state.db, user_id, &key)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found."))?;

    if let Some(old) = old_key {
        if let Err(e) = state.storage.delete_object(old).await {
            warn!(error = %e, key = %old, "failed to delete previous resume");
        }
    }
    Ok(key)
}

async fn presign_resume(
    state: &AppState,
    profile: &JobSeekerProfile,
) -> Result<Option<String>, ApiError> {
    match &profile.resume_key {
        Some(key) => state
            .storage
            .presign_get(key, PRESIGN_TTL_SECS)
            .await
            .map(Some)
            .map_err(ApiError::storage),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn old_resume_outlives_a_failed_row_update() {
        let (state, ops) = AppState::fake_recording();

        let result = swap_resume(
            &state,
            Uuid::new_v4(),
            Bytes::from_static(b"%PDF-1.4"),
            Some("resumes/old/cv.pdf"),
        )
        .await;
        assert!(result.is_err());

        let ops = ops.lock().unwrap();
        assert!(ops.iter().any(|op| op.starts_with("put resumes/")));
        assert!(!ops.iter().any(|op| op.starts_with("delete")));
    }
}
