use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    applications::repo_types::Application,
    auth::{handlers::is_valid_email, jwt::AuthUser},
    companies::{
        dto::{CompanyDashboardResponse, CompanyProfileResponse, LogoUploadResponse,
              UpdateCompanyRequest},
        repo_types::Company,
    },
    error::{is_unique_violation, ApiError},
    jobs::repo_types::Job,
    state::AppState,
    uploads::{collect_multipart, logo_key, validate_logo, PRESIGN_TTL_SECS},
};

pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/company/profile", get(get_profile).put(update_profile))
        .route("/company/logo", post(upload_logo))
        .route("/company/dashboard", get(dashboard))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CompanyProfileResponse>, ApiError> {
    auth.require_company()?;
    let company = Company::find_by_user(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company profile not found."))?;
    let logo_url = presign_logo(&state, &company).await?;
    Ok(Json(CompanyProfileResponse::from_company(&company, logo_url)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateCompanyRequest>,
) -> Result<Json<CompanyProfileResponse>, ApiError> {
    auth.require_company()?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Company name is required."));
    }
    if !is_valid_email(payload.email.trim()) {
        return Err(ApiError::validation("Invalid company email"));
    }

    // The unique index on companies.email is the authority; a collision
    // with another company's email lands here as a conflict.
    let company = match Company::update_profile(&state.db, auth.user_id, &payload).await {
        Ok(Some(company)) => company,
        Ok(None) => return Err(ApiError::not_found("Company profile not found.")),
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("A company with this email already exists."))
        }
        Err(e) => return Err(e.into()),
    };
    info!(company_id = %company.id, "company profile updated");

    let logo_url = presign_logo(&state, &company).await?;
    Ok(Json(CompanyProfileResponse::from_company(&company, logo_url)))
}

#[instrument(skip(state, multipart))]
pub async fn upload_logo(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<LogoUploadResponse>, ApiError> {
    auth.require_company()?;
    let company = Company::find_by_user(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company profile not found."))?;

    let form = collect_multipart(multipart).await?;
    let file = form
        .file("logo")
        .ok_or_else(|| ApiError::validation("Logo is required."))?;
    let ext = validate_logo(file)?;

    let key = swap_logo(
        &state,
        company.id,
        company.logo_key.as_deref(),
        file.body.clone(),
        &file.content_type,
        ext,
    )
    .await?;

    let logo_url = state
        .storage
        .presign_get(&key, PRESIGN_TTL_SECS)
        .await
        .map_err(ApiError::storage)?;
    info!(company_id = %company.id, "company logo updated");
    Ok(Json(LogoUploadResponse { logo_url }))
}

/// Store the new logo and repoint the row before the replaced object is
/// removed. The stored key always resolves; a failed delete only leaves
/// an orphan object behind.
async fn swap_logo(
    state: &AppState,
    company_id: Uuid,
    old_key: Option<&str>,
    body: Bytes,
    content_type: &str,
    ext: &str,
) -> Result<String, ApiError> {
    let key = logo_key(company_id, ext);
    state
        .storage
        .put_object(&key, body, content_type)
        .await
        .map_err(ApiError::storage)?;

    Company::set_logo(&state.db, company_id, &key).await?;

    if let Some(old) = old_key {
        if let Err(e) = state.storage.delete_object(old).await {
            warn!(error = %e, key = %old, "failed to delete previous logo");
        }
    }
    Ok(key)
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CompanyDashboardResponse>, ApiError> {
    // Role-gated, not approval-gated: pending and rejected companies
    // still see their own dashboard and vetting state.
    auth.require_company()?;
    let company = Company::find_by_user(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company profile not found."))?;

    let total_jobs = Job::count_by_company(&state.db, company.id).await?;
    let active_jobs = Job::count_active_by_company(&state.db, company.id).await?;
    let total_applications = Application::count_by_company(&state.db, company.id).await?;
    let new_applications = Application::count_new_by_company(&state.db, company.id).await?;
    let recent_jobs = Job::recent_by_company(&state.db, company.id, 5).await?;
    let recent_applications = Application::recent_by_company(&state.db, company.id, 10).await?;
    let logo_url = presign_logo(&state, &company).await?;

    Ok(Json(CompanyDashboardResponse {
        company: CompanyProfileResponse::from_company(&company, logo_url),
        total_jobs,
        active_jobs,
        total_applications,
        new_applications,
        recent_jobs,
        recent_applications,
    }))
}

async fn presign_logo(state: &AppState, company: &Company) -> Result<Option<String>, ApiError> {
    match &company.logo_key {
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
    async fn old_logo_outlives_a_failed_row_update() {
        let (state, ops) = AppState::fake_recording();

        let result = swap_logo(
            &state,
            Uuid::new_v4(),
            Some("company_logos/old/logo.png"),
            Bytes::from_static(b"png bytes"),
            "image/png",
            "png",
        )
        .await;
        assert!(result.is_err());

        let ops = ops.lock().unwrap();
        assert!(ops.iter().any(|op| op.starts_with("put company_logos/")));
        assert!(!ops.iter().any(|op| op.starts_with("delete")));
    }
}
