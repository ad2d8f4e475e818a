use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    applications::{
        dto::{
            ApplicationDetailResponse, ApplicationSubmittedResponse, CompanyApplicationsFilter,
            MyApplicationsFilter, UpdateApplicationStatusRequest, UpdateApplicationStatusResponse,
        },
        repo_types::{Application, CompanyApplicationRow, MyApplicationRow},
        services::{validate_cover_letter, ApplicationStatus},
    },
    auth::jwt::AuthUser,
    companies::vetting::{require_approved_company, CompanyStatus},
    error::{is_unique_violation, ApiError},
    jobs::{
        repo_types::Job,
        services::{deadline_passed, is_publicly_visible},
    },
    notifications::notify,
    profiles::repo_types::JobSeekerProfile,
    state::AppState,
    uploads::{application_resume_key, collect_multipart, validate_resume, PRESIGN_TTL_SECS},
};

pub fn seeker_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs/:id/apply", post(apply))
        .route("/my-applications", get(my_applications))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}

pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/company/applications", get(company_applications))
        .route("/company/applications/:id", get(application_detail))
        .route(
            "/company/applications/:id/status",
            post(update_application_status),
        )
}

#[instrument(skip(state, multipart))]
pub async fn apply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationSubmittedResponse>), ApiError> {
    auth.require_jobseeker()?;

    let job = Job::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;
    let company_status =
        CompanyStatus::parse(&job.company_status).unwrap_or(CompanyStatus::Pending);
    if !is_publicly_visible(job.is_active, job.is_published, company_status) {
        return Err(ApiError::not_found("Job not found."));
    }

    // The deadline day itself still accepts applications.
    let today = OffsetDateTime::now_utc().date();
    if deadline_passed(job.application_deadline, today) {
        return Err(ApiError::validation(
            "The application deadline for this job has passed.",
        ));
    }

    let form = collect_multipart(multipart).await?;

    // A resume attached to the application wins over the profile copy.
    let uploaded = form.file("resume");
    if let Some(file) = uploaded {
        validate_resume(file)?;
    } else {
        let on_profile = JobSeekerProfile::find_by_user(&state.db, auth.user_id)
            .await?
            .and_then(|profile| profile.resume_key);
        if on_profile.is_none() {
            return Err(ApiError::validation(
                "Please complete your profile and upload resume before applying.",
            ));
        }
    }

    if Application::exists_for(&state.db, id, auth.user_id).await? {
        return Err(ApiError::conflict("You have already applied for this job."));
    }

    let cover_letter = form.text("cover_letter").unwrap_or_default();
    validate_cover_letter(cover_letter)?;

    let resume_key = match uploaded {
        Some(file) => {
            let key = application_resume_key(auth.user_id);
            state
                .storage
                .put_object(&key, file.body.clone(), "application/pdf")
                .await
                .map_err(ApiError::storage)?;
            key
        }
        None => {
            // Present above; re-read to keep the borrow local.
            JobSeekerProfile::find_by_user(&state.db, auth.user_id)
                .await?
                .and_then(|profile| profile.resume_key)
                .ok_or_else(|| {
                    ApiError::validation(
                        "Please complete your profile and upload resume before applying.",
                    )
                })?
        }
    };

    let application = match Application::insert(
        &state.db,
        id,
        auth.user_id,
        job.company_id,
        &resume_key,
        cover_letter,
    )
    .await
    {
        Ok(application) => application,
        // Two submits racing past the pre-check; the index decides.
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("You have already applied for this job."));
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        application_id = %application.id,
        job_id = %id,
        user_id = %auth.user_id,
        "application submitted"
    );

    notify::new_application(&state.db, job.company_id, auth.user_id, &job.title).await;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationSubmittedResponse {
            message: "Application submitted successfully!".to_string(),
            application,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn my_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<MyApplicationsFilter>,
) -> Result<Json<Vec<MyApplicationRow>>, ApiError> {
    auth.require_jobseeker()?;

    let status = match filter.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            ApplicationStatus::parse(raw)
                .ok_or_else(|| ApiError::validation("Invalid application status."))?,
        ),
        None => None,
    };

    let applications = Application::list_by_user(&state.db, auth.user_id, status).await?;
    Ok(Json(applications))
}

#[instrument(skip(state))]
pub async fn company_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<CompanyApplicationsFilter>,
) -> Result<Json<Vec<CompanyApplicationRow>>, ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;

    let status = match filter.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            ApplicationStatus::parse(raw)
                .ok_or_else(|| ApiError::validation("Invalid application status."))?,
        ),
        None => None,
    };

    let applications =
        Application::list_by_company(&state.db, company.id, status, filter.job).await?;
    Ok(Json(applications))
}

#[instrument(skip(state))]
pub async fn application_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetailResponse>, ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;
    let row = Application::find_for_company(&state.db, id, company.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found."))?;

    let filename = format!("{}_resume.pdf", row.username);
    let resume_url = state
        .storage
        .presign_download(&row.resume_key, PRESIGN_TTL_SECS, &filename)
        .await
        .map_err(ApiError::storage)?;

    Ok(Json(ApplicationDetailResponse::from_row(row, resume_url)))
}

#[instrument(skip(state, payload))]
pub async fn update_application_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationStatusRequest>,
) -> Result<Json<UpdateApplicationStatusResponse>, ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;

    let status = ApplicationStatus::parse(&payload.status)
        .ok_or_else(|| ApiError::validation("Invalid application status."))?;
    let notes = payload
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let before = Application::find_for_company(&state.db, id, company.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found."))?;

    let application = Application::update_status(&state.db, id, company.id, status, notes)
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found."))?;

    info!(
        application_id = %application.id,
        status = %status,
        "application status updated"
    );

    // Seekers only hear about actual transitions, not note edits.
    if before.status != status.as_str() {
        notify::application_status_change(
            &state.db,
            application.user_id,
            &before.job_title,
            status,
        )
        .await;
    }

    Ok(Json(UpdateApplicationStatusResponse {
        message: "Application status updated successfully!".to_string(),
        application,
    }))
}
