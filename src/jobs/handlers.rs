use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    applications::repo_types::Application,
    auth::{jwt::AuthUser, roles::Role},
    companies::vetting::{require_approved_company, CompanyStatus},
    error::ApiError,
    jobs::{
        dto::{
            DeleteJobResponse, JobCompanyInfo, JobDetailResponse, JobFilter, JobListResponse,
            JobRequest, SaveJobResponse, UnsaveJobResponse,
        },
        repo,
        repo_types::{CompanyJobRow, Job, SavedJobRow},
        services::{deadline_passed, is_publicly_visible, validate_job_payload},
    },
    notifications::notify,
    state::AppState,
    uploads::PRESIGN_TTL_SECS,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(job_detail))
}

pub fn seeker_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs/:id/save", post(save_job))
        .route("/jobs/:id/unsave", post(unsave_job))
        .route("/saved-jobs", get(saved_jobs))
}

pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/company/jobs", get(my_jobs).post(create_job))
        .route(
            "/company/jobs/:id",
            get(get_own_job).put(update_job).delete(delete_job),
        )
        .route("/company/jobs/:id/toggle-active", post(toggle_job_active))
        .route("/company/jobs/:id/toggle-publish", post(toggle_job_publish))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<JobListResponse>, ApiError> {
    let (jobs, total) = Job::search_public(&state.db, &filter).await?;
    Ok(Json(JobListResponse {
        jobs,
        total,
        limit: filter.limit.clamp(1, 100),
        offset: filter.offset.max(0),
    }))
}

#[instrument(skip(state, auth))]
pub async fn job_detail(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDetailResponse>, ApiError> {
    let row = Job::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;

    // Hidden postings answer exactly like missing ones.
    let company_status =
        CompanyStatus::parse(&row.company_status).unwrap_or(CompanyStatus::Pending);
    if !is_publicly_visible(row.is_active, row.is_published, company_status) {
        return Err(ApiError::not_found("Job not found."));
    }

    Job::increment_views(&state.db, id).await?;

    let today = OffsetDateTime::now_utc().date();
    let (has_applied, is_saved) = match auth {
        Some(user) if user.role == Role::Jobseeker => (
            Application::exists_for(&state.db, id, user.user_id).await?,
            repo::is_job_saved(&state.db, user.user_id, id).await?,
        ),
        _ => (false, false),
    };

    let similar_jobs = Job::similar_to(&state.db, &row.category, id, 4).await?;
    let logo_url = match &row.company_logo_key {
        Some(key) => Some(
            state
                .storage
                .presign_get(key, PRESIGN_TTL_SECS)
                .await
                .map_err(ApiError::storage)?,
        ),
        None => None,
    };

    Ok(Json(JobDetailResponse {
        id: row.id,
        title: row.title,
        description: row.description,
        requirements: row.requirements,
        responsibilities: row.responsibilities,
        location: row.location,
        city: row.city,
        employment_type: row.employment_type,
        category: row.category,
        experience_required: row.experience_required,
        salary_min: row.salary_min,
        salary_max: row.salary_max,
        vacancies: row.vacancies,
        application_deadline: row.application_deadline,
        views_count: row.views_count,
        created_at: row.created_at,
        company: JobCompanyInfo {
            id: row.company_id,
            name: row.company_name,
            city: row.company_city,
            website: row.company_website,
            about: row.company_about,
            logo_url,
        },
        deadline_passed: deadline_passed(row.application_deadline, today),
        has_applied,
        is_saved,
        similar_jobs,
    }))
}

#[instrument(skip(state))]
pub async fn save_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveJobResponse>, ApiError> {
    auth.require_jobseeker()?;
    if !Job::exists(&state.db, id).await? {
        return Err(ApiError::not_found("Job not found."));
    }
    let created = repo::save_job(&state.db, auth.user_id, id).await?;
    if created {
        info!(job_id = %id, user_id = %auth.user_id, "job saved");
    }
    let message = if created {
        "Job saved successfully!"
    } else {
        "Job already saved."
    };
    Ok(Json(SaveJobResponse {
        created,
        message: message.to_string(),
    }))
}

#[instrument(skip(state))]
pub async fn unsave_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UnsaveJobResponse>, ApiError> {
    auth.require_jobseeker()?;
    let removed = repo::unsave_job(&state.db, auth.user_id, id).await?;
    let message = if removed {
        "Job removed from saved jobs."
    } else {
        "Job was not in your saved jobs."
    };
    Ok(Json(UnsaveJobResponse {
        removed,
        message: message.to_string(),
    }))
}

#[instrument(skip(state))]
pub async fn saved_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SavedJobRow>>, ApiError> {
    auth.require_jobseeker()?;
    let saved = repo::list_saved_jobs(&state.db, auth.user_id).await?;
    Ok(Json(saved))
}

#[instrument(skip(state))]
pub async fn my_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<CompanyJobRow>>, ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;
    let jobs = Job::list_by_company(&state.db, company.id).await?;
    Ok(Json(jobs))
}

#[instrument(skip(state, payload))]
pub async fn create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<JobRequest>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;
    validate_job_payload(&payload)?;

    let job = Job::create(&state.db, company.id, &payload).await?;
    info!(job_id = %job.id, company_id = %company.id, title = %job.title, "job created");

    notify::job_posted(&state.db, company.user_id, &job.title).await;

    Ok((StatusCode::CREATED, Json(job)))
}

#[instrument(skip(state))]
pub async fn get_own_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;
    let job = Job::find_owned(&state.db, id, company.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;
    Ok(Json(job))
}

#[instrument(skip(state, payload))]
pub async fn update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobRequest>,
) -> Result<Json<Job>, ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;
    validate_job_payload(&payload)?;

    let job = Job::update_owned(&state.db, id, company.id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;
    info!(job_id = %job.id, company_id = %company.id, "job updated");
    Ok(Json(job))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteJobResponse>, ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;
    if !Job::delete_owned(&state.db, id, company.id).await? {
        return Err(ApiError::not_found("Job not found."));
    }
    info!(job_id = %id, company_id = %company.id, "job deleted");
    Ok(Json(DeleteJobResponse {
        message: "Job deleted successfully!".to_string(),
    }))
}

#[instrument(skip(state))]
pub async fn toggle_job_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;
    let job = Job::toggle_active_owned(&state.db, id, company.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;
    info!(job_id = %job.id, is_active = job.is_active, "job active flag toggled");
    Ok(Json(job))
}

#[instrument(skip(state))]
pub async fn toggle_job_publish(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    let company = require_approved_company(&state.db, &auth).await?;
    let job = Job::toggle_publish_owned(&state.db, id, company.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;
    info!(job_id = %job.id, is_published = job.is_published, "job publish flag toggled");
    Ok(Json(job))
}
