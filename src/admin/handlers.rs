use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    admin::dto::{
        AdminCompanyDetailResponse, AdminCompanyListResponse, AdminDashboardResponse,
        AdminDeleteResponse, AdminJobDetailResponse, AdminJobListResponse, AdminUserListResponse,
        CategoryCount, CompanyListQuery, DailyCount, JobListQuery, RejectCompanyRequest,
        StatisticsResponse, TopCompany, UserListQuery, VettingActionResponse,
    },
    applications::repo_types::Application,
    auth::{jwt::AuthUser, repo_types::User},
    companies::{
        repo_types::Company,
        vetting::{self, CompanyStatus},
    },
    error::ApiError,
    jobs::repo_types::Job,
    notifications::notify,
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/companies", get(list_companies))
        .route("/admin/companies/:id", get(company_detail).delete(delete_company))
        .route("/admin/companies/:id/approve", post(approve_company))
        .route("/admin/companies/:id/reject", post(reject_company))
        .route("/admin/jobs", get(list_jobs))
        .route("/admin/jobs/:id", get(job_detail).delete(delete_job))
        .route("/admin/jobs/:id/toggle-active", post(toggle_job))
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id/toggle-active", post(toggle_user))
        .route("/admin/statistics", get(statistics))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AdminDashboardResponse>, ApiError> {
    auth.require_admin()?;

    let total_jobseekers = User::count_jobseekers(&state.db).await?;
    let total_companies = Company::count_all(&state.db).await?;
    let pending_companies = Company::count_by_status(&state.db, CompanyStatus::Pending).await?;
    let approved_companies = Company::count_by_status(&state.db, CompanyStatus::Approved).await?;
    let rejected_companies = Company::count_by_status(&state.db, CompanyStatus::Rejected).await?;
    let total_jobs = Job::count_all(&state.db).await?;
    let active_jobs = Job::count_active_total(&state.db).await?;
    let inactive_jobs = Job::count_inactive_total(&state.db).await?;
    let total_applications = Application::count_all(&state.db).await?;
    let pending_applications = Application::count_pending_all(&state.db).await?;

    let recent_companies = Company::list_admin(&state.db, None, None, 5, 0).await?;
    let recent_jobs = Job::list_admin(&state.db, None, None, None, 5, 0).await?;
    let recent_applications = Application::recent_all(&state.db, 10).await?;

    Ok(Json(AdminDashboardResponse {
        total_jobseekers,
        total_companies,
        pending_companies,
        approved_companies,
        rejected_companies,
        total_jobs,
        active_jobs,
        inactive_jobs,
        total_applications,
        pending_applications,
        recent_companies,
        recent_jobs,
        recent_applications,
    }))
}

#[instrument(skip(state))]
pub async fn list_companies(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CompanyListQuery>,
) -> Result<Json<AdminCompanyListResponse>, ApiError> {
    auth.require_admin()?;

    let status = match query.status.as_deref() {
        Some(raw) => Some(
            CompanyStatus::parse(raw)
                .ok_or_else(|| ApiError::validation("Invalid company status."))?,
        ),
        None => None,
    };
    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);

    let companies =
        Company::list_admin(&state.db, status, query.search.as_deref(), limit, offset).await?;
    Ok(Json(AdminCompanyListResponse {
        companies,
        limit,
        offset,
    }))
}

#[instrument(skip(state))]
pub async fn company_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminCompanyDetailResponse>, ApiError> {
    auth.require_admin()?;
    let company = Company::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found."))?;

    let total_jobs = Job::count_by_company(&state.db, company.id).await?;
    let active_jobs = Job::count_active_by_company(&state.db, company.id).await?;
    let total_applications = Application::count_by_company(&state.db, company.id).await?;
    let recent_jobs = Job::recent_by_company(&state.db, company.id, 5).await?;

    Ok(Json(AdminCompanyDetailResponse {
        company,
        total_jobs,
        active_jobs,
        total_applications,
        recent_jobs,
    }))
}

#[instrument(skip(state))]
pub async fn approve_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VettingActionResponse>, ApiError> {
    auth.require_admin()?;

    let outcome = vetting::approve(&state.db, id, auth.user_id).await?;
    if outcome.changed {
        notify::company_approved(&state.db, outcome.company.user_id, &outcome.company.name).await;
        return Ok(Json(VettingActionResponse {
            message: Some(format!(
                "Company \"{}\" approved successfully!",
                outcome.company.name
            )),
            warning: None,
            company: outcome.company,
        }));
    }

    warn!(company_id = %id, "approve ignored, company already approved");
    Ok(Json(VettingActionResponse {
        message: None,
        warning: Some("Company is already approved.".to_string()),
        company: outcome.company,
    }))
}

#[instrument(skip(state, payload))]
pub async fn reject_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectCompanyRequest>,
) -> Result<Json<VettingActionResponse>, ApiError> {
    auth.require_admin()?;

    let outcome = vetting::reject(&state.db, id, auth.user_id, &payload.reason).await?;
    if outcome.changed {
        notify::company_rejected(
            &state.db,
            outcome.company.user_id,
            &outcome.company.name,
            &outcome.company.rejection_reason,
        )
        .await;
        return Ok(Json(VettingActionResponse {
            message: Some(format!(
                "Company \"{}\" has been rejected.",
                outcome.company.name
            )),
            warning: None,
            company: outcome.company,
        }));
    }

    warn!(company_id = %id, "reject ignored, company already rejected");
    Ok(Json(VettingActionResponse {
        message: None,
        warning: Some("Company is already rejected.".to_string()),
        company: outcome.company,
    }))
}

#[instrument(skip(state))]
pub async fn delete_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminDeleteResponse>, ApiError> {
    auth.require_admin()?;

    let company = Company::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found."))?;
    if !Company::delete_with_account(&state.db, id).await? {
        return Err(ApiError::not_found("Company not found."));
    }
    info!(company_id = %id, name = %company.name, admin_id = %auth.user_id, "company deleted");
    Ok(Json(AdminDeleteResponse {
        message: format!("Company \"{}\" deleted successfully!", company.name),
    }))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<JobListQuery>,
) -> Result<Json<AdminJobListResponse>, ApiError> {
    auth.require_admin()?;

    let status = match query.status.as_deref() {
        Some("active") => Some("active"),
        Some("inactive") => Some("inactive"),
        None => None,
        Some(_) => return Err(ApiError::validation("Invalid job status filter.")),
    };
    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);

    let jobs = Job::list_admin(
        &state.db,
        status,
        query.company,
        query.search.as_deref(),
        limit,
        offset,
    )
    .await?;
    Ok(Json(AdminJobListResponse { jobs, limit, offset }))
}

#[instrument(skip(state))]
pub async fn job_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminJobDetailResponse>, ApiError> {
    auth.require_admin()?;
    let job = Job::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;
    let applications = Application::list_by_job(&state.db, job.id).await?;
    let total_applications = applications.len() as i64;
    Ok(Json(AdminJobDetailResponse {
        job,
        applications,
        total_applications,
    }))
}

#[instrument(skip(state))]
pub async fn toggle_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    auth.require_admin()?;
    let job = Job::toggle_active_admin(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;
    info!(job_id = %job.id, is_active = job.is_active, admin_id = %auth.user_id, "job active flag toggled");
    Ok(Json(job))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminDeleteResponse>, ApiError> {
    auth.require_admin()?;
    if !Job::delete_admin(&state.db, id).await? {
        return Err(ApiError::not_found("Job not found."));
    }
    info!(job_id = %id, admin_id = %auth.user_id, "job deleted");
    Ok(Json(AdminDeleteResponse {
        message: "Job deleted successfully!".to_string(),
    }))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<AdminUserListResponse>, ApiError> {
    auth.require_admin()?;

    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);
    let users = User::list_jobseekers(&state.db, query.search.as_deref(), limit, offset).await?;
    Ok(Json(AdminUserListResponse {
        users,
        limit,
        offset,
    }))
}

#[instrument(skip(state))]
pub async fn toggle_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    auth.require_admin()?;
    let user = User::toggle_active_jobseeker(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;
    info!(user_id = %user.id, is_active = user.is_active, admin_id = %auth.user_id, "job seeker active flag toggled");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn statistics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StatisticsResponse>, ApiError> {
    auth.require_admin()?;

    let applications_by_day = Application::count_by_day(&state.db, 30)
        .await?
        .into_iter()
        .map(|(day, count)| DailyCount { day, count })
        .collect();
    let jobs_by_category = Job::count_by_category(&state.db, 10)
        .await?
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    let top_companies = Application::top_companies(&state.db, 10)
        .await?
        .into_iter()
        .map(|(name, applications)| TopCompany { name, applications })
        .collect();

    Ok(Json(StatisticsResponse {
        applications_by_day,
        jobs_by_category,
        top_companies,
    }))
}
