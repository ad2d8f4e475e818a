use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::jobs::dto::{JobFilter, JobRequest};
use crate::jobs::repo_types::{
    AdminJobRow, CompanyJobRow, Job, JobDetailRow, PublicJobRow, SavedJobRow,
};
use crate::jobs::services::sort_clause;

// Reachability conjunction for job seekers, applied wherever listings join
// jobs with their company.
const PUBLIC_VISIBILITY: &str =
    "j.is_active = TRUE AND j.is_published = TRUE AND c.status = 'approved'";

impl Job {
    pub async fn create(
        db: &PgPool,
        company_id: Uuid,
        payload: &JobRequest,
    ) -> sqlx::Result<Job> {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs
                (company_id, title, description, requirements, responsibilities, location,
                 city, employment_type, category, experience_required, salary_min,
                 salary_max, vacancies, application_deadline, is_active, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, TRUE)
            RETURNING id, company_id, title, description, requirements, responsibilities,
                      location, city, employment_type, category, experience_required,
                      salary_min, salary_max, vacancies, is_published, is_active,
                      application_deadline, views_count, created_at, updated_at
            "#,
        )
        .bind(company_id)
        .bind(payload.title.trim())
        .bind(payload.description.trim())
        .bind(payload.requirements.trim())
        .bind(payload.responsibilities.trim())
        .bind(payload.location.trim())
        .bind(payload.city.trim())
        .bind(&payload.employment_type)
        .bind(payload.category.trim())
        .bind(&payload.experience_required)
        .bind(payload.salary_min)
        .bind(payload.salary_max)
        .bind(payload.vacancies)
        .bind(payload.application_deadline)
        .bind(payload.is_active)
        .fetch_one(db)
        .await
    }

    pub async fn update_owned(
        db: &PgPool,
        id: Uuid,
        company_id: Uuid,
        payload: &JobRequest,
    ) -> sqlx::Result<Option<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET title = $3, description = $4, requirements = $5, responsibilities = $6,
                location = $7, city = $8, employment_type = $9, category = $10,
                experience_required = $11, salary_min = $12, salary_max = $13,
                vacancies = $14, application_deadline = $15, is_active = $16,
                updated_at = now()
            WHERE id = $1 AND company_id = $2
            RETURNING id, company_id, title, description, requirements, responsibilities,
                      location, city, employment_type, category, experience_required,
                      salary_min, salary_max, vacancies, is_published, is_active,
                      application_deadline, views_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(payload.title.trim())
        .bind(payload.description.trim())
        .bind(payload.requirements.trim())
        .bind(payload.responsibilities.trim())
        .bind(payload.location.trim())
        .bind(payload.city.trim())
        .bind(&payload.employment_type)
        .bind(payload.category.trim())
        .bind(&payload.experience_required)
        .bind(payload.salary_min)
        .bind(payload.salary_max)
        .bind(payload.vacancies)
        .bind(payload.application_deadline)
        .bind(payload.is_active)
        .fetch_optional(db)
        .await
    }

    pub async fn find_owned(db: &PgPool, id: Uuid, company_id: Uuid) -> sqlx::Result<Option<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT id, company_id, title, description, requirements, responsibilities,
                   location, city, employment_type, category, experience_required,
                   salary_min, salary_max, vacancies, is_published, is_active,
                   application_deadline, views_count, created_at, updated_at
            FROM jobs
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete_owned(db: &PgPool, id: Uuid, company_id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn toggle_active_owned(
        db: &PgPool,
        id: Uuid,
        company_id: Uuid,
    ) -> sqlx::Result<Option<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET is_active = NOT is_active, updated_at = now()
            WHERE id = $1 AND company_id = $2
            RETURNING id, company_id, title, description, requirements, responsibilities,
                      location, city, employment_type, category, experience_required,
                      salary_min, salary_max, vacancies, is_published, is_active,
                      application_deadline, views_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(db)
        .await
    }

    pub async fn toggle_publish_owned(
        db: &PgPool,
        id: Uuid,
        company_id: Uuid,
    ) -> sqlx::Result<Option<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET is_published = NOT is_published, updated_at = now()
            WHERE id = $1 AND company_id = $2
            RETURNING id, company_id, title, description, requirements, responsibilities,
                      location, city, employment_type, category, experience_required,
                      salary_min, salary_max, vacancies, is_published, is_active,
                      application_deadline, views_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(db)
        .await
    }

    pub async fn list_by_company(db: &PgPool, company_id: Uuid) -> sqlx::Result<Vec<CompanyJobRow>> {
        sqlx::query_as::<_, CompanyJobRow>(
            r#"
            SELECT j.id, j.title, j.category, j.employment_type, j.city, j.is_published,
                   j.is_active, j.application_deadline, j.views_count,
                   (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count,
                   j.created_at
            FROM jobs j
            WHERE j.company_id = $1
            ORDER BY j.created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(db)
        .await
    }

    pub async fn recent_by_company(
        db: &PgPool,
        company_id: Uuid,
        limit: i64,
    ) -> sqlx::Result<Vec<CompanyJobRow>> {
        sqlx::query_as::<_, CompanyJobRow>(
            r#"
            SELECT j.id, j.title, j.category, j.employment_type, j.city, j.is_published,
                   j.is_active, j.application_deadline, j.views_count,
                   (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count,
                   j.created_at
            FROM jobs j
            WHERE j.company_id = $1
            ORDER BY j.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(db)
        .await
    }

    pub async fn count_by_company(db: &PgPool, company_id: Uuid) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(db)
            .await
    }

    pub async fn count_active_by_company(db: &PgPool, company_id: Uuid) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs WHERE company_id = $1 AND is_active = TRUE",
        )
        .bind(company_id)
        .fetch_one(db)
        .await
    }

    /// Public browse query. Returns the page plus the total match count
    /// for pagination.
    pub async fn search_public(
        db: &PgPool,
        filter: &JobFilter,
    ) -> sqlx::Result<(Vec<PublicJobRow>, i64)> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT j.id, j.title, j.location, j.city, j.employment_type, j.category,
                    j.experience_required, j.salary_min, j.salary_max, j.vacancies,
                    j.application_deadline, j.views_count, j.created_at, j.company_id,
                    c.name AS company_name
             FROM jobs j
             JOIN companies c ON c.id = j.company_id
             WHERE {PUBLIC_VISIBILITY}"
        ));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY ").push(sort_clause(filter.sort.as_deref()));
        qb.push(" LIMIT ")
            .push_bind(filter.limit.clamp(1, 100))
            .push(" OFFSET ")
            .push_bind(filter.offset.max(0));
        let jobs = qb.build_query_as::<PublicJobRow>().fetch_all(db).await?;

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT COUNT(*)
             FROM jobs j
             JOIN companies c ON c.id = j.company_id
             WHERE {PUBLIC_VISIBILITY}"
        ));
        push_filters(&mut count_qb, filter);
        let (total,) = count_qb
            .build_query_as::<(i64,)>()
            .fetch_one(db)
            .await?;

        Ok((jobs, total))
    }

    /// Job with company context, without the visibility check; callers
    /// decide who may see it.
    pub async fn find_detail(db: &PgPool, id: Uuid) -> sqlx::Result<Option<JobDetailRow>> {
        sqlx::query_as::<_, JobDetailRow>(
            r#"
            SELECT j.id, j.company_id, j.title, j.description, j.requirements,
                   j.responsibilities, j.location, j.city, j.employment_type, j.category,
                   j.experience_required, j.salary_min, j.salary_max, j.vacancies,
                   j.is_published, j.is_active, j.application_deadline, j.views_count,
                   j.created_at,
                   c.name AS company_name, c.city AS company_city,
                   c.website AS company_website, c.about AS company_about,
                   c.logo_key AS company_logo_key, c.status AS company_status
            FROM jobs j
            JOIN companies c ON c.id = j.company_id
            WHERE j.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn increment_views(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("UPDATE jobs SET views_count = views_count + 1 WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Visible postings in the same category, for the detail sidebar.
    pub async fn similar_to(
        db: &PgPool,
        category: &str,
        exclude: Uuid,
        limit: i64,
    ) -> sqlx::Result<Vec<PublicJobRow>> {
        sqlx::query_as::<_, PublicJobRow>(&format!(
            "SELECT j.id, j.title, j.location, j.city, j.employment_type, j.category,
                    j.experience_required, j.salary_min, j.salary_max, j.vacancies,
                    j.application_deadline, j.views_count, j.created_at, j.company_id,
                    c.name AS company_name
             FROM jobs j
             JOIN companies c ON c.id = j.company_id
             WHERE {PUBLIC_VISIBILITY} AND j.category = $1 AND j.id <> $2
             ORDER BY j.created_at DESC
             LIMIT $3"
        ))
        .bind(category)
        .bind(exclude)
        .bind(limit)
        .fetch_all(db)
        .await
    }

    /// Moderation listing across all companies. `status` accepts
    /// "active"/"inactive"; search matches title, description or company
    /// name.
    pub async fn list_admin(
        db: &PgPool,
        status: Option<&str>,
        company: Option<Uuid>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<AdminJobRow>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT j.id, j.title, j.category, j.employment_type, j.city, j.is_published,
                    j.is_active, j.application_deadline, j.views_count,
                    (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count,
                    j.created_at, c.name AS company_name, c.status AS company_status
             FROM jobs j
             JOIN companies c ON c.id = j.company_id
             WHERE TRUE",
        );
        match status {
            Some("active") => {
                qb.push(" AND j.is_active = TRUE");
            }
            Some("inactive") => {
                qb.push(" AND j.is_active = FALSE");
            }
            _ => {}
        }
        if let Some(company_id) = company {
            qb.push(" AND j.company_id = ").push_bind(company_id);
        }
        if let Some(term) = search {
            let pattern = format!("%{}%", term);
            qb.push(" AND (j.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR j.description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY j.created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        qb.build_query_as::<AdminJobRow>().fetch_all(db).await
    }

    /// Bare row without company context, for the admin job detail.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT id, company_id, title, description, requirements, responsibilities,
                   location, city, employment_type, category, experience_required,
                   salary_min, salary_max, vacancies, is_published, is_active,
                   application_deadline, views_count, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn toggle_active_admin(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET is_active = NOT is_active, updated_at = now()
            WHERE id = $1
            RETURNING id, company_id, title, description, requirements, responsibilities,
                      location, city, employment_type, category, experience_required,
                      salary_min, salary_max, vacancies, is_published, is_active,
                      application_deadline, views_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete_admin(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_all(db: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(db)
            .await
    }

    pub async fn count_active_total(db: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs WHERE is_active = TRUE AND is_published = TRUE",
        )
        .fetch_one(db)
        .await
    }

    pub async fn count_inactive_total(db: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE is_active = FALSE")
            .fetch_one(db)
            .await
    }

    /// Posting counts per category, largest first.
    pub async fn count_by_category(db: &PgPool, limit: i64) -> sqlx::Result<Vec<(String, i64)>> {
        sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT category, COUNT(*) AS jobs
            FROM jobs
            GROUP BY category
            ORDER BY COUNT(*) DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(db)
        .await
    }

    pub async fn exists(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    if let Some(keyword) = filter.keyword.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", keyword.trim());
        qb.push(" AND (j.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.category ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = filter.location.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", location.trim());
        qb.push(" AND (j.location ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.city ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(employment_type) = filter
        .employment_type
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        qb.push(" AND j.employment_type = ")
            .push_bind(employment_type.to_string());
    }
    if let Some(category) = filter.category.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND j.category = ").push_bind(category.to_string());
    }
    if let Some(experience) = filter.experience.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND j.experience_required = ")
            .push_bind(experience.to_string());
    }
}

/// Bookmark a job. True when this call created the row; saving twice is a
/// no-op resolved by the unique (user_id, job_id) index.
pub async fn save_job(db: &PgPool, user_id: Uuid, job_id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "INSERT INTO saved_jobs (user_id, job_id) VALUES ($1, $2)
         ON CONFLICT (user_id, job_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(job_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a bookmark. True when a row existed.
pub async fn unsave_job(db: &PgPool, user_id: Uuid, job_id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
        .bind(user_id)
        .bind(job_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn is_job_saved(db: &PgPool, user_id: Uuid, job_id: Uuid) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM saved_jobs WHERE user_id = $1 AND job_id = $2)",
    )
    .bind(user_id)
    .bind(job_id)
    .fetch_one(db)
    .await
}

pub async fn list_saved_jobs(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<SavedJobRow>> {
    sqlx::query_as::<_, SavedJobRow>(
        r#"
        SELECT sj.id, sj.saved_at, j.id AS job_id, j.title, j.location, j.city,
               j.employment_type, j.category, j.is_active, j.application_deadline,
               c.name AS company_name
        FROM saved_jobs sj
        JOIN jobs j ON j.id = sj.job_id
        JOIN companies c ON c.id = j.company_id
        WHERE sj.user_id = $1
        ORDER BY sj.saved_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}
