use time::Date;

use crate::companies::vetting::CompanyStatus;
use crate::error::ApiError;
use crate::jobs::dto::JobRequest;

pub const EMPLOYMENT_TYPES: [&str; 4] = ["full-time", "part-time", "contract", "internship"];
pub const EXPERIENCE_LEVELS: [&str; 4] = ["0-1", "1-3", "3-5", "5+"];

/// A posting is publicly reachable only while it is active, published and
/// its company holds an approval. The deadline is deliberately not part
/// of this check; expired jobs stay browsable and refuse applications.
pub fn is_publicly_visible(is_active: bool, is_published: bool, company: CompanyStatus) -> bool {
    is_active && is_published && company == CompanyStatus::Approved
}

/// Applications close strictly after the deadline day.
pub fn deadline_passed(deadline: Option<Date>, today: Date) -> bool {
    matches!(deadline, Some(d) if d < today)
}

/// Sort keys are whitelisted into ORDER BY fragments; anything unknown
/// falls back to newest first.
pub fn sort_clause(sort: Option<&str>) -> &'static str {
    match sort.unwrap_or("newest") {
        "oldest" => "j.created_at ASC",
        "title_az" => "j.title ASC",
        "title_za" => "j.title DESC",
        _ => "j.created_at DESC",
    }
}

pub fn validate_job_payload(payload: &JobRequest) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("Job title is required."));
    }
    if payload.description.trim().is_empty() {
        return Err(ApiError::validation("Job description is required."));
    }
    if payload.category.trim().is_empty() {
        return Err(ApiError::validation("Category is required."));
    }
    if !EMPLOYMENT_TYPES.contains(&payload.employment_type.as_str()) {
        return Err(ApiError::validation("Invalid employment type."));
    }
    if !EXPERIENCE_LEVELS.contains(&payload.experience_required.as_str()) {
        return Err(ApiError::validation("Invalid experience level."));
    }
    if payload.vacancies < 1 {
        return Err(ApiError::validation("Vacancies must be at least 1."));
    }
    if payload.salary_min.is_some_and(|v| v < 0) || payload.salary_max.is_some_and(|v| v < 0) {
        return Err(ApiError::validation("Salary cannot be negative."));
    }
    if let (Some(min), Some(max)) = (payload.salary_min, payload.salary_max) {
        if min > max {
            return Err(ApiError::validation(
                "Minimum salary cannot be greater than maximum salary.",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn payload() -> JobRequest {
        JobRequest {
            title: "Backend Engineer".into(),
            description: "Build services.".into(),
            requirements: String::new(),
            responsibilities: String::new(),
            location: "Berlin".into(),
            city: "Berlin".into(),
            employment_type: "full-time".into(),
            category: "Engineering".into(),
            experience_required: "1-3".into(),
            salary_min: Some(50_000),
            salary_max: Some(70_000),
            vacancies: 1,
            application_deadline: None,
            is_active: true,
        }
    }

    #[test]
    fn visibility_needs_all_three_flags() {
        use CompanyStatus::*;
        assert!(is_publicly_visible(true, true, Approved));
        assert!(!is_publicly_visible(false, true, Approved));
        assert!(!is_publicly_visible(true, false, Approved));
        assert!(!is_publicly_visible(true, true, Pending));
        assert!(!is_publicly_visible(true, true, Rejected));
    }

    #[test]
    fn deadline_day_itself_still_accepts() {
        let today = date!(2025 - 06 - 15);
        assert!(!deadline_passed(Some(today), today));
        assert!(!deadline_passed(Some(date!(2025 - 06 - 16)), today));
        assert!(deadline_passed(Some(date!(2025 - 06 - 14)), today));
        assert!(!deadline_passed(None, today));
    }

    #[test]
    fn sort_clause_whitelists_and_defaults_to_newest() {
        assert_eq!(sort_clause(Some("oldest")), "j.created_at ASC");
        assert_eq!(sort_clause(Some("title_az")), "j.title ASC");
        assert_eq!(sort_clause(Some("title_za")), "j.title DESC");
        assert_eq!(sort_clause(Some("newest")), "j.created_at DESC");
        assert_eq!(sort_clause(Some("salary; DROP TABLE jobs")), "j.created_at DESC");
        assert_eq!(sort_clause(None), "j.created_at DESC");
    }

    #[test]
    fn job_payload_validation_accepts_good_input() {
        assert!(validate_job_payload(&payload()).is_ok());
    }

    #[test]
    fn job_payload_validation_rejects_bad_enum_values() {
        let mut p = payload();
        p.employment_type = "freelance".into();
        assert!(validate_job_payload(&p).is_err());

        let mut p = payload();
        p.experience_required = "10+".into();
        assert!(validate_job_payload(&p).is_err());
    }

    #[test]
    fn job_payload_validation_checks_salary_band() {
        let mut p = payload();
        p.salary_min = Some(90_000);
        p.salary_max = Some(70_000);
        let err = validate_job_payload(&p).unwrap_err();
        assert!(err.to_string().contains("Minimum salary"));

        let mut p = payload();
        p.salary_min = Some(-1);
        assert!(validate_job_payload(&p).is_err());

        // open-ended bands are fine
        let mut p = payload();
        p.salary_max = None;
        assert!(validate_job_payload(&p).is_ok());
    }

    #[test]
    fn job_payload_validation_requires_at_least_one_vacancy() {
        let mut p = payload();
        p.vacancies = 0;
        assert!(validate_job_payload(&p).is_err());
    }
}
