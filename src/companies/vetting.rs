use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::companies::repo_types::Company;
use crate::error::ApiError;

/// Review state of a company. New registrations start pending and an
/// admin moves them to approved or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    Pending,
    Approved,
    Rejected,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Pending => "pending",
            CompanyStatus::Approved => "approved",
            CompanyStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CompanyStatus::Pending),
            "approved" => Some(CompanyStatus::Approved),
            "rejected" => Some(CompanyStatus::Rejected),
            _ => None,
        }
    }

    /// The verified flag mirrors this state: set on approval, cleared on
    /// rejection, never set while pending.
    pub fn is_verified(&self) -> bool {
        matches!(self, CompanyStatus::Approved)
    }
}

/// Result of an approve or reject call. `changed` is false when the
/// company was already in the requested state, in which case nothing was
/// written and no notification should be sent.
#[derive(Debug)]
pub struct VettingOutcome {
    pub company: Company,
    pub changed: bool,
}

pub async fn approve(
    db: &PgPool,
    company_id: Uuid,
    admin_id: Uuid,
) -> Result<VettingOutcome, ApiError> {
    // The UPDATE carries its own status guard; of two racing approvals
    // only one gets a row back.
    let updated = Company::mark_approved(db, company_id, admin_id).await?;
    let fallback = if updated.is_none() {
        Company::find_by_id(db, company_id).await?
    } else {
        None
    };
    let outcome = resolve(updated, fallback)?;
    if outcome.changed {
        info!(company_id = %outcome.company.id, admin_id = %admin_id, "company approved");
    }
    Ok(outcome)
}

pub async fn reject(
    db: &PgPool,
    company_id: Uuid,
    admin_id: Uuid,
    reason: &str,
) -> Result<VettingOutcome, ApiError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ApiError::validation("Please provide a rejection reason."));
    }

    let updated = Company::mark_rejected(db, company_id, admin_id, reason).await?;
    let fallback = if updated.is_none() {
        Company::find_by_id(db, company_id).await?
    } else {
        None
    };
    let outcome = resolve(updated, fallback)?;
    if outcome.changed {
        info!(company_id = %outcome.company.id, admin_id = %admin_id, "company rejected");
    }
    Ok(outcome)
}

/// Fold a guarded transition with its fallback read. A returned row is
/// the transition; no row plus a fresh read means the company was
/// already in the requested state.
fn resolve(
    updated: Option<Company>,
    current: Option<Company>,
) -> Result<VettingOutcome, ApiError> {
    match (updated, current) {
        (Some(company), _) => Ok(VettingOutcome {
            company,
            changed: true,
        }),
        (None, Some(company)) => Ok(VettingOutcome {
            company,
            changed: false,
        }),
        (None, None) => Err(ApiError::not_found("Company not found.")),
    }
}

/// Gate for employer operations: the caller must hold the company role,
/// own a company record, and that company must have passed review.
pub async fn require_approved_company(db: &PgPool, auth: &AuthUser) -> Result<Company, ApiError> {
    auth.require_company()?;
    let company = Company::find_by_user(db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company profile not found."))?;
    match company.vetting_status() {
        CompanyStatus::Approved => Ok(company),
        CompanyStatus::Pending => Err(ApiError::authorization(
            "Your company registration is pending approval.",
        )),
        CompanyStatus::Rejected => Err(ApiError::authorization(
            "Your company registration was rejected.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;
    use crate::state::AppState;
    use time::OffsetDateTime;

    fn company_in(status: &str) -> Company {
        Company {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            admin_id: None,
            name: "Acme Robotics".into(),
            registration_number: "REG-404142".into(),
            email: "jobs@acme-robotics.example".into(),
            phone: String::new(),
            website: String::new(),
            about: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            logo_key: None,
            status: status.into(),
            is_verified: status == "approved",
            rejection_reason: String::new(),
            submitted_at: OffsetDateTime::now_utc(),
            approved_at: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn status_parse_round_trips() {
        for status in [
            CompanyStatus::Pending,
            CompanyStatus::Approved,
            CompanyStatus::Rejected,
        ] {
            assert_eq!(CompanyStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CompanyStatus::parse("verified"), None);
        assert_eq!(CompanyStatus::parse(""), None);
    }

    #[test]
    fn verified_flag_tracks_approval_exactly() {
        assert!(!CompanyStatus::Pending.is_verified());
        assert!(CompanyStatus::Approved.is_verified());
        assert!(!CompanyStatus::Rejected.is_verified());
    }

    #[test]
    fn only_the_updating_call_reports_a_change() {
        let won = resolve(Some(company_in("approved")), None).expect("transition");
        assert!(won.changed);

        // The racing loser sees no row from the guarded UPDATE and reads
        // the company back already transitioned.
        let lost = resolve(None, Some(company_in("approved"))).expect("no-op outcome");
        assert!(!lost.changed);
    }

    #[test]
    fn vanished_company_resolves_to_not_found() {
        let err = resolve(None, None).unwrap_err();
        assert!(err.to_string().contains("Company not found"));
    }

    #[tokio::test]
    async fn reject_requires_a_reason_before_touching_the_db() {
        // Lazy pool: the call must fail on validation, not on connect.
        let state = AppState::fake();
        let err = reject(&state.db, Uuid::new_v4(), Uuid::new_v4(), "   ")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rejection reason"));
    }

    #[tokio::test]
    async fn employer_gate_rejects_non_company_roles_up_front() {
        let state = AppState::fake();
        let seeker = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Jobseeker,
        };
        let err = require_approved_company(&state.db, &seeker)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("permission"));
    }
}
