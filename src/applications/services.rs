use std::fmt;

use crate::error::ApiError;

pub const MIN_COVER_LETTER_CHARS: usize = 100;

/// Review pipeline states for an application. Stored as text; employers may
/// move an application to any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Applied,
    UnderReview,
    Shortlisted,
    InterviewScheduled,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "applied" => Some(ApplicationStatus::Applied),
            "under_review" => Some(ApplicationStatus::UnderReview),
            "shortlisted" => Some(ApplicationStatus::Shortlisted),
            "interview_scheduled" => Some(ApplicationStatus::InterviewScheduled),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cover letters are mandatory and must carry some substance. Length is
/// counted in characters, not bytes.
pub fn validate_cover_letter(cover_letter: &str) -> Result<(), ApiError> {
    let trimmed = cover_letter.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Cover letter is required."));
    }
    if trimmed.chars().count() < MIN_COVER_LETTER_CHARS {
        return Err(ApiError::validation(
            "Cover letter must be at least 100 characters.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod application_services_tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ApplicationStatus::Applied,
            ApplicationStatus::UnderReview,
            ApplicationStatus::Shortlisted,
            ApplicationStatus::InterviewScheduled,
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert_eq!(ApplicationStatus::parse("hired"), None);
        assert_eq!(ApplicationStatus::parse("Applied"), None);
        assert_eq!(ApplicationStatus::parse(""), None);
    }

    #[test]
    fn test_cover_letter_minimum_length() {
        let short = "a".repeat(MIN_COVER_LETTER_CHARS - 1);
        assert!(validate_cover_letter(&short).is_err());

        let exact = "a".repeat(MIN_COVER_LETTER_CHARS);
        assert!(validate_cover_letter(&exact).is_ok());
    }

    #[test]
    fn test_cover_letter_counts_characters_not_bytes() {
        // 100 two-byte characters pass even though the byte count is 200.
        let cyrillic = "д".repeat(MIN_COVER_LETTER_CHARS);
        assert!(validate_cover_letter(&cyrillic).is_ok());
    }

    #[test]
    fn test_cover_letter_trims_before_counting() {
        let padded = format!("   {}   ", "a".repeat(MIN_COVER_LETTER_CHARS - 1));
        assert!(validate_cover_letter(&padded).is_err());
        assert!(validate_cover_letter("   ").is_err());
    }
}
