//! The status lifecycle: which edges exist in the transition graph and who is
//! allowed to drive each one.

use super::domain::ApplicationStatus;
use crate::recruitment::registration::UserRole;

/// Who is driving a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAuthority {
    Applicant,
    Reviewer,
}

impl TransitionAuthority {
    /// Reviewer authority is reserved for admin accounts; guests hold none.
    pub const fn from_role(role: UserRole) -> Option<Self> {
        match role {
            UserRole::Admin => Some(TransitionAuthority::Reviewer),
            UserRole::Applicant => Some(TransitionAuthority::Applicant),
            UserRole::Guest => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TransitionAuthority::Applicant => "applicant",
            TransitionAuthority::Reviewer => "reviewer",
        }
    }
}

/// Legal next statuses from the given one. Terminal statuses return an empty
/// slice, and no status lists itself, so re-asserting the current status is
/// always rejected.
pub const fn successors(from: ApplicationStatus) -> &'static [ApplicationStatus] {
    match from {
        ApplicationStatus::Draft => &[ApplicationStatus::Submitted],
        ApplicationStatus::Submitted => &[ApplicationStatus::UnderScrutiny],
        ApplicationStatus::UnderScrutiny => &[
            ApplicationStatus::Eligible,
            ApplicationStatus::NotEligible,
        ],
        ApplicationStatus::Eligible => &[ApplicationStatus::InterviewScheduled],
        ApplicationStatus::InterviewScheduled => {
            &[ApplicationStatus::Selected, ApplicationStatus::Rejected]
        }
        ApplicationStatus::NotEligible
        | ApplicationStatus::Selected
        | ApplicationStatus::Rejected => &[],
    }
}

/// The submission edge belongs to the applicant; every other edge is a review
/// decision.
const fn required_authority(
    from: ApplicationStatus,
    to: ApplicationStatus,
) -> TransitionAuthority {
    match (from, to) {
        (ApplicationStatus::Draft, ApplicationStatus::Submitted) => TransitionAuthority::Applicant,
        _ => TransitionAuthority::Reviewer,
    }
}

/// Resolve one requested status change.
///
/// Edge legality is checked before authority, so an impossible request reports
/// `InvalidTransition` no matter who asked.
pub fn transition(
    current: ApplicationStatus,
    requested: ApplicationStatus,
    authority: TransitionAuthority,
) -> Result<ApplicationStatus, TransitionError> {
    let legal = successors(current)
        .iter()
        .any(|status| *status == requested);
    if !legal {
        return Err(TransitionError::InvalidTransition {
            from: current,
            to: requested,
        });
    }

    let required = required_authority(current, requested);
    if required != authority {
        return Err(TransitionError::UnauthorizedActor {
            authority,
            from: current,
            to: requested,
        });
    }

    Ok(requested)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("no transition from {} to {}", from.label(), to.label())]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("{} authority cannot move an application from {} to {}", authority.label(), from.label(), to.label())]
    UnauthorizedActor {
        authority: TransitionAuthority,
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
}
