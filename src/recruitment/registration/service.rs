use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::domain::{RegistrationRequest, User, UserId, UserRole};
use super::roster::{RosterError, UserRoster};
use crate::recruitment::validation::{self, FieldViolation};

/// Guards roster writes behind field validation and identity uniqueness.
pub struct RegistrationService<S> {
    roster: Arc<S>,
}

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_user_id() -> UserId {
    let id = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    UserId(format!("user-{id:06}"))
}

impl<S> RegistrationService<S>
where
    S: UserRoster + 'static,
{
    pub fn new(roster: Arc<S>) -> Self {
        Self { roster }
    }

    /// Register a new applicant account.
    ///
    /// An already-claimed identity number is a distinct failure from field
    /// validation and is only reported once the fields themselves pass.
    pub fn register(&self, request: RegistrationRequest) -> Result<User, RegistrationError> {
        let violations = validation::validate_registration(&request);
        if !violations.is_empty() {
            return Err(RegistrationError::Invalid(violations));
        }

        let user = User {
            id: next_user_id(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            mobile: request.mobile,
            aadhaar: request.aadhaar,
            role: UserRole::Applicant,
        };

        let stored = self.roster.insert(user)?;
        info!(user = %stored.id.0, "applicant registered");
        Ok(stored)
    }

    /// Identity-number login, the only credential the portal checks.
    pub fn login(&self, aadhaar: &str) -> Option<User> {
        self.roster.find_by_aadhaar(aadhaar)
    }

    pub fn find(&self, id: &UserId) -> Option<User> {
        self.roster.find(id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("registration details failed validation")]
    Invalid(Vec<FieldViolation>),
    #[error(transparent)]
    Roster(#[from] RosterError),
}
