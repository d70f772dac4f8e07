use std::sync::Mutex;

use super::domain::{User, UserId, UserRole};

/// Account storage abstraction. Lookup by the 12-digit identity number is the
/// portal's login primitive, so the roster indexes on it rather than on email.
pub trait UserRoster: Send + Sync {
    fn insert(&self, user: User) -> Result<User, RosterError>;
    fn find(&self, id: &UserId) -> Option<User>;
    fn find_by_aadhaar(&self, aadhaar: &str) -> Option<User>;
    fn count(&self) -> usize;
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("an account already exists for this identity number")]
    DuplicateIdentity,
}

/// In-memory roster backing the portal's local account model.
#[derive(Default)]
pub struct InMemoryUserRoster {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRoster {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    /// Roster preloaded with the demo admin and applicant accounts.
    pub fn seeded() -> Self {
        Self::new(demo_accounts())
    }
}

impl UserRoster for InMemoryUserRoster {
    fn insert(&self, user: User) -> Result<User, RosterError> {
        let mut users = self.users.lock().expect("roster mutex poisoned");
        if users.iter().any(|existing| existing.aadhaar == user.aadhaar) {
            return Err(RosterError::DuplicateIdentity);
        }
        users.push(user.clone());
        Ok(user)
    }

    fn find(&self, id: &UserId) -> Option<User> {
        self.users
            .lock()
            .expect("roster mutex poisoned")
            .iter()
            .find(|user| &user.id == id)
            .cloned()
    }

    fn find_by_aadhaar(&self, aadhaar: &str) -> Option<User> {
        self.users
            .lock()
            .expect("roster mutex poisoned")
            .iter()
            .find(|user| user.aadhaar == aadhaar)
            .cloned()
    }

    fn count(&self) -> usize {
        self.users.lock().expect("roster mutex poisoned").len()
    }
}

fn demo_accounts() -> Vec<User> {
    vec![
        User {
            id: UserId("admin1".to_string()),
            name: "Dr. Admin Officer".to_string(),
            email: "admin@serc.res.in".to_string(),
            mobile: "9999999999".to_string(),
            aadhaar: "111111111111".to_string(),
            role: UserRole::Admin,
        },
        User {
            id: UserId("user1".to_string()),
            name: "Priya Engineer".to_string(),
            email: "priya@example.com".to_string(),
            mobile: "9876543210".to_string(),
            aadhaar: "123412341234".to_string(),
            role: UserRole::Applicant,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_roster_has_admin_and_applicant() {
        let roster = InMemoryUserRoster::seeded();
        assert_eq!(roster.count(), 2);

        let admin = roster
            .find_by_aadhaar("111111111111")
            .expect("admin seeded");
        assert_eq!(admin.role, UserRole::Admin);

        let applicant = roster
            .find_by_aadhaar("123412341234")
            .expect("applicant seeded");
        assert_eq!(applicant.role, UserRole::Applicant);
    }

    #[test]
    fn insert_rejects_duplicate_identity() {
        let roster = InMemoryUserRoster::seeded();
        let clone = User {
            id: UserId("user2".to_string()),
            name: "Second Account".to_string(),
            email: "second@example.com".to_string(),
            mobile: "9000000000".to_string(),
            aadhaar: "123412341234".to_string(),
            role: UserRole::Applicant,
        };

        match roster.insert(clone) {
            Err(RosterError::DuplicateIdentity) => {}
            other => panic!("expected duplicate identity error, got {other:?}"),
        }
        assert_eq!(roster.count(), 2);
    }
}
