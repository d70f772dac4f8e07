//! Candidate registration and the account roster behind login.

pub mod domain;
pub mod roster;
pub mod service;

pub use domain::{RegistrationRequest, User, UserId, UserRole};
pub use roster::{InMemoryUserRoster, RosterError, UserRoster};
pub use service::{RegistrationError, RegistrationService};
