//! Core services for a government research recruitment portal.
//!
//! The crate models applicant-facing form state, the reviewer-driven status
//! lifecycle, and the intake boundaries around them: candidate registration,
//! the advertised post catalog, assisted statement drafting, and dashboard
//! reporting.

pub mod config;
pub mod error;
pub mod recruitment;
pub mod site;
pub mod telemetry;
