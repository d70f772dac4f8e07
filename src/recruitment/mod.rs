//! Recruitment workflow: candidate registration, the advertised post catalog,
//! application form state and its status lifecycle, assisted statement
//! drafting, and dashboard reporting.

pub mod applications;
pub mod assist;
pub mod postings;
pub mod registration;
pub mod report;
pub mod validation;
