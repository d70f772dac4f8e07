//! Application lifecycle: draft intake, per-section validation, the status
//! state machine, assisted statement drafting, and the review surface.

pub mod domain;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationForm, ApplicationId, ApplicationStatus, Category, DocumentKind, DocumentRef,
    DocumentSet, EducationDraft, EducationEntry, EntryId, ExperienceDraft, ExperienceEntry,
    PersonalDetails,
};
pub use lifecycle::{successors, transition, TransitionAuthority, TransitionError};
pub use repository::{
    ApplicationRecord, ApplicationRepository, ApplicationStatusView, InMemoryApplicationRepository,
    RepositoryError,
};
pub use router::{portal_router, ApplicationIntake, DocumentUpload, PortalState, ReviewRequest};
pub use service::{
    ApplicationService, ApplicationServiceError, AssistedStatement, DraftSource,
    GENERATION_FAILED_NOTICE, KEY_MISSING_NOTICE,
};
