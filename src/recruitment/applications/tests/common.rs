use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::recruitment::applications::domain::{
    ApplicationId, Category, DocumentKind, DocumentRef, EducationDraft, ExperienceDraft,
    PersonalDetails,
};
use crate::recruitment::applications::repository::{
    ApplicationRecord, ApplicationRepository, RepositoryError,
};
use crate::recruitment::applications::{
    portal_router, ApplicationService, InMemoryApplicationRepository, PortalState,
};
use crate::recruitment::assist::{AssistError, StatementContext, StatementGenerator};
use crate::recruitment::postings::{InMemoryPostingCatalog, PostingCatalog, PostingId};
use crate::recruitment::registration::{
    InMemoryUserRoster, RegistrationService, User, UserId, UserRole,
};

pub(super) const GENERATED_TEXT: &str =
    "I am committed to advancing structural engineering research in national service.";

pub(super) type PortalService =
    ApplicationService<InMemoryApplicationRepository, InMemoryPostingCatalog>;

pub(super) fn applicant(id: &str) -> User {
    User {
        id: UserId(id.to_string()),
        name: "Priya Engineer".to_string(),
        email: "priya@example.com".to_string(),
        mobile: "9876543210".to_string(),
        aadhaar: "123412341234".to_string(),
        role: UserRole::Applicant,
    }
}

pub(super) fn reviewer() -> User {
    User {
        id: UserId("admin1".to_string()),
        name: "Dr. Admin Officer".to_string(),
        email: "admin@serc.res.in".to_string(),
        mobile: "9999999999".to_string(),
        aadhaar: "111111111111".to_string(),
        role: UserRole::Admin,
    }
}

pub(super) fn guest() -> User {
    User {
        id: UserId("guest1".to_string()),
        name: "Walk-in Visitor".to_string(),
        email: "visitor@example.com".to_string(),
        mobile: "9000000000".to_string(),
        aadhaar: "999988887777".to_string(),
        role: UserRole::Guest,
    }
}

pub(super) fn complete_personal(category: Category) -> PersonalDetails {
    PersonalDetails {
        full_name: "Priya Engineer".to_string(),
        father_name: "R. Engineer".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1995, 6, 21),
        gender: "Female".to_string(),
        category,
        mobile: "9876543210".to_string(),
        aadhaar: "123412341234".to_string(),
        address: "4 Beach Road, Chennai".to_string(),
        nationality: "Indian".to_string(),
    }
}

pub(super) fn education_draft() -> EducationDraft {
    EducationDraft {
        level: "M.Tech Structural Engineering".to_string(),
        board: "IIT Madras".to_string(),
        institution: "IIT Madras".to_string(),
        year: "2020".to_string(),
        percentage: "8.9 CGPA".to_string(),
    }
}

pub(super) fn experience_draft() -> ExperienceDraft {
    ExperienceDraft {
        organization: "CSIR-SERC".to_string(),
        designation: "Project Associate".to_string(),
        from_date: NaiveDate::from_ymd_opt(2020, 8, 1),
        to_date: None,
        responsibilities: "Shake table experiments.".to_string(),
    }
}

pub(super) fn document(name: &str) -> DocumentRef {
    DocumentRef {
        file_name: name.to_string(),
        storage_key: format!("uploads/{name}"),
    }
}

pub(super) enum ScriptedOutcome {
    Text(&'static str),
    MissingKey,
    ApiFailure,
}

/// Stand-in provider recording every call so tests can assert the single
/// attempt policy and the prompt context handed over.
pub(super) struct ScriptedGenerator {
    outcome: ScriptedOutcome,
    calls: AtomicUsize,
    last_context: Mutex<Option<StatementContext>>,
}

impl ScriptedGenerator {
    pub(super) fn new(outcome: ScriptedOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_context: Mutex::new(None),
        }
    }

    pub(super) fn generated() -> Self {
        Self::new(ScriptedOutcome::Text(GENERATED_TEXT))
    }

    pub(super) fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub(super) fn last_context(&self) -> Option<StatementContext> {
        self.last_context
            .lock()
            .expect("context mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl StatementGenerator for ScriptedGenerator {
    async fn generate(&self, context: &StatementContext) -> Result<String, AssistError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self
            .last_context
            .lock()
            .expect("context mutex poisoned") = Some(context.clone());

        match &self.outcome {
            ScriptedOutcome::Text(text) => Ok((*text).to_string()),
            ScriptedOutcome::MissingKey => Err(AssistError::MissingCredential),
            ScriptedOutcome::ApiFailure => Err(AssistError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            }),
        }
    }
}

pub(super) fn build_service() -> (
    PortalService,
    Arc<InMemoryApplicationRepository>,
    Arc<InMemoryPostingCatalog>,
) {
    service_with_generator(Arc::new(ScriptedGenerator::generated()))
}

pub(super) fn service_with_generator(
    generator: Arc<ScriptedGenerator>,
) -> (
    PortalService,
    Arc<InMemoryApplicationRepository>,
    Arc<InMemoryPostingCatalog>,
) {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let catalog = Arc::new(InMemoryPostingCatalog::seeded());
    let service = ApplicationService::new(repository.clone(), catalog.clone(), generator);
    (service, repository, catalog)
}

pub(super) fn open_post(catalog: &InMemoryPostingCatalog) -> PostingId {
    catalog.list_open()[0].id.clone()
}

/// Opens a draft and fills every section so the form passes full validation.
pub(super) fn filed_draft(
    service: &PortalService,
    catalog: &InMemoryPostingCatalog,
    user: &User,
    category: Category,
) -> ApplicationId {
    let record = service
        .start_draft(user, &open_post(catalog))
        .expect("draft opens");
    let id = record.id.clone();

    service
        .update_personal(&id, user, complete_personal(category))
        .expect("personal saves");
    service
        .add_education(&id, user, education_draft())
        .expect("education saves");
    service
        .add_experience(&id, user, experience_draft())
        .expect("experience saves");
    service
        .attach_document(&id, user, DocumentKind::Photo, document("photo.jpg"))
        .expect("photo attaches");
    service
        .attach_document(
            &id,
            user,
            DocumentKind::Signature,
            document("signature.png"),
        )
        .expect("signature attaches");
    service
        .attach_document(&id, user, DocumentKind::Resume, document("resume.pdf"))
        .expect("resume attaches");
    if category.requires_caste_certificate() {
        service
            .attach_document(
                &id,
                user,
                DocumentKind::CasteCertificate,
                document("caste-certificate.pdf"),
            )
            .expect("certificate attaches");
    }

    id
}

pub(super) fn submitted_application(
    service: &PortalService,
    catalog: &InMemoryPostingCatalog,
    user: &User,
) -> ApplicationId {
    let id = filed_draft(service, catalog, user, Category::Gen);
    service.submit(&id, user).expect("submission succeeds");
    id
}

pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(None)
    }

    fn for_applicant(
        &self,
        _applicant: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_applicant(
        &self,
        _applicant: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type RoutingState =
    PortalState<InMemoryApplicationRepository, InMemoryPostingCatalog, InMemoryUserRoster>;

/// State wired the way `run_server` wires it: seeded roster, seeded catalog,
/// empty repository.
pub(super) fn portal_state() -> RoutingState {
    let (service, _repository, catalog) = build_service();
    PortalState {
        applications: Arc::new(service),
        registration: Arc::new(RegistrationService::new(Arc::new(
            InMemoryUserRoster::seeded(),
        ))),
        catalog,
    }
}

pub(super) fn portal_with_state() -> (axum::Router, RoutingState) {
    let state = portal_state();
    (portal_router(state.clone()), state)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
