use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ApplicationId, ApplicationStatus, DocumentKind, DocumentRef, EducationDraft, ExperienceDraft,
    PersonalDetails,
};
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{ApplicationService, ApplicationServiceError, AssistedStatement};
use crate::recruitment::postings::{PostingCatalog, PostingId};
use crate::recruitment::registration::{
    RegistrationError, RegistrationRequest, RegistrationService, RosterError, UserId, UserRoster,
};
use crate::recruitment::validation;

/// Shared state behind the portal's HTTP surface.
pub struct PortalState<R, C, S> {
    pub applications: Arc<ApplicationService<R, C>>,
    pub registration: Arc<RegistrationService<S>>,
    pub catalog: Arc<C>,
}

impl<R, C, S> Clone for PortalState<R, C, S> {
    fn clone(&self) -> Self {
        Self {
            applications: self.applications.clone(),
            registration: self.registration.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

/// Router exposing registration, the post catalog, and the application
/// workflow under `/api/v1`.
pub fn portal_router<R, C, S>(state: PortalState<R, C, S>) -> Router
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    Router::new()
        .route("/api/v1/register", post(register_handler::<R, C, S>))
        .route("/api/v1/login", post(login_handler::<R, C, S>))
        .route("/api/v1/postings", get(postings_handler::<R, C, S>))
        .route(
            "/api/v1/postings/:posting_id",
            get(posting_handler::<R, C, S>),
        )
        .route("/api/v1/applications", post(intake_handler::<R, C, S>))
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R, C, S>),
        )
        .route(
            "/api/v1/applications/:application_id/statement",
            put(statement_handler::<R, C, S>),
        )
        .route(
            "/api/v1/applications/:application_id/statement/draft",
            post(statement_draft_handler::<R, C, S>),
        )
        .route(
            "/api/v1/applications/:application_id/statement/accept",
            post(statement_accept_handler::<R, C, S>),
        )
        .route(
            "/api/v1/applications/:application_id/review",
            post(review_handler::<R, C, S>),
        )
        .route("/api/v1/dashboard/report", get(report_handler::<R, C, S>))
        .route(
            "/api/v1/dashboard/report.csv",
            get(export_handler::<R, C, S>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub aadhaar: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub file_name: String,
    pub storage_key: String,
}

/// Full form payload accepted at intake. Sections omitted from the payload
/// stay at their draft defaults, and `submit: false` leaves the application
/// as an editable draft.
#[derive(Debug, Deserialize)]
pub struct ApplicationIntake {
    pub applicant_id: UserId,
    pub post_id: PostingId,
    #[serde(default)]
    pub personal: Option<PersonalDetails>,
    #[serde(default)]
    pub education: Vec<EducationDraft>,
    #[serde(default)]
    pub experience: Vec<ExperienceDraft>,
    #[serde(default)]
    pub publications: Vec<String>,
    #[serde(default)]
    pub documents: Vec<DocumentUpload>,
    #[serde(default)]
    pub statement: Option<String>,
    #[serde(default)]
    pub submit: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatementUpdate {
    pub applicant_id: UserId,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct StatementDraftRequest {
    pub applicant_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct StatementAccept {
    pub applicant_id: UserId,
    #[serde(flatten)]
    pub draft: AssistedStatement,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub reviewer_id: UserId,
    pub status: ApplicationStatus,
}

pub(crate) async fn register_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
    Json(mut request): Json<RegistrationRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    request.mobile = validation::digits_only(&request.mobile);
    request.aadhaar = validation::digits_only(&request.aadhaar);

    match state.registration.register(request) {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(RegistrationError::Invalid(violations)) => {
            let payload = json!({
                "error": "registration details failed validation",
                "violations": violations,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(RegistrationError::Roster(RosterError::DuplicateIdentity)) => {
            let payload = json!({
                "error": "an account already exists for this identity number",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn login_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    let aadhaar = validation::digits_only(&request.aadhaar);
    match state.registration.login(&aadhaar) {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => {
            let payload = json!({ "error": "User not found. Please register." });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn postings_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    (StatusCode::OK, Json(state.catalog.list_open())).into_response()
}

pub(crate) async fn posting_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
    Path(posting_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    match state.catalog.get(&PostingId(posting_id)) {
        Some(post) => (StatusCode::OK, Json(post)).into_response(),
        None => {
            let payload = json!({ "error": "post not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn intake_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
    Json(payload): Json<ApplicationIntake>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    let user = match state.registration.find(&payload.applicant_id) {
        Some(user) => user,
        None => return unknown_applicant(),
    };

    let record = match state.applications.start_draft(&user, &payload.post_id) {
        Ok(record) => record,
        Err(error) => return error_response(error),
    };
    let id = record.id.clone();

    if let Some(personal) = payload.personal {
        if let Err(error) = state.applications.update_personal(&id, &user, personal) {
            return error_response(error);
        }
    }
    for draft in payload.education {
        if let Err(error) = state.applications.add_education(&id, &user, draft) {
            return error_response(error);
        }
    }
    for draft in payload.experience {
        if let Err(error) = state.applications.add_experience(&id, &user, draft) {
            return error_response(error);
        }
    }
    if !payload.publications.is_empty() {
        if let Err(error) =
            state
                .applications
                .set_publications(&id, &user, payload.publications)
        {
            return error_response(error);
        }
    }
    for upload in payload.documents {
        let document = DocumentRef {
            file_name: upload.file_name,
            storage_key: upload.storage_key,
        };
        if let Err(error) = state
            .applications
            .attach_document(&id, &user, upload.kind, document)
        {
            return error_response(error);
        }
    }
    if let Some(text) = payload.statement {
        if let Err(error) = state.applications.set_statement(&id, &user, text) {
            return error_response(error);
        }
    }

    if payload.submit {
        match state.applications.submit(&id, &user) {
            Ok(record) => (StatusCode::ACCEPTED, Json(record.status_view())).into_response(),
            Err(error) => error_response(error),
        }
    } else {
        match state.applications.get(&id) {
            Ok(record) => (StatusCode::CREATED, Json(record.status_view())).into_response(),
            Err(error) => error_response(error),
        }
    }
}

pub(crate) async fn status_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    let id = ApplicationId(application_id);
    match state.applications.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn statement_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
    Path(application_id): Path<String>,
    Json(request): Json<StatementUpdate>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    let id = ApplicationId(application_id);
    let user = match state.registration.find(&request.applicant_id) {
        Some(user) => user,
        None => return unknown_applicant(),
    };

    match state.applications.set_statement(&id, &user, request.text) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn statement_draft_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
    Path(application_id): Path<String>,
    Json(request): Json<StatementDraftRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    let id = ApplicationId(application_id);
    let user = match state.registration.find(&request.applicant_id) {
        Some(user) => user,
        None => return unknown_applicant(),
    };

    match state.applications.draft_statement(&id, &user).await {
        Ok(draft) => (StatusCode::OK, Json(draft)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn statement_accept_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
    Path(application_id): Path<String>,
    Json(request): Json<StatementAccept>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    let id = ApplicationId(application_id);
    let user = match state.registration.find(&request.applicant_id) {
        Some(user) => user,
        None => return unknown_applicant(),
    };

    match state.applications.accept_statement(&id, &user, &request.draft) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
    Path(application_id): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    let id = ApplicationId(application_id);
    let reviewer = match state.registration.find(&request.reviewer_id) {
        Some(user) => user,
        None => {
            let payload = json!({ "error": "unknown reviewer" });
            return (StatusCode::NOT_FOUND, Json(payload)).into_response();
        }
    };

    match state.applications.review(&id, &reviewer, request.status) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    match state.applications.report() {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R, C, S>(
    State(state): State<PortalState<R, C, S>>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
    S: UserRoster + 'static,
{
    let report = match state.applications.report() {
        Ok(report) => report,
        Err(error) => return error_response(error),
    };

    match report.to_csv_string() {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            csv,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({ "error": format!("report export error: {error}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn unknown_applicant() -> Response {
    let payload = json!({ "error": "unknown applicant" });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::UnknownPosting { .. }
        | ApplicationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Repository(RepositoryError::Conflict)
        | ApplicationServiceError::Transition(_)
        | ApplicationServiceError::NotEditable { .. }
        | ApplicationServiceError::StaleAssistedDraft => StatusCode::CONFLICT,
        ApplicationServiceError::RoleForbidden { .. } | ApplicationServiceError::NotOwner => {
            StatusCode::FORBIDDEN
        }
        ApplicationServiceError::PostingClosed { .. }
        | ApplicationServiceError::PostingNotChosen
        | ApplicationServiceError::UnknownEntry { .. }
        | ApplicationServiceError::SubmissionRejected { .. }
        | ApplicationServiceError::FallbackDraft => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let body = match &error {
        ApplicationServiceError::SubmissionRejected { violations } => json!({
            "error": error.to_string(),
            "violations": violations,
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, Json(body)).into_response()
}
