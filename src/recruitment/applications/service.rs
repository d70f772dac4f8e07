use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    ApplicationForm, ApplicationId, ApplicationStatus, DocumentKind, DocumentRef, EducationDraft,
    EntryId, ExperienceDraft, PersonalDetails,
};
use super::lifecycle::{self, TransitionAuthority, TransitionError};
use super::repository::{ApplicationRecord, ApplicationRepository, RepositoryError};
use crate::recruitment::assist::{AssistError, StatementContext, StatementGenerator};
use crate::recruitment::postings::{JobPost, PostingCatalog, PostingId};
use crate::recruitment::registration::{User, UserId, UserRole};
use crate::recruitment::report::RecruitmentReport;
use crate::recruitment::validation::{self, FieldViolation};

/// Notice surfaced when assisted drafting is attempted without a configured
/// provider key.
pub const KEY_MISSING_NOTICE: &str = "Gemini API Key is missing. Please configure the environment.";

/// Notice surfaced when the provider call fails or returns nothing usable.
pub const GENERATION_FAILED_NOTICE: &str =
    "Error generating content. Please try again manually.";

/// Where an assisted draft's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftSource {
    Generated,
    Fallback,
}

impl DraftSource {
    pub const fn label(self) -> &'static str {
        match self {
            DraftSource::Generated => "generated",
            DraftSource::Fallback => "fallback",
        }
    }
}

/// Advisory statement draft produced by the assist flow. Nothing is written
/// to the form until the applicant explicitly accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistedStatement {
    pub text: String,
    pub source: DraftSource,
    pub based_on_revision: u32,
}

impl AssistedStatement {
    pub const fn is_generated(&self) -> bool {
        matches!(self.source, DraftSource::Generated)
    }
}

/// Service composing the repository, the post catalog, and the statement
/// generator behind the application workflow.
pub struct ApplicationService<R, C> {
    repository: Arc<R>,
    catalog: Arc<C>,
    generator: Arc<dyn StatementGenerator>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R, C> ApplicationService<R, C>
where
    R: ApplicationRepository + 'static,
    C: PostingCatalog + 'static,
{
    pub fn new(repository: Arc<R>, catalog: Arc<C>, generator: Arc<dyn StatementGenerator>) -> Self {
        Self {
            repository,
            catalog,
            generator,
        }
    }

    /// Open a draft against an advertised post.
    pub fn start_draft(
        &self,
        applicant: &User,
        post_id: &PostingId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        if applicant.role != UserRole::Applicant {
            return Err(ApplicationServiceError::RoleForbidden {
                role: applicant.role,
            });
        }

        let post = self
            .catalog
            .get(post_id)
            .ok_or_else(|| ApplicationServiceError::UnknownPosting {
                id: post_id.clone(),
            })?;
        if !post.is_open() {
            return Err(ApplicationServiceError::PostingClosed {
                id: post_id.clone(),
            });
        }

        let record = ApplicationRecord {
            id: next_application_id(),
            applicant: applicant.id.clone(),
            form: ApplicationForm::for_post(post.id),
            status: ApplicationStatus::Draft,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Replace the personal details section, returning its current violations
    /// for inline display. Identity and mobile input is reduced to digits
    /// before it is stored, mirroring the keystroke filter on the form.
    pub fn update_personal(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        mut details: PersonalDetails,
    ) -> Result<Vec<FieldViolation>, ApplicationServiceError> {
        details.mobile = validation::digits_only(&details.mobile);
        details.aadhaar = validation::digits_only(&details.aadhaar);

        let mut record = self.editable_record(application_id, applicant)?;
        record.form.personal = details;
        let violations = validation::validate_personal(&record.form.personal);
        self.repository.update(record)?;
        Ok(violations)
    }

    pub fn add_education(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        draft: EducationDraft,
    ) -> Result<EntryId, ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        let entry_id = record.form.add_education(draft);
        self.repository.update(record)?;
        Ok(entry_id)
    }

    pub fn update_education(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        entry_id: EntryId,
        draft: EducationDraft,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        if !record.form.update_education(entry_id, draft) {
            return Err(ApplicationServiceError::UnknownEntry { id: entry_id });
        }
        self.repository.update(record)?;
        Ok(())
    }

    pub fn remove_education(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        entry_id: EntryId,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        if !record.form.remove_education(entry_id) {
            return Err(ApplicationServiceError::UnknownEntry { id: entry_id });
        }
        self.repository.update(record)?;
        Ok(())
    }

    pub fn add_experience(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        draft: ExperienceDraft,
    ) -> Result<EntryId, ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        let entry_id = record.form.add_experience(draft);
        self.repository.update(record)?;
        Ok(entry_id)
    }

    pub fn update_experience(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        entry_id: EntryId,
        draft: ExperienceDraft,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        if !record.form.update_experience(entry_id, draft) {
            return Err(ApplicationServiceError::UnknownEntry { id: entry_id });
        }
        self.repository.update(record)?;
        Ok(())
    }

    pub fn remove_experience(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        entry_id: EntryId,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        if !record.form.remove_experience(entry_id) {
            return Err(ApplicationServiceError::UnknownEntry { id: entry_id });
        }
        self.repository.update(record)?;
        Ok(())
    }

    pub fn set_publications(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        publications: Vec<String>,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        record.form.publications = publications;
        self.repository.update(record)?;
        Ok(())
    }

    pub fn attach_document(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        kind: DocumentKind,
        document: DocumentRef,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        record.form.documents.attach(kind, document);
        self.repository.update(record)?;
        Ok(())
    }

    pub fn remove_document(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        kind: DocumentKind,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        record.form.documents.remove(kind);
        self.repository.update(record)?;
        Ok(())
    }

    /// Overwrite the statement with manually typed text.
    pub fn set_statement(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        text: String,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.editable_record(application_id, applicant)?;
        record.form.set_statement(text);
        self.repository.update(record)?;
        Ok(())
    }

    /// Current violations across the whole form, for inline display.
    pub fn check(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
    ) -> Result<Vec<FieldViolation>, ApplicationServiceError> {
        let record = self.owned_record(application_id, applicant)?;
        Ok(validation::validate_form(&record.form))
    }

    /// Request an assisted statement draft for the applicant's own draft
    /// application.
    ///
    /// Provider failures never surface as errors here; they collapse into a
    /// fallback notice so the caller always has something to show. The result
    /// is advisory either way: nothing touches the form until
    /// [`accept_statement`](Self::accept_statement).
    pub async fn draft_statement(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
    ) -> Result<AssistedStatement, ApplicationServiceError> {
        let record = self.editable_record(application_id, applicant)?;

        let post_id = record
            .form
            .post_id
            .clone()
            .ok_or(ApplicationServiceError::PostingNotChosen)?;
        let post = self
            .catalog
            .get(&post_id)
            .ok_or(ApplicationServiceError::UnknownPosting { id: post_id })?;

        let context = StatementContext {
            post_title: post.title,
            education: record.form.education_summary(),
            experience: record.form.experience_summary(),
        };
        let based_on_revision = record.form.statement_revision();

        match self.generator.generate(&context).await {
            Ok(text) => Ok(AssistedStatement {
                text,
                source: DraftSource::Generated,
                based_on_revision,
            }),
            Err(AssistError::MissingCredential) => {
                warn!(
                    application = %record.id.0,
                    "statement drafting skipped: provider credential missing"
                );
                Ok(AssistedStatement {
                    text: KEY_MISSING_NOTICE.to_string(),
                    source: DraftSource::Fallback,
                    based_on_revision,
                })
            }
            Err(error) => {
                warn!(
                    application = %record.id.0,
                    error = %error,
                    "statement drafting failed"
                );
                Ok(AssistedStatement {
                    text: GENERATION_FAILED_NOTICE.to_string(),
                    source: DraftSource::Fallback,
                    based_on_revision,
                })
            }
        }
    }

    /// Copy an accepted draft into the statement field.
    ///
    /// The draft must have been prepared against the statement's current
    /// revision; anything older is discarded as stale. Fallback notices are
    /// never accepted as statement text.
    pub fn accept_statement(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
        draft: &AssistedStatement,
    ) -> Result<(), ApplicationServiceError> {
        if !draft.is_generated() {
            return Err(ApplicationServiceError::FallbackDraft);
        }

        let mut record = self.editable_record(application_id, applicant)?;
        if record.form.statement_revision() != draft.based_on_revision {
            return Err(ApplicationServiceError::StaleAssistedDraft);
        }

        record.form.set_statement(draft.text.clone());
        self.repository.update(record)?;
        Ok(())
    }

    /// Submit the draft for scrutiny.
    ///
    /// The whole form must validate cleanly and the chosen post must still be
    /// open; only then does the Draft -> Submitted transition run. A failed
    /// submission leaves the record untouched.
    pub fn submit(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let mut record = self.owned_record(application_id, applicant)?;

        let violations = validation::validate_form(&record.form);
        if !violations.is_empty() {
            return Err(ApplicationServiceError::SubmissionRejected { violations });
        }

        self.open_post_for(&record.form)?;

        let authority = authority_of(applicant)?;
        record.status = lifecycle::transition(record.status, ApplicationStatus::Submitted, authority)?;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Apply one reviewer decision to an application's status.
    ///
    /// Requires reviewer authority outright: the Draft -> Submitted edge is
    /// applicant-only and runs through [`submit`](Self::submit), never here.
    /// Illegal and unauthorized requests leave the record untouched.
    pub fn review(
        &self,
        application_id: &ApplicationId,
        reviewer: &User,
        requested: ApplicationStatus,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let authority = authority_of(reviewer)?;
        if authority != TransitionAuthority::Reviewer {
            return Err(ApplicationServiceError::RoleForbidden {
                role: reviewer.role,
            });
        }

        let mut record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;

        record.status = lifecycle::transition(record.status, requested, authority)?;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Fetch an application record for API responses.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Every application filed by the given account, in id order.
    pub fn for_applicant(
        &self,
        applicant: &UserId,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        Ok(self.repository.for_applicant(applicant)?)
    }

    /// Dashboard aggregates over the current record snapshot.
    ///
    /// Applications keep their post labels after the post closes; only the
    /// advertised vacancy counts shrink to the posts still open.
    pub fn report(&self) -> Result<RecruitmentReport, ApplicationServiceError> {
        let records = self.repository.all()?;
        let mut posts = self.catalog.list_open();
        for post_id in records
            .iter()
            .filter_map(|record| record.form.post_id.as_ref())
        {
            if posts.iter().all(|post| &post.id != post_id) {
                if let Some(post) = self.catalog.get(post_id) {
                    posts.push(post);
                }
            }
        }
        Ok(RecruitmentReport::build(&records, &posts))
    }

    fn open_post_for(&self, form: &ApplicationForm) -> Result<JobPost, ApplicationServiceError> {
        let post_id = form
            .post_id
            .clone()
            .ok_or(ApplicationServiceError::PostingNotChosen)?;
        let post = self
            .catalog
            .get(&post_id)
            .ok_or_else(|| ApplicationServiceError::UnknownPosting {
                id: post_id.clone(),
            })?;
        if !post.is_open() {
            return Err(ApplicationServiceError::PostingClosed { id: post_id });
        }
        Ok(post)
    }

    fn owned_record(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        if record.applicant != applicant.id {
            return Err(ApplicationServiceError::NotOwner);
        }
        Ok(record)
    }

    fn editable_record(
        &self,
        application_id: &ApplicationId,
        applicant: &User,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self.owned_record(application_id, applicant)?;
        if record.status != ApplicationStatus::Draft {
            return Err(ApplicationServiceError::NotEditable {
                status: record.status,
            });
        }
        Ok(record)
    }
}

fn authority_of(user: &User) -> Result<TransitionAuthority, ApplicationServiceError> {
    TransitionAuthority::from_role(user.role)
        .ok_or(ApplicationServiceError::RoleForbidden { role: user.role })
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("post {} is not advertised", id.0)]
    UnknownPosting { id: PostingId },
    #[error("post {} is closed for applications", id.0)]
    PostingClosed { id: PostingId },
    #[error("no post selected on the application")]
    PostingNotChosen,
    #[error("{} accounts cannot perform this action", role.label())]
    RoleForbidden { role: UserRole },
    #[error("only the owning applicant may act on this application")]
    NotOwner,
    #[error("application is read-only in status {}", status.label())]
    NotEditable { status: ApplicationStatus },
    #[error("entry {} does not exist on this form", id.0)]
    UnknownEntry { id: EntryId },
    #[error("submission blocked by {} validation issue(s)", violations.len())]
    SubmissionRejected { violations: Vec<FieldViolation> },
    #[error("statement changed while the draft was being prepared")]
    StaleAssistedDraft,
    #[error("fallback notices cannot be accepted as statement text")]
    FallbackDraft,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
