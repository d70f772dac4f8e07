use std::sync::Arc;

use super::common::*;
use crate::recruitment::applications::domain::{
    ApplicationId, ApplicationStatus, Category, DocumentKind, EducationDraft, EntryId,
};
use crate::recruitment::applications::repository::{ApplicationRepository, RepositoryError};
use crate::recruitment::applications::service::ApplicationServiceError;
use crate::recruitment::applications::{GENERATION_FAILED_NOTICE, KEY_MISSING_NOTICE};
use crate::recruitment::postings::{PostingCatalog, PostingId, PostingStatus};
use crate::recruitment::validation::ViolationKind;

#[test]
fn start_draft_requires_applicant_role() {
    let (service, _, catalog) = build_service();
    let post = open_post(&catalog);

    for user in [reviewer(), guest()] {
        match service.start_draft(&user, &post) {
            Err(ApplicationServiceError::RoleForbidden { role }) => assert_eq!(role, user.role),
            other => panic!("expected role rejection, got {other:?}"),
        }
    }
}

#[test]
fn start_draft_rejects_unknown_posting() {
    let (service, _, _) = build_service();

    let result = service.start_draft(&applicant("user1"), &PostingId("post-999".to_string()));
    assert!(matches!(
        result,
        Err(ApplicationServiceError::UnknownPosting { .. })
    ));
}

#[test]
fn start_draft_rejects_closed_posting() {
    let (service, _, _) = build_service();

    let result = service.start_draft(&applicant("user1"), &PostingId("post-004".to_string()));
    assert!(matches!(
        result,
        Err(ApplicationServiceError::PostingClosed { .. })
    ));
}

#[test]
fn start_draft_persists_an_empty_draft_record() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let post = open_post(&catalog);

    let record = service.start_draft(&user, &post).expect("draft opens");

    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Draft);
    assert_eq!(stored.applicant, user.id);
    assert_eq!(stored.form.post_id, Some(post));
    assert!(stored.form.education.is_empty());
    assert_eq!(stored.form.personal.nationality, "Indian");
}

#[test]
fn personal_identity_input_is_reduced_to_digits() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let record = service
        .start_draft(&user, &open_post(&catalog))
        .expect("draft opens");

    let mut details = complete_personal(Category::Gen);
    details.mobile = "98765 43210".to_string();
    details.aadhaar = "1234-1234-1234".to_string();

    let violations = service
        .update_personal(&record.id, &user, details)
        .expect("personal saves");
    assert!(violations.is_empty(), "filtered input should validate");

    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.form.personal.mobile, "9876543210");
    assert_eq!(stored.form.personal.aadhaar, "123412341234");
}

#[test]
fn update_personal_reports_current_violations() {
    let (service, _, catalog) = build_service();
    let user = applicant("user1");
    let record = service
        .start_draft(&user, &open_post(&catalog))
        .expect("draft opens");

    let mut details = complete_personal(Category::Gen);
    details.full_name.clear();
    details.mobile = "98".to_string();

    let violations = service
        .update_personal(&record.id, &user, details)
        .expect("personal saves");

    assert!(violations
        .iter()
        .any(|violation| violation.field == "personal.full_name"
            && matches!(violation.kind, ViolationKind::Required)));
    assert!(violations
        .iter()
        .any(|violation| violation.field == "personal.mobile"
            && matches!(violation.kind, ViolationKind::WrongLength { .. })));
}

#[test]
fn edits_are_rejected_for_non_owners() {
    let (service, _, catalog) = build_service();
    let owner = applicant("user1");
    let id = filed_draft(&service, &catalog, &owner, Category::Gen);

    let intruder = applicant("user2");
    let result = service.add_education(&id, &intruder, education_draft());
    assert!(matches!(result, Err(ApplicationServiceError::NotOwner)));
}

#[test]
fn edits_are_rejected_once_submitted() {
    let (service, _, catalog) = build_service();
    let user = applicant("user1");
    let id = submitted_application(&service, &catalog, &user);

    let result = service.update_personal(&id, &user, complete_personal(Category::Gen));
    match result {
        Err(ApplicationServiceError::NotEditable { status }) => {
            assert_eq!(status, ApplicationStatus::Submitted);
        }
        other => panic!("expected read-only rejection, got {other:?}"),
    }
}

#[test]
fn education_rows_can_be_updated_and_removed() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let record = service
        .start_draft(&user, &open_post(&catalog))
        .expect("draft opens");
    let id = record.id;

    let first = service
        .add_education(&id, &user, education_draft())
        .expect("row adds");
    let second = service
        .add_education(
            &id,
            &user,
            EducationDraft {
                level: "Ph.D.".to_string(),
                ..education_draft()
            },
        )
        .expect("row adds");

    let mut revised = education_draft();
    revised.year = "2021".to_string();
    service
        .update_education(&id, &user, first, revised)
        .expect("row updates");
    service
        .remove_education(&id, &user, second)
        .expect("row removes");

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.form.education.len(), 1);
    assert_eq!(stored.form.education[0].id, first);
    assert_eq!(stored.form.education[0].year, "2021");
}

#[test]
fn unknown_row_ids_are_reported() {
    let (service, _, catalog) = build_service();
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Gen);

    let result = service.update_education(&id, &user, EntryId(99), education_draft());
    assert!(matches!(
        result,
        Err(ApplicationServiceError::UnknownEntry { id: EntryId(99) })
    ));
    let result = service.remove_experience(&id, &user, EntryId(42));
    assert!(matches!(
        result,
        Err(ApplicationServiceError::UnknownEntry { id: EntryId(42) })
    ));
}

#[test]
fn check_requires_the_certificate_only_for_reserved_categories() {
    let (service, _, catalog) = build_service();
    let user = applicant("user1");

    let general = filed_draft(&service, &catalog, &user, Category::Gen);
    assert!(service
        .check(&general, &user)
        .expect("check runs")
        .is_empty());

    let pwd = filed_draft(&service, &catalog, &user, Category::Pwd);
    assert!(service.check(&pwd, &user).expect("check runs").is_empty());

    let reserved = filed_draft(&service, &catalog, &user, Category::Sc);
    service
        .remove_document(&reserved, &user, DocumentKind::CasteCertificate)
        .expect("certificate detaches");
    let violations = service.check(&reserved, &user).expect("check runs");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "documents.caste_certificate");
    assert!(matches!(
        violations[0].kind,
        ViolationKind::MissingDocument {
            document: DocumentKind::CasteCertificate
        }
    ));
}

#[test]
fn submit_rejects_an_incomplete_form_without_touching_it() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Gen);
    service
        .remove_document(&id, &user, DocumentKind::Resume)
        .expect("resume detaches");

    let before = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");

    match service.submit(&id, &user) {
        Err(ApplicationServiceError::SubmissionRejected { violations }) => {
            assert!(violations
                .iter()
                .any(|violation| violation.field == "documents.resume"));
        }
        other => panic!("expected submission rejection, got {other:?}"),
    }

    let after = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(after, before, "failed submission must leave the record as-is");
    assert_eq!(after.status, ApplicationStatus::Draft);
}

#[test]
fn submit_moves_a_complete_form_to_submitted() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Obc);

    let record = service.submit(&id, &user).expect("submission succeeds");
    assert_eq!(record.status, ApplicationStatus::Submitted);

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Submitted);
}

#[test]
fn submit_rejects_when_the_post_has_since_closed() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Gen);

    assert!(catalog.set_status(&PostingId("post-001".to_string()), PostingStatus::Closed));

    let result = service.submit(&id, &user);
    assert!(matches!(
        result,
        Err(ApplicationServiceError::PostingClosed { .. })
    ));
    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Draft);
}

#[test]
fn resubmission_is_rejected() {
    let (service, _, catalog) = build_service();
    let user = applicant("user1");
    let id = submitted_application(&service, &catalog, &user);

    let result = service.submit(&id, &user);
    assert!(matches!(
        result,
        Err(ApplicationServiceError::Transition(_))
    ));
}

#[test]
fn review_walks_the_selection_chain() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let id = submitted_application(&service, &catalog, &user);
    let officer = reviewer();

    for status in [
        ApplicationStatus::UnderScrutiny,
        ApplicationStatus::Eligible,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Selected,
    ] {
        let record = service
            .review(&id, &officer, status)
            .expect("review applies");
        assert_eq!(record.status, status);
    }

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Selected);
}

#[test]
fn review_rejects_applicant_authority() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let id = submitted_application(&service, &catalog, &user);

    match service.review(&id, &user, ApplicationStatus::UnderScrutiny) {
        Err(ApplicationServiceError::RoleForbidden { role }) => assert_eq!(role, user.role),
        other => panic!("expected role rejection, got {other:?}"),
    }
    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Submitted);
}

#[test]
fn review_cannot_stand_in_for_submission() {
    let (service, repository, catalog) = build_service();
    let owner = applicant("user1");
    let record = service
        .start_draft(&owner, &open_post(&catalog))
        .expect("draft opens");
    let id = record.id;

    // The untouched draft fails the real submission gate.
    assert!(matches!(
        service.submit(&id, &owner),
        Err(ApplicationServiceError::SubmissionRejected { .. })
    ));

    // Requesting the same edge through review is refused for applicant
    // accounts, owner and stranger alike.
    for user in [owner, applicant("user2")] {
        match service.review(&id, &user, ApplicationStatus::Submitted) {
            Err(ApplicationServiceError::RoleForbidden { role }) => assert_eq!(role, user.role),
            other => panic!("expected role rejection, got {other:?}"),
        }
    }

    // A reviewer cannot perform it either: the edge itself is applicant-only.
    assert!(matches!(
        service.review(&id, &reviewer(), ApplicationStatus::Submitted),
        Err(ApplicationServiceError::Transition(_))
    ));

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Draft);
    assert!(stored.form.personal.full_name.is_empty());
}

#[test]
fn review_rejects_guests_outright() {
    let (service, _, catalog) = build_service();
    let user = applicant("user1");
    let id = submitted_application(&service, &catalog, &user);

    let result = service.review(&id, &guest(), ApplicationStatus::UnderScrutiny);
    assert!(matches!(
        result,
        Err(ApplicationServiceError::RoleForbidden { .. })
    ));
}

#[test]
fn review_rejects_stage_skips() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let id = submitted_application(&service, &catalog, &user);

    let result = service.review(&id, &reviewer(), ApplicationStatus::Selected);
    assert!(matches!(
        result,
        Err(ApplicationServiceError::Transition(_))
    ));
    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Submitted);
}

#[test]
fn review_reports_missing_applications() {
    let (service, _, _) = build_service();

    let result = service.review(
        &ApplicationId("app-missing".to_string()),
        &reviewer(),
        ApplicationStatus::UnderScrutiny,
    );
    assert!(matches!(
        result,
        Err(ApplicationServiceError::Repository(
            RepositoryError::NotFound
        ))
    ));
}

#[tokio::test]
async fn draft_statement_returns_generated_text_with_context() {
    let generator = Arc::new(ScriptedGenerator::generated());
    let (service, _, catalog) = service_with_generator(generator.clone());
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Gen);

    let draft = service
        .draft_statement(&id, &user)
        .await
        .expect("draft produced");

    assert!(draft.is_generated());
    assert_eq!(draft.text, GENERATED_TEXT);
    assert_eq!(generator.call_count(), 1);

    let context = generator.last_context().expect("provider saw the context");
    assert_eq!(context.post_title, "Scientist (Structural Dynamics)");
    assert_eq!(
        context.education,
        "M.Tech Structural Engineering from IIT Madras (2020)"
    );
    assert_eq!(context.experience, "Project Associate at CSIR-SERC");
}

#[tokio::test]
async fn draft_statement_collapses_missing_key_into_a_notice() {
    let generator = Arc::new(ScriptedGenerator::new(ScriptedOutcome::MissingKey));
    let (service, _, catalog) = service_with_generator(generator.clone());
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Gen);

    let draft = service
        .draft_statement(&id, &user)
        .await
        .expect("fallback produced");

    assert!(!draft.is_generated());
    assert_eq!(draft.text, KEY_MISSING_NOTICE);
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn draft_statement_collapses_provider_failure_into_a_notice() {
    let generator = Arc::new(ScriptedGenerator::new(ScriptedOutcome::ApiFailure));
    let (service, repository, catalog) = service_with_generator(generator.clone());
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Gen);

    let draft = service
        .draft_statement(&id, &user)
        .await
        .expect("fallback produced");

    assert!(!draft.is_generated());
    assert_eq!(draft.text, GENERATION_FAILED_NOTICE);
    assert_eq!(generator.call_count(), 1, "one request means one attempt");

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert!(
        stored.form.statement.is_empty(),
        "drafting never writes to the form"
    );
}

#[tokio::test]
async fn draft_statement_is_refused_after_submission() {
    let (service, _, catalog) = build_service();
    let user = applicant("user1");
    let id = submitted_application(&service, &catalog, &user);

    let result = service.draft_statement(&id, &user).await;
    assert!(matches!(
        result,
        Err(ApplicationServiceError::NotEditable { .. })
    ));
}

#[tokio::test]
async fn accepted_drafts_are_copied_into_the_statement() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Gen);

    let draft = service
        .draft_statement(&id, &user)
        .await
        .expect("draft produced");
    service
        .accept_statement(&id, &user, &draft)
        .expect("draft accepted");

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.form.statement, GENERATED_TEXT);
    assert_eq!(
        stored.form.statement_revision(),
        draft.based_on_revision + 1
    );
}

#[tokio::test]
async fn stale_drafts_are_discarded_on_accept() {
    let (service, repository, catalog) = build_service();
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Gen);

    let draft = service
        .draft_statement(&id, &user)
        .await
        .expect("draft produced");

    service
        .set_statement(&id, &user, "My own words.".to_string())
        .expect("manual edit saves");

    let result = service.accept_statement(&id, &user, &draft);
    assert!(matches!(
        result,
        Err(ApplicationServiceError::StaleAssistedDraft)
    ));

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(
        stored.form.statement, "My own words.",
        "the manual edit wins"
    );
}

#[tokio::test]
async fn fallback_notices_are_never_accepted_as_text() {
    let generator = Arc::new(ScriptedGenerator::new(ScriptedOutcome::MissingKey));
    let (service, repository, catalog) = service_with_generator(generator);
    let user = applicant("user1");
    let id = filed_draft(&service, &catalog, &user, Category::Gen);

    let draft = service
        .draft_statement(&id, &user)
        .await
        .expect("fallback produced");

    let result = service.accept_statement(&id, &user, &draft);
    assert!(matches!(
        result,
        Err(ApplicationServiceError::FallbackDraft)
    ));

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record stored");
    assert!(stored.form.statement.is_empty());
}

#[test]
fn for_applicant_lists_only_owned_records() {
    let (service, _, catalog) = build_service();
    let first = applicant("user1");
    let second = applicant("user2");

    let owned = filed_draft(&service, &catalog, &first, Category::Gen);
    filed_draft(&service, &catalog, &second, Category::Gen);

    let records = service
        .for_applicant(&first.id)
        .expect("listing succeeds");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, owned);
}

#[test]
fn report_keeps_applications_whose_post_has_since_closed() {
    let (service, _, catalog) = build_service();
    let user = applicant("user1");
    let id = submitted_application(&service, &catalog, &user);
    let post = open_post(&catalog);

    assert!(catalog.set_status(&post, PostingStatus::Closed));

    let report = service.report().expect("report builds");
    assert_eq!(report.stats.total_applications, 1);

    let row = &report.applications[0];
    assert_eq!(row.application_id, id.0);
    assert_eq!(row.post_code, "SERC-02/2026-SCI");

    let scientist = report
        .post_type_load
        .iter()
        .find(|entry| entry.post_type_label == "Scientist")
        .expect("scientist row present");
    assert_eq!(scientist.applications, 1);
    assert_eq!(scientist.vacancies, 0, "closed vacancies are not advertised");
}
