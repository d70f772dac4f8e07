//! Pure field validation shared by registration and the application form.
//!
//! Validators never mutate state and never consult stores; they report the
//! complete violation list for whatever snapshot they are handed, so callers
//! can surface every problem at once instead of stopping at the first.

use std::fmt;

use serde::Serialize;

use super::applications::domain::{
    ApplicationForm, Category, DocumentKind, DocumentSet, EducationEntry, ExperienceEntry,
    PersonalDetails,
};
use super::registration::domain::RegistrationRequest;

/// National identity numbers are exactly twelve digits.
pub const AADHAAR_LENGTH: usize = 12;
/// Mobile numbers are exactly ten digits.
pub const MOBILE_LENGTH: usize = 10;

/// One broken rule, addressed to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    NotNumeric,
    WrongLength { expected: usize, found: usize },
    MissingDocument { document: DocumentKind },
}

impl FieldViolation {
    fn required(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::Required,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::Required => write!(f, "{} is required", self.field),
            ViolationKind::NotNumeric => write!(f, "{} must contain only digits", self.field),
            ViolationKind::WrongLength { expected, found } => write!(
                f,
                "{} must be exactly {} digits ({} given)",
                self.field, expected, found
            ),
            ViolationKind::MissingDocument { document } => {
                write!(f, "{} must be uploaded before submission", document.label())
            }
        }
    }
}

/// True when the value is exactly twelve ASCII digits.
pub fn is_valid_aadhaar(value: &str) -> bool {
    value.len() == AADHAAR_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// True when the value is exactly ten ASCII digits.
pub fn is_valid_mobile(value: &str) -> bool {
    value.len() == MOBILE_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// Drop every non-digit character. Entry points apply this to identity and
/// mobile input before storing it, mirroring the keystroke filter on the
/// portal's forms.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn check_text(field: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::required(field));
    }
}

fn check_mobile(field: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    if !is_valid_mobile(value) {
        violations.push(digit_violation(field, value, MOBILE_LENGTH));
    }
}

fn check_aadhaar(field: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    if !is_valid_aadhaar(value) {
        violations.push(digit_violation(field, value, AADHAAR_LENGTH));
    }
}

/// Name the rule a digit field broke. Called only after the matching
/// predicate has failed.
fn digit_violation(field: &str, value: &str, expected: usize) -> FieldViolation {
    if value.trim().is_empty() {
        FieldViolation::required(field)
    } else if !value.bytes().all(|b| b.is_ascii_digit()) {
        FieldViolation {
            field: field.to_string(),
            kind: ViolationKind::NotNumeric,
        }
    } else {
        FieldViolation {
            field: field.to_string(),
            kind: ViolationKind::WrongLength {
                expected,
                found: value.len(),
            },
        }
    }
}

/// Validate the registration page fields.
pub fn validate_registration(request: &RegistrationRequest) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    check_text("name", &request.name, &mut violations);
    check_text("email", &request.email, &mut violations);
    check_mobile("mobile", &request.mobile, &mut violations);
    check_aadhaar("aadhaar", &request.aadhaar, &mut violations);
    violations
}

/// Validate the personal details section.
pub fn validate_personal(details: &PersonalDetails) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    check_text("personal.full_name", &details.full_name, &mut violations);
    check_text("personal.father_name", &details.father_name, &mut violations);
    if details.date_of_birth.is_none() {
        violations.push(FieldViolation::required("personal.date_of_birth"));
    }
    check_text("personal.gender", &details.gender, &mut violations);
    check_mobile("personal.mobile", &details.mobile, &mut violations);
    check_aadhaar("personal.aadhaar", &details.aadhaar, &mut violations);
    check_text("personal.address", &details.address, &mut violations);
    check_text("personal.nationality", &details.nationality, &mut violations);
    violations
}

/// Validate the education section. Rows are optional, but a row that exists
/// must have every column filled.
pub fn validate_education(entries: &[EducationEntry]) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        check_text(&format!("education[{index}].level"), &entry.level, &mut violations);
        check_text(&format!("education[{index}].board"), &entry.board, &mut violations);
        check_text(
            &format!("education[{index}].institution"),
            &entry.institution,
            &mut violations,
        );
        check_text(&format!("education[{index}].year"), &entry.year, &mut violations);
        check_text(
            &format!("education[{index}].percentage"),
            &entry.percentage,
            &mut violations,
        );
    }
    violations
}

/// Validate the experience section. Rows are optional; a row that exists must
/// name the employer, the designation, and the joining date.
pub fn validate_experience(entries: &[ExperienceEntry]) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        check_text(
            &format!("experience[{index}].organization"),
            &entry.organization,
            &mut violations,
        );
        check_text(
            &format!("experience[{index}].designation"),
            &entry.designation,
            &mut violations,
        );
        if entry.from_date.is_none() {
            violations.push(FieldViolation::required(format!(
                "experience[{index}].from_date"
            )));
        }
    }
    violations
}

/// Validate the document slots against the declared category.
pub fn validate_documents(documents: &DocumentSet, category: Category) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    for kind in [
        DocumentKind::Photo,
        DocumentKind::Signature,
        DocumentKind::Resume,
    ] {
        if !documents.is_attached(kind) {
            violations.push(missing_document(kind));
        }
    }

    if category.requires_caste_certificate()
        && !documents.is_attached(DocumentKind::CasteCertificate)
    {
        violations.push(missing_document(DocumentKind::CasteCertificate));
    }

    violations
}

/// Full submission-readiness check across every section.
pub fn validate_form(form: &ApplicationForm) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    if form.post_id.is_none() {
        violations.push(FieldViolation::required("post"));
    }
    violations.extend(validate_personal(&form.personal));
    violations.extend(validate_education(&form.education));
    violations.extend(validate_experience(&form.experience));
    violations.extend(validate_documents(&form.documents, form.personal.category));
    violations
}

fn missing_document(kind: DocumentKind) -> FieldViolation {
    let field = match kind {
        DocumentKind::Photo => "documents.photo",
        DocumentKind::Signature => "documents.signature",
        DocumentKind::Resume => "documents.resume",
        DocumentKind::CasteCertificate => "documents.caste_certificate",
    };
    FieldViolation {
        field: field.to_string(),
        kind: ViolationKind::MissingDocument { document: kind },
    }
}
