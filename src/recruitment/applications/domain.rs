use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::recruitment::postings::PostingId;

/// Identifier wrapper for application records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Stable identifier for one education or experience row within a form.
///
/// Ids are allocated from a per-form counter, so removing a row never
/// renumbers its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

/// Reservation category declared by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    #[default]
    Gen,
    Obc,
    Sc,
    St,
    Ews,
    Pwd,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::Gen => "GEN",
            Category::Obc => "OBC",
            Category::Sc => "SC",
            Category::St => "ST",
            Category::Ews => "EWS",
            Category::Pwd => "PWD",
        }
    }

    /// Categories whose claim must be backed by an uploaded certificate.
    pub const fn requires_caste_certificate(self) -> bool {
        matches!(
            self,
            Category::Obc | Category::Sc | Category::St | Category::Ews
        )
    }

    pub const fn ordered() -> [Category; 6] {
        [
            Category::Gen,
            Category::Obc,
            Category::Sc,
            Category::St,
            Category::Ews,
            Category::Pwd,
        ]
    }
}

/// Personal and identity details collected in the first form section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: String,
    pub father_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub category: Category,
    pub mobile: String,
    pub aadhaar: String,
    pub address: String,
    pub nationality: String,
}

impl Default for PersonalDetails {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            father_name: String::new(),
            date_of_birth: None,
            gender: String::new(),
            category: Category::Gen,
            mobile: String::new(),
            aadhaar: String::new(),
            address: String::new(),
            nationality: "Indian".to_string(),
        }
    }
}

/// One qualification row in the education section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: EntryId,
    pub level: String,
    pub board: String,
    pub institution: String,
    pub year: String,
    pub percentage: String,
}

/// Column values for creating or replacing an education row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationDraft {
    pub level: String,
    pub board: String,
    pub institution: String,
    pub year: String,
    pub percentage: String,
}

/// One employment row in the experience section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: EntryId,
    pub organization: String,
    pub designation: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub responsibilities: String,
}

/// Column values for creating or replacing an experience row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceDraft {
    pub organization: String,
    pub designation: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub responsibilities: String,
}

/// Upload slots on the documents section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Photo,
    Signature,
    Resume,
    CasteCertificate,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentKind::Photo => "Photograph",
            DocumentKind::Signature => "Signature",
            DocumentKind::Resume => "Resume",
            DocumentKind::CasteCertificate => "Caste Certificate",
        }
    }

    pub const fn ordered() -> [DocumentKind; 4] {
        [
            DocumentKind::Photo,
            DocumentKind::Signature,
            DocumentKind::Resume,
            DocumentKind::CasteCertificate,
        ]
    }
}

/// Metadata for an uploaded file; the bytes live wherever the deployment
/// stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub file_name: String,
    pub storage_key: String,
}

/// The four upload slots tracked per application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSet {
    pub photo: Option<DocumentRef>,
    pub signature: Option<DocumentRef>,
    pub resume: Option<DocumentRef>,
    pub caste_certificate: Option<DocumentRef>,
}

impl DocumentSet {
    pub fn attach(&mut self, kind: DocumentKind, document: DocumentRef) {
        *self.slot_mut(kind) = Some(document);
    }

    pub fn remove(&mut self, kind: DocumentKind) -> Option<DocumentRef> {
        self.slot_mut(kind).take()
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&DocumentRef> {
        match kind {
            DocumentKind::Photo => self.photo.as_ref(),
            DocumentKind::Signature => self.signature.as_ref(),
            DocumentKind::Resume => self.resume.as_ref(),
            DocumentKind::CasteCertificate => self.caste_certificate.as_ref(),
        }
    }

    pub fn is_attached(&self, kind: DocumentKind) -> bool {
        self.get(kind).is_some()
    }

    fn slot_mut(&mut self, kind: DocumentKind) -> &mut Option<DocumentRef> {
        match kind {
            DocumentKind::Photo => &mut self.photo,
            DocumentKind::Signature => &mut self.signature,
            DocumentKind::Resume => &mut self.resume,
            DocumentKind::CasteCertificate => &mut self.caste_certificate,
        }
    }
}

/// Draft state for one application: every editable section plus the counters
/// backing row identity and statement revisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub post_id: Option<PostingId>,
    pub personal: PersonalDetails,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub publications: Vec<String>,
    pub documents: DocumentSet,
    pub statement: String,
    statement_revision: u32,
    next_entry_id: u64,
}

impl ApplicationForm {
    pub fn for_post(post_id: PostingId) -> Self {
        Self {
            post_id: Some(post_id),
            ..Self::default()
        }
    }

    /// Revision counter for the statement field. Every write bumps it, which
    /// is how assisted drafts prepared against an older statement are caught.
    pub fn statement_revision(&self) -> u32 {
        self.statement_revision
    }

    pub fn set_statement(&mut self, text: String) {
        self.statement = text;
        self.statement_revision += 1;
    }

    pub fn add_education(&mut self, draft: EducationDraft) -> EntryId {
        let id = self.next_entry();
        self.education.push(EducationEntry {
            id,
            level: draft.level,
            board: draft.board,
            institution: draft.institution,
            year: draft.year,
            percentage: draft.percentage,
        });
        id
    }

    pub fn update_education(&mut self, id: EntryId, draft: EducationDraft) -> bool {
        match self.education.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.level = draft.level;
                entry.board = draft.board;
                entry.institution = draft.institution;
                entry.year = draft.year;
                entry.percentage = draft.percentage;
                true
            }
            None => false,
        }
    }

    pub fn remove_education(&mut self, id: EntryId) -> bool {
        let before = self.education.len();
        self.education.retain(|entry| entry.id != id);
        self.education.len() != before
    }

    pub fn add_experience(&mut self, draft: ExperienceDraft) -> EntryId {
        let id = self.next_entry();
        self.experience.push(ExperienceEntry {
            id,
            organization: draft.organization,
            designation: draft.designation,
            from_date: draft.from_date,
            to_date: draft.to_date,
            responsibilities: draft.responsibilities,
        });
        id
    }

    pub fn update_experience(&mut self, id: EntryId, draft: ExperienceDraft) -> bool {
        match self.experience.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.organization = draft.organization;
                entry.designation = draft.designation;
                entry.from_date = draft.from_date;
                entry.to_date = draft.to_date;
                entry.responsibilities = draft.responsibilities;
                true
            }
            None => false,
        }
    }

    pub fn remove_experience(&mut self, id: EntryId) -> bool {
        let before = self.experience.len();
        self.experience.retain(|entry| entry.id != id);
        self.experience.len() != before
    }

    /// Compact qualification summary used to seed assisted drafting prompts.
    pub fn education_summary(&self) -> String {
        if self.education.is_empty() {
            return "Not provided".to_string();
        }
        self.education
            .iter()
            .map(|entry| format!("{} from {} ({})", entry.level, entry.institution, entry.year))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Compact employment summary used to seed assisted drafting prompts.
    pub fn experience_summary(&self) -> String {
        if self.experience.is_empty() {
            return "Not provided".to_string();
        }
        self.experience
            .iter()
            .map(|entry| format!("{} at {}", entry.designation, entry.organization))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn next_entry(&mut self) -> EntryId {
        self.next_entry_id += 1;
        EntryId(self.next_entry_id)
    }
}

/// High level status tracked throughout the application lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderScrutiny,
    Eligible,
    NotEligible,
    InterviewScheduled,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "Draft",
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderScrutiny => "Under Scrutiny",
            ApplicationStatus::Eligible => "Eligible",
            ApplicationStatus::NotEligible => "Not Eligible",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Selected => "Selected",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Terminal states admit no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::NotEligible
                | ApplicationStatus::Selected
                | ApplicationStatus::Rejected
        )
    }
}
