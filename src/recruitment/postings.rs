//! Catalog of advertised posts that applications are filed against.

use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for advertised posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostingId(pub String);

/// Cadre an advertised post belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Scientist,
    TechnicalOfficer,
    Technician,
    TechnicalAssistant,
}

impl PostType {
    pub const fn label(self) -> &'static str {
        match self {
            PostType::Scientist => "Scientist",
            PostType::TechnicalOfficer => "Technical Officer",
            PostType::Technician => "Technician",
            PostType::TechnicalAssistant => "Technical Assistant",
        }
    }

    pub const fn ordered() -> [PostType; 4] {
        [
            PostType::Scientist,
            PostType::TechnicalOfficer,
            PostType::Technician,
            PostType::TechnicalAssistant,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostingStatus {
    Open,
    Closed,
}

impl PostingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PostingStatus::Open => "OPEN",
            PostingStatus::Closed => "CLOSED",
        }
    }
}

/// One advertised vacancy in the current recruitment drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPost {
    pub id: PostingId,
    pub code: String,
    pub title: String,
    pub post_type: PostType,
    pub department: String,
    pub last_date: NaiveDate,
    pub vacancies: u32,
    pub description: String,
    pub status: PostingStatus,
}

impl JobPost {
    pub const fn is_open(&self) -> bool {
        matches!(self.status, PostingStatus::Open)
    }
}

/// Read access to the advertised posts.
///
/// Drafting and submission both consult the catalog; a post that closes
/// between the two is caught at submission time.
pub trait PostingCatalog: Send + Sync {
    fn list_open(&self) -> Vec<JobPost>;
    fn get(&self, id: &PostingId) -> Option<JobPost>;
}

/// In-memory catalog seeded at startup.
#[derive(Default)]
pub struct InMemoryPostingCatalog {
    posts: Mutex<Vec<JobPost>>,
}

impl InMemoryPostingCatalog {
    pub fn new(posts: Vec<JobPost>) -> Self {
        Self {
            posts: Mutex::new(posts),
        }
    }

    /// Catalog preloaded with the demo recruitment drive.
    pub fn seeded() -> Self {
        Self::new(demo_posts())
    }

    pub fn insert(&self, post: JobPost) {
        self.posts.lock().expect("catalog mutex poisoned").push(post);
    }

    /// Flip a post between OPEN and CLOSED. Returns false when the id is
    /// unknown.
    pub fn set_status(&self, id: &PostingId, status: PostingStatus) -> bool {
        let mut posts = self.posts.lock().expect("catalog mutex poisoned");
        match posts.iter_mut().find(|post| &post.id == id) {
            Some(post) => {
                post.status = status;
                true
            }
            None => false,
        }
    }
}

impl PostingCatalog for InMemoryPostingCatalog {
    fn list_open(&self) -> Vec<JobPost> {
        self.posts
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .filter(|post| post.is_open())
            .cloned()
            .collect()
    }

    fn get(&self, id: &PostingId) -> Option<JobPost> {
        self.posts
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .find(|post| &post.id == id)
            .cloned()
    }
}

fn demo_posts() -> Vec<JobPost> {
    vec![
        JobPost {
            id: PostingId("post-001".to_string()),
            code: "SERC-02/2026-SCI".to_string(),
            title: "Scientist (Structural Dynamics)".to_string(),
            post_type: PostType::Scientist,
            department: "Structural Dynamics Laboratory".to_string(),
            last_date: NaiveDate::from_ymd_opt(2026, 10, 15).expect("valid date"),
            vacancies: 4,
            description: "Research on seismic response of tall structures and large-span roofs."
                .to_string(),
            status: PostingStatus::Open,
        },
        JobPost {
            id: PostingId("post-002".to_string()),
            code: "SERC-02/2026-TO".to_string(),
            title: "Technical Officer (Instrumentation)".to_string(),
            post_type: PostType::TechnicalOfficer,
            department: "Advanced Materials Laboratory".to_string(),
            last_date: NaiveDate::from_ymd_opt(2026, 10, 15).expect("valid date"),
            vacancies: 2,
            description: "Operate and maintain servo-hydraulic testing facilities.".to_string(),
            status: PostingStatus::Open,
        },
        JobPost {
            id: PostingId("post-003".to_string()),
            code: "SERC-02/2026-TA".to_string(),
            title: "Technical Assistant (Civil)".to_string(),
            post_type: PostType::TechnicalAssistant,
            department: "Fatigue and Fracture Laboratory".to_string(),
            last_date: NaiveDate::from_ymd_opt(2026, 9, 30).expect("valid date"),
            vacancies: 6,
            description: "Assist in specimen preparation and structural testing campaigns."
                .to_string(),
            status: PostingStatus::Open,
        },
        JobPost {
            id: PostingId("post-004".to_string()),
            code: "SERC-01/2026-TEC".to_string(),
            title: "Technician (Workshop)".to_string(),
            post_type: PostType::Technician,
            department: "Central Workshop".to_string(),
            last_date: NaiveDate::from_ymd_opt(2026, 6, 30).expect("valid date"),
            vacancies: 3,
            description: "Fabrication support for experimental test rigs.".to_string(),
            status: PostingStatus::Closed,
        },
    ]
}
