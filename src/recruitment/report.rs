//! Dashboard aggregates and the downloadable scrutiny report.

use std::io::Write;

use serde::Serialize;

use super::applications::domain::{ApplicationStatus, Category};
use super::applications::repository::ApplicationRecord;
use super::postings::{JobPost, PostType};

/// Headline counters on the admin dashboard.
///
/// Drafts are applicant-private and excluded from every counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_applications: usize,
    pub pending_scrutiny: usize,
    pub eligible: usize,
    pub interviews: usize,
}

/// Application pressure per cadre against the advertised vacancies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostTypeLoadEntry {
    pub post_type_label: &'static str,
    pub applications: usize,
    pub vacancies: u32,
}

/// How applications spread across reservation categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShareEntry {
    pub category_label: &'static str,
    pub applications: usize,
}

/// One application in the scrutiny table and CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationRow {
    pub application_id: String,
    pub post_code: String,
    pub post_title: String,
    pub category: &'static str,
    pub status: &'static str,
}

/// Aggregated dashboard view over a record snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RecruitmentReport {
    pub stats: DashboardStats,
    pub post_type_load: Vec<PostTypeLoadEntry>,
    pub category_share: Vec<CategoryShareEntry>,
    pub applications: Vec<ApplicationRow>,
}

impl RecruitmentReport {
    /// Build the dashboard aggregates from a record snapshot and the posts
    /// it references. Closed posts still label their applications; vacancy
    /// counts cover open posts only.
    pub fn build(records: &[ApplicationRecord], posts: &[JobPost]) -> Self {
        let visible: Vec<&ApplicationRecord> = records
            .iter()
            .filter(|record| record.status != ApplicationStatus::Draft)
            .collect();

        let count_status = |wanted: ApplicationStatus| {
            visible
                .iter()
                .filter(|record| record.status == wanted)
                .count()
        };

        let stats = DashboardStats {
            total_applications: visible.len(),
            pending_scrutiny: count_status(ApplicationStatus::Submitted)
                + count_status(ApplicationStatus::UnderScrutiny),
            eligible: count_status(ApplicationStatus::Eligible),
            interviews: count_status(ApplicationStatus::InterviewScheduled),
        };

        let post_of = |record: &ApplicationRecord| {
            record
                .form
                .post_id
                .as_ref()
                .and_then(|id| posts.iter().find(|post| &post.id == id))
        };

        let post_type_load = PostType::ordered()
            .into_iter()
            .map(|post_type| PostTypeLoadEntry {
                post_type_label: post_type.label(),
                applications: visible
                    .iter()
                    .filter(|record| {
                        post_of(record).map(|post| post.post_type) == Some(post_type)
                    })
                    .count(),
                vacancies: posts
                    .iter()
                    .filter(|post| post.is_open() && post.post_type == post_type)
                    .map(|post| post.vacancies)
                    .sum(),
            })
            .collect();

        let category_share = Category::ordered()
            .into_iter()
            .map(|category| CategoryShareEntry {
                category_label: category.label(),
                applications: visible
                    .iter()
                    .filter(|record| record.form.personal.category == category)
                    .count(),
            })
            .collect();

        let applications = visible
            .iter()
            .map(|record| {
                let post = post_of(record);
                ApplicationRow {
                    application_id: record.id.0.clone(),
                    post_code: post.map(|post| post.code.clone()).unwrap_or_else(|| "Unknown".to_string()),
                    post_title: post.map(|post| post.title.clone()).unwrap_or_else(|| "Unknown".to_string()),
                    category: record.form.personal.category.label(),
                    status: record.status.label(),
                }
            })
            .collect();

        Self {
            stats,
            post_type_load,
            category_share,
            applications,
        }
    }

    /// Write the scrutiny rows as CSV, headers included.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        for row in &self.applications {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, csv::Error> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
