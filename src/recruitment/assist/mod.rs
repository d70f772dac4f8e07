//! Assisted statement drafting boundary.
//!
//! The portal offers to draft a statement of purpose from the applicant's
//! recorded background. Providers sit behind [`StatementGenerator`]; the
//! application service owns the fallback policy, so adapters report failures
//! instead of inventing text.

use async_trait::async_trait;

pub mod gemini;

pub use gemini::GeminiGenerator;

/// Inputs summarized from the form for prompt construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementContext {
    pub post_title: String,
    pub education: String,
    pub experience: String,
}

/// Provider abstraction for statement generation. One call is one attempt;
/// retrying is a decision the portal deliberately does not make.
#[async_trait]
pub trait StatementGenerator: Send + Sync {
    async fn generate(&self, context: &StatementContext) -> Result<String, AssistError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("provider credential is not configured")]
    MissingCredential,
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("provider returned no usable text")]
    EmptyResponse,
}

/// Prompt handed to the provider, framing it as a career consultant for a
/// government scientific organization.
pub fn build_prompt(context: &StatementContext) -> String {
    format!(
        "You are a professional career consultant for a government scientific organization (CSIR).\n\
         Write a concise, professional Statement of Purpose (max 200 words) for an applicant applying for the post of {post}.\n\n\
         Applicant Background:\n\
         Education: {education}\n\
         Experience Summary: {experience}\n\n\
         The tone should be formal, dedicated to national service, and technically sound.",
        post = context.post_title,
        education = context.education,
        experience = context.experience,
    )
}
