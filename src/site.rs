//! Editable site chrome: the header and footer text blocks administrators
//! can change, persisted as a JSON document on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderConfig {
    pub ministry_text: String,
    pub organization_name: String,
    pub organization_subtitle: String,
    pub parent_organization: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            ministry_text: "MINISTRY OF SCIENCE & TECHNOLOGY".to_string(),
            organization_name: "CSIR-SERC".to_string(),
            organization_subtitle: "Structural Engineering Research Centre".to_string(),
            parent_organization: "Council of Scientific & Industrial Research".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterConfig {
    pub about_text: String,
    pub address: String,
    pub copyright_text: String,
    pub contact_email: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            about_text: "Council of Scientific & Industrial Research - Structural Engineering \
                         Research Centre, Chennai. Pioneering advanced structural engineering \
                         solutions for the nation."
                .to_string(),
            address: "CSIR Road, Taramani,\nChennai - 600 113\nIndia.".to_string(),
            copyright_text:
                "© 2024 CSIR-SERC. All Rights Reserved. | Compliance to GIGW 3.0 | Noto Sans Font"
                    .to_string(),
            contact_email: "recruit@serc.res.in".to_string(),
        }
    }
}

/// The full editable chrome. Serialized in camelCase to match the document
/// the admin panel reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub header: HeaderConfig,
    pub footer: FooterConfig,
}

#[derive(Debug, Error)]
pub enum SiteConfigError {
    #[error("unable to persist site configuration")]
    Io(#[from] std::io::Error),
    #[error("unable to encode site configuration")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store for [`SiteConfig`].
#[derive(Debug, Clone)]
pub struct SiteConfigStore {
    path: PathBuf,
}

impl SiteConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored configuration. A missing or unreadable document
    /// falls back to the built-in defaults.
    pub fn load(&self) -> SiteConfig {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(_) => return SiteConfig::default(),
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "stored site configuration is not valid JSON, using defaults"
                );
                SiteConfig::default()
            }
        }
    }

    /// Replaces the stored document. Writes go through a temporary file and
    /// a rename so readers never observe a partial document.
    pub fn save(&self, config: &SiteConfig) -> Result<(), SiteConfigError> {
        let text = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Restores and persists the built-in defaults.
    pub fn reset(&self) -> Result<SiteConfig, SiteConfigError> {
        let config = SiteConfig::default();
        self.save(&config)?;
        Ok(config)
    }
}
