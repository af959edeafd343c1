//! Run configuration.
//!
//! A TOML file has one table per concern; every key is optional.
//!
//! ```toml
//! [pipeline]
//! text_extensions = [".txt", ".TXT"]
//! archive_extensions = [".zip", ".ZIP"]
//!
//! [extractor]
//! output_dir = "mdna"
//! min_words = 50
//!
//! [filter]
//! ciks = ["320193", "789019"]
//! cik_file = "ciks.csv"
//! forms = ["10-K"]
//! year_from = 2015
//! year_to = 2023
//! ```

use crate::error::{Result, SiftError};
use serde::{Deserialize, Serialize};
use sift_filings::{CikFilter, ExtractorConfig};
use sift_pipeline::PipelineConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// Archive and member name matching
    pub pipeline: PipelineConfig,
    /// MD&A extraction
    pub extractor: ExtractorConfig,
    /// Issuer filtering
    pub filter: FilterConfig,
}

impl SiftConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    /// Returns [`SiftError::ConfigParse`] for malformed TOML or unknown value types.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SiftError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// Issuer filter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// CIKs to keep
    pub ciks: Vec<String>,
    /// File with more CIKs, one per line or in a `cik` CSV column
    pub cik_file: Option<PathBuf>,
    /// Accepted form types; empty accepts all
    pub forms: Vec<String>,
    /// First accepted year
    pub year_from: Option<i32>,
    /// Last accepted year
    pub year_to: Option<i32>,
}

impl FilterConfig {
    /// Build the issuer filter, or `None` when no CIKs are configured.
    ///
    /// Form and year restrictions only refine a CIK filter; without CIKs they
    /// are ignored.
    ///
    /// # Errors
    /// Returns an error for a malformed CIK or an unreadable CIK file.
    pub fn build(&self) -> Result<Option<CikFilter>> {
        let mut filter = CikFilter::new(&self.ciks)?;
        if let Some(path) = &self.cik_file {
            filter.extend(CikFilter::from_file(path)?);
        }

        if filter.is_empty() {
            if !self.forms.is_empty() || self.year_from.is_some() || self.year_to.is_some() {
                tracing::warn!("form and year restrictions need at least one CIK; not filtering");
            }
            return Ok(None);
        }

        tracing::info!(ciks = filter.len(), "issuer filter active");
        Ok(Some(
            filter
                .with_form_types(&self.forms)
                .with_year_range(self.year_from, self.year_to),
        ))
    }
}
