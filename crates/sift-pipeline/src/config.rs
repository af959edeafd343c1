//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Which file names the pipeline treats as filings and archives.
///
/// Extension matching is case-sensitive, so both spellings are listed by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Accepted extensions for text members inside an archive
    pub text_extensions: Vec<String>,
    /// Accepted extensions for archives inside a directory
    pub archive_extensions: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_extensions: vec![".txt".to_string(), ".TXT".to_string()],
            archive_extensions: vec![".zip".to_string(), ".ZIP".to_string()],
        }
    }
}

impl PipelineConfig {
    /// Whether an archive member name is a filing candidate.
    pub fn is_text_member(&self, name: &str) -> bool {
        has_extension(name, &self.text_extensions)
    }

    /// Whether a directory entry name is an archive.
    pub fn is_archive_name(&self, name: &str) -> bool {
        has_extension(name, &self.archive_extensions)
    }
}

fn has_extension(name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}
