//! Management's Discussion and Analysis extraction.
//!
//! This module provides:
//! - The `ContentExtractor` trait the pipeline drives for selected filings
//! - `MdnaExtractor`, which locates the MD&A section of a 10-K or 10-Q,
//!   preserves its financial tables, and optionally writes the result to disk
//!
//! # Example
//!
//! ```no_run
//! use sift_filings::{ContentExtractor, ExtractorConfig, MdnaExtractor};
//! use std::path::Path;
//!
//! let extractor = MdnaExtractor::new(ExtractorConfig::default().with_output_dir("out"));
//! match extractor.extract(Path::new("filing.txt"))? {
//!     Some(result) => println!("{} words, {} tables", result.word_count, result.table_count),
//!     None => println!("no MD&A section"),
//! }
//! # Ok::<(), sift_filings::FilingError>(())
//! ```

mod normalize;
mod section;
mod tables;

pub use tables::{TABLE_BEGIN, TABLE_END};

use crate::error::{FilingError, Result};
use crate::metadata::HeaderMetadataParser;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Extracts structured content from a selected filing.
pub trait ContentExtractor {
    /// Structured result of a successful extraction.
    type Output;

    /// Extract content from the file at `path`.
    ///
    /// Returns `Ok(None)` when the document holds nothing extractable.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or the result cannot be written.
    fn extract(&self, path: &Path) -> Result<Option<Self::Output>>;
}

/// Configuration for MD&A extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Directory receiving one text file per extracted section; nothing is written when unset
    pub output_dir: Option<PathBuf>,
    /// Sections with fewer words are treated as not found
    pub min_words: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            min_words: 50,
        }
    }
}

impl ExtractorConfig {
    /// Write extracted sections to `dir`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the minimum section length in words.
    pub const fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }
}

/// An extracted MD&A section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdnaExtraction {
    /// Issuer CIK
    pub cik: String,
    /// Company name, "Unknown Company" when the header has none
    pub company_name: String,
    /// Form type
    pub form_type: String,
    /// Filing date, when known
    pub filing_date: Option<NaiveDate>,
    /// Section text with tables wrapped in markers
    pub text: String,
    /// Number of words in the section
    pub word_count: usize,
    /// Number of preserved tables
    pub table_count: usize,
    /// File the section was written to
    pub output_path: Option<PathBuf>,
}

/// MD&A section extractor for EDGAR full-text filings.
#[derive(Debug, Clone, Default)]
pub struct MdnaExtractor {
    config: ExtractorConfig,
}

impl MdnaExtractor {
    /// Create an extractor.
    pub const fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extractor configuration.
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the MD&A section from already-loaded filing text.
    ///
    /// Nothing is written to disk; `output_path` is always `None`.
    pub fn extract_from_text(&self, path: &Path, content: &str) -> Option<MdnaExtraction> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "empty filing");
            return None;
        }

        let meta = HeaderMetadataParser::parse_content(path, content);
        let Some(cik) = meta.issuer_id else {
            tracing::warn!(path = %path.display(), "missing CIK, skipping extraction");
            return None;
        };
        let form_type = meta.document_type.unwrap_or_else(|| "10-K".to_string());

        let text = normalize::preservation_version(content);
        let Some(span) = section::find_mdna(&text, &form_type) else {
            tracing::warn!(path = %path.display(), form = %form_type, "MD&A section not found");
            return None;
        };

        let section_text = &text[span];
        let word_count = normalize::parsing_version(section_text)
            .split_whitespace()
            .count();
        if word_count < self.config.min_words {
            tracing::warn!(
                path = %path.display(),
                word_count,
                min_words = self.config.min_words,
                "MD&A section too short"
            );
            return None;
        }

        let lines: Vec<&str> = section_text.lines().collect();
        let (rendered, table_count) = tables::process_lines(&lines);

        Some(MdnaExtraction {
            cik,
            company_name: meta
                .company_name
                .unwrap_or_else(|| "Unknown Company".to_string()),
            form_type,
            filing_date: meta.filing_date,
            text: rendered,
            word_count,
            table_count,
            output_path: None,
        })
    }

    fn save(&self, dir: &Path, result: &MdnaExtraction) -> Result<PathBuf> {
        let path = dir.join(output_file_name(result));
        fs::create_dir_all(dir)
            .and_then(|()| fs::write(&path, format_output(result)))
            .map_err(|e| {
                FilingError::Extraction(format!("cannot save {}: {}", path.display(), e))
            })?;
        tracing::info!(path = %path.display(), "saved extraction");
        Ok(path)
    }
}

impl ContentExtractor for MdnaExtractor {
    type Output = MdnaExtraction;

    fn extract(&self, path: &Path) -> Result<Option<MdnaExtraction>> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);

        let Some(mut result) = self.extract_from_text(path, &content) else {
            return Ok(None);
        };

        if let Some(dir) = &self.config.output_dir {
            result.output_path = Some(self.save(dir, &result)?);
        }

        tracing::info!(
            path = %path.display(),
            words = result.word_count,
            tables = result.table_count,
            "extracted MD&A"
        );
        Ok(Some(result))
    }
}

/// `(<cik>)_(<company>)_(<date>)_(<form>).txt`
fn output_file_name(result: &MdnaExtraction) -> String {
    let date = result
        .filing_date
        .map_or_else(|| "unknown".to_string(), |d| d.format("%Y-%m-%d").to_string());
    let company: String = result
        .company_name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .take(50)
        .collect();

    format!(
        "({})_({})_({})_({}).txt",
        result.cik,
        company,
        date,
        result.form_type.replace('/', "_")
    )
}

fn format_output(result: &MdnaExtraction) -> String {
    let rule = "=".repeat(80);
    let filing_date = result
        .filing_date
        .map_or_else(|| "unknown".to_string(), |d| d.to_string());

    format!(
        "{rule}\n\
         CIK: {}\n\
         Company: {}\n\
         Form Type: {}\n\
         Filing Date: {}\n\
         Extraction Date: {}\n\
         Word Count: {}\n\
         {rule}\n\n\
         {}\n",
        result.cik,
        result.company_name,
        result.form_type,
        filing_date,
        Utc::now().to_rfc3339(),
        result.word_count,
        result.text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filing() -> String {
        let prose = "Revenue grew as customers expanded their use of our platform. ".repeat(12);
        format!(
            "<SEC-HEADER>\n\
             CONFORMED SUBMISSION TYPE:\t10-K\n\
             FILED AS OF DATE:\t\t20230301\n\
             COMPANY CONFORMED NAME:\t\t\tACME WIDGETS, INC.\n\
             CENTRAL INDEX KEY:\t\t\t0000012345\n\
             </SEC-HEADER>\n\
             <DOCUMENT>\n<TYPE>10-K\n<TEXT>\n\
             Item 7. Management&#8217;s Discussion and Analysis\n\
             Item 8. Financial Statements\n\
             PART II\n\
             Item 7. Management&#8217;s Discussion and Analysis of Results\n\
             {prose}\n\
                                   2023          2022\n\
                                   ----          ----\n\
             Net sales          $ 1,200       $ 1,100\n\
             Total              $ 1,200       $ 1,100\n\
             \n\
             {prose}\n\
             Item 8. Financial Statements and Supplementary Data\n\
             </TEXT>\n</DOCUMENT>\n"
        )
    }

    #[test]
    fn test_extract_from_text() {
        let extractor = MdnaExtractor::default();
        let result = extractor
            .extract_from_text(Path::new("filing.txt"), &filing())
            .unwrap();

        assert_eq!(result.cik, "0000012345");
        assert_eq!(result.company_name, "ACME WIDGETS, INC.");
        assert_eq!(result.form_type, "10-K");
        assert_eq!(result.filing_date, NaiveDate::from_ymd_opt(2023, 3, 1));
        assert!(result.word_count > 100);
        assert!(result.text.starts_with("Item 7. Management\u{2019}s Discussion and Analysis of Results"));
        assert!(!result.text.contains("Supplementary Data"));
        assert!(result.output_path.is_none());
    }

    #[test]
    fn test_missing_cik_yields_none() {
        let content = filing().replace("CENTRAL INDEX KEY:\t\t\t0000012345\n", "");
        assert!(
            MdnaExtractor::default()
                .extract_from_text(Path::new("filing.txt"), &content)
                .is_none()
        );
    }

    #[test]
    fn test_short_section_yields_none() {
        let extractor = MdnaExtractor::new(ExtractorConfig::default().with_min_words(10_000));
        assert!(
            extractor
                .extract_from_text(Path::new("filing.txt"), &filing())
                .is_none()
        );
    }

    #[test]
    fn test_extract_writes_output() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let path = input.path().join("filing.txt");
        fs::write(&path, filing()).unwrap();

        let extractor = MdnaExtractor::new(ExtractorConfig::default().with_output_dir(output.path()));
        let result = extractor.extract(&path).unwrap().unwrap();

        let written = result.output_path.unwrap();
        assert_eq!(
            written.file_name().unwrap().to_str().unwrap(),
            "(0000012345)_(ACME WIDGETS INC)_(2023-03-01)_(10-K).txt"
        );
        let contents = fs::read_to_string(written).unwrap();
        assert!(contents.contains("CIK: 0000012345"));
        assert!(contents.contains("Word Count:"));
        assert!(contents.contains(TABLE_BEGIN));
    }

    #[test]
    fn test_unsaveable_section_is_extraction_error() {
        let input = tempfile::tempdir().unwrap();
        let path = input.path().join("filing.txt");
        fs::write(&path, filing()).unwrap();
        let blocker = input.path().join("out");
        fs::write(&blocker, "not a directory").unwrap();

        let extractor = MdnaExtractor::new(ExtractorConfig::default().with_output_dir(&blocker));
        let result = extractor.extract(&path);
        assert!(matches!(result, Err(FilingError::Extraction(msg)) if msg.contains("cannot save")));
    }

    #[test]
    fn test_extract_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();
        assert!(MdnaExtractor::default().extract(&path).unwrap().is_none());
    }

    #[test]
    fn test_extract_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MdnaExtractor::default().extract(&dir.path().join("nope.txt")).is_err());
    }
}
