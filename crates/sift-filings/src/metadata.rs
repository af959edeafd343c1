//! Lightweight filing metadata parsing.
//!
//! Metadata is taken from two places, in order:
//! - EDGAR bulk download file names (`20230301_10-K_edgar_data_320193_0000320193-23-000006.txt`)
//! - the SEC header block at the top of the filing text
//!
//! Only the fields needed to group and filter filings are recovered: the
//! issuer CIK, the fiscal period (filing year), the form type, and when
//! available the filing date and company name.

use crate::error::{FilingError, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

/// Number of characters of filing text searched for header fields.
const HEADER_CHARS: usize = 5000;

/// Number of bytes read from disk when the header has to be consulted.
const HEADER_BYTES: u64 = 64 * 1024;

static FILENAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{8})_(10-[KQ](?:/A)?)_edgar_data_(\d{1,10})_([0-9\-]+)\.txt")
        .expect("valid filename pattern")
});

static CIK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)CENTRAL INDEX KEY:\s*(\d+)",
        r"(?i)CIK:\s*(\d+)",
        r"(?i)C\.I\.K\.\s*NO\.\s*(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid CIK pattern"))
    .collect()
});

static FORM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)CONFORMED SUBMISSION TYPE:\s*(10-[KQ])(/A)?",
        r"(?i)FORM\s+TYPE:\s*(10-[KQ])(/A)?",
        r"(?i)FORM\s+(10-[KQ])(/A)?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid form pattern"))
    .collect()
});

static DATE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)FILED AS OF DATE:\s*(\d{8})").expect("valid date pattern"),
            "%Y%m%d",
        ),
        (
            Regex::new(r"(?i)DATE OF REPORT[^:\n]*:\s*(\d{4}-\d{2}-\d{2})")
                .expect("valid date pattern"),
            "%Y-%m-%d",
        ),
    ]
});

static COMPANY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)COMPANY\s*CONFORMED\s*NAME:\s*([^\n]+)",
        r"(?i)CONFORMED\s*NAME:\s*([^\n]+)",
        r"(?i)REGISTRANT\s*NAME:\s*([^\n]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid company pattern"))
    .collect()
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Metadata recovered from a single filing document.
///
/// Every field is optional: a member that yields an incomplete
/// (issuer, period, form) triple is not a filing candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilingMetadata {
    /// Central Index Key, zero-padded to 10 digits
    pub issuer_id: Option<String>,
    /// Fiscal period the filing belongs to (filing year)
    pub period: Option<String>,
    /// Form type (e.g., "10-K", "10-Q/A")
    pub document_type: Option<String>,
    /// Filing date, when known
    pub filing_date: Option<NaiveDate>,
    /// Company conformed name, when present in the header
    pub company_name: Option<String>,
}

impl FilingMetadata {
    /// Returns the (issuer, period, form) triple when every field is present and non-blank.
    pub fn complete(&self) -> Option<(&str, &str, &str)> {
        fn non_blank(field: &Option<String>) -> Option<&str> {
            field
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
        }

        Some((
            non_blank(&self.issuer_id)?,
            non_blank(&self.period)?,
            non_blank(&self.document_type)?,
        ))
    }

    /// Fill any missing field from `other`, keeping fields already set.
    fn merge(&mut self, other: Self) {
        if self.issuer_id.is_none() {
            self.issuer_id = other.issuer_id;
        }
        if self.filing_date.is_none() {
            self.filing_date = other.filing_date;
        }
        if self.period.is_none() {
            self.period = self.filing_date.map(|d| d.year().to_string());
        }
        if self.document_type.is_none() {
            self.document_type = other.document_type;
        }
        if self.company_name.is_none() {
            self.company_name = other.company_name;
        }
    }
}

/// Parses lightweight metadata out of an extracted filing.
pub trait MetadataParser {
    /// Parse metadata from the file at `path`.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read. Missing fields are not
    /// errors; they are reported as `None`.
    fn parse(&self, path: &Path) -> Result<FilingMetadata>;
}

/// Metadata parser for EDGAR full-text filings.
///
/// Tries the bulk-download file name convention first and falls back to
/// the SEC header for anything the name does not carry.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderMetadataParser;

impl HeaderMetadataParser {
    /// Create a new parser.
    pub const fn new() -> Self {
        Self
    }

    /// Parse metadata from a file name alone.
    ///
    /// # Example
    /// ```
    /// use sift_filings::HeaderMetadataParser;
    ///
    /// let meta = HeaderMetadataParser::parse_file_name(
    ///     "20230301_10-K_edgar_data_320193_0000320193-23-000006.txt",
    /// );
    /// assert_eq!(meta.issuer_id.as_deref(), Some("0000320193"));
    /// assert_eq!(meta.period.as_deref(), Some("2023"));
    /// assert_eq!(meta.document_type.as_deref(), Some("10-K"));
    /// ```
    pub fn parse_file_name(file_name: &str) -> FilingMetadata {
        let Some(caps) = FILENAME_PATTERN.captures(file_name) else {
            return FilingMetadata::default();
        };

        let filing_date = NaiveDate::parse_from_str(&caps[1], "%Y%m%d").ok();
        if filing_date.is_none() {
            tracing::debug!(file_name, "unparseable date in file name");
        }

        FilingMetadata {
            issuer_id: Some(normalize_cik(&caps[3]).unwrap_or_else(|_| caps[3].to_string())),
            period: filing_date.map(|d| d.year().to_string()),
            document_type: Some(caps[2].to_uppercase()),
            filing_date,
            company_name: None,
        }
    }

    /// Parse metadata from the SEC header of a filing's text.
    pub fn parse_header(content: &str) -> FilingMetadata {
        let header = leading_chars(content, HEADER_CHARS);

        let issuer_id = CIK_PATTERNS
            .iter()
            .find_map(|re| re.captures(header))
            .and_then(|caps| normalize_cik(&caps[1]).ok());

        let document_type = FORM_PATTERNS.iter().find_map(|re| {
            re.captures(header).map(|caps| {
                let mut form = caps[1].to_uppercase();
                if caps.get(2).is_some() {
                    form.push_str("/A");
                }
                form
            })
        });

        let filing_date = DATE_PATTERNS.iter().find_map(|(re, fmt)| {
            re.captures(header)
                .and_then(|caps| NaiveDate::parse_from_str(&caps[1], fmt).ok())
        });

        let company_name = COMPANY_PATTERNS.iter().find_map(|re| {
            re.captures(header).and_then(|caps| {
                let name = WHITESPACE.replace_all(caps[1].trim(), " ").into_owned();
                (name.len() > 3 && name.len() < 100).then_some(name)
            })
        });

        FilingMetadata {
            issuer_id,
            period: filing_date.map(|d| d.year().to_string()),
            document_type,
            filing_date,
            company_name,
        }
    }

    /// Parse metadata from a file name and already-loaded content.
    pub fn parse_content(path: &Path, content: &str) -> FilingMetadata {
        let mut meta = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(Self::parse_file_name)
            .unwrap_or_default();
        meta.merge(Self::parse_header(content));
        meta
    }
}

impl MetadataParser for HeaderMetadataParser {
    fn parse(&self, path: &Path) -> Result<FilingMetadata> {
        let mut meta = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(Self::parse_file_name)
            .unwrap_or_default();

        if meta.complete().is_some() && meta.filing_date.is_some() {
            return Ok(meta);
        }

        let mut bytes = Vec::new();
        File::open(path)?.take(HEADER_BYTES).read_to_end(&mut bytes)?;
        if bytes.contains(&0) {
            return Err(FilingError::Parse(format!(
                "binary content in {}",
                path.display()
            )));
        }
        let content = String::from_utf8_lossy(&bytes);

        meta.merge(Self::parse_header(&content));
        Ok(meta)
    }
}

/// Normalize a CIK to the 10-digit zero-padded form used by EDGAR.
///
/// # Errors
/// Returns an error if the value is empty, longer than 10 digits, or not numeric.
///
/// # Example
/// ```
/// use sift_filings::normalize_cik;
///
/// assert_eq!(normalize_cik("320193").unwrap(), "0000320193");
/// assert!(normalize_cik("AAPL").is_err());
/// ```
pub fn normalize_cik(cik: &str) -> Result<String> {
    let cik = cik.trim();
    if cik.is_empty() || cik.len() > 10 || !cik.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FilingError::InvalidCik(cik.to_string()));
    }
    Ok(format!("{:0>10}", cik))
}

/// Slice off at most `max` characters without splitting a code point.
pub(crate) fn leading_chars(text: &str, max: usize) -> &str {
    text.char_indices()
        .nth(max)
        .map_or(text, |(idx, _)| &text[..idx])
}
