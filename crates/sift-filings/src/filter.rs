//! Issuer filtering.
//!
//! A filter answers one question for the pipeline: should a filing with
//! this (issuer, period, form) proceed to selection? The default
//! implementation matches on CIK, optionally narrowed by form type and an
//! inclusive year range.

use crate::error::Result;
use crate::metadata::normalize_cik;
use std::collections::BTreeSet;
use std::path::Path;

/// Decides whether a parsed filing should proceed through the pipeline.
pub trait IssuerFilter {
    /// Whether any filtering rule is configured.
    ///
    /// The pipeline skips `should_process` entirely when this is false.
    fn has_active_rules(&self) -> bool;

    /// Whether a filing with the given metadata should proceed.
    fn should_process(
        &self,
        issuer_id: Option<&str>,
        period: Option<&str>,
        document_type: Option<&str>,
    ) -> bool;
}

/// Filter on issuer CIK with optional form type and year restrictions.
///
/// Only the CIK set activates the filter; form and year restrictions refine
/// an active CIK filter but do nothing on their own.
#[derive(Debug, Clone, Default)]
pub struct CikFilter {
    /// Normalized 10-digit CIKs
    ciks: BTreeSet<String>,
    /// Upper-cased form types, empty means any form
    form_types: BTreeSet<String>,
    /// Earliest fiscal year accepted (inclusive)
    year_from: Option<i32>,
    /// Latest fiscal year accepted (inclusive)
    year_to: Option<i32>,
}

impl CikFilter {
    /// Create a filter accepting the given CIKs.
    ///
    /// # Errors
    /// Returns an error if any CIK is not numeric.
    ///
    /// # Example
    /// ```
    /// use sift_filings::{CikFilter, IssuerFilter};
    ///
    /// let filter = CikFilter::new(["320193"]).unwrap();
    /// assert!(filter.has_active_rules());
    /// assert!(filter.should_process(Some("0000320193"), Some("2023"), Some("10-K")));
    /// assert!(!filter.should_process(Some("0000789019"), Some("2023"), Some("10-K")));
    /// ```
    pub fn new<I, S>(ciks: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ciks = ciks
            .into_iter()
            .map(|cik| normalize_cik(cik.as_ref()))
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(Self {
            ciks,
            ..Default::default()
        })
    }

    /// Load CIKs from a list file.
    ///
    /// Accepts either one CIK per line or a CSV file with a `cik` column.
    /// Lines starting with `#` are ignored, as are rows whose CIK field is
    /// not numeric.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut column = 0;
        let mut ciks = BTreeSet::new();

        for (row, record) in reader.records().enumerate() {
            let record = record?;

            if row == 0
                && let Some(idx) = record.iter().position(|f| f.eq_ignore_ascii_case("cik"))
            {
                column = idx;
                continue;
            }

            match record.get(column).map(normalize_cik) {
                Some(Ok(cik)) => {
                    ciks.insert(cik);
                }
                Some(Err(e)) => tracing::debug!(row, error = %e, "skipping CIK list row"),
                None => {}
            }
        }

        tracing::info!(count = ciks.len(), path = %path.display(), "loaded CIK list");

        Ok(Self {
            ciks,
            ..Default::default()
        })
    }

    /// Restrict accepted filings to the given form types.
    pub fn with_form_types<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.form_types = forms
            .into_iter()
            .map(|f| f.as_ref().trim().to_uppercase())
            .filter(|f| !f.is_empty())
            .collect();
        self
    }

    /// Restrict accepted filings to an inclusive year range.
    pub const fn with_year_range(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.year_from = from;
        self.year_to = to;
        self
    }

    /// Merge the CIKs of another filter into this one.
    pub fn extend(&mut self, other: Self) {
        self.ciks.extend(other.ciks);
    }

    /// Number of CIKs in the filter.
    pub fn len(&self) -> usize {
        self.ciks.len()
    }

    /// Whether the filter holds no CIKs.
    pub fn is_empty(&self) -> bool {
        self.ciks.is_empty()
    }

    /// Whether a CIK is in the filter.
    pub fn contains(&self, cik: &str) -> bool {
        normalize_cik(cik).is_ok_and(|cik| self.ciks.contains(&cik))
    }

    fn year_in_range(&self, period: Option<&str>) -> bool {
        let Some(year) = period.and_then(|p| p.trim().parse::<i32>().ok()) else {
            return true;
        };
        self.year_from.is_none_or(|from| year >= from) && self.year_to.is_none_or(|to| year <= to)
    }
}

impl IssuerFilter for CikFilter {
    fn has_active_rules(&self) -> bool {
        !self.ciks.is_empty()
    }

    fn should_process(
        &self,
        issuer_id: Option<&str>,
        period: Option<&str>,
        document_type: Option<&str>,
    ) -> bool {
        let Some(cik) = issuer_id else {
            return false;
        };
        if !self.contains(cik) {
            return false;
        }

        if !self.form_types.is_empty() {
            let form_ok = document_type
                .is_some_and(|form| self.form_types.contains(&form.trim().to_uppercase()));
            if !form_ok {
                return false;
            }
        }

        self.year_in_range(period)
    }
}
