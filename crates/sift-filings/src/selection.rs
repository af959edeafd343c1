//! Canonical filing selection.
//!
//! Bulk archives routinely contain several documents for the same issuer
//! and fiscal period: the annual report, its amendments, quarterly reports.
//! A selection registry collects every candidate of an archive and then
//! decides which single filing per (issuer, period) gets its content
//! extracted.

use crate::error::{FilingError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A filing that parsed completely and passed the issuer filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingCandidate {
    /// Location of the extracted document
    pub location: PathBuf,
    /// Issuer CIK
    pub issuer_id: String,
    /// Fiscal period
    pub period: String,
    /// Form type
    pub document_type: String,
}

/// Outcome of selection for one archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    /// Locations whose content should be extracted, in selection order
    pub process: Vec<PathBuf>,
    /// Registered locations that lost to another filing of the same group
    pub duplicates: Vec<PathBuf>,
}

/// Accumulates candidates and picks canonical filings.
///
/// A registry holds the candidates of one archive; callers reset it between
/// archives.
pub trait SelectionRegistry {
    /// Register a candidate.
    ///
    /// # Errors
    /// Implementations may reject malformed candidates.
    fn register(
        &mut self,
        location: &Path,
        issuer_id: &str,
        period: &str,
        document_type: &str,
    ) -> Result<()>;

    /// Compute which registered candidates should be processed.
    fn select(&self) -> SelectionResult;

    /// Drop every registered candidate.
    fn reset(&mut self);
}

/// Rank of a form type; lower ranks win selection.
///
/// # Example
/// ```
/// use sift_filings::selection::form_rank;
///
/// assert!(form_rank("10-K") < form_rank("10-K/A"));
/// assert!(form_rank("10-K/A") < form_rank("10-Q"));
/// ```
pub fn form_rank(document_type: &str) -> u8 {
    match document_type.trim().to_uppercase().as_str() {
        "10-K" => 0,
        "10-K405" => 1,
        "10-KSB" => 2,
        "10-K/A" | "10-K405/A" | "10-KSB/A" => 3,
        "10-Q" => 4,
        "10-QSB" => 5,
        "10-Q/A" | "10-QSB/A" => 6,
        _ => 7,
    }
}

/// Registry keeping one filing per (issuer, period).
///
/// The annual report wins over amendments, which win over quarterly
/// reports. Among filings of equal rank the first one registered wins.
/// Groups are emitted in the order their first candidate was registered.
#[derive(Debug, Clone, Default)]
pub struct CanonicalRegistry {
    candidates: Vec<FilingCandidate>,
}

impl CanonicalRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Number of registered candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether no candidate is registered.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Registered candidates in registration order.
    pub fn candidates(&self) -> &[FilingCandidate] {
        &self.candidates
    }
}

impl SelectionRegistry for CanonicalRegistry {
    fn register(
        &mut self,
        location: &Path,
        issuer_id: &str,
        period: &str,
        document_type: &str,
    ) -> Result<()> {
        for (field, value) in [
            ("issuer_id", issuer_id),
            ("period", period),
            ("document_type", document_type),
        ] {
            if value.trim().is_empty() {
                return Err(FilingError::InvalidCandidate(format!(
                    "{} is blank for {}",
                    field,
                    location.display()
                )));
            }
        }

        self.candidates.push(FilingCandidate {
            location: location.to_path_buf(),
            issuer_id: issuer_id.trim().to_string(),
            period: period.trim().to_string(),
            document_type: document_type.trim().to_uppercase(),
        });
        Ok(())
    }

    fn select(&self) -> SelectionResult {
        let mut group_index: HashMap<(&str, &str), usize> = HashMap::new();
        let mut winners: Vec<usize> = Vec::new();
        let mut duplicates = Vec::new();

        for (idx, candidate) in self.candidates.iter().enumerate() {
            let key = (candidate.issuer_id.as_str(), candidate.period.as_str());

            match group_index.get(&key) {
                None => {
                    group_index.insert(key, winners.len());
                    winners.push(idx);
                }
                Some(&group) => {
                    let current = &self.candidates[winners[group]];
                    if form_rank(&candidate.document_type) < form_rank(&current.document_type) {
                        duplicates.push(current.location.clone());
                        winners[group] = idx;
                    } else {
                        duplicates.push(candidate.location.clone());
                    }
                }
            }
        }

        SelectionResult {
            process: winners
                .into_iter()
                .map(|idx| self.candidates[idx].location.clone())
                .collect(),
            duplicates,
        }
    }

    fn reset(&mut self) {
        self.candidates.clear();
    }
}
