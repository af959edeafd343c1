//! Test doubles and fixture builders shared by the pipeline integration tests.

#![allow(dead_code, unreachable_pub)]

use sift_filings::{
    CanonicalRegistry, ContentExtractor, FilingError, FilingMetadata, IssuerFilter,
    MetadataParser, SelectionRegistry, SelectionResult,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// Write a zip archive at `dir/name` holding `members`.
pub fn build_zip(dir: &Path, name: &str, members: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
    for (member, contents) in members {
        writer.start_file(*member, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

/// Reads `issuer|period|type` from the first line of a file; blank fields are absent.
///
/// A file starting with `!` makes parsing fail.
#[derive(Debug, Default)]
pub struct LineParser;

impl MetadataParser for LineParser {
    fn parse(&self, path: &Path) -> sift_filings::Result<FilingMetadata> {
        let content = std::fs::read_to_string(path)?;
        let line = content.lines().next().unwrap_or_default();
        if line.starts_with('!') {
            return Err(FilingError::Parse(format!("unparsable header in {}", file_name(path))));
        }

        let mut fields = line.split('|').map(|f| {
            let f = f.trim();
            (!f.is_empty()).then(|| f.to_string())
        });
        Ok(FilingMetadata {
            issuer_id: fields.next().flatten(),
            period: fields.next().flatten(),
            document_type: fields.next().flatten(),
            ..FilingMetadata::default()
        })
    }
}

/// Canonical registry that also remembers every registered location.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub inner: CanonicalRegistry,
    pub seen: Vec<PathBuf>,
}

impl RecordingRegistry {
    pub fn seen_names(&self) -> Vec<String> {
        self.seen.iter().map(|p| file_name(p)).collect()
    }
}

impl SelectionRegistry for RecordingRegistry {
    fn register(
        &mut self,
        location: &Path,
        issuer_id: &str,
        period: &str,
        document_type: &str,
    ) -> sift_filings::Result<()> {
        self.seen.push(location.to_path_buf());
        self.inner.register(location, issuer_id, period, document_type)
    }

    fn select(&self) -> SelectionResult {
        self.inner.select()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Registry whose selection also names a location it never saw.
#[derive(Debug, Default)]
pub struct ForeignSelection {
    pub inner: CanonicalRegistry,
}

impl SelectionRegistry for ForeignSelection {
    fn register(
        &mut self,
        location: &Path,
        issuer_id: &str,
        period: &str,
        document_type: &str,
    ) -> sift_filings::Result<()> {
        self.inner.register(location, issuer_id, period, document_type)
    }

    fn select(&self) -> SelectionResult {
        let mut result = self.inner.select();
        result.process.push(PathBuf::from("/nowhere/foreign.txt"));
        result
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Canonical registry that refuses to register chosen file names.
#[derive(Debug, Default)]
pub struct RejectingRegistry {
    pub inner: CanonicalRegistry,
    pub reject: HashSet<String>,
}

impl RejectingRegistry {
    pub fn rejecting(names: &[&str]) -> Self {
        Self {
            reject: names.iter().map(|n| (*n).to_string()).collect(),
            ..Self::default()
        }
    }
}

impl SelectionRegistry for RejectingRegistry {
    fn register(
        &mut self,
        location: &Path,
        issuer_id: &str,
        period: &str,
        document_type: &str,
    ) -> sift_filings::Result<()> {
        let name = file_name(location);
        if self.reject.contains(&name) {
            return Err(FilingError::InvalidCandidate(format!("refused {name}")));
        }
        self.inner.register(location, issuer_id, period, document_type)
    }

    fn select(&self) -> SelectionResult {
        self.inner.select()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Extractor that fails for chosen file names and returns nothing for others.
#[derive(Debug, Default)]
pub struct ScriptedExtractor {
    pub raise_for: HashSet<String>,
    pub empty_for: HashSet<String>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedExtractor {
    pub fn raising(names: &[&str]) -> Self {
        Self {
            raise_for: names.iter().map(|n| (*n).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn empty(names: &[&str]) -> Self {
        Self {
            empty_for: names.iter().map(|n| (*n).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ContentExtractor for ScriptedExtractor {
    type Output = String;

    fn extract(&self, path: &Path) -> sift_filings::Result<Option<String>> {
        let name = file_name(path);
        self.calls.borrow_mut().push(name.clone());
        if self.raise_for.contains(&name) {
            return Err(FilingError::Extraction(format!("cannot extract {name}")));
        }
        if self.empty_for.contains(&name) {
            return Ok(None);
        }
        Ok(Some(name))
    }
}

/// Accepts only the listed issuers.
#[derive(Debug)]
pub struct AllowIssuers(pub Vec<&'static str>);

impl IssuerFilter for AllowIssuers {
    fn has_active_rules(&self) -> bool {
        !self.0.is_empty()
    }

    fn should_process(
        &self,
        issuer_id: Option<&str>,
        _period: Option<&str>,
        _document_type: Option<&str>,
    ) -> bool {
        issuer_id.is_some_and(|id| self.0.contains(&id))
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
