#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;

pub use export::{ArchiveRow, ErrorRow, ExportError, ExportFormat, Exporter, errors_path};
pub use report::{RunReport, RunReportBuilder, ReportError};
