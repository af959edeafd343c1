//! Integration tests for reporting and exporting run statistics.

use sift_output::{ExportFormat, Exporter, RunReportBuilder, errors_path};
use sift_pipeline::{ArchiveStats, DirectoryStats};
use std::fs;

fn run() -> DirectoryStats {
    let mut good = ArchiveStats::new("in/2023q1.zip");
    good.total_candidates = 3;
    good.processed = 2;
    good.filtered_out = 1;

    let mut broken = ArchiveStats::new("in/2023q2.zip");
    broken.push_error("in/2023q2.zip", "Corrupt archive in/2023q2.zip: invalid Zip archive");

    let mut partial = ArchiveStats::new("in/2023q3.zip");
    partial.total_candidates = 2;
    partial.processed = 1;
    partial.record_failure("C.txt", "Extraction failed");

    DirectoryStats::from_archive_results("in", [good, broken, partial])
}

#[test]
fn test_full_reporting_workflow() {
    let stats = run();
    let report = RunReportBuilder::new()
        .input("in")
        .directory(stats.clone())
        .build()
        .unwrap();

    let ascii = report.to_ascii_table();
    assert!(ascii.contains("2023q1.zip"));
    assert!(ascii.contains("2023q2.zip"));
    assert!(ascii.contains("Errors (2):"));

    let markdown = report.to_markdown();
    assert!(markdown.contains("| Archive | Candidates |"));
    assert!(markdown.contains("- **Archives:** 3"));

    let json = report.to_json().unwrap();
    assert!(json.contains("\"total_candidates\": 5"));
}

#[test]
fn test_export_directory_to_files() {
    let dir = tempfile::tempdir().unwrap();
    let stats = run();

    let csv_path = dir.path().join("summary.csv");
    let format = ExportFormat::from_path(&csv_path).unwrap();
    stats.export_to_file(&csv_path, format).unwrap();

    let rows = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(rows.lines().count(), 4);
    let errors = fs::read_to_string(errors_path(&csv_path)).unwrap();
    assert_eq!(errors.lines().count(), 3);
    assert!(errors.contains("in/2023q3.zip,C.txt,Extraction failed"));

    let json_path = dir.path().join("summary.json");
    stats
        .export_to_file(&json_path, ExportFormat::from_path(&json_path).unwrap())
        .unwrap();
    let back: DirectoryStats =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(back, stats);
    assert!(!dir.path().join("summary_errors.json").exists());
}
