//! End-to-end runs of the default pipeline over zipped EDGAR filings.

use sift::filings::IssuerFilter;
use sift::{FilterConfig, SiftConfig, default_processor};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

fn filing(cik: &str, company: &str, form: &str, filed: &str) -> String {
    let prose = "Revenue grew as customers expanded their use of our platform. ".repeat(12);
    let item = if form.starts_with("10-Q") { "2" } else { "7" };
    let closing = if form.starts_with("10-Q") {
        "Item 3. Quantitative and Qualitative Disclosures About Market Risk"
    } else {
        "Item 8. Financial Statements and Supplementary Data"
    };
    format!(
        "<SEC-HEADER>\n\
         CONFORMED SUBMISSION TYPE:\t{form}\n\
         FILED AS OF DATE:\t\t{filed}\n\
         COMPANY CONFORMED NAME:\t\t\t{company}\n\
         CENTRAL INDEX KEY:\t\t\t{cik}\n\
         </SEC-HEADER>\n\
         <DOCUMENT>\n<TYPE>{form}\n<TEXT>\n\
         Item {item}. Management's Discussion and Analysis of Financial Condition\n\
         {prose}\n\
         {prose}\n\
         {closing}\n\
         </TEXT>\n</DOCUMENT>\n"
    )
}

fn write_zip(path: &Path, members: &[(&str, String)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, contents) in members {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn fixture(dir: &Path) {
    write_zip(
        &dir.join("2023q1.zip"),
        &[
            (
                "20230301_10-K_edgar_data_12345_0000012345-23-000001.txt",
                filing("0000012345", "ACME WIDGETS INC", "10-K", "20230301"),
            ),
            (
                "20230510_10-Q_edgar_data_12345_0000012345-23-000002.txt",
                filing("0000012345", "ACME WIDGETS INC", "10-Q", "20230510"),
            ),
            (
                "20230315_10-K_edgar_data_67890_0000067890-23-000003.txt",
                filing("0000067890", "GLOBEX CORP", "10-K", "20230315"),
            ),
            ("index.htm", "<html></html>".to_string()),
        ],
    );
    write_zip(
        &dir.join("2023q2.zip"),
        &[(
            "20230601_10-K_edgar_data_55555_0000055555-23-000004.txt",
            "no discussion section here".to_string(),
        )],
    );
    fs::write(dir.join("2023q3.zip"), b"truncated download").unwrap();
}

#[test]
fn test_directory_run_extracts_canonical_filings() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fixture(input.path());

    let mut config = SiftConfig::default();
    config.extractor.output_dir = Some(output.path().to_path_buf());

    let stats = default_processor(&config)
        .process_directory(input.path(), None)
        .unwrap();

    assert_eq!(stats.total_archives, 3);
    assert_eq!(stats.total_candidates, 4);
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.filtered_out, 0);

    let q2 = &stats.archive_results[1];
    assert_eq!(q2.errors[0].message, "Extraction failed");
    let q3 = &stats.archive_results[2];
    assert_eq!(q3.total_candidates, 0);
    assert_eq!(q3.errors.len(), 1);

    let mut written: Vec<_> = fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            "(0000012345)_(ACME WIDGETS INC)_(2023-03-01)_(10-K).txt",
            "(0000067890)_(GLOBEX CORP)_(2023-03-15)_(10-K).txt",
        ]
    );
}

#[test]
fn test_cik_filter_limits_run() {
    let input = tempfile::tempdir().unwrap();
    fixture(input.path());

    let config = SiftConfig {
        filter: FilterConfig {
            ciks: vec!["67890".to_string()],
            ..FilterConfig::default()
        },
        ..SiftConfig::default()
    };
    let filter = config.filter.build().unwrap();

    let stats = default_processor(&config)
        .process_directory(
            input.path(),
            filter.as_ref().map(|f| f as &dyn IssuerFilter),
        )
        .unwrap();

    assert_eq!(stats.processed, 1);
    assert_eq!(stats.filtered_out, 3);
    assert_eq!(stats.failed, 0);
}

#[test]
fn test_single_archive_run() {
    let input = tempfile::tempdir().unwrap();
    fixture(input.path());

    let mut processor = default_processor(&SiftConfig::default());
    let stats = processor
        .archive_processor()
        .process_zip_file(&input.path().join("2023q1.zip"), None);

    assert_eq!(stats.total_candidates, 3);
    assert_eq!(stats.processed, 2);
    assert!(stats.errors.is_empty());
}
