//! Table-aware line processing for extracted sections.
//!
//! Financial tables in plain-text filings are laid out with runs of spaces
//! or tabs. Regions that look like tables are copied verbatim between
//! `--- BEGIN TABLE ---` and `--- END TABLE ---` markers; prose lines get
//! their whitespace normalized.

use regex::Regex;
use std::sync::LazyLock;

/// Marker opening a preserved table region.
pub const TABLE_BEGIN: &str = "--- BEGIN TABLE ---";
/// Marker closing a preserved table region.
pub const TABLE_END: &str = "--- END TABLE ---";

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid table pattern")
}

static COLUMN_GAP: LazyLock<Regex> = LazyLock::new(|| re(r"\s{3,}|\t"));
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| re(r"^[-=_\s]+$"));
static PERIOD_HEADER: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(?:Year|Quarter|Period|Month)s?\s+Ended?\b"));
static DATE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)(?:December|March|June|September)\s+\d{1,2},?\s+\d{4}"));
static YEAR_COLUMNS: LazyLock<Regex> = LazyLock::new(|| re(r"\b20\d{2}\b.*\b20\d{2}\b"));
static CURRENCY: LazyLock<Regex> = LazyLock::new(|| re(r"\$\s*[\d,]+"));
static PERCENT: LazyLock<Regex> = LazyLock::new(|| re(r"\d+\.?\d*\s*%"));
static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| re(r"\(\s*[\d,]+\.?\d*\s*\)"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| re(r"\b[\d,]+\.?\d*\b"));
static TOTALS: LazyLock<Regex> = LazyLock::new(|| re(r"\b(?:total|subtotal|net|gross)\b"));
static NOTE_REF: LazyLock<Regex> = LazyLock::new(|| re(r"^\s*\([0-9a-z]\)"));
static FOOTNOTE: LazyLock<Regex> = LazyLock::new(|| re(r"^\s*\*+"));
static NOTE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| re(r"^\s*(?:see|refer to|includes|excludes|represents)"));
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| re(r"[.!?]\s*$"));
static DIGIT: LazyLock<Regex> = LazyLock::new(|| re(r"\d"));

const HEADER_TERMS: [&str; 6] = ["Revenue", "Income", "Assets", "Liabilities", "Equity", "Cash"];

/// Process section lines, returning the rendered text and the number of tables preserved.
pub(crate) fn process_lines(lines: &[&str]) -> (String, usize) {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut tables = 0;
    let mut i = 0;

    while i < lines.len() {
        if let Some(len) = table_region_len(lines, i) {
            if out.last().is_some_and(|l| !l.trim().is_empty()) {
                out.push(String::new());
            }
            out.push(TABLE_BEGIN.to_string());
            out.extend(lines[i..i + len].iter().map(|l| (*l).to_string()));
            out.push(TABLE_END.to_string());
            out.push(String::new());
            tables += 1;
            i += len;
        } else {
            let line = lines[i];
            if is_regular_text(line) {
                out.push(normalize_text_line(line));
            } else {
                out.push(line.to_string());
            }
            i += 1;
        }
    }

    (out.join("\n"), tables)
}

/// Length of the table region starting at `start`, if one starts there.
fn table_region_len(lines: &[&str], start: usize) -> Option<usize> {
    if !starts_table(lines, start) {
        return None;
    }

    let mut len = 0;
    let mut consecutive_empty = 0;
    let mut has_numbers = false;

    for line in &lines[start..] {
        if DIGIT.is_match(line) {
            has_numbers = true;
        }

        if line.trim().is_empty() {
            consecutive_empty += 1;
            if consecutive_empty > 2 {
                break;
            }
        } else {
            consecutive_empty = 0;
            if !(is_table_line(line) || is_table_continuation(line)) {
                if len > 2 && has_numbers {
                    break;
                }
                return None;
            }
        }
        len += 1;
    }

    (len >= 2 && has_numbers).then_some(len)
}

fn starts_table(lines: &[&str], idx: usize) -> bool {
    let Some(line) = lines.get(idx) else {
        return false;
    };
    let next = lines.get(idx + 1);

    if is_table_header(line) && next.is_some_and(|n| is_separator(n) || is_table_line(n)) {
        return true;
    }

    is_separator(line) && next.is_some_and(|n| is_table_line(n))
}

fn is_table_header(line: &str) -> bool {
    if PERIOD_HEADER.is_match(line) || DATE_HEADER.is_match(line) || YEAR_COLUMNS.is_match(line) {
        return true;
    }
    HEADER_TERMS.iter().any(|term| line.contains(term)) && COLUMN_GAP.is_match(line)
}

fn is_separator(line: &str) -> bool {
    let stripped = line.trim();
    stripped.len() >= 3 && SEPARATOR.is_match(stripped)
}

fn is_table_line(line: &str) -> bool {
    if COLUMN_GAP.is_match(line) {
        let segments = COLUMN_GAP
            .split(line)
            .filter(|s| !s.trim().is_empty())
            .count();
        if segments >= 2 {
            return true;
        }
    }

    contains_financial_data(line) || line.matches('|').count() >= 2
}

fn is_table_continuation(line: &str) -> bool {
    let lower = line.to_lowercase();
    TOTALS.is_match(&lower)
        || NOTE_REF.is_match(&lower)
        || FOOTNOTE.is_match(line)
        || NOTE_TEXT.is_match(&lower)
}

fn contains_financial_data(line: &str) -> bool {
    if CURRENCY.is_match(line) || PERCENT.is_match(line) || NEGATIVE.is_match(line) {
        return true;
    }

    // Several numbers spread across the line read as columns.
    let mut numbers = NUMBER.find_iter(line);
    match (numbers.next(), numbers.last()) {
        (Some(first), Some(last)) => last.start() - first.start() > 20,
        _ => false,
    }
}

fn is_regular_text(line: &str) -> bool {
    if line.trim().is_empty() || is_table_line(line) || is_table_continuation(line) {
        return false;
    }
    SENTENCE_END.is_match(line.trim())
        || (line.split_whitespace().count() > 5 && !COLUMN_GAP.is_match(line))
}

/// Collapse inner whitespace, keeping up to four columns of indentation.
fn normalize_text_line(line: &str) -> String {
    let indent: String = line
        .chars()
        .take(4)
        .take_while(|c| c.is_whitespace())
        .collect();
    let content = line.split_whitespace().collect::<Vec<_>>().join(" ");
    if content.is_empty() {
        String::new()
    } else {
        indent + &content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Net sales      $ 1,200      $ 1,100", true)]
    #[case("Revenue\t394,328\t365,817", true)]
    #[case("| a | b |", true)]
    #[case("Gross margin increased 2.1% compared to prior year", true)]
    #[case("We sell products worldwide", false)]
    fn test_is_table_line(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_table_line(line), expected);
    }

    #[rstest]
    #[case("-----", true)]
    #[case(" === === ", true)]
    #[case("--", false)]
    #[case("- a -", false)]
    fn test_is_separator(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_separator(line), expected);
    }

    #[test]
    fn test_normalize_text_line() {
        assert_eq!(normalize_text_line("      Sales   grew  fast."), "    Sales grew fast.");
        assert_eq!(normalize_text_line("Plain"), "Plain");
        assert_eq!(normalize_text_line("   "), "");
    }

    #[test]
    fn test_process_lines_wraps_tables() {
        let lines = [
            "Results of operations were strong this year.",
            "                      2023          2022",
            "                      ----          ----",
            "Net sales          $ 1,200       $ 1,100",
            "Cost of sales          700           650",
            "Total                $ 500         $ 450",
            "",
            "Revenue growth was driven by higher volumes in every segment.",
        ];

        let (text, tables) = process_lines(&lines);
        assert_eq!(tables, 1);

        let begin = text.find(TABLE_BEGIN).unwrap();
        let end = text.find(TABLE_END).unwrap();
        let table = &text[begin..end];
        assert!(table.contains("Net sales          $ 1,200       $ 1,100"));
        assert!(table.contains("Total                $ 500         $ 450"));
        assert!(text.starts_with("Results of operations were strong this year.\n\n"));
        assert!(text.ends_with("Revenue growth was driven by higher volumes in every segment."));
    }

    #[test]
    fn test_process_lines_without_tables() {
        let lines = ["Our  business  is  described below.", "", "More  prose here."];
        let (text, tables) = process_lines(&lines);
        assert_eq!(tables, 0);
        assert_eq!(text, "Our business is described below.\n\nMore prose here.");
    }
}
