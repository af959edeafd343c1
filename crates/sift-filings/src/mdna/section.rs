//! Locating the MD&A section.
//!
//! Annual reports carry MD&A under Item 7, quarterly reports under Part I
//! Item 2. A heading usually appears twice: once in the table of contents
//! and once in the body. Every heading occurrence is paired with the next
//! closing heading and the longest span wins, which skips the table of
//! contents entry.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Spans shorter than this are treated as table-of-contents entries.
const MIN_SECTION_CHARS: usize = 200;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid section pattern")
}

static ANNUAL_START: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?im)^\s*item\s*7\s*[.:\-–—]?\s*management.{0,3}s?\s+discussion")
});
static ANNUAL_END: LazyLock<Regex> = LazyLock::new(|| re(r"(?im)^\s*item\s*(?:7a|8)\b"));
static QUARTERLY_START: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?im)^\s*item\s*2\s*[.:\-–—]?\s*management.{0,3}s?\s+discussion")
});
static QUARTERLY_END: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?im)^\s*(?:item\s*[34]\b|part\s+ii\b)"));

/// Byte range of the MD&A section in `text`, if one can be found.
pub(crate) fn find_mdna(text: &str, form_type: &str) -> Option<Range<usize>> {
    let (start_re, end_re) = if form_type.trim().to_uppercase().starts_with("10-Q") {
        (&*QUARTERLY_START, &*QUARTERLY_END)
    } else {
        (&*ANNUAL_START, &*ANNUAL_END)
    };

    start_re
        .find_iter(text)
        .map(|heading| {
            let end = end_re
                .find_at(text, heading.end())
                .map_or(text.len(), |m| m.start());
            heading.start()..end
        })
        .filter(|span| span.len() >= MIN_SECTION_CHARS)
        .max_by_key(|span| (span.len(), span.start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(words: usize) -> String {
        "Revenue increased due to strong demand. ".repeat(words)
    }

    #[test]
    fn test_skips_table_of_contents() {
        let text = format!(
            "TABLE OF CONTENTS\n\
             Item 7. Management's Discussion and Analysis\n\
             Item 7A. Quantitative and Qualitative Disclosures\n\
             PART II\n\
             Item 7. Management's Discussion and Analysis of Financial Condition\n\
             {}\n\
             Item 7A. Quantitative and Qualitative Disclosures About Market Risk\n",
            body(20)
        );

        let span = find_mdna(&text, "10-K").unwrap();
        let section = &text[span];
        assert!(section.starts_with("Item 7. Management's Discussion and Analysis of Financial"));
        assert!(section.contains("strong demand"));
        assert!(!section.contains("Item 7A"));
    }

    #[test]
    fn test_quarterly_section() {
        let text = format!(
            "PART I\nItem 1. Financial Statements\n\
             ITEM 2. MANAGEMENT\u{2019}S DISCUSSION AND ANALYSIS\n{}\n\
             Item 3. Quantitative and Qualitative Disclosures\n",
            body(10)
        );

        let span = find_mdna(&text, "10-Q").unwrap();
        assert!(text[span].contains("strong demand"));
    }

    #[test]
    fn test_runs_to_end_without_closing_heading() {
        let text = format!("Item 7 - Management's Discussion\n{}", body(10));
        let span = find_mdna(&text, "10-K/A").unwrap();
        assert_eq!(span.end, text.len());
    }

    #[test]
    fn test_missing_section() {
        assert!(find_mdna(&body(50), "10-K").is_none());
        let short = "Item 7. Management's Discussion\nItem 8. Financial Statements\n";
        assert!(find_mdna(short, "10-K").is_none());
    }
}
