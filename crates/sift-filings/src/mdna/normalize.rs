//! Markup removal for SEC full-text filings.
//!
//! Two renderings are produced from the raw text. The parsing rendering is
//! flat prose suitable for pattern matching. The preservation rendering
//! keeps table rows on their own lines with tab-separated cells so tables
//! survive extraction.

use regex::{Captures, Regex};
use std::sync::LazyLock;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid markup pattern")
}

static SEC_HEADER: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<SEC-HEADER>.*?</SEC-HEADER>"));
static SEC_WRAPPER_TAGS: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)</?(?:SEC-DOCUMENT|DOCUMENT|TEXT)>[^\n]*"));
static DOCUMENT_TAGS: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)<(?:TYPE|SEQUENCE|FILENAME|DESCRIPTION)>[^<\n]*"));
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<br\s*/?\s*>"));
static PARAGRAPH_CLOSE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)</p>"));
static PARAGRAPH_OPEN: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<p[^>]*>"));
static ROW_CLOSE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)</tr>"));
static ROW_OPEN: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<tr[^>]*>"));
static CELL_CLOSE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)</t[dh]>"));
static CELL_OPEN: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<t[dh][^>]*>"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| re(r"<[^>]+>"));
static HTML_TABLE: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<table[^>]*>.*?</table>"));
static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<tr[^>]*>(.*?)</tr>"));
static TABLE_CELL: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<t[hd][^>]*>(.*?)</t[hd]>"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| re(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);?"));

/// Remove SEC envelope markup shared by both renderings.
fn strip_envelope(content: &str) -> String {
    let text = SEC_HEADER.replace_all(content, "");
    let text = SEC_WRAPPER_TAGS.replace_all(&text, "");
    DOCUMENT_TAGS.replace_all(&text, "").into_owned()
}

/// Rendering used for locating sections and counting words.
pub(crate) fn parsing_version(content: &str) -> String {
    let text = strip_envelope(content);
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = PARAGRAPH_CLOSE.replace_all(&text, "\n");
    let text = PARAGRAPH_OPEN.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    decode_entities(&text)
}

/// Rendering that keeps table layout intact.
pub(crate) fn preservation_version(content: &str) -> String {
    let text = strip_envelope(content);
    let text = convert_html_tables(&text);
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = ROW_CLOSE.replace_all(&text, "\n");
    let text = ROW_OPEN.replace_all(&text, "");
    let text = CELL_CLOSE.replace_all(&text, "\t");
    let text = CELL_OPEN.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, "");
    decode_entities(&text)
}

/// Flatten HTML tables into tab-separated rows.
fn convert_html_tables(content: &str) -> String {
    HTML_TABLE
        .replace_all(content, |table: &Captures<'_>| {
            let rows: Vec<String> = TABLE_ROW
                .captures_iter(&table[0])
                .filter_map(|row| {
                    let cells: Vec<String> = TABLE_CELL
                        .captures_iter(&row[1])
                        .map(|cell| ANY_TAG.replace_all(&cell[1], "").trim().to_string())
                        .collect();
                    (!cells.is_empty()).then(|| cells.join("\t"))
                })
                .collect();
            format!("\n{}\n", rows.join("\n"))
        })
        .into_owned()
}

/// Decode HTML character references. Non-breaking spaces become plain spaces.
pub(crate) fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let entity = &caps[1];
            let decoded = if let Some(num) = entity.strip_prefix('#') {
                let code = match num.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32)
                    .map(|c| if c == '\u{a0}' { ' ' } else { c })
            } else {
                named_entity(entity)
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name.to_ascii_lowercase().as_str() {
        "nbsp" | "ensp" | "emsp" | "thinsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "rsquo" | "lsquo" => '\'',
        "rdquo" | "ldquo" => '"',
        "mdash" => '—',
        "ndash" => '–',
        "bull" => '•',
        "sect" => '§',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "cent" => '¢',
        "pound" => '£',
        "euro" => '€',
        "hellip" => '…',
        _ => return None,
    };
    Some(c)
}
