//! Line-level recognizers shared by the block parser.

use regex::Regex;
use std::sync::LazyLock;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(SECTION|SUBSECTION|ARTICLE):([^:\]]+):(.*)\]$").unwrap());
static TABLE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:#{2,4}\s*)?(?:\*\*)?Table\s+(\d+(?:\.\d+){2,}[A-Z]?\.?(?:-[A-Z](?:/[A-Z])?)?(?:\(\d+\))*)\.?(?:\*\*)?(\s*\(Cont['’]d\))?(?:\*\*)?\s*(.*)$",
    )
    .unwrap()
});
static FORMING_PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[*_]*\(?\s*Forming\s+Part\s+of\b").unwrap());
static FORMING_PART_INLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[*_]*\(?\s*Forming\s+Part\s+of\b").unwrap());
static NOTES_TO_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:#{1,6}\s*)?[*_]*Notes\s+to\s+Table(?:\s+(\d+(?:\.\d+)+\.?(?:-[A-Z](?:/[A-Z])?)?(?:\(\d+\))*))?",
    )
    .unwrap()
});
static ARTICLE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+\.\d+[A-Z]?\.\d+[A-Z]?)\.\s*(.*)$").unwrap());
static SUBSECTION_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+\.\d+[A-Z]?)\.\s*(.*)$").unwrap());
static NUMBERED_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+").unwrap());
static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());

pub(crate) static CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((\d+(?:\.\d+)?)\)\s*(.*)$").unwrap());
pub(crate) static SUBCLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([a-z])\)\s*(.*)$").unwrap());
pub(crate) static ROMAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((i{1,3}|iv|vi?)\)\s*(.*)$").unwrap());
static ITEM_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((?:\d+(?:\.\d+)?|[a-z]+)\)").unwrap());
static EQUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z]?\s*=\s*(.+)$").unwrap());
/// A minus counts only between operands, so hyphenated words are not formulas.
static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+*/×÷^]|\s[-−]\s|\d[-−]\d").unwrap());
static TRAILING_WHERE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwhere\s*:?$").unwrap());
pub(crate) static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][a-z0-9]*)\s*=\s*(.+)$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-–•]\s+(.+)$").unwrap());
static HTML_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<h[45][\s>]").unwrap());

const MAX_EQUATION_LEN: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Section,
    Subsection,
    Article,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub id: String,
    pub title: String,
}

pub fn parse_marker(line: &str) -> Option<Marker> {
    let caps = MARKER_RE.captures(line)?;
    let kind = match &caps[1] {
        "SECTION" => MarkerKind::Section,
        "SUBSECTION" => MarkerKind::Subsection,
        _ => MarkerKind::Article,
    };
    Some(Marker {
        kind,
        id: caps[2].trim().to_string(),
        title: caps[3].trim().to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeading {
    pub id: String,
    pub continued: bool,
    pub rest: String,
}

/// `Table N.N.N.N.[-X]` with optional hash-heading and bold wrappers. A heading
/// followed by lower-case prose or punctuation is a sentence, not a heading.
pub fn parse_table_heading(line: &str) -> Option<TableHeading> {
    let caps = TABLE_HEADING_RE.captures(line)?;
    let rest = caps.get(3).map_or("", |m| m.as_str()).trim();
    let opens_heading = rest
        .chars()
        .next()
        .map_or(true, |c| {
            c.is_uppercase() || c.is_numeric() || matches!(c, '*' | '_' | '(' | '#')
        });
    if !opens_heading {
        return None;
    }
    Some(TableHeading {
        id: caps[1].to_string(),
        continued: caps.get(2).is_some(),
        rest: rest.to_string(),
    })
}

pub fn is_forming_part(line: &str) -> bool {
    FORMING_PART_RE.is_match(line)
}

/// Split a heading remainder into caption and forming-part text.
pub fn split_caption(rest: &str) -> (Option<String>, Option<String>) {
    let (caption, forming) = match FORMING_PART_INLINE_RE.find(rest) {
        Some(found) => (&rest[..found.start()], Some(&rest[found.start()..])),
        None => (rest, None),
    };
    let caption = strip_emphasis(caption);
    (
        (!caption.is_empty()).then_some(caption),
        forming.map(strip_emphasis).filter(|text| !text.is_empty()),
    )
}

/// Drop surrounding Markdown emphasis markers.
pub fn strip_emphasis(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .to_string()
}

/// Table reference from a "Notes to Table" heading; outer `None` when the line is not one.
pub fn parse_notes_heading(line: &str) -> Option<Option<String>> {
    let caps = NOTES_TO_TABLE_RE.captures(line)?;
    Some(caps.get(1).map(|m| m.as_str().to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub id: String,
    pub title: String,
}

pub fn parse_article_header(line: &str) -> Option<Header> {
    let caps = ARTICLE_HEADER_RE.captures(line)?;
    let title = caps[2].trim();
    if title.starts_with('(') {
        return None;
    }
    Some(Header {
        id: caps[1].to_string(),
        title: title.to_string(),
    })
}

/// Bare `N.N.N.` heading. Lines with a parenthesis are sentence text.
pub fn parse_subsection_header(line: &str) -> Option<Header> {
    if line.contains('(') {
        return None;
    }
    let caps = SUBSECTION_HEADER_RE.captures(line)?;
    let title = caps[2].trim();
    if LEADING_NUMBER_RE.is_match(title) {
        return None;
    }
    Some(Header {
        id: caps[1].to_string(),
        title: title.to_string(),
    })
}

pub fn is_numbered_line(line: &str) -> bool {
    NUMBERED_LINE_RE.is_match(line)
}

pub fn is_item_start(line: &str) -> bool {
    ITEM_START_RE.is_match(line)
}

pub fn is_where(line: &str) -> bool {
    line.trim_end_matches(':').trim().eq_ignore_ascii_case("where")
}

/// Short `X = expr` line with an operator; lines ending in "where" introduce a where-block.
pub fn is_equation_line(line: &str) -> bool {
    if line.chars().count() >= MAX_EQUATION_LEN || TRAILING_WHERE_RE.is_match(line) {
        return false;
    }
    EQUATION_RE
        .captures(line)
        .is_some_and(|caps| OPERATOR_RE.is_match(&caps[1]))
}

pub fn is_table_html_start(line: &str) -> bool {
    line.get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("<table"))
}

pub fn closes_table_html(line: &str) -> bool {
    line.to_ascii_lowercase().contains("</table>")
}

pub fn is_html_heading(line: &str) -> bool {
    HTML_HEADING_RE.is_match(line)
}

pub fn strip_bullet(line: &str) -> Option<&str> {
    BULLET_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `N.` followed by a digit under the root part, e.g. `9.4` for root `9`.
pub fn starts_with_root_number(line: &str, root_part: &str) -> bool {
    line.strip_prefix(root_part)
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

/// Lines that always start a new block, whatever precedes them.
pub fn is_hard_break(line: &str) -> bool {
    let line = line.trim();
    line.is_empty()
        || is_numbered_line(line)
        || line.starts_with('[')
        || line.starts_with('<')
        || line.starts_with('#')
        || line.starts_with('*')
        || line.starts_with('_')
        || line.starts_with('(')
        || strip_bullet(line).is_some()
        || parse_table_heading(line).is_some()
        || is_forming_part(line)
        || parse_notes_heading(line).is_some()
        || is_where(line)
        || is_equation_line(line)
        || VARIABLE_RE.is_match(line)
}

fn ends_sentence(line: &str) -> bool {
    line.trim_end()
        .ends_with(['.', ':', ';', '!', '?'])
}

/// Whether `next` continues the sentence broken at the end of `prev`.
pub fn should_join(prev: &str, next: &str) -> bool {
    let prev = prev.trim();
    if prev.is_empty() || ends_sentence(prev) || is_hard_break(next) {
        return false;
    }
    if parse_marker(prev).is_some()
        || parse_table_heading(prev).is_some()
        || is_where(prev)
        || prev.starts_with('<')
        || prev.starts_with('#')
    {
        return false;
    }
    next.trim().chars().next().is_some_and(char::is_lowercase)
}

pub fn rejoin_soft_wraps(lines: Vec<String>) -> Vec<String> {
    let mut joined: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(previous) = joined.last_mut() {
            if should_join(previous, &line) {
                previous.push(' ');
                previous.push_str(line.trim());
                continue;
            }
        }
        joined.push(line);
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_heading_variants() {
        let plain = parse_table_heading("Table 9.10.14.1.-A").unwrap();
        assert_eq!(plain.id, "9.10.14.1.-A");
        assert!(plain.rest.is_empty());

        let hashed = parse_table_heading("### **Table 10.3.2.1.** Minimum Sizes").unwrap();
        assert_eq!(hashed.id, "10.3.2.1.");
        assert_eq!(hashed.rest, "Minimum Sizes");

        let continued = parse_table_heading("Table 9.23.4.2.-A (Cont'd)").unwrap();
        assert!(continued.continued);

        assert!(parse_table_heading("Table 9.10.14.1.-A lists the ratings").is_none());
        assert!(parse_table_heading("Table 9.10.14.1.-A, which applies").is_none());
    }

    #[test]
    fn article_header_rejects_sentence_numbers() {
        assert!(parse_article_header("9.10.14.1.(1) Every").is_none());
        let header = parse_article_header("9.5.3A.1. Scope").unwrap();
        assert_eq!(header.id, "9.5.3A.1");
    }

    #[test]
    fn subsection_header_rejects_parenthesis_and_articles() {
        assert!(parse_subsection_header("9.10.14. Fire (Separations)").is_none());
        assert!(parse_subsection_header("9.10.14.1. General").is_none());
        assert_eq!(
            parse_subsection_header("9.10.14. Fire Separations").unwrap().title,
            "Fire Separations"
        );
    }

    #[test]
    fn join_decision_table() {
        assert!(should_join("every fire separation shall be", "constructed of masonry"));
        assert!(!should_join("ends a sentence.", "next one"));
        assert!(!should_join("open clause", "(a) item"));
        assert!(!should_join("open clause", "Capitalised start"));
        assert!(!should_join("open clause", "9.10.14. Heading"));
        assert!(!should_join("[SECTION:10.1:General]", "text"));
        assert!(!should_join("open clause", "where"));
        assert!(!should_join("open clause", "- bullet"));
    }

    #[test]
    fn equation_line_needs_an_operator() {
        assert!(is_equation_line("R = 1/U"));
        assert!(is_equation_line("A = B × C"));
        assert!(!is_equation_line("W = dead load"));
        assert!(!is_equation_line("L = 2 x S where"));
        assert!(!is_equation_line("A = fire-resistance rating"));
        assert!(is_equation_line("A = B - C"));
        assert!(is_equation_line("T = 20-5"));
    }
}
