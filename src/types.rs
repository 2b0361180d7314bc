use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SUB_ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+[A-Z]\.\d+$").unwrap());
static ARTICLE_0A_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+\.0A$").unwrap());
static ARTICLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+[A-Z]$").unwrap());
static ALT_SUBSECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+[A-Z]$").unwrap());
static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+$").unwrap());
static SUBSECTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+$").unwrap());
static PART_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// First part number that ships in the marker dialect.
pub const FIRST_MARKER_PART: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Part,
    Section,
    Subsection,
    AltSubsection,
    Article,
    ArticleSuffix,
    #[serde(rename = "article_0a")]
    Article0A,
    SubArticle,
    Unknown,
}

impl NodeKind {
    /// Classify a dotted id. The lettered variants are checked before the plain ones.
    pub fn from_id(id: &str) -> Self {
        if SUB_ARTICLE_RE.is_match(id) {
            return Self::SubArticle;
        }
        if ARTICLE_0A_RE.is_match(id) {
            return Self::Article0A;
        }
        if ARTICLE_SUFFIX_RE.is_match(id) {
            return Self::ArticleSuffix;
        }
        if ALT_SUBSECTION_RE.is_match(id) {
            return Self::AltSubsection;
        }
        if ARTICLE_RE.is_match(id) {
            return Self::Article;
        }
        if SUBSECTION_RE.is_match(id) {
            return Self::Subsection;
        }
        if SECTION_RE.is_match(id) {
            return Self::Section;
        }
        if PART_RE.is_match(id) {
            return Self::Part;
        }
        Self::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Part => "part",
            Self::Section => "section",
            Self::Subsection => "subsection",
            Self::AltSubsection => "alt_subsection",
            Self::Article => "article",
            Self::ArticleSuffix => "article_suffix",
            Self::Article0A => "article_0a",
            Self::SubArticle => "sub_article",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_subsection(self) -> bool {
        matches!(self, Self::Subsection | Self::AltSubsection)
    }

    pub fn is_article(self) -> bool {
        matches!(
            self,
            Self::Article | Self::ArticleSuffix | Self::Article0A | Self::SubArticle
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub parent_id: Option<String>,
    pub title: String,
    pub content: Option<String>,
    pub page: u32,
    pub seq: u32,
}

pub fn part_number(id: &str) -> &str {
    id.split('.').next().unwrap_or(id)
}

/// Ancestor ids from the part down to the direct parent, derived by truncation.
pub fn ancestor_ids(id: &str) -> Vec<String> {
    let components: Vec<&str> = id.split('.').collect();
    (1..components.len())
        .map(|len| components[..len].join("."))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Legacy,
    Marker,
}

impl Dialect {
    pub fn for_part(part: &str) -> Self {
        match part.parse::<u32>() {
            Ok(value) if value >= FIRST_MARKER_PART => Self::Marker,
            _ => Self::Legacy,
        }
    }

    pub fn detect(content: &str) -> Self {
        let has_marker = content.lines().any(|line| {
            let line = line.trim();
            line.starts_with("[SECTION:")
                || line.starts_with("[SUBSECTION:")
                || line.starts_with("[ARTICLE:")
        });
        if has_marker {
            Self::Marker
        } else {
            Self::Legacy
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledContent {
    pub dialect: Dialect,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Table,
    Article,
    Sentence,
    Subsection,
    Section,
    Clause,
    Part,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMatch {
    pub kind: ReferenceKind,
    pub raw_text: String,
    pub target_id: Option<String>,
    pub start: usize,
    pub end: usize,
}

/// An annotated inline run. Every variant keeps the source text it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text {
        text: String,
    },
    TableRef {
        text: String,
        table_id: String,
        href: String,
    },
    NodeLink {
        text: String,
        kind: ReferenceKind,
        target_id: String,
        href: String,
    },
    Term {
        text: String,
        term: String,
        definition: String,
    },
    NoteRef {
        text: String,
    },
    Highlight {
        text: String,
    },
    Math {
        source: String,
        latex: String,
        display: bool,
        html: String,
    },
}

impl Segment {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            text: value.into(),
        }
    }

    pub fn literal(&self) -> &str {
        match self {
            Self::Text { text }
            | Self::TableRef { text, .. }
            | Self::NodeLink { text, .. }
            | Self::Term { text, .. }
            | Self::NoteRef { text }
            | Self::Highlight { text } => text,
            Self::Math { source, .. } => source,
        }
    }

    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

pub fn segments_literal(segments: &[Segment]) -> String {
    segments.iter().map(Segment::literal).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    SectionHeader {
        id: String,
        title: String,
    },
    SubsectionHeader {
        id: String,
        title: String,
    },
    Article {
        id: String,
        title: String,
        children: Vec<Block>,
    },
    Clause {
        number: String,
        text: Vec<Segment>,
    },
    SubClause {
        letter: String,
        text: Vec<Segment>,
    },
    RomanItem {
        numeral: String,
        text: Vec<Segment>,
    },
    Equation {
        source: String,
        math: Segment,
    },
    Table(TableBlock),
    Where(WhereBlock),
    NotesToTable(NotesToTable),
    Caption {
        text: Vec<Segment>,
    },
    Html {
        html: String,
    },
    Paragraph {
        text: Vec<Segment>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub table_id: String,
    pub caption: Option<String>,
    pub forming_part: Option<Vec<Segment>>,
    pub rendering: TableRendering,
    pub notes: Option<NotesToTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TableRendering {
    Inline { html: String },
    Registry { title: String, html: String },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereBlock {
    pub entries: Vec<WhereEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WhereEntry {
    Variable {
        name: String,
        definition: Vec<Segment>,
    },
    Text {
        text: Vec<Segment>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesToTable {
    pub table_ref: Option<String>,
    pub heading: String,
    pub items: Vec<NoteItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteItem {
    Text { text: Vec<Segment> },
    Table { html: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub title: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub rows: u32,
    #[serde(default)]
    pub cols: u32,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub term: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub id: String,
    pub title: String,
    pub section: String,
    pub section_id: String,
    pub content: String,
    pub page: u32,
    pub path: String,
}
