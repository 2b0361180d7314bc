#![allow(dead_code)]
use codebook::annotate::references::ReferenceRecognizer;
use codebook::annotate::terms::Glossary;
use codebook::parser::{parse_content, ParseOptions, RenderContext};
use codebook::store::{load_parts_from_dir, JsonScanStore, MemoryStore, TableRegistry};
use codebook::types::{segments_literal, Block, Segment};
use std::fs;
use std::path::Path;

pub fn fixtures_dir() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures")
}

pub fn load_fixture(filename: &str) -> String {
    let path = Path::new(fixtures_dir()).join(filename);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

pub fn fixture_tables() -> TableRegistry {
    TableRegistry::load_from_file(Path::new(fixtures_dir()).join("tables.json"))
        .expect("fixture tables should load")
}

pub fn memory_store() -> MemoryStore {
    MemoryStore::load_from_dir(Path::new(fixtures_dir())).expect("fixture parts should load")
}

pub fn scan_store() -> JsonScanStore {
    let parts = load_parts_from_dir(Path::new(fixtures_dir())).expect("fixture parts should load");
    JsonScanStore::new(parts)
}

/// Owns the collaborators a parse borrows.
pub struct Harness {
    pub tables: TableRegistry,
    pub glossary: Glossary,
    pub references: ReferenceRecognizer,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            tables: TableRegistry::default(),
            glossary: Glossary::builtin(),
            references: ReferenceRecognizer::new("9"),
        }
    }

    pub fn with_tables() -> Self {
        Self {
            tables: fixture_tables(),
            ..Self::new()
        }
    }

    pub fn parse(&self, content: &str) -> Vec<Block> {
        self.parse_with(content, &ParseOptions::default())
    }

    pub fn parse_with(&self, content: &str, options: &ParseOptions<'_>) -> Vec<Block> {
        let context = RenderContext {
            tables: &self.tables,
            glossary: &self.glossary,
            references: &self.references,
        };
        parse_content(content, options, &context)
    }
}

pub fn plain(segments: &[Segment]) -> String {
    segments_literal(segments)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Short label per block, for order assertions.
pub fn block_kinds(blocks: &[Block]) -> Vec<String> {
    blocks
        .iter()
        .map(|block| match block {
            Block::SectionHeader { id, .. } => format!("section:{id}"),
            Block::SubsectionHeader { id, .. } => format!("subsection:{id}"),
            Block::Article { id, .. } => format!("article:{id}"),
            Block::Clause { number, .. } => format!("clause:{number}"),
            Block::SubClause { letter, .. } => format!("subclause:{letter}"),
            Block::RomanItem { numeral, .. } => format!("roman:{numeral}"),
            Block::Equation { .. } => "equation".to_string(),
            Block::Table(table) => format!("table:{}", table.table_id),
            Block::Where(_) => "where".to_string(),
            Block::NotesToTable(_) => "notes".to_string(),
            Block::Caption { .. } => "caption".to_string(),
            Block::Html { .. } => "html".to_string(),
            Block::Paragraph { .. } => "paragraph".to_string(),
        })
        .collect()
}

pub fn article_children(block: &Block) -> &[Block] {
    match block {
        Block::Article { children, .. } => children,
        other => panic!("expected an article, got {other:?}"),
    }
}
