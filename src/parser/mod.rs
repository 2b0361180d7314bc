//! Single forward pass from extracted code text to a typed block tree.

mod body;
pub mod lines;
mod tables;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::annotate::references::ReferenceRecognizer;
use crate::annotate::terms::Glossary;
use crate::annotate::Annotator;
use crate::store::TableResolver;
use crate::types::{segments_literal, Block, Dialect, NoteItem, Segment, WhereEntry};
use lines::{MarkerKind, parse_article_header, parse_marker, parse_subsection_header};

/// A formula placed on its own line right after the first occurrence of `anchor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationInsert {
    pub anchor: String,
    pub formula: String,
}

#[derive(Debug, Clone)]
pub struct ParseOptions<'a> {
    pub dialect: Dialect,
    /// Id of the node being rendered; its own bare heading is skipped.
    pub current_id: Option<&'a str>,
    pub equation_inserts: &'a [EquationInsert],
    pub highlight: Option<&'a str>,
    pub rejoin_soft_wraps: bool,
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        Self {
            dialect: Dialect::Legacy,
            current_id: None,
            equation_inserts: &[],
            highlight: None,
            rejoin_soft_wraps: false,
        }
    }
}

/// Read-only collaborators shared by every parse.
pub struct RenderContext<'a> {
    pub tables: &'a dyn TableResolver,
    pub glossary: &'a Glossary,
    pub references: &'a ReferenceRecognizer,
}

impl RenderContext<'_> {
    pub fn root_part(&self) -> &str {
        self.references.root_part()
    }
}

pub fn parse_content(
    content: &str,
    options: &ParseOptions<'_>,
    context: &RenderContext<'_>,
) -> Vec<Block> {
    let prepared = apply_equation_inserts(content, options.equation_inserts);
    let mut source_lines: Vec<String> = prepared
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if options.rejoin_soft_wraps {
        source_lines = lines::rejoin_soft_wraps(source_lines);
    }

    let line_count = source_lines.len();
    let mut parser = Parser::new(source_lines, options, context);
    let blocks = parser.parse_top_level();
    tracing::debug!(
        "[Parser] {} lines -> {} blocks, {} tables rendered",
        line_count,
        blocks.len(),
        parser.rendered_tables.len()
    );
    blocks
}

fn apply_equation_inserts(content: &str, inserts: &[EquationInsert]) -> String {
    let mut output = content.to_string();
    for insert in inserts {
        if insert.anchor.is_empty() {
            continue;
        }
        if let Some(position) = output.find(&insert.anchor) {
            let end = position + insert.anchor.len();
            output.insert_str(end, &format!("\n{}\n", insert.formula));
        }
    }
    output
}

pub(crate) struct Parser<'a> {
    lines: Vec<String>,
    cursor: usize,
    rendered_tables: HashSet<String>,
    options: &'a ParseOptions<'a>,
    context: &'a RenderContext<'a>,
    annotator: Annotator<'a>,
}

impl<'a> Parser<'a> {
    fn new(
        lines: Vec<String>,
        options: &'a ParseOptions<'a>,
        context: &'a RenderContext<'a>,
    ) -> Self {
        Self {
            lines,
            cursor: 0,
            rendered_tables: HashSet::new(),
            options,
            context,
            annotator: Annotator::new(context.references, context.glossary, options.highlight),
        }
    }

    fn annotate(&self, text: &str) -> Vec<Segment> {
        self.annotator.annotate(text)
    }

    fn is_legacy(&self) -> bool {
        self.options.dialect == Dialect::Legacy
    }

    fn current_line(&self) -> Option<String> {
        self.lines.get(self.cursor).cloned()
    }

    fn parse_top_level(&mut self) -> Vec<Block> {
        let mut blocks = Vec::new();
        while let Some(line) = self.current_line() {
            if let Some(marker) = parse_marker(&line) {
                self.cursor += 1;
                let block = match marker.kind {
                    MarkerKind::Section => Block::SectionHeader {
                        id: marker.id,
                        title: marker.title,
                    },
                    MarkerKind::Subsection => Block::SubsectionHeader {
                        id: marker.id,
                        title: marker.title,
                    },
                    MarkerKind::Article => self.parse_article(marker.id, marker.title),
                };
                blocks.push(block);
                continue;
            }

            if self.parse_table(&mut blocks) {
                continue;
            }

            if lines::is_forming_part(&line) {
                blocks.push(Block::Caption {
                    text: self.annotate(&lines::strip_emphasis(&line)),
                });
                self.cursor += 1;
                continue;
            }

            if self.is_legacy() {
                if let Some(header) = parse_subsection_header(&line) {
                    if self.options.current_id == Some(header.id.as_str()) {
                        self.cursor += 1;
                        continue;
                    }
                }
                if let Some(header) = parse_article_header(&line) {
                    self.cursor += 1;
                    let article = self.parse_article(header.id, header.title);
                    blocks.push(article);
                    continue;
                }
                if let Some(header) = parse_subsection_header(&line) {
                    self.cursor += 1;
                    blocks.push(Block::SubsectionHeader {
                        id: header.id,
                        title: header.title,
                    });
                    continue;
                }
            }

            if self.parse_body_item(&mut blocks) || self.parse_embedded_html(&mut blocks) {
                continue;
            }

            blocks.push(Block::Paragraph {
                text: self.annotate(&line),
            });
            self.cursor += 1;
        }
        blocks
    }

    /// Article body runs until the next article, bare subsection or marker.
    fn parse_article(&mut self, id: String, title: String) -> Block {
        let mut children = Vec::new();
        while let Some(line) = self.current_line() {
            if self.ends_article(&line) {
                break;
            }
            if self.parse_table(&mut children) {
                continue;
            }
            if lines::is_forming_part(&line) {
                children.push(Block::Caption {
                    text: self.annotate(&lines::strip_emphasis(&line)),
                });
                self.cursor += 1;
                continue;
            }
            if self.parse_body_item(&mut children) || self.parse_embedded_html(&mut children) {
                continue;
            }
            children.push(Block::Paragraph {
                text: self.annotate(&line),
            });
            self.cursor += 1;
        }
        Block::Article {
            id,
            title,
            children,
        }
    }

    fn ends_article(&self, line: &str) -> bool {
        if parse_marker(line).is_some() {
            return true;
        }
        self.is_legacy()
            && (parse_article_header(line).is_some() || parse_subsection_header(line).is_some())
    }

    fn push_paragraphs(&self, lines: &[String], out: &mut Vec<Block>) {
        for line in lines {
            out.push(Block::Paragraph {
                text: self.annotate(line),
            });
        }
    }
}

/// Source-order literal lines of a block tree, without the markup added by
/// annotation. Rendered HTML is left out.
pub fn literal_lines(blocks: &[Block]) -> Vec<String> {
    let mut output = Vec::new();
    for block in blocks {
        push_literal(block, &mut output);
    }
    output
}

fn push_literal(block: &Block, output: &mut Vec<String>) {
    match block {
        Block::SectionHeader { id, title } | Block::SubsectionHeader { id, title } => {
            output.push(format!("{id}. {title}").trim_end().to_string());
        }
        Block::Article {
            id,
            title,
            children,
        } => {
            output.push(format!("{id}. {title}").trim_end().to_string());
            for child in children {
                push_literal(child, output);
            }
        }
        Block::Clause { number, text } => output.push(format!("({number}) {}", segments_literal(text))),
        Block::SubClause { letter, text } => {
            output.push(format!("({letter}) {}", segments_literal(text)))
        }
        Block::RomanItem { numeral, text } => {
            output.push(format!("({numeral}) {}", segments_literal(text)))
        }
        Block::Equation { source, .. } => output.push(source.clone()),
        Block::Where(where_block) => {
            output.push("where".to_string());
            for entry in &where_block.entries {
                match entry {
                    WhereEntry::Variable { name, definition } => {
                        output.push(format!("{name} = {}", segments_literal(definition)))
                    }
                    WhereEntry::Text { text } => output.push(segments_literal(text)),
                }
            }
        }
        Block::Table(table) => {
            output.push(table.table_id.clone());
            if let Some(caption) = &table.caption {
                output.push(caption.clone());
            }
            if let Some(forming) = &table.forming_part {
                output.push(segments_literal(forming));
            }
            if let Some(notes) = &table.notes {
                push_notes_literal(notes, output);
            }
        }
        Block::NotesToTable(notes) => push_notes_literal(notes, output),
        Block::Caption { text } | Block::Paragraph { text } => output.push(segments_literal(text)),
        Block::Html { .. } => {}
    }
}

fn push_notes_literal(notes: &crate::types::NotesToTable, output: &mut Vec<String>) {
    output.push(notes.heading.clone());
    for item in &notes.items {
        if let NoteItem::Text { text } = item {
            output.push(segments_literal(text));
        }
    }
}
