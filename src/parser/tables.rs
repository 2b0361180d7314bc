use regex::Regex;
use std::sync::LazyLock;

use crate::parser::lines;
use crate::parser::Parser;
use crate::sanitize::sanitize_table_html;
use crate::store::normalize_table_id;
use crate::types::{Block, NoteItem, NotesToTable, TableBlock, TableRendering};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lines searched for a "Forming Part of" line after a table heading.
const FORMING_PART_LOOKAHEAD: usize = 4;
/// Lines searched for an inline `<table>` after a table heading.
const INLINE_TABLE_LOOKAHEAD: usize = 3;

impl Parser<'_> {
    /// Table heading with caption, forming-part line, body and trailing notes.
    /// A table already rendered in this parse is consumed without a block.
    pub(super) fn parse_table(&mut self, out: &mut Vec<Block>) -> bool {
        let Some(line) = self.current_line() else {
            return false;
        };
        let Some(heading) = lines::parse_table_heading(&line) else {
            return false;
        };
        self.cursor += 1;

        let table_id = normalize_table_id(&heading.id);
        let (mut caption, mut forming_part) = lines::split_caption(&heading.rest);

        if caption.is_none() {
            if let Some(next) = self.current_line() {
                if !stops_caption_search(&next) {
                    caption = Some(lines::strip_emphasis(&next)).filter(|text| !text.is_empty());
                    self.cursor += 1;
                }
            }
        }

        if forming_part.is_none() {
            forming_part = self.take_forming_part();
        }

        let first_rendering = self.rendered_tables.insert(table_id.clone());

        let mut detached = Vec::new();
        let inline_html = match self.find_inline_table() {
            Some(start) => {
                let pending = self.lines[self.cursor..start].to_vec();
                let html = self.take_html_table(start);
                if html.is_some() {
                    detached = pending;
                }
                html
            }
            None => None,
        };

        let notes = match self.current_line().and_then(|next| {
            lines::parse_notes_heading(&next).map(|table_ref| (next, table_ref))
        }) {
            Some((heading_line, table_ref)) => {
                self.cursor += 1;
                Some(self.parse_notes(heading_line, table_ref))
            }
            None => None,
        };

        if !first_rendering {
            tracing::debug!("[Parser] {} already rendered, skipping repeat", table_id);
            self.push_paragraphs(&detached, out);
            return true;
        }

        let rendering = match inline_html {
            Some(html) => TableRendering::Inline {
                html: sanitize_table_html(&html),
            },
            None => match self.context.tables.resolve(&table_id) {
                Some(entry) => TableRendering::Registry {
                    title: entry.title,
                    html: sanitize_table_html(&entry.html),
                },
                None => {
                    tracing::warn!("[Parser] {} not found inline or in the registry", table_id);
                    TableRendering::NotFound
                }
            },
        };

        out.push(Block::Table(TableBlock {
            forming_part: forming_part.map(|text| self.annotate(&text)),
            table_id,
            caption,
            rendering,
            notes,
        }));
        self.push_paragraphs(&detached, out);
        true
    }

    /// Remove and return the first "Forming Part of" line within the lookahead.
    fn take_forming_part(&mut self) -> Option<String> {
        let limit = (self.cursor + FORMING_PART_LOOKAHEAD).min(self.lines.len());
        for index in self.cursor..limit {
            let line = &self.lines[index];
            if lines::is_forming_part(line) {
                let line = self.lines.remove(index);
                return Some(lines::strip_emphasis(&line));
            }
            if stops_lookahead(line) {
                break;
            }
        }
        None
    }

    fn find_inline_table(&self) -> Option<usize> {
        let limit = (self.cursor + INLINE_TABLE_LOOKAHEAD).min(self.lines.len());
        for index in self.cursor..limit {
            let line = &self.lines[index];
            if lines::is_table_html_start(line) {
                return Some(index);
            }
            if stops_lookahead(line) || lines::parse_notes_heading(line).is_some() {
                break;
            }
        }
        None
    }

    /// Index of the line closing the `<table>` opened at `start`. `None` when a
    /// structural line or the end of input comes first.
    fn html_table_end(&self, start: usize) -> Option<usize> {
        for (index, line) in self.lines.iter().enumerate().skip(start) {
            if index > start && interrupts_html_table(line) {
                return None;
            }
            if lines::closes_table_html(line) {
                return Some(index);
            }
        }
        None
    }

    /// Markup from `start` through its closing line, moving the cursor past it.
    /// Nothing is consumed when the table never closes.
    fn take_html_table(&mut self, start: usize) -> Option<String> {
        let end = self.html_table_end(start)?;
        let html = self.lines[start..=end].join("\n");
        self.cursor = end + 1;
        Some(html)
    }

    /// Items of a "Notes to Table" block; the cursor sits just past its heading.
    pub(super) fn parse_notes(&mut self, heading: String, table_ref: Option<String>) -> NotesToTable {
        let mut items = Vec::new();
        let mut current: Option<String> = None;

        while let Some(line) = self.current_line() {
            if self.ends_notes(&line) {
                break;
            }
            if lines::is_table_html_start(&line) {
                if let Some(html) = self.take_html_table(self.cursor) {
                    if let Some(text) = current.take() {
                        items.push(NoteItem::Text {
                            text: self.annotate(&text),
                        });
                    }
                    items.push(NoteItem::Table {
                        html: sanitize_table_html(&html),
                    });
                    continue;
                }
            }
            match lines::strip_bullet(&line) {
                Some(item) => {
                    if let Some(text) = current.replace(item.to_string()) {
                        items.push(NoteItem::Text {
                            text: self.annotate(&text),
                        });
                    }
                }
                None => match current.as_mut() {
                    Some(text) => {
                        text.push(' ');
                        text.push_str(&line);
                    }
                    None => current = Some(line),
                },
            }
            self.cursor += 1;
        }

        if let Some(text) = current {
            items.push(NoteItem::Text {
                text: self.annotate(&text),
            });
        }

        NotesToTable {
            table_ref: table_ref.map(|id| normalize_table_id(&id)),
            heading: lines::strip_emphasis(heading.trim_start_matches('#')),
            items,
        }
    }

    fn ends_notes(&self, line: &str) -> bool {
        lines::parse_table_heading(line).is_some()
            || lines::parse_marker(line).is_some()
            || lines::parse_notes_heading(line).is_some()
            || lines::parse_article_header(line).is_some()
            || lines::parse_subsection_header(line).is_some()
            || lines::is_html_heading(line)
            || line.starts_with('#')
            || lines::CLAUSE_RE.is_match(line)
    }

    /// Raw `<table>` markup and `<h4>`/`<h5>` headings outside any table heading.
    pub(super) fn parse_embedded_html(&mut self, out: &mut Vec<Block>) -> bool {
        let Some(line) = self.current_line() else {
            return false;
        };

        if lines::is_table_html_start(&line) {
            let Some(html) = self.take_html_table(self.cursor) else {
                return false;
            };
            out.push(Block::Html {
                html: sanitize_table_html(&html),
            });
            return true;
        }

        if lines::is_html_heading(&line) {
            self.cursor += 1;
            let heading = html_inner_text(&line);
            match lines::parse_notes_heading(&heading) {
                Some(table_ref) => {
                    let notes = self.parse_notes(heading, table_ref);
                    out.push(Block::NotesToTable(notes));
                }
                None => out.push(Block::Html {
                    html: sanitize_table_html(&line),
                }),
            }
            return true;
        }

        false
    }
}

/// Lines that can never be a table caption.
fn stops_caption_search(line: &str) -> bool {
    lines::is_forming_part(line)
        || lines::parse_table_heading(line).is_some()
        || lines::is_numbered_line(line)
        || lines::is_table_html_start(line)
        || lines::parse_marker(line).is_some()
        || lines::parse_notes_heading(line).is_some()
        || lines::is_item_start(line)
}

/// Lines that end an unclosed `<table>`: the markup was cut off in extraction.
fn interrupts_html_table(line: &str) -> bool {
    lines::parse_marker(line).is_some()
        || lines::parse_table_heading(line).is_some()
        || lines::parse_article_header(line).is_some()
        || lines::parse_subsection_header(line).is_some()
        || lines::CLAUSE_RE.is_match(line)
}

fn stops_lookahead(line: &str) -> bool {
    lines::parse_table_heading(line).is_some()
        || lines::parse_marker(line).is_some()
        || lines::is_numbered_line(line)
        || lines::is_item_start(line)
}

/// Whitespace-normalized text of the first `<h4>`/`<h5>` in a fragment.
fn html_inner_text(fragment: &str) -> String {
    let Ok(dom) = tl::parse(fragment, tl::ParserOptions::default()) else {
        return String::new();
    };
    let parser = dom.parser();
    let text = dom
        .nodes()
        .iter()
        .find_map(|node| {
            let tag = node.as_tag()?;
            let name = tag.name().as_utf8_str();
            matches!(&*name, "h4" | "h5" | "H4" | "H5")
                .then(|| tag.inner_text(parser).to_string())
        })
        .unwrap_or_default();
    WHITESPACE_RE.replace_all(text.trim(), " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_text_is_extracted_from_markup() {
        assert_eq!(
            html_inner_text("<h4>Notes to Table   9.10.14.1.-A:</h4>"),
            "Notes to Table 9.10.14.1.-A:"
        );
    }
}
