use crate::annotate::math::equation_segment;
use crate::parser::lines::{self, CLAUSE_RE, ROMAN_RE, SUBCLAUSE_RE, VARIABLE_RE};
use crate::parser::Parser;
use crate::types::{segments_literal, Block, WhereBlock, WhereEntry};

enum Lettered {
    SubClause,
    Roman,
}

impl Parser<'_> {
    /// Clause-level items shared by the top level and article bodies.
    pub(super) fn parse_body_item(&mut self, out: &mut Vec<Block>) -> bool {
        let Some(line) = self.current_line() else {
            return false;
        };

        if let Some(caps) = CLAUSE_RE.captures(&line) {
            let number = caps[1].to_string();
            let mut text = caps[2].to_string();
            self.cursor += 1;
            if text.trim_end().ends_with(',') {
                self.collect_definition_lines(&mut text);
            }
            out.push(Block::Clause {
                number,
                text: self.annotate(&text),
            });
            return true;
        }

        if let Some(block) = self.parse_lettered(&line, out) {
            self.cursor += 1;
            out.push(block);
            return true;
        }

        if let Some(table_ref) = lines::parse_notes_heading(&line) {
            self.cursor += 1;
            let notes = self.parse_notes(line, table_ref);
            out.push(Block::NotesToTable(notes));
            return true;
        }

        if lines::is_equation_line(&line) {
            self.cursor += 1;
            out.push(Block::Equation {
                math: equation_segment(&line),
                source: line,
            });
            return true;
        }

        if lines::is_where(&line) && self.parse_where(out) {
            return true;
        }

        if is_continuation(&line) {
            if let Some(last) = out.last_mut() {
                if let Block::SubClause { text, .. } | Block::RomanItem { text, .. } = last {
                    let joined = format!("{} {}", segments_literal(text), line);
                    *text = self.annotator.annotate(&joined);
                    self.cursor += 1;
                    return true;
                }
            }
        }

        false
    }

    /// Definition-style clause: a trailing comma pulls in lines up to the next item.
    fn collect_definition_lines(&mut self, text: &mut String) {
        while let Some(next) = self.current_line() {
            if lines::is_item_start(&next)
                || lines::parse_marker(&next).is_some()
                || lines::parse_table_heading(&next).is_some()
                || lines::parse_notes_heading(&next).is_some()
                || lines::is_table_html_start(&next)
                || (self.is_legacy()
                    && (lines::parse_article_header(&next).is_some()
                        || lines::parse_subsection_header(&next).is_some()))
            {
                break;
            }
            text.push(' ');
            text.push_str(&next);
            self.cursor += 1;
        }
    }

    fn parse_lettered(&self, line: &str, out: &[Block]) -> Option<Block> {
        if let Some(caps) = ROMAN_RE.captures(line) {
            let numeral = &caps[1];
            let kind = match numeral {
                "i" | "v" => classify_ambiguous(numeral, out),
                _ => Lettered::Roman,
            };
            let text = self.annotate(&caps[2]);
            return Some(match kind {
                Lettered::Roman => Block::RomanItem {
                    numeral: numeral.to_string(),
                    text,
                },
                Lettered::SubClause => Block::SubClause {
                    letter: numeral.to_string(),
                    text,
                },
            });
        }

        let caps = SUBCLAUSE_RE.captures(line)?;
        Some(Block::SubClause {
            letter: caps[1].to_string(),
            text: self.annotate(&caps[2]),
        })
    }

    /// Variable definitions after a "where" line. Returns false, consuming
    /// nothing, when no definition follows.
    fn parse_where(&mut self, out: &mut Vec<Block>) -> bool {
        let mut index = self.cursor + 1;
        let mut entries = Vec::new();
        let mut has_variable = false;

        while let Some(line) = self.lines.get(index) {
            if self.ends_where_block(line) {
                break;
            }
            match VARIABLE_RE.captures(line) {
                Some(caps) => {
                    has_variable = true;
                    entries.push(WhereEntry::Variable {
                        name: caps[1].to_string(),
                        definition: self.annotate(caps[2].trim()),
                    });
                }
                None => entries.push(WhereEntry::Text {
                    text: self.annotate(line),
                }),
            }
            index += 1;
        }

        if !has_variable {
            return false;
        }
        self.cursor = index;
        out.push(Block::Where(WhereBlock { entries }));
        true
    }

    fn ends_where_block(&self, line: &str) -> bool {
        lines::is_item_start(line)
            || lines::starts_with_root_number(line, self.context.root_part())
            || lines::parse_marker(line).is_some()
            || lines::parse_table_heading(line).is_some()
            || lines::parse_notes_heading(line).is_some()
            || lines::is_table_html_start(line)
            || lines::is_where(line)
            || lines::parse_article_header(line).is_some()
            || lines::parse_subsection_header(line).is_some()
    }
}

/// `(i)` and `(v)` are both letters and numerals. The most recent items of the
/// current clause decide.
fn classify_ambiguous(label: &str, out: &[Block]) -> Lettered {
    let predecessor = if label == "i" { "h" } else { "u" };
    let mut seen_subclause = false;
    for (position, block) in out.iter().rev().enumerate() {
        match block {
            Block::RomanItem { .. } if position == 0 => return Lettered::Roman,
            Block::SubClause { letter, .. } => {
                if !seen_subclause && letter == predecessor {
                    return Lettered::SubClause;
                }
                seen_subclause = true;
            }
            Block::RomanItem { .. } => {}
            _ => break,
        }
    }
    if seen_subclause {
        Lettered::Roman
    } else {
        Lettered::SubClause
    }
}

fn is_continuation(line: &str) -> bool {
    line.chars().next().is_some_and(char::is_lowercase) || line.starts_with("(See Note")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Segment;

    fn subclause(letter: &str) -> Block {
        Block::SubClause {
            letter: letter.to_string(),
            text: vec![Segment::text("x")],
        }
    }

    fn roman(numeral: &str) -> Block {
        Block::RomanItem {
            numeral: numeral.to_string(),
            text: vec![Segment::text("x")],
        }
    }

    #[test]
    fn letter_i_after_h_is_a_subclause() {
        let out = vec![subclause("g"), subclause("h")];
        assert!(matches!(classify_ambiguous("i", &out), Lettered::SubClause));
    }

    #[test]
    fn letter_i_under_a_subclause_is_roman() {
        let out = vec![subclause("a")];
        assert!(matches!(classify_ambiguous("i", &out), Lettered::Roman));
    }

    #[test]
    fn v_after_iv_is_roman() {
        let out = vec![subclause("b"), roman("iii"), roman("iv")];
        assert!(matches!(classify_ambiguous("v", &out), Lettered::Roman));
    }

    #[test]
    fn i_with_no_context_is_a_subclause() {
        assert!(matches!(classify_ambiguous("i", &[]), Lettered::SubClause));
    }
}
