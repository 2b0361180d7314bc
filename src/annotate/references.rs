use regex::Regex;

use crate::annotate::split_by_spans;
use crate::store::tables::normalize_table_id;
use crate::types::{ReferenceKind, ReferenceMatch, Segment};

struct ReferencePattern {
    kind: ReferenceKind,
    regex: Regex,
}

/// Cross-reference patterns compiled for one root part.
pub struct ReferenceRecognizer {
    root_part: String,
    patterns: Vec<ReferencePattern>,
}

impl ReferenceRecognizer {
    pub fn new(root_part: &str) -> Self {
        let root = regex::escape(root_part);
        let sources = [
            (
                ReferenceKind::Table,
                format!(r"Table\s+({root}\.\d+\.\d+\.\d+(?:\.-[A-Z])?\.?)"),
            ),
            (
                ReferenceKind::Article,
                r"Articles?\s+(\d+\.\d+\.\d+\.\d+\.?)".to_string(),
            ),
            (
                ReferenceKind::Sentence,
                r"Sentences?\s+(\d+\.\d+\.\d+\.\d+\.\(\d+\))".to_string(),
            ),
            (
                ReferenceKind::Subsection,
                r"Subsection\s+(\d+\.\d+\.\d+\.?)".to_string(),
            ),
            (
                ReferenceKind::Section,
                r"Section\s+(\d+\.\d+\.\d+\.?)".to_string(),
            ),
            (
                ReferenceKind::Clause,
                r"Clause\s+(\d+\.\d+\.\d+\.\d+\.\(\d+\)\([a-z]\))".to_string(),
            ),
            (ReferenceKind::Part, format!(r"Part\s+({root})\b")),
        ];

        let patterns = sources
            .into_iter()
            .map(|(kind, source)| ReferencePattern {
                kind,
                regex: Regex::new(&source).expect("reference pattern should compile"),
            })
            .collect();

        Self {
            root_part: root_part.to_string(),
            patterns,
        }
    }

    pub fn root_part(&self) -> &str {
        &self.root_part
    }

    /// All non-overlapping references in `text`, ordered by position.
    pub fn find_references(&self, text: &str) -> Vec<ReferenceMatch> {
        let mut candidates = Vec::new();
        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(text) {
                let (Some(whole), Some(reference)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                candidates.push(ReferenceMatch {
                    kind: pattern.kind,
                    raw_text: whole.as_str().to_string(),
                    target_id: self.resolve_target(pattern.kind, reference.as_str()),
                    start: whole.start(),
                    end: whole.end(),
                });
            }
        }

        candidates.sort_by_key(|candidate| candidate.start);

        let mut accepted: Vec<ReferenceMatch> = Vec::with_capacity(candidates.len());
        let mut last_end = 0;
        for candidate in candidates {
            if candidate.start >= last_end {
                last_end = candidate.end;
                accepted.push(candidate);
            }
        }
        accepted
    }

    pub fn link_references(&self, text: &str) -> Vec<Segment> {
        let matches = self.find_references(text);
        let spans: Vec<(usize, usize)> = matches.iter().map(|m| (m.start, m.end)).collect();
        split_by_spans(text, &spans, |index, literal| {
            reference_segment(&matches[index], literal)
        })
    }

    fn resolve_target(&self, kind: ReferenceKind, reference: &str) -> Option<String> {
        match kind {
            ReferenceKind::Table => Some(normalize_table_id(reference)),
            ReferenceKind::Part => (reference == self.root_part).then(|| self.root_part.clone()),
            _ => {
                let cleaned = reference.trim();
                let cleaned = cleaned.strip_suffix('.').unwrap_or(cleaned);
                let components: Vec<&str> = cleaned.split('.').collect();
                if components.len() >= 3 && components[0] == self.root_part {
                    Some(components[..3].join("."))
                } else {
                    None
                }
            }
        }
    }
}

fn reference_segment(reference: &ReferenceMatch, literal: &str) -> Segment {
    let Some(target_id) = reference.target_id.clone() else {
        return Segment::text(literal);
    };

    match reference.kind {
        ReferenceKind::Table => Segment::TableRef {
            text: literal.to_string(),
            href: format!("/api/table/{}", urlencoding::encode(&target_id)),
            table_id: target_id,
        },
        ReferenceKind::Part => Segment::NodeLink {
            text: literal.to_string(),
            kind: reference.kind,
            target_id,
            href: "/".to_string(),
        },
        kind => Segment::NodeLink {
            text: literal.to_string(),
            kind,
            href: format!("/code/{target_id}"),
            target_id,
        },
    }
}

/// One-shot helper; compiles the pattern set on every call.
pub fn find_references(text: &str, root_part: &str) -> Vec<ReferenceMatch> {
    ReferenceRecognizer::new(root_part).find_references(text)
}

/// One-shot helper; compiles the pattern set on every call.
pub fn link_references(text: &str, root_part: &str) -> Vec<Segment> {
    ReferenceRecognizer::new(root_part).link_references(text)
}
