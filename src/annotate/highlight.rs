use regex::{Regex, RegexBuilder};

use crate::annotate::split_by_spans;
use crate::types::Segment;

/// Case-insensitive literal matcher for the active search query.
pub struct Highlighter {
    pattern: Regex,
}

impl Highlighter {
    /// `None` when there is nothing to highlight.
    pub fn new(query: Option<&str>) -> Option<Self> {
        let query = query.map(str::trim).filter(|query| !query.is_empty())?;
        match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Some(Self { pattern }),
            Err(e) => {
                tracing::warn!("[Highlight] Ignoring query {:?}: {}", query, e);
                None
            }
        }
    }

    pub fn highlight(&self, text: &str) -> Vec<Segment> {
        let spans: Vec<(usize, usize)> = self
            .pattern
            .find_iter(text)
            .filter(|found| !found.is_empty())
            .map(|found| (found.start(), found.end()))
            .collect();
        split_by_spans(text, &spans, |_, matched| Segment::Highlight {
            text: matched.to_string(),
        })
    }
}

pub fn highlight_query(text: &str, query: Option<&str>) -> Vec<Segment> {
    match Highlighter::new(query) {
        Some(highlighter) => highlighter.highlight(text),
        None => vec![Segment::text(text)],
    }
}
