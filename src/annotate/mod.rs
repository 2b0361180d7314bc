pub mod highlight;
pub mod math;
pub mod notes;
pub mod references;
pub mod terms;

use crate::types::Segment;
use highlight::Highlighter;
use references::ReferenceRecognizer;
use terms::Glossary;

/// Runs the inline pipeline over one leaf text run:
/// references, defined terms, note citations, search highlight, then math.
pub struct Annotator<'a> {
    references: &'a ReferenceRecognizer,
    glossary: &'a Glossary,
    highlighter: Option<Highlighter>,
}

impl<'a> Annotator<'a> {
    pub fn new(
        references: &'a ReferenceRecognizer,
        glossary: &'a Glossary,
        highlight: Option<&str>,
    ) -> Self {
        Self {
            references,
            glossary,
            highlighter: Highlighter::new(highlight),
        }
    }

    pub fn annotate(&self, text: &str) -> Vec<Segment> {
        let segments = self.references.link_references(text);
        let segments = map_plain(segments, |plain| terms::annotate_terms(plain, self.glossary));
        let segments = map_plain(segments, notes::style_note_references);
        let segments = match &self.highlighter {
            Some(highlighter) => map_plain(segments, |plain| highlighter.highlight(plain)),
            None => segments,
        };
        map_plain(segments, math::math_segments)
    }
}

/// Apply `stage` to the plain-text leaves only; annotated segments pass through untouched.
pub fn map_plain<F>(segments: Vec<Segment>, mut stage: F) -> Vec<Segment>
where
    F: FnMut(&str) -> Vec<Segment>,
{
    let mut output = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Text { text } => output.extend(stage(&text)),
            other => output.push(other),
        }
    }
    merge_plain(output)
}

/// Drop empty text runs and join adjacent ones.
pub fn merge_plain(segments: Vec<Segment>) -> Vec<Segment> {
    let mut output: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if let Segment::Text { text } = &segment {
            if text.is_empty() {
                continue;
            }
            if let Some(Segment::Text { text: previous }) = output.last_mut() {
                previous.push_str(text);
                continue;
            }
        }
        output.push(segment);
    }
    output
}

/// Cut `text` at the given sorted, non-overlapping byte spans. `make` builds the
/// segment for the span with the given index; the gaps become plain text.
pub(crate) fn split_by_spans<F>(text: &str, spans: &[(usize, usize)], mut make: F) -> Vec<Segment>
where
    F: FnMut(usize, &str) -> Segment,
{
    if spans.is_empty() {
        return vec![Segment::text(text)];
    }

    let mut output = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for (index, &(start, end)) in spans.iter().enumerate() {
        if start > cursor {
            output.push(Segment::text(&text[cursor..start]));
        }
        output.push(make(index, &text[start..end]));
        cursor = end;
    }
    if cursor < text.len() {
        output.push(Segment::text(&text[cursor..]));
    }
    output
}
