use regex::Regex;
use std::sync::LazyLock;

use crate::annotate::split_by_spans;
use crate::types::Segment;

static NOTE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    let note = r"A-\d+(?:\.\d+[A-Z]?)*\.?(?:\([0-9a-z]+\))*";
    Regex::new(&format!(
        r"(?i)\(\s*see\s+notes?\s+{note}(?:\s*(?:,|and)\s*{note})*\s*\)"
    ))
    .unwrap()
});

/// Mark `(See Note A-…)` citations so they render distinctly.
pub fn style_note_references(text: &str) -> Vec<Segment> {
    let spans: Vec<(usize, usize)> = NOTE_REF_RE
        .find_iter(text)
        .map(|found| (found.start(), found.end()))
        .collect();
    split_by_spans(text, &spans, |_, matched| Segment::NoteRef {
        text: matched.to_string(),
    })
}
