use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::annotate::split_by_spans;
use crate::types::{Definition, Segment};

static BUILTIN_GLOSSARY: &str = include_str!("../../data/glossary.json");

/// Defined terms and the single alternation used to find them.
pub struct Glossary {
    definitions: Vec<Definition>,
    by_term: HashMap<String, usize>,
    pattern: Option<Regex>,
}

impl Glossary {
    pub fn new(definitions: Vec<Definition>) -> Self {
        let mut by_term = HashMap::new();
        for (index, definition) in definitions.iter().enumerate() {
            by_term
                .entry(definition.term.to_lowercase())
                .or_insert(index);
            for alias in &definition.aliases {
                by_term.entry(alias.to_lowercase()).or_insert(index);
            }
        }

        let pattern = build_pattern(by_term.keys().map(String::as_str));
        Self {
            definitions,
            by_term,
            pattern,
        }
    }

    /// The Part 9 definition list compiled into the binary.
    pub fn builtin() -> Self {
        let definitions: Vec<Definition> =
            serde_json::from_str(BUILTIN_GLOSSARY).expect("builtin glossary should parse");
        Self::new(definitions)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read glossary {}: {e}", path.display()))?;
        let definitions: Vec<Definition> = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse glossary {}: {e}", path.display()))?;
        Ok(Self::new(definitions))
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Case-insensitive lookup by term or alias.
    pub fn lookup(&self, term: &str) -> Option<&Definition> {
        self.by_term
            .get(&term.to_lowercase())
            .map(|&index| &self.definitions[index])
    }

    /// Every recognised spelling: canonical terms followed by their aliases.
    pub fn terms(&self) -> Vec<&str> {
        self.definitions
            .iter()
            .flat_map(|definition| {
                std::iter::once(definition.term.as_str())
                    .chain(definition.aliases.iter().map(String::as_str))
            })
            .collect()
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn build_pattern<'a>(terms: impl Iterator<Item = &'a str>) -> Option<Regex> {
    let mut terms: Vec<&str> = terms.filter(|term| !term.trim().is_empty()).collect();
    if terms.is_empty() {
        return None;
    }
    // Longest first so "fire separation wall" beats "fire separation".
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");

    match RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!("[Glossary] Failed to compile term pattern: {}", e);
            None
        }
    }
}

/// Wrap every glossary term in `text`, preserving the matched spelling.
pub fn annotate_terms(text: &str, glossary: &Glossary) -> Vec<Segment> {
    let Some(pattern) = &glossary.pattern else {
        return vec![Segment::text(text)];
    };

    let spans: Vec<(usize, usize)> = pattern
        .find_iter(text)
        .map(|found| (found.start(), found.end()))
        .collect();

    split_by_spans(text, &spans, |_, matched| match glossary.lookup(matched) {
        Some(definition) => Segment::Term {
            text: matched.to_string(),
            term: definition.term.clone(),
            definition: definition.definition.clone(),
        },
        None => Segment::text(matched),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_glossary_covers_aliases() {
        let glossary = Glossary::builtin();
        assert!(!glossary.is_empty());
        let storey = glossary.lookup("Story").expect("alias should resolve");
        assert_eq!(storey.term, "storey");
    }

    #[test]
    fn empty_glossary_leaves_text_alone() {
        let glossary = Glossary::empty();
        assert_eq!(
            annotate_terms("fire separation", &glossary),
            vec![Segment::text("fire separation")]
        );
    }
}
