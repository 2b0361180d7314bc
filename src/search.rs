//! Ranking over the subsection index.

use regex::RegexBuilder;

use crate::store::ContentStore;
use crate::types::{NodeKind, SearchItem};

const EXACT_ID_SCORE: u32 = 100;
const PARTIAL_ID_SCORE: u32 = 50;
const TITLE_SCORE: u32 = 30;
const CONTENT_SCORE: u32 = 10;
const OCCURRENCE_SCORE: u32 = 2;
const MAX_COUNTED_OCCURRENCES: usize = 5;

pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_SNIPPET_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub item: SearchItem,
    pub score: u32,
}

/// Score of one term (matched as a whole phrase) against an item.
pub fn score_term(item: &SearchItem, term: &str) -> u32 {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return 0;
    }

    let id = item.id.to_lowercase();
    let mut score = if id == term {
        EXACT_ID_SCORE
    } else if id.contains(&term) {
        PARTIAL_ID_SCORE
    } else {
        0
    };

    if item.title.to_lowercase().contains(&term) {
        score += TITLE_SCORE;
    }

    let content = item.content.to_lowercase();
    let occurrences = content.matches(&term).count();
    if occurrences > 0 {
        score += CONTENT_SCORE + occurrences.min(MAX_COUNTED_OCCURRENCES) as u32 * OCCURRENCE_SCORE;
    }
    score
}

/// Sum of `score_term` over the whitespace-separated tokens of `query`.
pub fn score_item(item: &SearchItem, query: &str) -> u32 {
    query
        .split_whitespace()
        .map(|token| score_term(item, token))
        .sum()
}

/// Items with a positive score, best first; ties keep index order.
pub fn search_code(index: &[SearchItem], query: &str, limit: usize) -> Vec<ScoredItem> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<ScoredItem> = index
        .iter()
        .filter_map(|item| {
            let score = score_item(item, query);
            (score > 0).then(|| ScoredItem {
                item: item.clone(),
                score,
            })
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// Wrap every token of `query` in `**`.
pub fn highlight_text(text: &str, query: &str) -> String {
    let mut output = text.to_string();
    for token in query.split_whitespace() {
        let Ok(pattern) = RegexBuilder::new(&format!("({})", regex::escape(token)))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        output = pattern.replace_all(&output, "**${1}**").into_owned();
    }
    output
}

/// Up to `max_len` bytes around the first query token found in `content`.
pub fn snippet(content: &str, query: &str, max_len: usize) -> String {
    let lower = content.to_ascii_lowercase();
    let first_match = query
        .split_whitespace()
        .filter_map(|token| lower.find(&token.to_ascii_lowercase()))
        .min();

    let Some(position) = first_match else {
        if content.len() <= max_len {
            return content.to_string();
        }
        return format!("{}...", &content[..floor_char_boundary(content, max_len)]);
    };

    let start = floor_char_boundary(content, position.saturating_sub(50));
    let end = floor_char_boundary(content, (position + max_len.saturating_sub(50)).min(content.len()));
    let mut output = String::with_capacity(end - start + 6);
    if start > 0 {
        output.push_str("...");
    }
    output.push_str(&content[start..end]);
    if end < content.len() {
        output.push_str("...");
    }
    output
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// One entry per subsection, carrying its section for display.
pub fn build_search_index<S: ContentStore + ?Sized>(store: &S) -> Vec<SearchItem> {
    let mut index = Vec::new();
    for section in store.nodes_of_kind(NodeKind::Section) {
        for subsection in store.get_children(&section.id) {
            if !subsection.kind.is_subsection() {
                continue;
            }
            index.push(SearchItem {
                path: format!("/code/{}", subsection.id),
                id: subsection.id,
                title: subsection.title,
                section: section.title.clone(),
                section_id: section.id.clone(),
                content: subsection.content.unwrap_or_default(),
                page: subsection.page,
            });
        }
    }
    tracing::info!("[Search] Indexed {} subsections", index.len());
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_without_match_truncates() {
        assert_eq!(snippet("abcdef", "zzz", 3), "abc...");
        assert_eq!(snippet("abc", "zzz", 10), "abc");
    }

    #[test]
    fn snippet_centres_on_first_match() {
        let content = format!("{}needle{}", "a".repeat(100), "b".repeat(300));
        let cut = snippet(&content, "needle", 120);
        assert!(cut.starts_with("..."));
        assert!(cut.ends_with("..."));
        assert!(cut.contains("needle"));
    }
}
