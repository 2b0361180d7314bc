mod common;

use codebook::search::{
    build_search_index, highlight_text, score_item, score_term, search_code, snippet, DEFAULT_LIMIT,
};
use codebook::types::SearchItem;
use common::{memory_store, scan_store};

fn item(id: &str, title: &str, content: &str) -> SearchItem {
    SearchItem {
        id: id.to_string(),
        title: title.to_string(),
        section: "Fire Protection".to_string(),
        section_id: "9.10".to_string(),
        content: content.to_string(),
        page: 1,
        path: format!("/code/{id}"),
    }
}

fn separations() -> SearchItem {
    item(
        "9.10.9",
        "Fire Separations",
        "A fire separation is required. Each fire separation is continuous. No fire separation may be pierced.",
    )
}

#[test]
fn phrase_score_counts_title_and_capped_occurrences() {
    assert_eq!(score_term(&separations(), "fire separation"), 46);
}

#[test]
fn multi_word_query_sums_token_scores() {
    assert_eq!(score_item(&separations(), "fire separation"), 92);
}

#[test]
fn id_matches_outrank_text() {
    let exact = item("9.10.14", "Other", "");
    assert_eq!(score_term(&exact, "9.10.14"), 100);
    let partial = item("9.10.14", "Other", "");
    assert_eq!(score_term(&partial, "9.10"), 50);
}

#[test]
fn occurrences_are_capped() {
    let noisy = item("9.1.1", "Other", &"stair ".repeat(12));
    assert_eq!(score_term(&noisy, "stair"), 10 + 5 * 2);
}

#[test]
fn results_are_ranked_and_limited() {
    let index = vec![
        item("9.8.1", "Stairs", "stairs and ramps"),
        item("9.8.2", "Stair Dimensions", "stair rise and stair run"),
        item("9.9.1", "Egress", "no match here"),
    ];
    let results = search_code(&index, "stair", DEFAULT_LIMIT);
    let ids: Vec<&str> = results.iter().map(|r| r.item.id.as_str()).collect();
    assert_eq!(ids, vec!["9.8.2", "9.8.1"]);
    assert!(results[0].score > results[1].score);

    assert_eq!(search_code(&index, "stair", 1).len(), 1);
    assert!(search_code(&index, "   ", DEFAULT_LIMIT).is_empty());
}

#[test]
fn index_covers_every_subsection() {
    let index = build_search_index(&memory_store());
    let ids: Vec<&str> = index.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["9.9.1", "9.10.14", "9.10.15", "9.5.3A", "10.1.1"]);

    let houses = &index[2];
    assert_eq!(houses.path, "/code/9.10.15");
    assert_eq!(houses.section, "Fire Protection");
    assert_eq!(houses.section_id, "9.10");
    assert_eq!(houses.page, 160);

    assert_eq!(build_search_index(&scan_store()), index);
}

#[test]
fn fixture_search_prefers_the_separation_subsection() {
    let index = build_search_index(&memory_store());
    let results = search_code(&index, "fire separation", DEFAULT_LIMIT);
    assert_eq!(results[0].item.id, "9.10.14");
    assert_eq!(results[1].item.id, "9.10.15");
}

#[test]
fn highlighting_wraps_each_token() {
    assert_eq!(highlight_text("Fire separation", "fire"), "**Fire** separation");
    assert_eq!(
        highlight_text("Fire separation", "fire separation"),
        "**Fire** **separation**"
    );
    assert_eq!(highlight_text("R = 1/U (see)", "(see)"), "R = 1/U **(see)**");
}

#[test]
fn snippet_keeps_short_content_whole() {
    let content = "(1) Houses shall comply with Subsection 9.10.14.";
    assert_eq!(snippet(content, "houses", 200), content);
}
