use codebook::annotate::references::{find_references, link_references, ReferenceRecognizer};
use codebook::types::{segments_literal, ReferenceKind, Segment};

#[test]
fn article_reference_resolves_to_its_subsection() {
    let matches = find_references("See Article 9.10.14.1. for details", "9");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].kind, ReferenceKind::Article);
    assert_eq!(matches[0].raw_text, "Article 9.10.14.1.");
    assert_eq!(matches[0].target_id.as_deref(), Some("9.10.14"));
    assert_eq!(matches[0].start, 4);
}

#[test]
fn sentence_and_clause_references_link_to_subsection_pages() {
    let segments = link_references(
        "as required by Sentence 9.10.14.1.(1) and Clause 9.10.14.2.(1)(a)",
        "9",
    );
    let links: Vec<(&str, &str)> = segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::NodeLink { target_id, href, .. } => Some((target_id.as_str(), href.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        links,
        vec![("9.10.14", "/code/9.10.14"), ("9.10.14", "/code/9.10.14")]
    );
}

#[test]
fn reference_into_another_part_stays_plain() {
    let text = "conform to Article 3.2.3.1. of Division B";
    let matches = find_references(text, "9");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].target_id, None);

    let segments = link_references(text, "9");
    assert!(segments.iter().all(|segment| segment.as_plain().is_some()));
    assert_eq!(segments_literal(&segments), text);
}

#[test]
fn table_reference_becomes_a_popup_trigger() {
    let segments = link_references("Refer to Table 9.10.14.1.-A.", "9");
    match &segments[1] {
        Segment::TableRef {
            text,
            table_id,
            href,
        } => {
            assert_eq!(text, "Table 9.10.14.1.-A.");
            assert_eq!(table_id, "Table 9.10.14.1.-A");
            assert_eq!(href, "/api/table/Table%209.10.14.1.-A");
        }
        other => panic!("expected a table reference, got {other:?}"),
    }
}

#[test]
fn part_reference_links_to_root() {
    let segments = link_references("the requirements of Part 9 apply", "9");
    assert!(segments.iter().any(|segment| matches!(
        segment,
        Segment::NodeLink { kind: ReferenceKind::Part, href, .. } if href == "/"
    )));
}

#[test]
fn root_part_is_configurable() {
    let recognizer = ReferenceRecognizer::new("10");
    let matches = recognizer.find_references("Table 10.3.2.1.-A and Article 9.10.14.1.");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].target_id.as_deref(), Some("Table 10.3.2.1.-A"));
    assert_eq!(matches[1].target_id, None);
}

#[test]
fn accepted_matches_never_overlap_and_keep_text() {
    let text = "Subsection 9.10.14., Section 9.10.14., Articles 9.10.14.1. and Part 9 \
                per Sentence 9.10.14.1.(1) and Table 9.10.14.1.-A";
    let matches = find_references(text, "9");
    assert!(matches.len() >= 5);
    for pair in matches.windows(2) {
        assert!(pair[1].start >= pair[0].end);
    }
    assert_eq!(segments_literal(&link_references(text, "9")), text);
}
