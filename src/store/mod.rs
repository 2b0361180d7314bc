pub mod documents;
pub mod json_scan;
pub mod memory;
pub mod tables;

use crate::types::{part_number, AssembledContent, Dialect, Node, NodeKind, TableEntry};

pub use documents::{load_parts_from_dir, PartDocument};
pub use json_scan::JsonScanStore;
pub use memory::MemoryStore;
pub use tables::{normalize_table_id, TableRegistry};

/// Read-only access to the code hierarchy.
pub trait ContentStore: Send + Sync {
    fn get_node(&self, id: &str) -> Option<Node>;

    /// Direct children in document order; empty when the id has none or is unknown.
    fn get_children(&self, parent_id: &str) -> Vec<Node>;

    /// All nodes of one kind in document order.
    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<Node>;

    /// A whole part as one marker-dialect string.
    fn get_full_content(&self, part: &str) -> Option<String> {
        let part_node = self.get_node(part).filter(|node| node.kind == NodeKind::Part)?;
        let mut pieces = Vec::new();
        for section in self.get_children(&part_node.id) {
            pieces.push(marker_line("SECTION", &section));
            for subsection in self.get_children(&section.id) {
                pieces.push(marker_line("SUBSECTION", &subsection));
                push_subsection_body(self, &subsection, Dialect::Marker, &mut pieces);
            }
        }
        Some(pieces.join("\n\n"))
    }
}

pub trait TableResolver: Send + Sync {
    fn resolve(&self, table_id: &str) -> Option<TableEntry>;
}

/// Ancestors from the part down to the node itself.
pub fn breadcrumb<S: ContentStore + ?Sized>(store: &S, id: &str) -> Vec<Node> {
    let mut trail = Vec::new();
    let mut current = store.get_node(id);
    while let Some(node) = current {
        current = node
            .parent_id
            .as_deref()
            .and_then(|parent_id| store.get_node(parent_id));
        trail.push(node);
    }
    trail.reverse();
    trail
}

/// The text a node page renders, in the dialect its part is stored in.
pub fn assemble_content<S: ContentStore + ?Sized>(store: &S, id: &str) -> Option<AssembledContent> {
    let node = store.get_node(id)?;
    let part = part_number(&node.id);

    if node.kind == NodeKind::Part {
        return Some(AssembledContent {
            dialect: Dialect::Marker,
            text: store.get_full_content(part)?,
        });
    }

    let dialect = Dialect::for_part(part);
    let mut pieces = Vec::new();
    match node.kind {
        NodeKind::Section => {
            for subsection in store.get_children(&node.id) {
                match dialect {
                    Dialect::Marker => pieces.push(marker_line("SUBSECTION", &subsection)),
                    Dialect::Legacy => {
                        let body = subsection.content.as_deref().unwrap_or_default();
                        if !has_heading_line(body, &subsection.id) {
                            pieces.push(format!("{}. {}", subsection.id, subsection.title));
                        }
                    }
                }
                push_subsection_body(store, &subsection, dialect, &mut pieces);
            }
        }
        kind if kind.is_subsection() => push_subsection_body(store, &node, dialect, &mut pieces),
        _ => {
            if let Some(content) = node.content.as_deref().filter(|c| !c.trim().is_empty()) {
                pieces.push(content.to_string());
            }
        }
    }

    tracing::debug!(
        "[Store] Assembled {} ({}, {} pieces)",
        node.id,
        node.kind.as_str(),
        pieces.len()
    );
    Some(AssembledContent {
        dialect,
        text: pieces.join("\n\n"),
    })
}

fn marker_line(label: &str, node: &Node) -> String {
    format!("[{label}:{}:{}]", node.id, node.title)
}

/// Subsection text followed by any article not already present in it.
fn push_subsection_body<S: ContentStore + ?Sized>(
    store: &S,
    subsection: &Node,
    dialect: Dialect,
    pieces: &mut Vec<String>,
) {
    let body = subsection.content.as_deref().unwrap_or_default();
    if !body.trim().is_empty() {
        pieces.push(body.to_string());
    }

    for article in store.get_children(&subsection.id) {
        if has_heading_line(body, &article.id) || body.contains(&format!("[ARTICLE:{}:", article.id))
        {
            continue;
        }
        match dialect {
            Dialect::Marker => pieces.push(marker_line("ARTICLE", &article)),
            Dialect::Legacy => pieces.push(format!("{}. {}", article.id, article.title)),
        }
        if let Some(content) = article.content.as_deref().filter(|c| !c.trim().is_empty()) {
            pieces.push(content.to_string());
        }
    }
}

/// Whether some line of `body` opens with `"{id}."` followed by whitespace or nothing.
fn has_heading_line(body: &str, id: &str) -> bool {
    let prefix = format!("{id}.");
    body.lines().any(|line| {
        line.trim_start()
            .strip_prefix(&prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}
