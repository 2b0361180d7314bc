use std::collections::HashMap;
use std::path::Path;

use crate::store::documents::{load_parts_from_dir, PartDocument};
use crate::store::ContentStore;
use crate::types::{Node, NodeKind};

/// Every node flattened once and indexed by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: HashMap<String, Node>,
    children: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl MemoryStore {
    pub fn from_parts(parts: &[PartDocument]) -> Self {
        let mut store = Self::default();
        for part in parts {
            store.insert(part.node());
            for (section_seq, section) in part.sections.iter().enumerate() {
                store.insert(section.node(&part.id, section_seq));
                for (sub_seq, subsection) in section.subsections.iter().enumerate() {
                    store.insert(subsection.node(section, sub_seq));
                    for (article_seq, article) in subsection.articles.iter().enumerate() {
                        store.insert(article.node(subsection, article_seq));
                    }
                }
            }
        }
        tracing::info!("[Store] Indexed {} nodes", store.order.len());
        store
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self, String> {
        let parts = load_parts_from_dir(dir)?;
        Ok(Self::from_parts(&parts))
    }

    fn insert(&mut self, node: Node) {
        if self.nodes.contains_key(&node.id) {
            tracing::warn!("[Store] Duplicate node id {}, keeping the first", node.id);
            return;
        }
        if let Some(parent_id) = &node.parent_id {
            self.children
                .entry(parent_id.clone())
                .or_default()
                .push(node.id.clone());
        }
        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ContentStore for MemoryStore {
    fn get_node(&self, id: &str) -> Option<Node> {
        self.nodes.get(id).cloned()
    }

    fn get_children(&self, parent_id: &str) -> Vec<Node> {
        self.children
            .get(parent_id)
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id).cloned()).collect())
            .unwrap_or_default()
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<Node> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .filter(|node| node.kind == kind)
            .cloned()
            .collect()
    }
}
