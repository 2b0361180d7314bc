use std::path::Path;

use crate::store::documents::{load_parts_from_dir, PartDocument};
use crate::store::ContentStore;
use crate::types::{part_number, Node, NodeKind};

/// Walks the part documents on every call; no index is built.
#[derive(Debug, Default)]
pub struct JsonScanStore {
    parts: Vec<PartDocument>,
}

impl JsonScanStore {
    pub fn new(parts: Vec<PartDocument>) -> Self {
        Self { parts }
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self, String> {
        Ok(Self::new(load_parts_from_dir(dir)?))
    }

    fn part(&self, id: &str) -> Option<&PartDocument> {
        let part = part_number(id);
        self.parts.iter().find(|candidate| candidate.id == part)
    }
}

impl ContentStore for JsonScanStore {
    fn get_node(&self, id: &str) -> Option<Node> {
        let part = self.part(id)?;
        if part.id == id {
            return Some(part.node());
        }
        for (section_seq, section) in part.sections.iter().enumerate() {
            if section.id == id {
                return Some(section.node(&part.id, section_seq));
            }
            for (sub_seq, subsection) in section.subsections.iter().enumerate() {
                if subsection.id == id {
                    return Some(subsection.node(section, sub_seq));
                }
                for (article_seq, article) in subsection.articles.iter().enumerate() {
                    if article.id == id {
                        return Some(article.node(subsection, article_seq));
                    }
                }
            }
        }
        None
    }

    fn get_children(&self, parent_id: &str) -> Vec<Node> {
        let Some(part) = self.part(parent_id) else {
            return Vec::new();
        };
        if part.id == parent_id {
            return part
                .sections
                .iter()
                .enumerate()
                .map(|(seq, section)| section.node(&part.id, seq))
                .collect();
        }
        for section in &part.sections {
            if section.id == parent_id {
                return section
                    .subsections
                    .iter()
                    .enumerate()
                    .map(|(seq, subsection)| subsection.node(section, seq))
                    .collect();
            }
            for subsection in &section.subsections {
                if subsection.id == parent_id {
                    return subsection
                        .articles
                        .iter()
                        .enumerate()
                        .map(|(seq, article)| article.node(subsection, seq))
                        .collect();
                }
            }
        }
        Vec::new()
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<Node> {
        let mut nodes = Vec::new();
        for part in &self.parts {
            if kind == NodeKind::Part {
                nodes.push(part.node());
                continue;
            }
            for (section_seq, section) in part.sections.iter().enumerate() {
                if kind == NodeKind::Section {
                    nodes.push(section.node(&part.id, section_seq));
                    continue;
                }
                for (sub_seq, subsection) in section.subsections.iter().enumerate() {
                    let node = subsection.node(section, sub_seq);
                    if node.kind == kind {
                        nodes.push(node);
                        continue;
                    }
                    nodes.extend(
                        subsection
                            .articles
                            .iter()
                            .enumerate()
                            .map(|(seq, article)| article.node(subsection, seq))
                            .filter(|article| article.kind == kind),
                    );
                }
            }
        }
        nodes
    }
}
