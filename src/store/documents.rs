use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::{Node, NodeKind};

/// One `partN.json` file as produced by extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<SectionDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub subsections: Vec<SubsectionDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub articles: Vec<ArticleDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl PartDocument {
    pub fn node(&self) -> Node {
        Node {
            id: self.id.clone(),
            kind: NodeKind::Part,
            parent_id: None,
            title: self.title.clone(),
            content: None,
            page: self.sections.first().map_or(0, |section| section.page),
            seq: 0,
        }
    }
}

impl SectionDocument {
    pub fn node(&self, part_id: &str, seq: usize) -> Node {
        Node {
            id: self.id.clone(),
            kind: NodeKind::Section,
            parent_id: Some(part_id.to_string()),
            title: self.title.clone(),
            content: None,
            page: self.page,
            seq: seq as u32,
        }
    }
}

impl SubsectionDocument {
    pub fn node(&self, section: &SectionDocument, seq: usize) -> Node {
        let kind = match NodeKind::from_id(&self.id) {
            NodeKind::AltSubsection => NodeKind::AltSubsection,
            _ => NodeKind::Subsection,
        };
        Node {
            id: self.id.clone(),
            kind,
            parent_id: Some(section.id.clone()),
            title: self.title.clone(),
            content: self.content.clone(),
            page: if self.page > 0 { self.page } else { section.page },
            seq: seq as u32,
        }
    }
}

impl ArticleDocument {
    pub fn node(&self, subsection: &SubsectionDocument, seq: usize) -> Node {
        let kind = match NodeKind::from_id(&self.id) {
            kind if kind.is_article() => kind,
            _ => NodeKind::Article,
        };
        Node {
            id: self.id.clone(),
            kind,
            parent_id: Some(subsection.id.clone()),
            title: self.title.clone(),
            content: self.content.clone(),
            page: subsection.page,
            seq: seq as u32,
        }
    }
}

/// Read every `part<N>.json` in `dir`, ordered by part number.
pub fn load_parts_from_dir(dir: &Path) -> Result<Vec<PartDocument>, String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Failed to read data dir {}: {e}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read data dir entry: {e}"))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Some(number) = name
            .strip_prefix("part")
            .and_then(|rest| rest.strip_suffix(".json"))
            .and_then(|number| number.parse::<u32>().ok())
        else {
            continue;
        };
        files.push((number, path));
    }
    files.sort_by_key(|(number, _)| *number);

    let mut parts = Vec::with_capacity(files.len());
    for (_, path) in files {
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let part: PartDocument = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
        tracing::info!(
            "[Store] Loaded part {} ({} sections) from {}",
            part.id,
            part.sections.len(),
            path.display()
        );
        parts.push(part);
    }
    Ok(parts)
}
