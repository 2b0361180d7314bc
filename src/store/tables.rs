use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::store::TableResolver;
use crate::types::TableEntry;

/// Canonical table key: trimmed, no trailing period, `Table ` prefix.
pub fn normalize_table_id(id: &str) -> String {
    let trimmed = id.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed).trim_end();
    let bare = trimmed
        .strip_prefix("Table")
        .map(str::trim_start)
        .unwrap_or(trimmed);
    format!("Table {bare}")
}

/// Table JSON map loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    entries: HashMap<String, TableEntry>,
}

impl TableRegistry {
    pub fn new(entries: HashMap<String, TableEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(id, entry)| (normalize_table_id(&id), entry))
            .collect();
        Self { entries }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read tables {}: {e}", path.display()))?;
        let entries: HashMap<String, TableEntry> = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse tables {}: {e}", path.display()))?;
        tracing::info!("[Store] Loaded {} tables from {}", entries.len(), path.display());
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TableResolver for TableRegistry {
    fn resolve(&self, table_id: &str) -> Option<TableEntry> {
        self.entries.get(&normalize_table_id(table_id)).cloned()
    }
}
