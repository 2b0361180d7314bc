use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "site.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Memory,
    JsonScan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the `partN.json` documents.
    pub data_dir: PathBuf,
    pub tables_file: Option<PathBuf>,
    /// Replaces the builtin glossary when set.
    pub glossary_file: Option<PathBuf>,
    pub root_part: String,
    pub bind_addr: String,
    pub store: StoreKind,
    pub rejoin_soft_wraps: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tables_file: None,
            glossary_file: None,
            root_part: "9".to_string(),
            bind_addr: "0.0.0.0:8080".to_string(),
            store: StoreKind::Memory,
            rejoin_soft_wraps: false,
        }
    }
}

impl SiteConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let config: SiteConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
        Ok(config)
    }

    /// `$CONFIGS_PATH/site.json` when present, defaults otherwise.
    pub fn load_default() -> Result<Self, String> {
        let Ok(dir) = env::var("CONFIGS_PATH") else {
            return Ok(Self::default());
        };
        let path = Path::new(&dir).join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::info!("[Config] {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }
}
