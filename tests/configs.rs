use codebook::runtime::config::{SiteConfig, StoreKind, CONFIG_FILE_NAME};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_partial_config_fills_defaults() {
    let json = r#"
    {
        "data_dir": "/srv/code",
        "store": "json_scan",
        "rejoin_soft_wraps": true
    }
    "#;

    let config: SiteConfig = serde_json::from_str(json).expect("Failed to parse config");

    assert_eq!(config.data_dir, PathBuf::from("/srv/code"));
    assert_eq!(config.store, StoreKind::JsonScan);
    assert!(config.rejoin_soft_wraps);
    assert_eq!(config.root_part, "9");
    assert_eq!(config.bind_addr, "0.0.0.0:8080");
    assert_eq!(config.tables_file, None);
}

#[test]
fn test_load_from_file() {
    let mut tmp_file = NamedTempFile::new().expect("Failed to create temp file");
    write!(
        tmp_file,
        r#"{{"tables_file": "tables.json", "bind_addr": "127.0.0.1:3000"}}"#
    )
    .expect("Failed to write to temp file");

    let config = SiteConfig::load_from_file(tmp_file.path()).expect("Failed to load config");
    assert_eq!(config.tables_file, Some(PathBuf::from("tables.json")));
    assert_eq!(config.bind_addr, "127.0.0.1:3000");
    assert_eq!(config.store, StoreKind::Memory);
}

#[test]
fn test_load_from_file_errors() {
    let err = SiteConfig::load_from_file("/nonexistent/site.json").unwrap_err();
    assert!(err.starts_with("Failed to read"));

    let mut tmp_file = NamedTempFile::new().expect("Failed to create temp file");
    write!(tmp_file, "{{ not json").expect("Failed to write to temp file");
    let err = SiteConfig::load_from_file(tmp_file.path()).unwrap_err();
    assert!(err.starts_with("Failed to parse"));
}

// Environment variables are process-wide, so every CONFIGS_PATH case lives in one test.
#[test]
fn test_load_default_with_env_var() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    std::env::remove_var("CONFIGS_PATH");
    assert_eq!(SiteConfig::load_default().unwrap(), SiteConfig::default());

    std::env::set_var("CONFIGS_PATH", temp_dir.path());
    assert_eq!(SiteConfig::load_default().unwrap(), SiteConfig::default());

    std::fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        r#"{"root_part": "10", "glossary_file": "terms.json"}"#,
    )
    .expect("Failed to write site.json");
    let config = SiteConfig::load_default().expect("Failed to load default config");
    std::env::remove_var("CONFIGS_PATH");

    assert_eq!(config.root_part, "10");
    assert_eq!(config.glossary_file, Some(PathBuf::from("terms.json")));
}
