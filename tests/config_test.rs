//! Integration tests for loading AppConfig from disk.

use std::path::PathBuf;

use llm_inside::{AppConfig, Error};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("llm-inside-{}-{name}", std::process::id()))
}

#[test]
fn test_load_partial_file() {
    let path = temp_path("partial.json");
    std::fs::write(
        &path,
        r#"{"service": {"language": "English"}, "display": {"color": false}}"#,
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.service.language, "English");
    assert_eq!(config.service.model, "gemini-2.5-flash");
    assert!(!config.display.color);
    assert_eq!(config.insight.debounce_ms, 500);
}

#[test]
fn test_roundtrip_through_json() {
    let config = AppConfig::default().with_debounce_ms(250).with_model("m");
    let path = temp_path("roundtrip.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = AppConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_load_errors() {
    let missing = AppConfig::load(temp_path("does-not-exist.json"));
    assert!(matches!(missing, Err(Error::Io(_))));

    let path = temp_path("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let broken = AppConfig::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(broken, Err(Error::Json(_))));

    let path = temp_path("invalid.json");
    std::fs::write(&path, r#"{"service": {"model": ""}}"#).unwrap();
    let invalid = AppConfig::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(invalid, Err(Error::Config(_))));
}
