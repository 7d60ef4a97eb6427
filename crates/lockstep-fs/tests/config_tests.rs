use lockstep_fs::{ConfigStore, Error, NormalizedPath};
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct TestConfig {
    image: String,
    timeout_secs: u64,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("lockstep.toml");
    fs::write(&file_path, "image = \"dotnet\"\ntimeout_secs = 60\n").unwrap();

    let config: TestConfig = ConfigStore::new().load(&NormalizedPath::new(&file_path)).unwrap();

    assert_eq!(config.image, "dotnet");
    assert_eq!(config.timeout_secs, 60);
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("lockstep.json");
    fs::write(&file_path, r#"{"image": "dotnet", "timeout_secs": 5}"#).unwrap();

    let config: TestConfig = ConfigStore::new().load(&NormalizedPath::new(&file_path)).unwrap();

    assert_eq!(config.timeout_secs, 5);
}

#[test]
fn test_load_yaml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("lockstep.yml");
    fs::write(&file_path, "image: sdk\ntimeout_secs: 1\n").unwrap();

    let config: TestConfig = ConfigStore::new().load(&NormalizedPath::new(&file_path)).unwrap();

    assert_eq!(config.image, "sdk");
}

#[test]
fn test_load_invalid_toml_reports_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("lockstep.toml");
    fs::write(&file_path, "image = ").unwrap();

    let err = ConfigStore::new()
        .load::<TestConfig>(&NormalizedPath::new(&file_path))
        .unwrap_err();

    match err {
        Error::ConfigParse { format, .. } => assert_eq!(format, "TOML"),
        other => panic!("expected ConfigParse, got {other:?}"),
    }
}

#[test]
fn test_load_unsupported_extension() {
    let err = ConfigStore::new()
        .load::<TestConfig>(&NormalizedPath::new("/tmp/lockstep.ini"))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { extension } if extension == "ini"));
}
