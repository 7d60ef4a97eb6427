use lockstep_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("packages.lock.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_text_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("a/b/c/nuget.config"));

    io::write_text(&path, "<configuration />").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "<configuration />");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("target.txt"));

    io::write_text(&path, "content").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "found temp files: {:?}", leftovers);
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/packages.lock.json");
    let err = io::read_text(&path).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_read_optional_missing_is_none() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.json"));
    assert_eq!(io::read_optional(&path).unwrap(), None);
}

#[test]
fn test_read_optional_existing_is_some() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("present.json"), "data").unwrap();
    let path = NormalizedPath::new(temp.path().join("present.json"));
    assert_eq!(io::read_optional(&path).unwrap().as_deref(), Some("data"));
}

#[test]
fn test_remove_file_tolerates_missing() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("gone.txt"));
    io::remove_file(&path).unwrap();
}

#[test]
fn test_remove_dir_all_removes_tree() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("cache/nuget/token");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("nuget.config"), "<configuration />").unwrap();

    io::remove_dir_all(&NormalizedPath::new(&dir)).unwrap();

    assert!(!dir.exists());
    assert!(temp.path().join("cache/nuget").exists());
    io::remove_dir_all(&NormalizedPath::new(&dir)).unwrap();
}

#[test]
fn test_remove_file_deletes_existing() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nuget.config"));
    io::write_text(&path, "<configuration />").unwrap();

    io::remove_file(&path).unwrap();

    assert!(!path.exists());
}
