use libcat_core::{Book, BookStatus, CatalogStorage, JsonFileStorage, StoreError};
use std::fs;

fn sample_books() -> Vec<Book> {
    let mut checked_out = Book::new(5, "Война и мир", "Толстой", "1869");
    checked_out.status = BookStatus::CheckedOut;
    vec![
        Book::new(3, "Dune", "Herbert", "1965"),
        checked_out,
        Book::new(1, "", "Anonymous \"quoted\"", "circa 800"),
    ]
}

#[test]
fn load_missing_file_returns_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("books.json"));

    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn load_malformed_file_returns_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    let storage = JsonFileStorage::new(&path);

    for content in [
        "",
        "not json",
        "{\"id\": 1}",
        "[{\"id\": 1, \"title\": \"a\", \"author\": \"b\", \"year\": \"c\", \"status\": \"lost\"}]",
        "[{\"id\": 0, \"title\": \"a\", \"author\": \"b\", \"year\": \"c\", \"status\": \"available\"}]",
        "[{\"id\": -1, \"title\": \"a\", \"author\": \"b\", \"year\": \"c\", \"status\": \"available\"}]",
    ] {
        fs::write(&path, content).unwrap();
        assert!(storage.load().unwrap().is_empty(), "content: {content}");
    }
}

#[test]
fn save_then_load_roundtrips_order_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("books.json"));
    let books = sample_books();

    storage.save(&books).unwrap();
    assert_eq!(storage.load().unwrap(), books);

    storage.save(&[]).unwrap();
    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn save_writes_human_readable_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    let storage = JsonFileStorage::new(&path);

    storage.save(&[Book::new(1, "Dune", "Herbert", "1965")]).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value[0]["id"], 1);
    assert_eq!(value[0]["status"], "available");
}

#[test]
fn save_overwrites_prior_content_and_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog").join("books.json");
    let storage = JsonFileStorage::new(&path);

    storage.save(&sample_books()).unwrap();
    storage.save(&[Book::new(8, "Solo", "One", "2000")]).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, 8);

    let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn save_into_unwritable_location_surfaces_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "file, not a directory").unwrap();
    let storage = JsonFileStorage::new(blocker.join("books.json"));

    let err = storage.save(&sample_books()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[test]
fn load_directory_path_surfaces_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path());

    let err = storage.load().unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[cfg(unix)]
#[test]
fn save_keeps_existing_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    let storage = JsonFileStorage::new(&path);

    storage.save(&sample_books()).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    storage.save(&[Book::new(1, "Dune", "Herbert", "1965")]).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    assert_eq!(storage.load().unwrap().len(), 1);
}
