//! JSON file catalog storage.
//!
//! # Responsibility
//! - Read and write the catalog as one pretty-printed JSON array.
//! - Classify stored content as missing, malformed or loaded before use.
//!
//! # Invariants
//! - A failed save leaves the previous file content intact (temp file +
//!   rename in the same directory).
//! - Load failures other than "missing" and "malformed" are surfaced.

use super::{CatalogStorage, StoreError, StoreResult};
use crate::model::book::Book;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// File name used when no catalog path is configured.
pub const DEFAULT_CATALOG_FILE: &str = "books.json";

const JSON_INDENT: &[u8] = b"    ";

/// Classified content of the catalog file.
#[derive(Debug)]
enum Snapshot {
    Missing,
    Malformed(serde_json::Error),
    Loaded(Vec<Book>),
}

/// Catalog storage backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_snapshot(&self) -> StoreResult<Snapshot> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Snapshot::Missing),
            Err(err) => return Err(self.io_error(err)),
        };
        Ok(classify(&bytes))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl CatalogStorage for JsonFileStorage {
    fn load(&self) -> StoreResult<Vec<Book>> {
        let started_at = Instant::now();
        let snapshot = match self.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(
                    "event=catalog_load module=store status=error duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        match snapshot {
            // Why: a first run and a hand-damaged file both start from an empty
            // catalog; only the malformed case is worth a warning.
            Snapshot::Missing => {
                debug!("event=catalog_load module=store status=ok source=missing books=0");
                Ok(Vec::new())
            }
            Snapshot::Malformed(err) => {
                warn!(
                    "event=catalog_load module=store status=fallback source=malformed books=0 line={} column={}",
                    err.line(),
                    err.column()
                );
                Ok(Vec::new())
            }
            Snapshot::Loaded(books) => {
                debug!(
                    "event=catalog_load module=store status=ok source=file books={} duration_ms={}",
                    books.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(books)
            }
        }
    }

    fn save(&self, books: &[Book]) -> StoreResult<()> {
        let started_at = Instant::now();
        match write_atomically(self, books) {
            Ok(()) => {
                info!(
                    "event=catalog_save module=store status=ok books={} duration_ms={}",
                    books.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=catalog_save module=store status=error books={} duration_ms={} error_code=write_failed error={}",
                    books.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn classify(bytes: &[u8]) -> Snapshot {
    match serde_json::from_slice::<Vec<Book>>(bytes) {
        Ok(books) => Snapshot::Loaded(books),
        Err(err) => Snapshot::Malformed(err),
    }
}

fn encode(books: &[Book]) -> StoreResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    books.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

fn write_atomically(storage: &JsonFileStorage, books: &[Book]) -> StoreResult<()> {
    let encoded = encode(books)?;
    let dir = storage.parent_dir();
    std::fs::create_dir_all(dir).map_err(|err| storage.io_error(err))?;

    // Why: the temp file lives next to the target so `persist` is a same-filesystem
    // rename; a crash mid-write leaves the old catalog readable.
    let mut temp = NamedTempFile::new_in(dir).map_err(|err| storage.io_error(err))?;
    keep_existing_permissions(storage, &temp)?;
    temp.write_all(&encoded)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|err| storage.io_error(err))?;
    temp.persist(&storage.path)
        .map_err(|err| storage.io_error(err.error))?;
    Ok(())
}

// Why: `NamedTempFile` is created 0600; without this a shared 0644 catalog
// would silently turn private after the first save.
fn keep_existing_permissions(storage: &JsonFileStorage, temp: &NamedTempFile) -> StoreResult<()> {
    let permissions = match std::fs::metadata(&storage.path) {
        Ok(metadata) => metadata.permissions(),
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(storage.io_error(err)),
    };
    temp.as_file()
        .set_permissions(permissions)
        .map_err(|err| storage.io_error(err))
}
