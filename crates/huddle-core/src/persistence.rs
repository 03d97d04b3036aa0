//! JSON persistence of the current snapshot.
//!
//! Only the current snapshot is saved; history does not survive a restart.
//! Loading validates every field and every relationship, so a file that
//! would break a store invariant is rejected as a whole.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use huddle_store::{EntityStore, StoreError};
use huddle_types::{Event, Person};

/// Version written to every saved file.
pub const FORMAT_VERSION: u32 = 1;

/// Errors raised while loading or saving the data file.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid JSON or a field failed validation.
    #[error("malformed data in {}: {source}", .path.display())]
    Json {
        /// The file involved.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The file was written by an incompatible version.
    #[error("unsupported data format version {found} (expected {FORMAT_VERSION})")]
    UnsupportedVersion {
        /// The version found in the file.
        found: u32,
    },

    /// The records break a store invariant.
    #[error("invalid data: {source}")]
    InvalidData {
        /// The violated invariant.
        #[from]
        source: StoreError,
    },
}

#[derive(Serialize)]
struct StoredBookRef<'s> {
    version: u32,
    people: &'s [Person],
    events: &'s [Event],
}

#[derive(Deserialize)]
struct StoredBook {
    version: u32,
    #[serde(default)]
    people: Vec<Person>,
    #[serde(default)]
    events: Vec<Event>,
}

/// Load a store from the JSON file at `path`.
///
/// # Errors
///
/// Returns [`PersistenceError`] if the file cannot be read, is malformed,
/// has another format version, or breaks a store invariant.
pub fn load(path: &Path) -> Result<EntityStore, PersistenceError> {
    let contents = std::fs::read(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let book: StoredBook =
        serde_json::from_slice(&contents).map_err(|source| PersistenceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    if book.version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: book.version,
        });
    }

    let store = EntityStore::from_parts(book.people, book.events)?;
    info!(
        path = %path.display(),
        people = store.people().len(),
        events = store.events().len(),
        "data file loaded"
    );
    Ok(store)
}

/// Load the store at `path`, or an empty store if the file does not exist.
///
/// # Errors
///
/// Returns [`PersistenceError`] if the file exists but cannot be loaded.
pub fn load_or_default(path: &Path) -> Result<EntityStore, PersistenceError> {
    if !path.exists() {
        info!(path = %path.display(), "no data file, starting empty");
        return Ok(EntityStore::new());
    }
    load(path)
}

/// Write `store` to `path`, replacing any existing file atomically.
///
/// The JSON is written to a temporary file next to `path` and renamed over
/// it, so a crash mid-write leaves the previous file intact.
///
/// # Errors
///
/// Returns [`PersistenceError::Io`] if the directory or file cannot be
/// written, or [`PersistenceError::Json`] if serialization fails.
pub fn save(path: &Path, store: &EntityStore) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let book = StoredBookRef {
        version: FORMAT_VERSION,
        people: store.people(),
        events: store.events(),
    };
    let json = serde_json::to_vec_pretty(&book).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let temp = temp_path(path);
    std::fs::write(&temp, json).map_err(io_err)?;
    if let Err(err) = std::fs::rename(&temp, path) {
        std::fs::remove_file(&temp).ok();
        return Err(io_err(err));
    }

    debug!(
        path = %path.display(),
        people = store.people().len(),
        events = store.events().len(),
        "data file saved"
    );
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", Uuid::now_v7().simple()));
    path.with_file_name(name)
}
