//! Flat-file adapter: the whole hotel state as one JSON document.
//!
//! Commits write a sibling temp file, fsync it, rename it over the document
//! and fsync the directory, so a crash mid-write leaves the previous commit in
//! place. A document that is not JSON is moved aside to
//! `<file>.corrupt.<millis>` and the store resumes from an empty state. A JSON
//! document with a damaged top level (non-array `rooms`, `null` counters) is
//! repaired on read; records that still don't fit are a
//! [`StorageError::Decode`] and the file is left untouched.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};
use sunin_core::port::{PersistencePort, StorageError};
use sunin_core::HotelState;
use tempfile::NamedTempFile;

pub const DATA_FILE_NAME: &str = "hotel-sunin-data.json";

/// How often a read restarts because a commit replaced the document under it.
const READ_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    /// Held while the document is replaced, either by a commit or by a
    /// quarantine, so a reader never moves aside a file it did not read.
    replace_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Use `data_dir/hotel-sunin-data.json`, creating the directory if needed.
    pub fn open(data_dir: impl AsRef<Path>) -> io::Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join(DATA_FILE_NAME),
            replace_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PersistencePort for FileStore {
    async fn load(&self) -> Result<HotelState, StorageError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.read_state())
            .await
            .map_err(StorageError::backend)?
    }

    async fn commit(&self, state: &HotelState) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.write_atomically(&bytes))
            .await
            .map_err(StorageError::backend)?
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

impl FileStore {
    fn lock_replace(&self) -> MutexGuard<'_, ()> {
        self.replace_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read_state(&self) -> Result<HotelState, StorageError> {
        let path = self.path.as_path();
        for _ in 0..READ_ATTEMPTS {
            let mut file = match fs::File::open(path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HotelState::default()),
                Err(e) => return Err(StorageError::io(path, e)),
            };
            let mut raw = Vec::new();
            file.read_to_end(&mut raw)
                .map_err(|e| StorageError::io(path, e))?;

            let reason = match serde_json::from_slice::<Value>(&raw) {
                Ok(Value::Object(doc)) => return decode(path, doc),
                Ok(other) => format!("expected a JSON object, found {}", json_kind(&other)),
                Err(syntax) => syntax.to_string(),
            };
            if self.quarantine(file, &reason)? {
                return Ok(HotelState::default());
            }
        }
        Err(StorageError::io(
            path,
            io::Error::other("document kept changing while it was being read"),
        ))
    }

    /// Move the unreadable document aside if it is still the file that was
    /// read. Returns `false` when a commit has replaced it since.
    fn quarantine(&self, read_from: fs::File, reason: &str) -> Result<bool, StorageError> {
        let path = self.path.as_path();
        let _replacing = self.lock_replace();

        match is_same_file(&read_from, path) {
            Ok(true) => {}
            Ok(false) => return Ok(false),
            // Another reader already moved it aside.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(StorageError::io(path, e)),
        }
        drop(read_from);

        let quarantined = quarantine_path(path);
        fs::rename(path, &quarantined).map_err(|e| StorageError::io(path, e))?;
        tracing::error!(
            path = %path.display(),
            quarantined = %quarantined.display(),
            error = %reason,
            "Stored hotel data is corrupt; moved aside and starting empty"
        );
        Ok(true)
    }

    fn write_atomically(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path.as_path();
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
        tmp.write_all(bytes).map_err(|e| StorageError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StorageError::io(tmp.path(), e))?;

        let _replacing = self.lock_replace();
        // Dropping the temp file on error removes it.
        tmp.persist(path)
            .map_err(|e| StorageError::io(path, e.error))?;
        // The new document is already visible; a failed directory sync only
        // weakens durability across a crash.
        if let Err(e) = sync_dir(dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to sync data directory");
        }
        Ok(())
    }
}

/// Repair the top level the way older data files need it, then decode.
fn decode(path: &Path, mut doc: Map<String, Value>) -> Result<HotelState, StorageError> {
    for key in ["rooms", "bookings"] {
        if !doc.get(key).is_some_and(Value::is_array) {
            doc.insert(key.to_string(), Value::Array(Vec::new()));
        }
    }
    for key in ["nextRoomId", "nextBookingId", "nextSettingsId"] {
        if doc.get(key).is_some_and(Value::is_null) {
            doc.remove(key);
        }
    }
    serde_json::from_value(Value::Object(doc)).map_err(|source| StorageError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(unix)]
fn is_same_file(file: &fs::File, path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let held = file.metadata()?;
    let current = fs::metadata(path)?;
    Ok(held.dev() == current.dev() && held.ino() == current.ino())
}

#[cfg(not(unix))]
fn is_same_file(_file: &fs::File, path: &Path) -> io::Result<bool> {
    fs::metadata(path).map(|_| true)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// `<file>.corrupt.<millis>`, with a `.<n>` suffix if that name is taken.
fn quarantine_path(path: &Path) -> PathBuf {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut base = path.file_name().unwrap_or_default().to_os_string();
    base.push(format!(".corrupt.{millis}"));

    let mut candidate = path.with_file_name(&base);
    let mut n = 1;
    while fs::symlink_metadata(&candidate).is_ok() {
        let mut name = base.clone();
        name.push(format!(".{n}"));
        candidate = path.with_file_name(name);
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarantine_name_keeps_the_original_file_name() {
        let quarantined = quarantine_path(Path::new("/var/lib/sunin/hotel-sunin-data.json"));
        let name = quarantined.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("hotel-sunin-data.json.corrupt."), "{name}");
        assert_eq!(quarantined.parent(), Some(Path::new("/var/lib/sunin")));
    }

    #[test]
    fn quarantine_name_skips_taken_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATA_FILE_NAME);

        let first = quarantine_path(&path);
        fs::write(&first, b"old").unwrap();
        let second = quarantine_path(&path);
        assert_ne!(first, second);
        assert!(!second.exists());
    }

    #[cfg(unix)]
    #[test]
    fn replaced_document_is_not_quarantined() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(store.path(), b"{ torn").unwrap();
        let stale = fs::File::open(store.path()).unwrap();

        // A commit lands between the read and the quarantine.
        store.write_atomically(b"{\"rooms\": []}").unwrap();

        assert!(!store.quarantine(stale, "torn").unwrap());
        assert_eq!(fs::read(store.path()).unwrap(), b"{\"rooms\": []}");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn top_level_is_repaired_before_decoding() {
        let doc = serde_json::json!({
            "rooms": "not a list",
            "nextRoomId": null,
            "nextBookingId": 7,
        });
        let Value::Object(doc) = doc else { unreachable!() };
        let state = decode(Path::new("data.json"), doc).unwrap();
        assert!(state.rooms.is_empty());
        assert!(state.bookings.is_empty());
        assert_eq!(state.next_room_id, 1);
        assert_eq!(state.next_booking_id, 7);
    }
}
