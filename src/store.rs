//! Generic file-backed record storage.
//!
//! A [`RecordStore`] persists a homogeneous list of records as a single
//! pretty-printed JSON array at `<cache-dir>/<file-name>`. The file is read
//! and rewritten wholesale on every update — collection sizes are bounded by
//! one person's bookmarks and stars, so the O(n) rewrite keeps the format
//! trivially inspectable without partial-update bugs.
//!
//! There is no locking: the design assumes a single active CLI invocation
//! per cache file, and concurrent external writers get last-writer-wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};

/// Resolve the cache directory: the configured override, or
/// `~/.cache/shelfmark`.
pub fn cache_dir(config: &Config) -> Result<PathBuf> {
    if let Some(dir) = &config.cache.dir {
        return Ok(dir.clone());
    }

    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("could not determine home directory".to_string()))?;
    Ok(home.join(".cache").join("shelfmark"))
}

/// Remove every regular file inside the cache directory, leaving the
/// directory itself in place. Returns the number of files removed; a
/// missing directory removes nothing.
pub fn clear_cache_dir(dir: &Path) -> Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err.into()),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Durable list-of-`T` persistence at a fixed path.
pub struct RecordStore<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T> RecordStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a store for `file_name` inside `dir`, creating the directory
    /// if it does not exist yet.
    pub fn open(dir: &Path, file_name: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(file_name),
            _record: PhantomData,
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all persisted records in file order.
    ///
    /// A missing backing file yields an empty list, not an error.
    pub fn read(&self) -> Result<Vec<T>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let items = serde_json::from_str(&data)
            .map_err(|err| Error::Decode(format!("malformed cache {}: {}", self.path.display(), err)))?;
        Ok(items)
    }

    /// Serialize `items` and overwrite the entire file.
    pub fn write_all(&self, items: &[T]) -> Result<()> {
        let data = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    /// Remove every persisted record for which `matches` returns true, then
    /// append `new_items` and write the result back.
    ///
    /// Surviving records are not cross-checked against the new items for
    /// duplicates — de-duplication is the caller's responsibility via the
    /// predicate.
    pub fn merge_update<F>(&self, matches: F, new_items: Vec<T>) -> Result<()>
    where
        F: Fn(&T) -> bool,
    {
        let mut items: Vec<T> = self
            .read()?
            .into_iter()
            .filter(|item| !matches(item))
            .collect();
        items.extend(new_items);
        self.write_all(&items)
    }

    /// True if the backing file does not exist or its last-modified time is
    /// strictly older than `max_age`.
    pub fn is_stale(&self, max_age: Duration) -> Result<bool> {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(true),
            Err(err) => return Err(err.into()),
        };

        let modified = metadata.modified()?;
        let elapsed = modified.elapsed().unwrap_or_default();
        Ok(elapsed > max_age)
    }
}
