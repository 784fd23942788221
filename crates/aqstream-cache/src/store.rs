//! On-disk date cache.

use aqstream_types::{AqError, MeasurementRecord, RecordKey};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{Deduped, dedup_records};

/// File name prefix shared by every cache entry.
const FILE_PREFIX: &str = "openaq_";

/// File name extension of cache entries.
const FILE_EXTENSION: &str = "json";

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No cache entry exists for the date.
    #[error("No cache entry for {0}")]
    Miss(NaiveDate),

    /// Failed to create the cache directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a cache entry.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a cache entry.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to move a finished entry into place.
    #[error("Failed to replace '{path}': {source}")]
    Persist {
        /// The entry that could not be replaced.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse a cache entry.
    #[error("Failed to parse cache file '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize a cache entry.
    #[error("Failed to serialize cache entry: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// Failed to list the cache directory.
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl From<CacheError> for AqError {
    fn from(error: CacheError) -> Self {
        Self::Cache(error.to_string())
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// The deduplicated records written by [`CacheStore::replace_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Day the snapshot belongs to.
    pub date: NaiveDate,
    /// Stored records, in the same order [`CacheStore::read_all`] returns them.
    pub records: Vec<MeasurementRecord>,
    /// Records dropped because a keying field was missing.
    pub dropped: usize,
}

#[derive(Serialize)]
struct EntryRef<'a> {
    date: NaiveDate,
    records: &'a BTreeMap<RecordKey, MeasurementRecord>,
}

#[derive(Deserialize)]
struct Entry {
    records: BTreeMap<RecordKey, MeasurementRecord>,
}

/// Persistent store of per-date record snapshots.
///
/// Each date is stored as `openaq_YYYYMMDD.json` under the cache root.
/// Replacement writes a temporary file next to the entry and renames it over
/// the old one, so a reader sees either the previous snapshot or the new
/// one. Writers are serialized through a lock shared by all clones of the
/// store.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory holding the cache entries.
    root: PathBuf,
    /// Held for the duration of a replacement.
    write_lock: Arc<Mutex<()>>,
}

impl CacheStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: PathBuf) -> Result<Self> {
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| CacheError::CreateDir {
                path: root.clone(),
                source: e,
            })?;
        }

        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Returns the default cache root.
    ///
    /// Uses the platform data directory (`~/.local/share/aqstream/cached` on
    /// Linux) and falls back to `~/.aqstream/cached`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "aqstream")
            .map_or_else(dirs_fallback, |proj_dirs| proj_dirs.data_dir().to_path_buf())
            .join("cached")
    }

    /// Creates a store at the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_default_path() -> Result<Self> {
        Self::new(Self::default_path())
    }

    /// Returns the cache root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the entry for `date`.
    #[must_use]
    pub fn cache_path(&self, date: NaiveDate) -> PathBuf {
        self.root.join(format!(
            "{FILE_PREFIX}{}.{FILE_EXTENSION}",
            date.format("%Y%m%d")
        ))
    }

    /// Returns true if an entry exists for `date`.
    #[must_use]
    pub fn exists(&self, date: NaiveDate) -> bool {
        self.cache_path(date).is_file()
    }

    /// Replaces the entry for `date` with the deduplicated `records`.
    ///
    /// Whatever was stored before is discarded; the new entry holds exactly
    /// one record per key, the last occurrence in `records` winning.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written. The previous entry,
    /// if any, is left untouched in that case.
    pub fn replace_all<I>(&self, date: NaiveDate, records: I) -> Result<Snapshot>
    where
        I: IntoIterator<Item = MeasurementRecord>,
    {
        let deduped = dedup_records(records);
        self.store_deduped(date, &deduped)?;

        Ok(Snapshot {
            date,
            dropped: deduped.dropped,
            records: deduped.into_records(),
        })
    }

    /// Writes an already deduplicated record set as the entry for `date`.
    ///
    /// This is the write half of [`Self::replace_all`], for callers that
    /// need to keep the records when the write fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written. The previous entry,
    /// if any, is left untouched in that case.
    pub fn store_deduped(&self, date: NaiveDate, deduped: &Deduped) -> Result<()> {
        let path = self.cache_path(date);

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut file = NamedTempFile::new_in(&self.root).map_err(|e| CacheError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer_pretty(
                &mut writer,
                &EntryRef {
                    date,
                    records: &deduped.entries,
                },
            )?;
            writer.flush().map_err(|e| CacheError::WriteFile {
                path: path.clone(),
                source: e,
            })?;
        }

        file.as_file().sync_all().map_err(|e| CacheError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        file.persist(&path).map_err(|e| CacheError::Persist {
            path: path.clone(),
            source: e.error,
        })?;

        log::debug!("cached {} records at {}", deduped.len(), path.display());
        Ok(())
    }

    /// Reads every record stored for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Miss`] if no entry exists, or an error if the
    /// entry cannot be read or parsed.
    pub fn read_all(&self, date: NaiveDate) -> Result<Vec<MeasurementRecord>> {
        let path = self.cache_path(date);

        if !path.is_file() {
            return Err(CacheError::Miss(date));
        }

        let content = fs::read_to_string(&path).map_err(|e| CacheError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        let entry: Entry =
            serde_json::from_str(&content).map_err(|e| CacheError::ParseJson { path, source: e })?;

        Ok(entry.records.into_values().collect())
    }

    /// Lists the dates that have a cache entry, ascending.
    ///
    /// Files that do not follow the entry naming scheme are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be read.
    pub fn list_dates(&self) -> Result<Vec<NaiveDate>> {
        let entries = fs::read_dir(&self.root).map_err(|e| CacheError::ReadDir {
            path: self.root.clone(),
            source: e,
        })?;

        let mut dates = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| CacheError::ReadDir {
                path: self.root.clone(),
                source: e,
            })?;

            if let Some(date) = date_from_path(&entry.path()) {
                dates.push(date);
            }
        }

        dates.sort_unstable();
        Ok(dates)
    }
}

/// Recovers the date from an entry path such as `openaq_20200501.json`.
fn date_from_path(path: &Path) -> Option<NaiveDate> {
    if path.extension()? != FILE_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.strip_prefix(FILE_PREFIX)?;
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".aqstream")
}
