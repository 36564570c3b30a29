//! One-time history cache.
//!
//! The history store is a JSON object keyed by chat name. Each entry keeps
//! four summary tables of a chat the first time it is analyzed:
//!
//! ```json
//! {
//!   "chat_family": {
//!     "hour_dict": { "9": 12, "21": 40 },
//!     "month_dict": { "1": 30, "2": 22 },
//!     "year_dict": { "2024": 52 },
//!     "name_dict": { "Dana": 30, "Avi": 22 }
//!   }
//! }
//! ```
//!
//! Entries are never overwritten, and the store is never created
//! implicitly: a missing file means history is disabled for this run.
//! Updates go to a temporary file next to the store which is then renamed
//! over it, so an interrupted write leaves the previous store intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::Result;
use crate::stats::{ChatStats, Tally};

/// What [`HistoryStore::maybe_persist`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// A new entry was added and the store rewritten.
    Written,
    /// The chat already had an entry; the store was left untouched.
    AlreadyPresent,
    /// The store file does not exist; nothing was written.
    StoreMissing,
}

#[derive(Serialize)]
struct HistoryEntry<'a> {
    hour_dict: &'a Tally<u32>,
    month_dict: &'a Tally<u32>,
    year_dict: &'a Tally<i32>,
    name_dict: &'a Tally<String>,
}

/// Handle on a history store file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Points at a store file. The file is not touched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Writes an empty store (`{}`) at `path`, replacing any existing file.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        fs::write(&store.path, "{}")?;
        Ok(store)
    }

    /// Store file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the store file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the whole store.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or is not a JSON object.
    pub fn load(&self) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Returns `true` if `chat_name` already has an entry.
    pub fn contains(&self, chat_name: &str) -> Result<bool> {
        Ok(self.exists() && self.load()?.contains_key(chat_name))
    }

    /// Stores the four summary tables under `chat_name` unless the chat is
    /// already known or the store does not exist.
    ///
    /// Other entries are kept as they are, whatever their shape.
    pub fn maybe_persist(
        &self,
        chat_name: &str,
        hours: &Tally<u32>,
        months: &Tally<u32>,
        years: &Tally<i32>,
        people: &Tally<String>,
    ) -> Result<PersistOutcome> {
        if !self.exists() {
            info!(
                path = %self.path.display(),
                "history store not found, skipping history for {chat_name}"
            );
            return Ok(PersistOutcome::StoreMissing);
        }

        let mut document = self.load()?;
        if document.contains_key(chat_name) {
            info!(chat = chat_name, "chat already in history");
            return Ok(PersistOutcome::AlreadyPresent);
        }

        let entry = HistoryEntry {
            hour_dict: hours,
            month_dict: months,
            year_dict: years,
            name_dict: people,
        };
        document.insert(chat_name.to_string(), serde_json::to_value(entry)?);
        self.replace_contents(&serde_json::to_string_pretty(&document)?)?;

        info!(chat = chat_name, path = %self.path.display(), "chat added to history");
        Ok(PersistOutcome::Written)
    }

    fn replace_contents(&self, contents: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(contents.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// [`maybe_persist`](Self::maybe_persist) with the tables of `stats`.
    pub fn persist_stats(&self, chat_name: &str, stats: &ChatStats) -> Result<PersistOutcome> {
        self.maybe_persist(
            chat_name,
            stats.hours(),
            stats.months(),
            stats.years(),
            stats.people(),
        )
    }
}
