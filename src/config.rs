//! Configuration types for parsing and aggregation.
//!
//! This module provides a plain configuration struct for library usage,
//! without any CLI framework dependencies.
//!
//! # Example
//!
//! ```rust
//! use chatstat::config::StatsConfig;
//!
//! let config = StatsConfig::new()
//!     .with_media_placeholders(["<Media omitted>"])
//!     .with_exclusion_sentinel("skip");
//!
//! assert!(config.media_placeholders.contains("<Media omitted>"));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChatstatError, Result};
use crate::stats::WordGroup;

/// Placeholder the Hebrew-locale export writes instead of an attachment.
pub const DEFAULT_MEDIA_PLACEHOLDERS: &[&str] = &["<המדיה לא נכללה>"];

/// Answer that tells the person resolver to drop a sender entirely.
pub const DEFAULT_EXCLUSION_SENTINEL: &str = "dont";

/// Common function words, kept available for filtering ranked word views.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "לא", "מה", "מדיה", "זה", "את", "של", "על", "יש", "אתה", "עם", "אני", "אין", "הוא", "אבל",
    "איזה", "גם", "כל", "לי", "רק", "היה", "אם", "טוב", "חייב", "כן",
];

/// Word-group sets reported by default, titled as they are printed.
pub const DEFAULT_WORD_GROUP_SETS: &[(&str, &[&[&str]])] = &[
    (
        "Curses Words",
        &[
            &["זונה", "הזונה", "זונות", "הזונות", "בנזונה", "זנות"],
            &["סתום", "טיפש", "אידיוט", "מפגר", "דבע"],
            &["זין", "זיןן"],
            &[
                "מזדיין", "מדיינת", "זדיין", "זיין", "זיינתי", "זיינו", "הזדיינתי", "תזדיינו",
                "להזדיין",
            ],
            &["שרמוטה", "שרמוטות"],
        ],
    ),
    (
        "Good Words",
        &[
            &["אוהב", "מאוהב", "אהבתי", "אהבה", "לאהוב"],
            &["תודה", "תודות", "להודות", "מודה"],
            &["שמח", "שמחתי", "לשמוח", "לחייך", "חיוך"],
            &["טוב", "טובה", "לטובה", "טובב", "יופי"],
        ],
    ),
];

/// Exact message bodies that stand for a non-text attachment.
///
/// Serialized as a plain list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaPlaceholders(Vec<String>);

impl MediaPlaceholders {
    /// Creates a placeholder set.
    pub fn new<I, S>(placeholders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(placeholders.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if `body` is exactly one of the placeholders.
    pub fn contains(&self, body: &str) -> bool {
        self.0.iter().any(|p| p == body)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for MediaPlaceholders {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_PLACEHOLDERS.iter().copied())
    }
}

/// A titled collection of word groups, reported as one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordGroupSet {
    pub title: String,
    pub groups: Vec<WordGroup>,
}

impl WordGroupSet {
    pub fn new(title: impl Into<String>, groups: Vec<WordGroup>) -> Self {
        Self {
            title: title.into(),
            groups,
        }
    }

    /// The built-in sets.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_WORD_GROUP_SETS
            .iter()
            .map(|(title, groups)| {
                let groups = groups
                    .iter()
                    .map(|forms| WordGroup::new(forms.iter().copied()))
                    .collect();
                Self::new(*title, groups)
            })
            .collect()
    }
}

/// Configuration for parsing a chat export into statistics.
///
/// # Example
///
/// ```rust
/// use chatstat::config::StatsConfig;
///
/// let config = StatsConfig::default();
/// assert_eq!(config.exclusion_sentinel, "dont");
/// assert!(config.history_path.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Exact message bodies that stand for a non-text attachment
    pub media_placeholders: MediaPlaceholders,

    /// Words available for filtering ranked views (never applied while aggregating)
    pub stop_words: Vec<String>,

    /// Resolver answer that excludes a sender from all statistics (default: "dont")
    ///
    /// The parser never reads it. Resolvers pick it up through
    /// `MappingResolver::from_config` or `PromptResolver::from_config`.
    pub exclusion_sentinel: String,

    /// Location of the history store, if persistence is wanted
    pub history_path: Option<PathBuf>,

    /// Titled word-group sets for the report
    pub word_groups: Vec<WordGroupSet>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            media_placeholders: MediaPlaceholders::default(),
            stop_words: DEFAULT_STOP_WORDS.iter().map(ToString::to_string).collect(),
            exclusion_sentinel: DEFAULT_EXCLUSION_SENTINEL.to_string(),
            history_path: None,
            word_groups: WordGroupSet::defaults(),
        }
    }
}

impl StatsConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        if config.exclusion_sentinel.trim().is_empty() {
            return Err(ChatstatError::invalid_config(
                "exclusion_sentinel must not be empty",
                Some(path.to_path_buf()),
            ));
        }
        Ok(config)
    }

    /// Replaces the media placeholder set.
    #[must_use]
    pub fn with_media_placeholders<I, S>(mut self, placeholders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media_placeholders = MediaPlaceholders::new(placeholders);
        self
    }

    /// Replaces the stop-word list.
    #[must_use]
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the resolver answer that excludes a sender.
    #[must_use]
    pub fn with_exclusion_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.exclusion_sentinel = sentinel.into();
        self
    }

    /// Replaces the word-group sets.
    #[must_use]
    pub fn with_word_groups(mut self, sets: Vec<WordGroupSet>) -> Self {
        self.word_groups = sets;
        self
    }

    /// Sets the history store location.
    #[must_use]
    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }

    /// Returns `true` if `word` is in the stop-word list.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.iter().any(|w| w == word)
    }
}
