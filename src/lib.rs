//! # Chatstat
//!
//! Frequency statistics for exported chat logs.
//!
//! ## Overview
//!
//! Chatstat reads a plain-text chat export where every message starts with a
//! header line:
//!
//! ```text
//! D.M.YYYY, H:MM - <sender>: <first line of the message>
//! <continuation lines...>
//! ```
//!
//! and folds each message into a set of frequency tables: messages per hour,
//! month, year, date and sender, per-person word, bigram and trigram counts,
//! media attachments, and who tends to answer whom. Sender labels (often raw
//! phone numbers) are mapped to canonical names once per chat, and a sender
//! can be excluded from the statistics entirely.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatstat::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let parser = ChatParser::new();
//!     let mut resolver = MappingResolver::from_json_file("names.json")?;
//!     let chat = parser.parse_file("chat_family.txt", &mut resolver)?;
//!
//!     let report = Report::new(&chat.stats);
//!     for entry in report.top_words(10) {
//!         println!("{}: {}", entry.key, entry.count);
//!     }
//!
//!     HistoryStore::new("history.json").persist_stats(&chat.name, &chat.stats)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — [`ChatParser`](parser::ChatParser), the single-pass log reader
//! - [`parsing`] — header line classification and tokenization
//! - [`normalizer`] — sender name resolution
//!   - [`NameResolver`](normalizer::NameResolver), [`PromptResolver`](normalizer::PromptResolver),
//!     [`MappingResolver`](normalizer::MappingResolver)
//! - [`stats`] — [`ChatStats`](stats::ChatStats) tables and ranked [`Report`](stats::Report) views
//! - [`history`] — one-time [`HistoryStore`](history::HistoryStore) cache
//! - [`config`] — [`StatsConfig`](config::StatsConfig)
//! - [`error`] — [`ChatstatError`], [`Result`]
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod message;
pub mod normalizer;
pub mod parser;
pub mod parsing;
pub mod stats;

pub use error::{ChatstatError, Result};
pub use message::ParsedMessage;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatstat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ParsedMessage;

    pub use crate::error::{ChatstatError, Result};

    pub use crate::config::{StatsConfig, WordGroupSet};

    pub use crate::parser::{ChatParser, ParseSummary, ParsedChat};

    pub use crate::normalizer::{
        MappingResolver, NameResolver, PersonNormalizer, PromptResolver, Resolution,
    };

    pub use crate::stats::{ChatStats, RankedEntry, Report, WordGroup};

    pub use crate::history::{HistoryStore, PersistOutcome};
}
