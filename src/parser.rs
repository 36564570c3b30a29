//! Chat log parser.
//!
//! [`ChatParser`] reads an export line by line, assembles each message from
//! its header and continuation lines, resolves the sender through a
//! [`NameResolver`], and folds every finished message into a fresh
//! [`ChatStats`].
//!
//! # Example
//!
//! ```rust
//! use chatstat::normalizer::MappingResolver;
//! use chatstat::parser::ChatParser;
//!
//! let log = "\
//! 1.2.2024, 9:05 - +972 50-123-4567: good morning
//! and a second line
//! 1.2.2024, 9:07 - Avi: morning!
//! ";
//!
//! let mut resolver = MappingResolver::new().with_name("+972 50-123-4567", "Dana");
//! let chat = ChatParser::new().parse_str("family", log, &mut resolver)?;
//!
//! assert_eq!(chat.stats.people().get("Dana"), 1);
//! assert_eq!(chat.stats.words().total("line"), 1);
//! assert_eq!(chat.stats.transitions().count("Dana", "Avi"), 1);
//! assert_eq!(chat.summary.recorded, 2);
//! # Ok::<(), chatstat::ChatstatError>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::StatsConfig;
use crate::error::{ChatstatError, Result};
use crate::message::ParsedMessage;
use crate::normalizer::{NameResolver, PersonNormalizer, Resolution};
use crate::parsing::header::{LineClassifier, MessageHeader};
use crate::stats::ChatStats;

/// Read buffer for chat files.
const BUFFER_SIZE: usize = 64 * 1024;

/// Counters describing one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    /// Lines read from the input
    pub lines_read: usize,
    /// Messages folded into the statistics
    pub recorded: usize,
    /// Messages skipped because of an unreadable date or time
    pub dropped: usize,
    /// Messages skipped because their sender is excluded
    pub excluded: usize,
    /// Continuation lines seen while no message was open
    pub orphan_lines: usize,
}

/// Statistics for one chat, with its name and parse counters.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedChat {
    pub name: String,
    pub stats: ChatStats,
    pub summary: ParseSummary,
}

/// Single-pass parser for chat exports.
///
/// Each `parse_*` call starts from empty tables and an empty name mapping;
/// nothing carries over between chats except the resolver itself.
#[derive(Debug, Clone)]
pub struct ChatParser {
    config: StatsConfig,
    classifier: LineClassifier,
}

impl ChatParser {
    /// Creates a parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(StatsConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: StatsConfig) -> Self {
        Self {
            config,
            classifier: LineClassifier::new(),
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Parses a chat export file. The chat is named after the file.
    ///
    /// # Errors
    ///
    /// - [`ChatstatError::Io`] if the file cannot be opened or read
    /// - [`ChatstatError::Resolution`] if the resolver fails
    pub fn parse_file<N>(&self, path: impl AsRef<Path>, resolver: &mut N) -> Result<ParsedChat>
    where
        N: NameResolver + ?Sized,
    {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(BUFFER_SIZE, file);
        self.parse_reader(chat_name(path), reader, resolver)
    }

    /// Parses chat content already in memory.
    pub fn parse_str<N>(
        &self,
        name: impl Into<String>,
        content: &str,
        resolver: &mut N,
    ) -> Result<ParsedChat>
    where
        N: NameResolver + ?Sized,
    {
        self.parse_reader(name, Cursor::new(content), resolver)
    }

    /// Parses chat content from any buffered reader, strictly line by line.
    pub fn parse_reader<R, N>(
        &self,
        name: impl Into<String>,
        reader: R,
        resolver: &mut N,
    ) -> Result<ParsedChat>
    where
        R: BufRead,
        N: NameResolver + ?Sized,
    {
        let name = name.into();
        let (stats, summary) = self.run(&name, reader, resolver)?;
        Ok(ParsedChat {
            name,
            stats,
            summary,
        })
    }

    #[instrument(level = "debug", skip_all, fields(chat = %name))]
    fn run<R, N>(
        &self,
        name: &str,
        mut reader: R,
        resolver: &mut N,
    ) -> Result<(ChatStats, ParseSummary)>
    where
        R: BufRead,
        N: NameResolver + ?Sized,
    {
        let mut run = ParseRun::new(&self.config, resolver);
        let mut line = String::with_capacity(1024);

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            run.summary.lines_read += 1;

            let text = if run.summary.lines_read == 1 {
                line.trim_start_matches('\u{feff}')
            } else {
                line.as_str()
            };

            match self.classifier.classify(text) {
                Some(header) => run.on_header(&header)?,
                None => run.on_continuation(text),
            }
        }

        Ok(run.finish())
    }
}

impl Default for ChatParser {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one parse: the open message, the last recorded sender, and the
/// tables being filled.
struct ParseRun<'r, N: ?Sized> {
    normalizer: PersonNormalizer<'r, N>,
    stats: ChatStats,
    summary: ParseSummary,
    pending: Option<ParsedMessage>,
    previous_person: Option<String>,
}

impl<'r, N: NameResolver + ?Sized> ParseRun<'r, N> {
    fn new(config: &StatsConfig, resolver: &'r mut N) -> Self {
        Self {
            normalizer: PersonNormalizer::new(resolver),
            stats: ChatStats::new(config),
            summary: ParseSummary::default(),
            pending: None,
            previous_person: None,
        }
    }

    fn on_header(&mut self, header: &MessageHeader<'_>) -> Result<()> {
        self.flush();

        let person = match self.normalizer.resolve(header.person)? {
            Resolution::Name(name) => name.clone(),
            Resolution::Exclude => {
                self.summary.excluded += 1;
                return Ok(());
            }
        };

        match header.timestamp() {
            Ok((date, time)) => {
                self.pending = Some(ParsedMessage::new(person, date, time, header.body.trim()));
            }
            Err(e) => {
                let err = ChatstatError::invalid_header(self.summary.lines_read, e.to_string());
                warn!(date = header.date, time = header.time, "dropping message: {err}");
                self.summary.dropped += 1;
            }
        }
        Ok(())
    }

    fn on_continuation(&mut self, line: &str) {
        match self.pending.as_mut() {
            Some(message) => {
                message.body.push(' ');
                message.body.push_str(line.trim());
            }
            None => self.summary.orphan_lines += 1,
        }
    }

    fn flush(&mut self) {
        if let Some(message) = self.pending.take() {
            self.stats.record(&message, self.previous_person.as_deref());
            self.previous_person = Some(message.person);
            self.summary.recorded += 1;
        }
    }

    fn finish(mut self) -> (ChatStats, ParseSummary) {
        self.flush();
        debug!(
            recorded = self.summary.recorded,
            dropped = self.summary.dropped,
            excluded = self.summary.excluded,
            senders = self.normalizer.mapping().len(),
            "chat parsed"
        );
        (self.stats, self.summary)
    }
}

/// Derives a chat name from a file path: the file name up to its first dot.
///
/// ```
/// use chatstat::parser::chat_name;
/// use std::path::Path;
///
/// assert_eq!(chat_name(Path::new("files/chat_family.txt")), "chat_family");
/// assert_eq!(chat_name(Path::new("export.2024.txt")), "export");
/// ```
pub fn chat_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|n| n.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::MappingResolver;

    fn parse(content: &str) -> ParsedChat {
        ChatParser::new()
            .parse_str("test", content, &mut MappingResolver::new())
            .unwrap()
    }

    #[test]
    fn test_single_message() {
        let chat = parse("26.10.2025, 20:40 - Alice: Hello there\n");
        assert_eq!(chat.name, "test");
        assert_eq!(chat.stats.people().get("Alice"), 1);
        assert_eq!(chat.stats.hours().get(&20), 1);
        assert_eq!(chat.summary.recorded, 1);
        assert_eq!(chat.summary.lines_read, 1);
    }

    #[test]
    fn test_multiline_message_joined_with_spaces() {
        let chat = parse("1.2.2024, 9:05 - Bob: first\n   second line  \nthird\n");

        assert_eq!(chat.summary.recorded, 1);
        assert_eq!(chat.stats.hours().get(&9), 1);
        assert_eq!(chat.stats.trigrams().total("first second line"), 1);
        assert_eq!(chat.stats.trigrams().total("second line third"), 1);
    }

    #[test]
    fn test_leading_noise_is_ignored() {
        let chat = parse("exported by phone\n\n1.2.2024, 9:05 - Bob: hi there\n");
        assert_eq!(chat.summary.orphan_lines, 2);
        assert_eq!(chat.summary.recorded, 1);
        assert_eq!(chat.stats.words().len(), 2);
    }

    #[test]
    fn test_byte_order_mark_on_first_line() {
        let chat = parse("\u{feff}1.2.2024, 9:05 - Bob: hi there\n");
        assert_eq!(chat.summary.recorded, 1);
        assert_eq!(chat.summary.orphan_lines, 0);
    }

    #[test]
    fn test_crlf_line_endings() {
        let chat = parse("1.2.2024, 9:05 - Bob: <המדיה לא נכללה>\r\n1.2.2024, 9:06 - Bob: ok\r\n");
        assert_eq!(chat.stats.media().count_for("Bob"), 1);
        assert_eq!(chat.summary.recorded, 2);
    }

    #[test]
    fn test_malformed_header_is_dropped() {
        let chat = parse(
            "1.2.2024, 9:05 - Alice: one\n\
             31.2.2024, 9:06 - Bob: impossible date\n\
             continuation of the dropped message\n\
             1.2.2024, 9:07 - Carol: three\n",
        );

        assert_eq!(chat.summary.recorded, 2);
        assert_eq!(chat.summary.dropped, 1);
        assert_eq!(chat.summary.orphan_lines, 1);
        assert_eq!(chat.stats.people().get("Bob"), 0);
        // Alice stays the previous sender
        assert_eq!(chat.stats.transitions().count("Alice", "Carol"), 1);
        assert_eq!(chat.stats.words().total("continuation"), 0);
    }

    #[test]
    fn test_header_with_empty_body() {
        let chat = parse("1.2.2024, 9:05 - Bob: \nfilled in later\n");
        assert_eq!(chat.summary.recorded, 1);
        assert_eq!(chat.stats.bigrams().total("filled in"), 1);
    }

    #[test]
    fn test_empty_input() {
        let chat = parse("");
        assert!(chat.stats.is_empty());
        assert_eq!(chat.summary, ParseSummary::default());
    }

    #[test]
    fn test_exclusion_skips_sender_and_transition() {
        let mut resolver = MappingResolver::new().with_name("bot", "dont");
        let chat = ChatParser::new()
            .parse_str(
                "test",
                "1.2.2024, 9:05 - Alice: hi\n\
                 1.2.2024, 9:06 - bot: automated notice\n\
                 more notice text\n\
                 1.2.2024, 9:07 - Bob: hello\n",
                &mut resolver,
            )
            .unwrap();

        assert_eq!(chat.summary.excluded, 1);
        assert_eq!(chat.summary.orphan_lines, 1);
        assert_eq!(chat.stats.people().get("bot"), 0);
        assert_eq!(chat.stats.words().total("notice"), 0);
        assert_eq!(chat.stats.transitions().count("Alice", "Bob"), 1);
        assert!(chat.stats.transitions().followers("bot").is_none());
    }

    #[test]
    fn test_resolver_failure_is_fatal() {
        let mut resolver =
            |raw: &str| -> Result<Resolution> { Err(ChatstatError::resolution(raw, "no answer")) };
        let err = ChatParser::new()
            .parse_str("test", "1.2.2024, 9:05 - Alice: hi\n", &mut resolver)
            .unwrap_err();
        assert!(err.is_resolution());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ChatParser::new()
            .parse_file("/nonexistent/chat.txt", &mut MappingResolver::new())
            .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_chat_name() {
        assert_eq!(chat_name(Path::new("chat_brothers.txt")), "chat_brothers");
        assert_eq!(chat_name(Path::new("/a/b/c")), "c");
        assert_eq!(chat_name(Path::new("")), "");
    }
}
