//! Message header recognition.
//!
//! Chat exports start every message with a header line:
//!
//! ```text
//! 26.10.2025, 20:40 - Sender: Message
//! 1.2.2024, 9:05 - Sender: Message
//! ```
//!
//! Day, month and hour may have one or two digits; the year always has four.
//! Any line that does not match is a continuation of the previous message.

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

/// Header pattern: `D.M.YYYY, H:MM - <person>: <body>`.
///
/// The person is the shortest run of characters followed by `": "`, so a
/// colon inside the body never leaks into the sender.
pub const HEADER_PATTERN: &str =
    r"^(?P<date>\d{1,2}\.\d{1,2}\.\d{4}), (?P<time>\d{1,2}:\d{2}) - (?P<person>.*?): (?P<body>.*)$";

/// chrono format for the header date.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// chrono format for the header time.
pub const TIME_FORMAT: &str = "%H:%M";

/// Fields captured from a header line.
///
/// Nothing is validated here: the date and time are the raw captured text,
/// and the person is the raw label with surrounding whitespace trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader<'a> {
    pub date: &'a str,
    pub time: &'a str,
    pub person: &'a str,
    pub body: &'a str,
}

impl MessageHeader<'_> {
    /// Interprets the captured date and time.
    pub fn timestamp(&self) -> Result<(NaiveDate, NaiveTime), chrono::ParseError> {
        Ok((parse_header_date(self.date)?, parse_header_time(self.time)?))
    }
}

/// Classifies raw lines as message headers or continuation lines.
///
/// # Example
///
/// ```
/// use chatstat::parsing::LineClassifier;
///
/// let classifier = LineClassifier::new();
///
/// let header = classifier.classify("26.10.2025, 20:40 - Alice: Hello").unwrap();
/// assert_eq!(header.person, "Alice");
/// assert_eq!(header.body, "Hello");
///
/// assert!(classifier.classify("just another line").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LineClassifier {
    regex: Regex,
}

impl LineClassifier {
    /// Creates a classifier for the export header format.
    pub fn new() -> Self {
        Self {
            regex: Regex::new(HEADER_PATTERN).expect("header pattern is valid"),
        }
    }

    /// Returns the header fields if `line` starts a new message.
    ///
    /// A trailing `\n` or `\r\n` is ignored.
    pub fn classify<'a>(&self, line: &'a str) -> Option<MessageHeader<'a>> {
        let line = line.trim_end_matches(['\n', '\r']);
        let caps = self.regex.captures(line)?;

        Some(MessageHeader {
            date: caps.name("date").map_or("", |m| m.as_str()),
            time: caps.name("time").map_or("", |m| m.as_str()),
            person: caps.name("person").map_or("", |m| m.as_str().trim()),
            body: caps.name("body").map_or("", |m| m.as_str()),
        })
    }

    /// Returns `true` if `line` is a header line.
    pub fn is_header(&self, line: &str) -> bool {
        self.classify(line).is_some()
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a header date such as `26.10.2025` or `1.2.2024`.
pub fn parse_header_date(date: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
}

/// Parses a header time such as `20:40` or `9:05`.
pub fn parse_header_time(time: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(time, TIME_FORMAT)
}
