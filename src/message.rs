//! Fully assembled chat message.
//!
//! A [`ParsedMessage`] is what the parser hands to the aggregation engine once
//! a header and all of its continuation lines have been read. It is not
//! retained after it has been recorded.
//!
//! # Example
//!
//! ```
//! use chatstat::ParsedMessage;
//! use chrono::{NaiveDate, NaiveTime};
//!
//! let msg = ParsedMessage::new(
//!     "Alice",
//!     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!     NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
//!     "Hello everyone",
//! );
//!
//! assert_eq!(msg.hour(), 10);
//! assert_eq!(msg.month(), 1);
//! assert_eq!(msg.year(), 2024);
//! ```

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A message with a canonical sender and a complete body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Canonical display name of the sender
    pub person: String,

    /// Calendar date from the header
    pub date: NaiveDate,

    /// Hour and minute from the header
    pub time: NaiveTime,

    /// Header body plus continuation lines, joined by single spaces
    pub body: String,
}

impl ParsedMessage {
    /// Creates a new message.
    pub fn new(
        person: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        body: impl Into<String>,
    ) -> Self {
        Self {
            person: person.into(),
            date,
            time,
            body: body.into(),
        }
    }

    /// Hour of day (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Month of year (1-12).
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}
