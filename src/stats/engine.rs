//! The aggregation engine.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{MediaPlaceholders, StatsConfig};
use crate::message::ParsedMessage;
use crate::parsing::tokenizer::{phrases, tokenize};

use super::tables::{PersonCounts, PhraseTable, Tally, TransitionTable};

/// All frequency tables for one chat.
///
/// Tables start empty and change only through [`record`](Self::record), one
/// message at a time, in file order. Once parsing is over the value is a
/// read-only snapshot for reporting and rendering.
///
/// # Example
///
/// ```
/// use chatstat::ParsedMessage;
/// use chatstat::stats::ChatStats;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let mut stats = ChatStats::default();
///
/// stats.record(
///     &ParsedMessage::new("Dana", date, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), "good morning all"),
///     None,
/// );
/// stats.record(
///     &ParsedMessage::new("Avi", date, NaiveTime::from_hms_opt(9, 5, 0).unwrap(), "good morning"),
///     Some("Dana"),
/// );
///
/// assert_eq!(stats.people().get("Dana"), 1);
/// assert_eq!(stats.words().total("good"), 2);
/// assert_eq!(stats.bigrams().total("good morning"), 2);
/// assert_eq!(stats.transitions().count("Dana", "Avi"), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatStats {
    hours: Tally<u32>,
    months: Tally<u32>,
    years: Tally<i32>,
    dates: Tally<NaiveDate>,
    people: Tally<String>,
    words: PhraseTable,
    bigrams: PhraseTable,
    trigrams: PhraseTable,
    transitions: TransitionTable,
    media: PersonCounts,
    #[serde(skip)]
    media_placeholders: MediaPlaceholders,
}

impl Default for ChatStats {
    fn default() -> Self {
        Self::new(&StatsConfig::default())
    }
}

impl ChatStats {
    /// Creates empty tables using the config's media placeholders.
    pub fn new(config: &StatsConfig) -> Self {
        Self {
            hours: Tally::new(),
            months: Tally::new(),
            years: Tally::new(),
            dates: Tally::new(),
            people: Tally::new(),
            words: PhraseTable::new(),
            bigrams: PhraseTable::new(),
            trigrams: PhraseTable::new(),
            transitions: TransitionTable::new(),
            media: PersonCounts::new(),
            media_placeholders: config.media_placeholders.clone(),
        }
    }

    /// Folds one message into every table.
    ///
    /// `previous_person` is the sender of the message recorded just before
    /// this one, or `None` for the first message of the chat.
    pub fn record(&mut self, message: &ParsedMessage, previous_person: Option<&str>) {
        let person = message.person.as_str();

        self.hours.increment(message.hour());
        self.months.increment(message.month());
        self.years.increment(message.year());
        self.dates.increment(message.date);
        self.people.increment_str(person);

        if let Some(previous) = previous_person {
            self.transitions.record(previous, person);
        }

        if self.media_placeholders.contains(&message.body) {
            self.media.add(person);
            return;
        }

        let tokens = tokenize(&message.body);
        for word in &tokens {
            self.words.record(word.clone(), person);
        }
        for pair in phrases(&tokens, 2) {
            self.bigrams.record(pair, person);
        }
        for triple in phrases(&tokens, 3) {
            self.trigrams.record(triple, person);
        }
    }

    /// Messages per hour of day (0-23).
    pub fn hours(&self) -> &Tally<u32> {
        &self.hours
    }

    /// Messages per month of year (1-12).
    pub fn months(&self) -> &Tally<u32> {
        &self.months
    }

    /// Messages per year.
    pub fn years(&self) -> &Tally<i32> {
        &self.years
    }

    /// Messages per calendar date.
    pub fn dates(&self) -> &Tally<NaiveDate> {
        &self.dates
    }

    /// Messages per canonical sender.
    pub fn people(&self) -> &Tally<String> {
        &self.people
    }

    /// Single words.
    pub fn words(&self) -> &PhraseTable {
        &self.words
    }

    /// Adjacent word pairs.
    pub fn bigrams(&self) -> &PhraseTable {
        &self.bigrams
    }

    /// Adjacent word triples.
    pub fn trigrams(&self) -> &PhraseTable {
        &self.trigrams
    }

    /// Who replied after whom.
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// Media attachments per sender.
    pub fn media(&self) -> &PersonCounts {
        &self.media
    }

    /// Number of messages recorded.
    pub fn message_count(&self) -> u64 {
        self.people.total()
    }

    /// Returns `true` if no message has been recorded.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
