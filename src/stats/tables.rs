//! Frequency table types owned by [`ChatStats`](super::ChatStats).
//!
//! Every table is a plain ordered map with a single get-or-insert-zero
//! mutator, so each count can only ever go up by one at a time. Maps are
//! ordered so that snapshots and rankings are deterministic.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// Occurrence count per key.
///
/// # Example
///
/// ```
/// use chatstat::stats::Tally;
///
/// let mut hours = Tally::new();
/// hours.increment(21u32);
/// hours.increment(21u32);
/// hours.increment(8u32);
///
/// assert_eq!(hours.get(&21), 2);
/// assert_eq!(hours.get(&3), 0);
/// assert_eq!(hours.total(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K: Ord> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Tally<K> {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to `key`, inserting it at zero first if absent.
    /// Returns the new count.
    pub fn increment(&mut self, key: K) -> u64 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Returns the count for `key` (zero if never seen).
    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Returns `true` if `key` has been counted at least once.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.counts.contains_key(key)
    }

    /// Iterates over `(key, count)` in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, K, u64> {
        self.counts.iter()
    }

    /// Iterates over keys in order.
    pub fn keys(&self) -> btree_map::Keys<'_, K, u64> {
        self.counts.keys()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl Tally<String> {
    /// Like [`increment`](Self::increment), allocating the key only on first sight.
    pub fn increment_str(&mut self, key: &str) -> u64 {
        match self.counts.get_mut(key) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => self.increment(key.to_string()),
        }
    }
}

impl<'a, K: Ord> IntoIterator for &'a Tally<K> {
    type Item = (&'a K, &'a u64);
    type IntoIter = btree_map::Iter<'a, K, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Per-person counts with a cross-person total.
///
/// The total is updated by the same call that updates a person's count, so
/// the sum of [`per_person`](Self::per_person) always equals
/// [`total`](Self::total).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonCounts {
    per_person: Tally<String>,
    total: u64,
}

impl PersonCounts {
    /// Creates empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence for `person`.
    pub fn add(&mut self, person: &str) {
        self.per_person.increment_str(person);
        self.total += 1;
    }

    /// Occurrences for `person`.
    pub fn count_for(&self, person: &str) -> u64 {
        self.per_person.get(person)
    }

    /// Occurrences per person.
    pub fn per_person(&self) -> &Tally<String> {
        &self.per_person
    }

    /// Occurrences across all persons.
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Word or phrase → [`PersonCounts`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhraseTable {
    entries: BTreeMap<String, PersonCounts>,
}

impl PhraseTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `phrase` by `person`.
    pub fn record(&mut self, phrase: String, person: &str) {
        self.entries.entry(phrase).or_default().add(person);
    }

    /// Counts for `phrase`, if it was ever recorded.
    pub fn get(&self, phrase: &str) -> Option<&PersonCounts> {
        self.entries.get(phrase)
    }

    /// Total occurrences of `phrase` (zero if never recorded).
    pub fn total(&self, phrase: &str) -> u64 {
        self.get(phrase).map_or(0, PersonCounts::total)
    }

    /// Occurrences of `phrase` by `person`.
    pub fn count_for(&self, phrase: &str, person: &str) -> u64 {
        self.get(phrase).map_or(0, |c| c.count_for(person))
    }

    /// Iterates over entries in phrase order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PersonCounts> {
        self.entries.iter()
    }

    /// Number of distinct phrases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a PhraseTable {
    type Item = (&'a String, &'a PersonCounts);
    type IntoIter = btree_map::Iter<'a, String, PersonCounts>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sender → who sent the following message → count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransitionTable {
    next: BTreeMap<String, Tally<String>>,
}

impl TransitionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one message by `to` directly following one by `from`.
    pub fn record(&mut self, from: &str, to: &str) {
        if !self.next.contains_key(from) {
            self.next.insert(from.to_string(), Tally::new());
        }
        if let Some(followers) = self.next.get_mut(from) {
            followers.increment_str(to);
        }
    }

    /// Who followed `from`, if `from` was ever followed by anyone.
    pub fn followers(&self, from: &str) -> Option<&Tally<String>> {
        self.next.get(from)
    }

    /// Number of times `to` directly followed `from`.
    pub fn count(&self, from: &str, to: &str) -> u64 {
        self.followers(from).map_or(0, |f| f.get(to))
    }

    /// Iterates over senders in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Tally<String>> {
        self.next.iter()
    }

    /// Number of senders with at least one follower.
    pub fn len(&self) -> usize {
        self.next.len()
    }

    /// Returns `true` if no transition has been recorded.
    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Sum of all transition counts.
    pub fn total(&self) -> u64 {
        self.next.values().map(Tally::total).sum()
    }
}
