//! Ranked, chart-ready views over a finished [`ChatStats`].
//!
//! Nothing here draws anything. Each method returns exactly the series one
//! chart needs, already sorted, so a renderer only has to map it to bars.
//!
//! Rankings sort by count, highest first, and break ties by key so output is
//! stable between runs.
//!
//! # Example
//!
//! ```
//! use chatstat::ParsedMessage;
//! use chatstat::stats::{ChatStats, Report};
//! use chrono::{NaiveDate, NaiveTime};
//!
//! let mut stats = ChatStats::default();
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
//! stats.record(&ParsedMessage::new("Dana", date, time, "tea tea coffee"), None);
//!
//! let report = Report::new(&stats);
//! let top = report.top_words(1);
//! assert_eq!(top[0].key, "tea");
//! assert_eq!(top[0].count, 2);
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::engine::ChatStats;
use super::tables::{PhraseTable, Tally};

/// One bar of a ranked chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry<K = String> {
    pub key: K,
    pub count: u64,
}

/// A family of word forms counted together under one label.
///
/// The label is the first form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordGroup {
    forms: Vec<String>,
}

impl WordGroup {
    /// Creates a group from its forms; the first form is the label.
    pub fn new<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            forms: forms.into_iter().map(Into::into).collect(),
        }
    }

    /// The group's label, or `""` for an empty group.
    pub fn label(&self) -> &str {
        self.forms.first().map_or("", String::as_str)
    }

    /// All forms, label first.
    pub fn forms(&self) -> &[String] {
        &self.forms
    }
}

/// Per-person usage of one [`WordGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupUsage {
    pub label: String,
    pub person: String,
    pub count: u64,
}

/// Read-only report over one chat's statistics.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    stats: &'a ChatStats,
}

impl<'a> Report<'a> {
    /// Wraps finished statistics.
    pub fn new(stats: &'a ChatStats) -> Self {
        Self { stats }
    }

    /// Most used words overall.
    pub fn top_words(&self, n: usize) -> Vec<RankedEntry> {
        top_phrases(self.stats.words(), n, |_| true)
    }

    /// Most used words overall, skipping the given words.
    pub fn top_words_excluding(&self, n: usize, skip: &[String]) -> Vec<RankedEntry> {
        top_phrases(self.stats.words(), n, |word| !skip.iter().any(|s| s == word))
    }

    /// Most used word pairs.
    pub fn top_bigrams(&self, n: usize) -> Vec<RankedEntry> {
        top_phrases(self.stats.bigrams(), n, |_| true)
    }

    /// Most used word triples.
    pub fn top_trigrams(&self, n: usize) -> Vec<RankedEntry> {
        top_phrases(self.stats.trigrams(), n, |_| true)
    }

    /// Most used words of one person. Empty if the person wrote no words.
    pub fn top_words_for(&self, person: &str, n: usize) -> Vec<RankedEntry> {
        let entries = self
            .stats
            .words()
            .iter()
            .map(|(word, counts)| (word.clone(), counts.count_for(person)))
            .filter(|(_, count)| *count > 0);
        rank(entries, n)
    }

    /// [`top_words_for`](Self::top_words_for) for every sender that has at
    /// least one word. Senders without words get no entry.
    pub fn top_words_by_person(&self, n: usize) -> BTreeMap<String, Vec<RankedEntry>> {
        self.stats
            .people()
            .keys()
            .filter_map(|person| {
                let top = self.top_words_for(person, n);
                (!top.is_empty()).then(|| (person.clone(), top))
            })
            .collect()
    }

    /// Busiest calendar dates.
    pub fn top_dates(&self, n: usize) -> Vec<RankedEntry<NaiveDate>> {
        rank(self.stats.dates().iter().map(|(d, c)| (*d, *c)), n)
    }

    /// Senders by message count.
    pub fn people_ranked(&self) -> Vec<RankedEntry> {
        ranked_tally(self.stats.people())
    }

    /// Who sent the message right after `person`, most frequent first.
    pub fn next_message_distribution(&self, person: &str) -> Vec<RankedEntry> {
        self.stats
            .transitions()
            .followers(person)
            .map(ranked_tally)
            .unwrap_or_default()
    }

    /// Per-person totals for each word group, summed over its forms.
    ///
    /// Output follows group order, then person name. Persons who never used
    /// any form of a group are left out of that group.
    pub fn word_group_distribution(&self, groups: &[WordGroup]) -> Vec<GroupUsage> {
        let mut usage = Vec::new();
        for group in groups {
            let mut per_person: BTreeMap<&str, u64> = BTreeMap::new();
            for form in group.forms() {
                if let Some(counts) = self.stats.words().get(form) {
                    for (person, count) in counts.per_person() {
                        *per_person.entry(person.as_str()).or_insert(0) += count;
                    }
                }
            }
            usage.extend(per_person.into_iter().map(|(person, count)| GroupUsage {
                label: group.label().to_string(),
                person: person.to_string(),
                count,
            }));
        }
        usage
    }

    /// Messages for every hour 0-23, including empty hours.
    pub fn hour_series(&self) -> Vec<(u32, u64)> {
        (0..24).map(|h| (h, self.stats.hours().get(&h))).collect()
    }

    /// Messages for every month 1-12, including empty months.
    pub fn month_series(&self) -> Vec<(u32, u64)> {
        (1..=12).map(|m| (m, self.stats.months().get(&m))).collect()
    }

    /// Messages per year that has any.
    pub fn year_series(&self) -> Vec<(i32, u64)> {
        self.stats.years().iter().map(|(y, c)| (*y, *c)).collect()
    }

    /// Messages per date that has any, oldest first.
    pub fn date_series(&self) -> Vec<(NaiveDate, u64)> {
        self.stats.dates().iter().map(|(d, c)| (*d, *c)).collect()
    }
}

fn top_phrases<F>(table: &PhraseTable, n: usize, keep: F) -> Vec<RankedEntry>
where
    F: Fn(&str) -> bool,
{
    let entries = table
        .iter()
        .filter(|(phrase, _)| keep(phrase))
        .map(|(phrase, counts)| (phrase.clone(), counts.total()));
    rank(entries, n)
}

fn ranked_tally(tally: &Tally<String>) -> Vec<RankedEntry> {
    rank(tally.iter().map(|(k, c)| (k.clone(), *c)), usize::MAX)
}

fn rank<K, I>(entries: I, n: usize) -> Vec<RankedEntry<K>>
where
    K: Ord,
    I: IntoIterator<Item = (K, u64)>,
{
    let mut ranked: Vec<RankedEntry<K>> = entries
        .into_iter()
        .map(|(key, count)| RankedEntry { key, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    ranked.truncate(n);
    ranked
}
