//! Chat statistics: the aggregation engine, its tables, and ranked reports.
//!
//! - [`ChatStats`] - owns every frequency table and folds messages into them
//! - [`tables`] - [`Tally`], [`PersonCounts`], [`PhraseTable`], [`TransitionTable`]
//! - [`report`] - [`Report`] with top-N rankings and chart series

pub mod engine;
pub mod report;
pub mod tables;

pub use engine::ChatStats;
pub use report::{GroupUsage, RankedEntry, Report, WordGroup};
pub use tables::{PersonCounts, PhraseTable, Tally, TransitionTable};
