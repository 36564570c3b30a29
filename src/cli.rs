//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`ResolverMode`] - how sender labels are turned into names
//!
//! ```rust
//! use chatstat::cli::{Args, ResolverMode};
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chatstat", "--no-prompt", "chat_family.txt"]);
//! assert_eq!(args.resolver_mode(), ResolverMode::KeepLabels);
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{StatsConfig, WordGroupSet};
use crate::error::Result;
use crate::normalizer::{MappingResolver, NameResolver, PromptResolver};
use crate::stats::WordGroup;

/// Word, phrase and activity statistics for exported chat logs.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatstat")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatstat chat_family.txt
    chatstat chat_family.txt chat_work.txt --names names.json
    chatstat chat_family.txt --no-prompt --json out/
    chatstat chat_family.txt --history history.json --top 10
    chatstat chat_family.txt --group 'lol,lool,loool' --group 'haha,hahaha'")]
pub struct Args {
    /// Chat export files, processed in order
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// JSON file mapping raw sender labels to names (no prompting)
    #[arg(long, value_name = "FILE")]
    pub names: Option<PathBuf>,

    /// Keep raw sender labels instead of prompting
    #[arg(long, conflicts_with = "names")]
    pub no_prompt: bool,

    /// History store file (must already exist to be written)
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of entries in each ranking
    #[arg(short = 'n', long, default_value_t = 25)]
    pub top: usize,

    /// Number of busiest dates to list
    #[arg(long, default_value_t = 30)]
    pub top_dates: usize,

    /// Word forms counted together, comma separated (repeatable).
    /// Reported as an extra "Custom Words" block
    #[arg(long = "group", value_name = "FORMS")]
    pub groups: Vec<String>,

    /// Directory for per-chat JSON snapshots
    #[arg(long, value_name = "DIR")]
    pub json: Option<PathBuf>,
}

/// Where sender names come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverMode {
    /// Ask on the terminal
    Prompt,
    /// Look up a mapping file
    Mapping,
    /// Use raw labels as names
    KeepLabels,
}

impl fmt::Display for ResolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverMode::Prompt => write!(f, "interactive"),
            ResolverMode::Mapping => write!(f, "mapping file"),
            ResolverMode::KeepLabels => write!(f, "raw labels"),
        }
    }
}

impl Args {
    /// Returns how sender labels will be resolved.
    pub fn resolver_mode(&self) -> ResolverMode {
        if self.names.is_some() {
            ResolverMode::Mapping
        } else if self.no_prompt {
            ResolverMode::KeepLabels
        } else {
            ResolverMode::Prompt
        }
    }

    /// Loads the configuration file, if any, and applies `--history`.
    pub fn load_config(&self) -> Result<StatsConfig> {
        let mut config = match &self.config {
            Some(path) => StatsConfig::from_json_file(path)?,
            None => StatsConfig::default(),
        };
        if let Some(history) = &self.history {
            config = config.with_history_path(history);
        }
        Ok(config)
    }

    /// Builds the resolver selected on the command line.
    pub fn build_resolver(&self, config: &StatsConfig) -> Result<Box<dyn NameResolver>> {
        Ok(match (&self.names, self.resolver_mode()) {
            (Some(path), _) => Box::new(
                MappingResolver::from_json_file(path)?
                    .with_sentinel(config.exclusion_sentinel.as_str()),
            ),
            (None, ResolverMode::KeepLabels) => Box::new(MappingResolver::from_config(config)),
            (None, _) => Box::new(PromptResolver::from_config(
                io::stdin().lock(),
                io::stdout(),
                config,
            )),
        })
    }

    /// Parses `--group` values into word groups, skipping empty ones.
    pub fn word_groups(&self) -> Vec<WordGroup> {
        self.groups
            .iter()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|form| !form.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|forms| !forms.is_empty())
            .map(WordGroup::new)
            .collect()
    }

    /// The configured word-group sets, followed by the `--group` values as
    /// a "Custom Words" set when any were given.
    pub fn word_group_sets(&self, config: &StatsConfig) -> Vec<WordGroupSet> {
        let mut sets = config.word_groups.clone();
        let custom = self.word_groups();
        if !custom.is_empty() {
            sets.push(WordGroupSet::new("Custom Words", custom));
        }
        sets
    }
}
