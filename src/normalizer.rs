//! Sender name normalization.
//!
//! Chat exports label senders however the exporting phone knew them: a
//! contact name, a nickname, or a bare phone number. The [`PersonNormalizer`]
//! maps each raw label to a canonical display name exactly once per chat and
//! reuses that answer for every later message.
//!
//! Where the answer comes from is a [`NameResolver`]:
//!
//! - [`PromptResolver`] asks an operator on a terminal
//! - [`MappingResolver`] looks the label up in a prepared table
//! - any `FnMut(&str) -> Result<Resolution>` closure
//!
//! # Example
//!
//! ```
//! use chatstat::normalizer::{MappingResolver, PersonNormalizer};
//!
//! let mut resolver = MappingResolver::new()
//!     .with_name("+972 50-123-4567", "Dana")
//!     .with_name("Spam Bot", "dont");
//! let mut normalizer = PersonNormalizer::new(&mut resolver);
//!
//! assert_eq!(normalizer.resolve("+972 50-123-4567")?.name(), Some("Dana"));
//! assert!(normalizer.resolve("Spam Bot")?.is_excluded());
//! assert_eq!(normalizer.resolve("Avi")?.name(), Some("Avi"));
//! # Ok::<(), chatstat::ChatstatError>(())
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::debug;

use crate::config::{DEFAULT_EXCLUSION_SENTINEL, StatsConfig};
use crate::error::{ChatstatError, Result};

/// The decision taken for one raw sender label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Count the sender's messages under this canonical name
    Name(String),
    /// Drop every message from this sender
    Exclude,
}

impl Resolution {
    /// Interprets a free-text answer for `raw_label`.
    ///
    /// An empty answer keeps the raw label, the `sentinel` excludes the
    /// sender, anything else is the canonical name.
    ///
    /// ```
    /// use chatstat::normalizer::Resolution;
    ///
    /// assert_eq!(Resolution::from_answer("0501234567", "", "dont"), Resolution::Name("0501234567".into()));
    /// assert_eq!(Resolution::from_answer("0501234567", " Dana ", "dont"), Resolution::Name("Dana".into()));
    /// assert_eq!(Resolution::from_answer("0501234567", "dont", "dont"), Resolution::Exclude);
    /// ```
    pub fn from_answer(raw_label: &str, answer: &str, sentinel: &str) -> Self {
        let answer = answer.trim();
        if answer.is_empty() {
            Resolution::Name(raw_label.to_string())
        } else if answer == sentinel {
            Resolution::Exclude
        } else {
            Resolution::Name(answer.to_string())
        }
    }

    /// Returns the canonical name, or `None` if the sender is excluded.
    pub fn name(&self) -> Option<&str> {
        match self {
            Resolution::Name(name) => Some(name),
            Resolution::Exclude => None,
        }
    }

    /// Returns `true` if the sender is excluded.
    pub fn is_excluded(&self) -> bool {
        matches!(self, Resolution::Exclude)
    }
}

/// Source of decisions for raw sender labels that have not been seen yet.
///
/// Implementations may block (an operator typing an answer). An error is
/// fatal for the chat being parsed.
pub trait NameResolver {
    /// Decides what to do with `raw_label`.
    fn resolve(&mut self, raw_label: &str) -> Result<Resolution>;
}

impl<F> NameResolver for F
where
    F: FnMut(&str) -> Result<Resolution>,
{
    fn resolve(&mut self, raw_label: &str) -> Result<Resolution> {
        self(raw_label)
    }
}

/// Asks an operator for each new sender label.
///
/// Writes `Enter the name to replace '<label>': ` to `output` and reads one
/// line from `input`.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
    sentinel: String,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    /// Creates a resolver that excludes on `config.exclusion_sentinel`.
    pub fn from_config(input: R, output: W, config: &StatsConfig) -> Self {
        Self::new(input, output).with_sentinel(config.exclusion_sentinel.as_str())
    }
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    /// Creates a resolver on arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            sentinel: DEFAULT_EXCLUSION_SENTINEL.to_string(),
        }
    }

    /// Sets the answer that excludes a sender.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    fn ask(&mut self, raw_label: &str) -> io::Result<Option<String>> {
        write!(self.output, "Enter the name to replace '{raw_label}': ")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer))
    }
}

impl<R: BufRead, W: Write> NameResolver for PromptResolver<R, W> {
    fn resolve(&mut self, raw_label: &str) -> Result<Resolution> {
        match self.ask(raw_label) {
            Ok(Some(answer)) => Ok(Resolution::from_answer(raw_label, &answer, &self.sentinel)),
            Ok(None) => Err(ChatstatError::resolution(raw_label, "input closed")),
            Err(e) => Err(ChatstatError::resolution(raw_label, e.to_string())),
        }
    }
}

/// Resolves labels from a prepared raw-label → name table.
///
/// Labels missing from the table keep their raw text. Values are interpreted
/// like typed answers (see [`Resolution::from_answer`]).
#[derive(Debug, Clone)]
pub struct MappingResolver {
    names: HashMap<String, String>,
    sentinel: String,
}

impl Default for MappingResolver {
    fn default() -> Self {
        Self {
            names: HashMap::new(),
            sentinel: DEFAULT_EXCLUSION_SENTINEL.to_string(),
        }
    }
}

impl MappingResolver {
    /// Creates a resolver with an empty table (every label keeps its raw text).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty resolver that excludes on `config.exclusion_sentinel`.
    pub fn from_config(config: &StatsConfig) -> Self {
        Self::new().with_sentinel(config.exclusion_sentinel.as_str())
    }

    /// Creates a resolver from an existing table.
    pub fn from_map(names: HashMap<String, String>) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }

    /// Loads the table from a JSON object of strings.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let names: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(Self::from_map(names))
    }

    /// Adds one entry to the table.
    #[must_use]
    pub fn with_name(mut self, raw_label: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(raw_label.into(), name.into());
        self
    }

    /// Sets the value that excludes a sender.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }
}

impl NameResolver for MappingResolver {
    fn resolve(&mut self, raw_label: &str) -> Result<Resolution> {
        let answer = self.names.get(raw_label).map_or("", String::as_str);
        Ok(Resolution::from_answer(raw_label, answer, &self.sentinel))
    }
}

/// Memoizes one [`Resolution`] per raw label for the duration of a chat.
///
/// The resolver is consulted at most once per distinct label; the decision
/// never changes afterwards. The resolver is borrowed so one prompt can serve
/// several chats while each chat starts with an empty mapping.
pub struct PersonNormalizer<'r, N: ?Sized> {
    resolver: &'r mut N,
    mapping: HashMap<String, Resolution>,
}

impl<'r, N: NameResolver + ?Sized> PersonNormalizer<'r, N> {
    /// Creates a normalizer with no decisions recorded.
    pub fn new(resolver: &'r mut N) -> Self {
        Self {
            resolver,
            mapping: HashMap::new(),
        }
    }

    /// Returns the decision for `raw_label`, asking the resolver if needed.
    pub fn resolve(&mut self, raw_label: &str) -> Result<&Resolution> {
        if !self.mapping.contains_key(raw_label) {
            let resolution = self.resolver.resolve(raw_label)?;
            debug!(raw_label, ?resolution, "resolved sender");
            self.mapping.insert(raw_label.to_string(), resolution);
        }
        Ok(&self.mapping[raw_label])
    }

    /// Returns every decision taken so far.
    pub fn mapping(&self) -> &HashMap<String, Resolution> {
        &self.mapping
    }

    /// Consumes the normalizer, returning the decisions taken.
    pub fn into_mapping(self) -> HashMap<String, Resolution> {
        self.mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_resolution_accessors() {
        let name = Resolution::Name("Dana".into());
        assert_eq!(name.name(), Some("Dana"));
        assert!(!name.is_excluded());
        assert_eq!(Resolution::Exclude.name(), None);
        assert!(Resolution::Exclude.is_excluded());
    }

    #[test]
    fn test_memoized_single_prompt() {
        let mut calls = 0;
        let mut resolver = |raw: &str| -> Result<Resolution> {
            calls += 1;
            Ok(Resolution::Name(format!("{raw}!")))
        };
        let mut normalizer = PersonNormalizer::new(&mut resolver);

        for _ in 0..5 {
            assert_eq!(normalizer.resolve("x").unwrap().name(), Some("x!"));
        }
        assert_eq!(normalizer.resolve("y").unwrap().name(), Some("y!"));
        drop(normalizer);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_exclusion_is_memoized() {
        let mut calls = 0;
        let mut resolver = |_: &str| -> Result<Resolution> {
            calls += 1;
            Ok(Resolution::Exclude)
        };
        let mut normalizer = PersonNormalizer::new(&mut resolver);

        assert!(normalizer.resolve("bot").unwrap().is_excluded());
        assert!(normalizer.resolve("bot").unwrap().is_excluded());
        assert_eq!(normalizer.mapping().len(), 1);
        drop(normalizer);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_resolver_error_propagates() {
        let mut resolver =
            |raw: &str| -> Result<Resolution> { Err(ChatstatError::resolution(raw, "boom")) };
        let mut normalizer = PersonNormalizer::new(&mut resolver);
        let err = normalizer.resolve("x").unwrap_err();
        assert!(err.is_resolution());
        assert!(normalizer.mapping().is_empty());
    }

    #[test]
    fn test_prompt_resolver() {
        let input = Cursor::new("Dana\n\ndont\n");
        let mut output = Vec::new();
        {
            let mut resolver = PromptResolver::new(input, &mut output);
            assert_eq!(
                resolver.resolve("050").unwrap(),
                Resolution::Name("Dana".into())
            );
            assert_eq!(
                resolver.resolve("Avi").unwrap(),
                Resolution::Name("Avi".into())
            );
            assert_eq!(resolver.resolve("bot").unwrap(), Resolution::Exclude);
        }

        let prompts = String::from_utf8(output).unwrap();
        assert!(prompts.contains("Enter the name to replace '050': "));
        assert!(prompts.contains("Enter the name to replace 'bot': "));
    }

    #[test]
    fn test_prompt_resolver_windows_line_endings() {
        let mut resolver = PromptResolver::new(Cursor::new("Dana\r\n"), io::sink());
        assert_eq!(
            resolver.resolve("050").unwrap(),
            Resolution::Name("Dana".into())
        );
    }

    #[test]
    fn test_prompt_resolver_custom_sentinel() {
        let mut resolver =
            PromptResolver::new(Cursor::new("-\ndont\n"), io::sink()).with_sentinel("-");
        assert_eq!(resolver.resolve("a").unwrap(), Resolution::Exclude);
        assert_eq!(
            resolver.resolve("b").unwrap(),
            Resolution::Name("dont".into())
        );
    }

    #[test]
    fn test_prompt_resolver_eof_is_error() {
        let mut resolver = PromptResolver::new(Cursor::new(""), io::sink());
        let err = resolver.resolve("050").unwrap_err();
        assert!(err.is_resolution());
        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn test_mapping_resolver() {
        let mut resolver = MappingResolver::new()
            .with_name("050", "Dana")
            .with_name("blank", "")
            .with_name("bot", "dont");

        assert_eq!(resolver.resolve("050").unwrap().name(), Some("Dana"));
        assert_eq!(resolver.resolve("blank").unwrap().name(), Some("blank"));
        assert_eq!(resolver.resolve("other").unwrap().name(), Some("other"));
        assert!(resolver.resolve("bot").unwrap().is_excluded());
    }

    #[test]
    fn test_resolvers_from_config_use_its_sentinel() {
        let config = StatsConfig::new().with_exclusion_sentinel("skip");

        let mut mapping = MappingResolver::from_config(&config)
            .with_name("bot", "skip")
            .with_name("Avi", "dont");
        assert!(mapping.resolve("bot").unwrap().is_excluded());
        assert_eq!(mapping.resolve("Avi").unwrap().name(), Some("dont"));

        let mut prompt = PromptResolver::from_config(Cursor::new("skip\n"), io::sink(), &config);
        assert!(prompt.resolve("bot").unwrap().is_excluded());
    }

    #[test]
    fn test_mapping_resolver_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"050": "Dana", "bot": "dont"}}"#).unwrap();

        let mut resolver = MappingResolver::from_json_file(file.path()).unwrap();
        assert_eq!(resolver.resolve("050").unwrap().name(), Some("Dana"));
        assert!(resolver.resolve("bot").unwrap().is_excluded());
    }

    #[test]
    fn test_mapping_resolver_rejects_non_string_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"050": 1}}"#).unwrap();

        assert!(MappingResolver::from_json_file(file.path()).is_err());
    }
}
