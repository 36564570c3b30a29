//! Unified error types for chatstat.
//!
//! This module provides a single [`ChatstatError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging
//!
//! Only conditions that abort a chat are surfaced as errors. A malformed
//! header field drops a single message and is reported through `tracing`,
//! and a missing history store is a [`PersistOutcome`](crate::history::PersistOutcome),
//! not an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatstat operations.
///
/// # Example
///
/// ```rust
/// use chatstat::error::Result;
/// use chatstat::stats::ChatStats;
///
/// fn empty_stats() -> Result<ChatStats> {
///     Ok(ChatStats::default())
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatstatError>;

/// The error type for all chatstat operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatstatError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input chat file doesn't exist
    /// - Permission denied
    /// - The history store cannot be rewritten
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    ///
    /// Raised for an unreadable history store, name mapping or config file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The person resolver failed to produce a name for a raw label.
    ///
    /// This is fatal for the chat being parsed.
    #[error("Could not resolve sender '{label}': {message}")]
    Resolution {
        /// The raw sender label that was being resolved
        label: String,
        /// Description of the failure
        message: String,
    },

    /// A header line matched the message pattern but its date or time
    /// could not be interpreted.
    #[error("Invalid message header on line {line}: {message}")]
    InvalidHeader {
        /// 1-based line number of the header
        line: usize,
        /// Description of what's wrong
        message: String,
    },

    /// A configuration file has an unusable shape.
    #[error("Invalid configuration{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    InvalidConfig {
        /// Description of what's wrong
        message: String,
        /// The file path, if available
        path: Option<PathBuf>,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatstatError {
    /// Creates a resolution error for a raw sender label.
    pub fn resolution(label: impl Into<String>, message: impl Into<String>) -> Self {
        ChatstatError::Resolution {
            label: label.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid header error.
    pub fn invalid_header(line: usize, message: impl Into<String>) -> Self {
        ChatstatError::InvalidHeader {
            line,
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ChatstatError::InvalidConfig {
            message: message.into(),
            path,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatstatError::Io(_))
    }

    /// Returns `true` if this is a resolver failure.
    pub fn is_resolution(&self) -> bool {
        matches!(self, ChatstatError::Resolution { .. })
    }

    /// Returns `true` if this is a malformed header error.
    pub fn is_invalid_header(&self) -> bool {
        matches!(self, ChatstatError::InvalidHeader { .. })
    }
}
