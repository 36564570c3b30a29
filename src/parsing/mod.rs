//! Line-level parsing utilities.
//!
//! This module contains the pieces the [`ChatParser`](crate::parser::ChatParser)
//! is built from:
//!
//! - [`header`] - recognizes message header lines
//! - [`tokenizer`] - splits message bodies into words and phrases

pub mod header;
pub mod tokenizer;

// Re-export commonly used items
pub use header::{LineClassifier, MessageHeader, parse_header_date, parse_header_time};
pub use tokenizer::{is_letter, phrases, tokenize};
