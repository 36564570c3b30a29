//! Message body tokenization.
//!
//! Bodies are reduced to letters and spaces, split on whitespace, and
//! stripped of single-character tokens. A letter is any character in one of
//! the Unicode `L*` general categories, so Hebrew, Cyrillic and CJK text
//! survive while digits, punctuation, emoji and combining marks (niqqud,
//! Indic vowel signs) are removed.

use unicode_general_category::{GeneralCategory, get_general_category};

/// Returns `true` if `c` is in a Unicode letter category (`Lu`, `Ll`, `Lt`,
/// `Lm` or `Lo`).
///
/// Narrower than [`char::is_alphabetic`], which also accepts combining marks
/// and letter numbers such as `Ⅻ`.
pub fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Splits a message body into word tokens, in order.
///
/// # Example
///
/// ```
/// use chatstat::parsing::tokenize;
///
/// assert_eq!(tokenize("Hi!! it's 5 o'clock"), vec!["Hi", "its", "oclock"]);
/// assert_eq!(tokenize("שלום, עולם 🌍"), vec!["שלום", "עולם"]);
/// ```
pub fn tokenize(body: &str) -> Vec<String> {
    let cleaned: String = body
        .chars()
        .filter(|c| is_letter(*c) || *c == ' ')
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Yields every run of `width` adjacent tokens, joined by a single space.
///
/// Returns nothing when there are fewer than `width` tokens. A `width` of 0
/// is treated as 1.
///
/// # Example
///
/// ```
/// use chatstat::parsing::{phrases, tokenize};
///
/// let tokens = tokenize("one two three");
/// let pairs: Vec<String> = phrases(&tokens, 2).collect();
/// assert_eq!(pairs, vec!["one two", "two three"]);
/// ```
pub fn phrases(tokens: &[String], width: usize) -> impl Iterator<Item = String> + '_ {
    // `windows` panics on 0
    tokens
        .windows(width.max(1))
        .map(|window| window.join(" "))
}
