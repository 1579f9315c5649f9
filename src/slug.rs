//! Identifier normalization for speaker and action names.
//!
//! Human-friendly names like `"File Created!"` become identifier-safe slugs
//! like `file_created_`. Both [`Speaker`](crate::Speaker) construction and
//! every name-taking operation (`plug`, `shout`, `unplug`, `release`) pass
//! input through [`underscore`], so callers may use either form
//! interchangeably.

use std::sync::LazyLock;

use regex::Regex;

/// One or more consecutive non-word characters (Unicode-aware).
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("hardcoded pattern"));

/// Normalizes arbitrary text into a lowercase, underscore-separated
/// identifier.
///
/// Leading/trailing whitespace is stripped, the result is lowercased, and
/// every run of non-word characters collapses into a single `_`. Total over
/// any input; an empty or whitespace-only string yields `""`.
///
/// # Example
/// ```
/// use speakers::underscore;
///
/// assert_eq!(underscore("File Created"), "file_created");
/// assert_eq!(underscore("  AwesomeSauce  "), "awesomesauce");
/// assert_eq!(underscore("do -- this"), "do_this");
/// ```
pub fn underscore(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_WORD.replace_all(&lowered, "_").into_owned()
}
