//! Block text cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ASCII_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x00-\x7F]+").unwrap());
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ ]{2,}").unwrap());

const LIGATURES: &[(char, &str)] = &[('\u{FB01}', "fi"), ('\u{FB02}', "fl")];
const DECORATIONS: &[char] = &['\u{2022}', '\u{00B7}'];

/// Normalize raw block text.
///
/// Rules, in order: ligatures become their ASCII letters, bullet and
/// middle-dot decorations are removed, every remaining run of non-ASCII
/// characters becomes one space, newlines become spaces and space runs
/// collapse to one, and the result is trimmed.
///
/// # Example
/// ```
/// use rankpdf::extract::normalize;
///
/// assert_eq!(normalize("\u{2022} e\u{FB03}cient\n  \u{FB01}les "), "e cient files");
/// ```
pub fn normalize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if DECORATIONS.contains(&c) {
            continue;
        }
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, ascii)) => result.push_str(ascii),
            None => result.push(c),
        }
    }

    let result = NON_ASCII_RUN.replace_all(&result, " ");
    let result = result.replace('\n', " ");
    let result = SPACE_RUN.replace_all(&result, " ");
    result.trim().to_string()
}
