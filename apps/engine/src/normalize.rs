//! Text Normalizer: turns raw text into the canonical token stream shared by
//! the CV extractor, the matching scorer and the harvester.
//!
//! Pipeline (order matters):
//! 1. strip
//! 2. lowercase
//! 3. technical compounds (`c++`, `c#`, `node.js`) → single tokens
//! 4. NFKD + drop combining marks
//! 5. anything outside `[a-z0-9\s]` → space
//! 6. collapse whitespace

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Compounds that would be shredded by punctuation stripping.
/// Must be applied before step 5.
const TECH_COMPOUNDS: &[(&str, &str)] = &[("c++", "cpp"), ("c#", "csharp"), ("node.js", "nodejs")];

/// Returns the canonical, lowercase, ASCII-only form of `text`.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let mut lowered = text.trim().to_lowercase();

    for (compound, replacement) in TECH_COMPOUNDS {
        if lowered.contains(compound) {
            lowered = lowered.replace(compound, replacement);
        }
    }

    let folded: String = lowered
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                // whitespace and everything else collapse to a separator
                ' '
            }
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokens of the normalized form. No stop-word removal at this layer.
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Truncates to at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// `true` when `phrase` occurs in `normalized_text` as a run of whole tokens.
/// Both arguments must already be normalized.
pub fn contains_phrase(normalized_text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let haystack = format!(" {normalized_text} ");
    haystack.contains(&format!(" {phrase} "))
}
