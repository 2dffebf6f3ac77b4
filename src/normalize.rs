//! Transcript text normalization.
//!
//! Reduces raw transcript text to a canonical comparable form so that
//! phrase matching is resilient to transcription formatting differences:
//! "¡Atrás, ya!" → "atras ya".

/// Normalize raw transcript text for classification.
///
/// Lowercases, folds Spanish diacritics to their base letters, replaces
/// punctuation with spaces, and collapses whitespace runs. Idempotent and
/// infallible; empty input yields empty output.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(fold_diacritic)
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map an accented lowercase Latin letter to its unaccented base, so that
/// "atrás" and "atras" compare equal after normalization.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}
