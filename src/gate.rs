//! Wake-word gate.
//!
//! Extracts the command phrase following the configured wake word from a
//! raw transcript. Transcripts without the wake word carry no command and
//! must not be classified.

/// Minimum length (in characters) of the text after the wake word for it
/// to count as a command phrase. Guards against false triggers on the
/// wake word alone or trailing noise.
pub const MIN_COMMAND_LEN: usize = 2;

/// Extract the command phrase following the first occurrence of
/// `wake_word` in `raw_transcript`, using the default minimum length.
///
/// Returns `None` when the wake word is absent or the remainder is too
/// short to be a command.
#[must_use]
pub fn extract_command_phrase(raw_transcript: &str, wake_word: &str) -> Option<String> {
    extract_command_phrase_min(raw_transcript, wake_word, MIN_COMMAND_LEN)
}

/// [`extract_command_phrase`] with an explicit minimum command length.
///
/// The search is case-insensitive and only the first occurrence of the
/// wake word is used; anything before it is discarded as noise or a false
/// start, and everything after it (wake-word repeats included) is the
/// candidate phrase.
#[must_use]
pub fn extract_command_phrase_min(
    raw_transcript: &str,
    wake_word: &str,
    min_len: usize,
) -> Option<String> {
    if wake_word.is_empty() {
        return None;
    }

    let (_, end) = find_case_insensitive(raw_transcript, &wake_word.to_lowercase())?;
    let phrase = raw_transcript[end..].trim();

    if phrase.chars().count() < min_len {
        return None;
    }
    Some(phrase.to_owned())
}

/// Case-insensitive search returning the byte range of the first match
/// in `haystack` itself. Lowercasing can change byte lengths, so offsets
/// into a lowercased copy are not positionally valid in the raw text;
/// folding during the scan keeps them aligned.
fn find_case_insensitive(haystack: &str, needle_lower: &str) -> Option<(usize, usize)> {
    haystack.char_indices().find_map(|(start, _)| {
        match_len(&haystack[start..], needle_lower).map(|len| (start, start + len))
    })
}

/// Byte length of the prefix of `text` whose lowercase folding equals
/// `needle_lower`, if any.
fn match_len(text: &str, needle_lower: &str) -> Option<usize> {
    let mut needle = needle_lower.chars();
    let mut expected = needle.next();
    for (offset, c) in text.char_indices() {
        if expected.is_none() {
            return Some(offset);
        }
        for folded in c.to_lowercase() {
            match expected {
                Some(want) if want == folded => expected = needle.next(),
                _ => return None,
            }
        }
    }
    if expected.is_none() { Some(text.len()) } else { None }
}
