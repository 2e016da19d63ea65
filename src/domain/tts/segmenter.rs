use regex::Regex;
use std::sync::OnceLock;

/// Default chunk bound used by the worker
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 4000;

fn sentence_boundary() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Terminator run followed by whitespace; the whitespace is the cut point
    PATTERN.get_or_init(|| Regex::new(r"[.!?]+\s+").unwrap())
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split text into sentence-like units at `.`, `!` or `?` followed by
/// whitespace. Surrounding whitespace is dropped and empty units skipped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last_end = 0;

    for mat in sentence_boundary().find_iter(text) {
        let sentence = text[last_end..mat.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        last_end = mat.end();
    }

    let remaining = text[last_end..].trim();
    if !remaining.is_empty() {
        sentences.push(remaining);
    }

    sentences
}

/// Cut a sentence into windows of exactly `max_length` characters (the last
/// may be shorter). Word boundaries are not respected.
fn hard_slice(sentence: &str, max_length: usize) -> Vec<String> {
    let chars: Vec<char> = sentence.chars().collect();
    chars
        .chunks(max_length)
        .map(|window| window.iter().collect())
        .collect()
}

/// Split `text` into ordered chunks of at most `max_length` characters.
///
/// Text that already fits is returned untouched as a single chunk (so empty
/// input yields one empty chunk). Longer text is packed greedily sentence by
/// sentence, joining sentences with a single space; a sentence that alone
/// exceeds the bound is hard-sliced into `max_length` windows.
///
/// Lengths are counted in characters, not bytes.
pub fn segment(text: &str, max_length: usize) -> Vec<String> {
    if char_len(text) <= max_length {
        return vec![text.to_string()];
    }

    let max_length = max_length.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences(text) {
        let sentence_len = char_len(sentence);

        if sentence_len > max_length {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.extend(hard_slice(sentence, max_length));
            continue;
        }

        if current.is_empty() {
            current.push_str(sentence);
            current_len = sentence_len;
        } else if current_len + 1 + sentence_len > max_length {
            chunks.push(std::mem::replace(&mut current, sentence.to_string()));
            current_len = sentence_len;
        } else {
            current.push(' ');
            current.push_str(sentence);
            current_len += 1 + sentence_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    // Whitespace-only input longer than the bound
    if chunks.is_empty() {
        chunks.push(String::new());
    }

    chunks
}
