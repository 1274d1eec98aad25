use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

pub const PARAGRAPH_BREAK: &str = "\n\n";

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Runs of word characters (alphanumeric or underscore).
pub fn word_count(text: &str) -> usize {
    WORD_REGEX.find_iter(text).count()
}

/// Universal newlines: `\r\n` and a lone `\r` both become `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

pub struct Chunker;

impl Chunker {
    /// Greedily packs blank-line separated paragraphs into chunks of at most
    /// `word_limit` words. A paragraph is never split, so one that is larger
    /// than the limit on its own becomes a single oversized chunk.
    pub fn chunk(text: &str, word_limit: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_words = 0;

        for paragraph in text.split(PARAGRAPH_BREAK) {
            let words = word_count(paragraph);
            if current_words + words > word_limit && !current.is_empty() {
                chunks.push(current.join(PARAGRAPH_BREAK));
                current.clear();
                current_words = 0;
            }
            current.push(paragraph);
            current_words += words;
        }

        if !current.is_empty() {
            chunks.push(current.join(PARAGRAPH_BREAK));
        }
        chunks
    }
}
