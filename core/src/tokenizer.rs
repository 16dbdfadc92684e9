use crate::stemmer::stem;
use lazy_static::lazy_static;
use regex::bytes::{Matches, Regex};

lazy_static! {
    // ASCII only: every other byte, including UTF-8 continuation bytes, separates tokens.
    static ref RE: Regex = Regex::new(r"(?-u)[A-Za-z0-9]+").expect("valid regex");
}

/// Lazy stream of lowercase alphanumeric tokens over a borrowed buffer.
pub struct Tokens<'t> {
    matches: Matches<'static, 't>,
    min_len: usize,
}

impl<'t> Iterator for Tokens<'t> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for m in self.matches.by_ref() {
            let raw = m.as_bytes();
            if raw.len() < self.min_len {
                continue;
            }
            return Some(raw.iter().map(|b| b.to_ascii_lowercase() as char).collect());
        }
        None
    }
}

/// Split text into lowercase alphanumeric tokens (minimum length 1).
pub fn tokenize<T: AsRef<[u8]> + ?Sized>(text: &T) -> Tokens<'_> {
    tokenize_with_min_len(text, 1)
}

/// Like [`tokenize`], discarding tokens shorter than `min_len` bytes.
pub fn tokenize_with_min_len<T: AsRef<[u8]> + ?Sized>(text: &T, min_len: usize) -> Tokens<'_> {
    Tokens { matches: RE.find_iter(text.as_ref()), min_len }
}

/// Tokenize and stem: the exact pipeline used both at build time and for query terms.
pub fn normalize<T: AsRef<[u8]> + ?Sized>(text: &T) -> impl Iterator<Item = String> + '_ {
    tokenize(text).map(|token| stem(&token))
}

/// Normalize a single query term. Only the first sub-token counts when the
/// term fragment splits into several (e.g. `don't` -> `don`).
pub fn normalize_term(term: &str) -> Option<String> {
    normalize(term).next()
}
