//! Porter suffix-stripping stemmer.
//!
//! The passes run in the classical order (1a, 1b, 1c, 2, 3, 4, 5a). Each pass
//! only looks at the current working word. Stemming is not idempotent:
//! `stem(stem(w))` may differ from `stem(w)`.

const STEP2: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

const STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Stem one lowercase token. Words of two bytes or fewer come back unchanged.
pub fn stem(word: &str) -> String {
    if word.len() <= 2 {
        return word.to_string();
    }
    let mut w = Word::new(word);
    w.step1a();
    if w.step1b() {
        w.step1b_cleanup();
    }
    w.step1c();
    w.replace_first(STEP2);
    w.replace_first(STEP3);
    w.step4();
    w.step5();
    w.into_string()
}

/// Working buffer plus its consonant classification, one flag per byte.
struct Word {
    bytes: Vec<u8>,
    consonant: Vec<bool>,
}

impl Word {
    fn new(word: &str) -> Self {
        let bytes = word.to_ascii_lowercase().into_bytes();
        let consonant = classify(&bytes);
        Self { bytes, consonant }
    }

    fn into_string(self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn ends_with(&self, suffix: &str) -> bool {
        self.bytes.ends_with(suffix.as_bytes())
    }

    /// Measure of the first `len` bytes. A `y` only depends on what precedes it,
    /// so the flags of a prefix are a prefix of the flags.
    fn measure(&self, len: usize) -> usize {
        measure(&self.consonant[..len])
    }

    fn has_vowel(&self, len: usize) -> bool {
        self.consonant[..len].iter().any(|&c| !c)
    }

    fn ends_cvc(&self, len: usize) -> bool {
        if len < 3 {
            return false;
        }
        let c = &self.consonant;
        c[len - 1] && !c[len - 2] && c[len - 3] && !matches!(self.bytes[len - 1], b'w' | b'x' | b'y')
    }

    fn ends_double_consonant(&self) -> bool {
        let n = self.len();
        n >= 2 && self.bytes[n - 1] == self.bytes[n - 2] && self.consonant[n - 1]
    }

    /// Keep the first `len` bytes and append `tail`.
    fn splice(&mut self, len: usize, tail: &str) {
        self.bytes.truncate(len);
        self.bytes.extend_from_slice(tail.as_bytes());
        self.consonant = classify(&self.bytes);
    }

    fn truncate_by(&mut self, n: usize) {
        let len = self.len() - n;
        self.splice(len, "");
    }

    fn step1a(&mut self) {
        if self.ends_with("sses") || self.ends_with("ies") {
            self.truncate_by(2);
        } else if self.ends_with("s") && !self.ends_with("ss") {
            self.truncate_by(1);
        }
    }

    /// Returns true when `ed` or `ing` was stripped.
    fn step1b(&mut self) -> bool {
        if self.ends_with("eed") {
            if self.measure(self.len() - 3) > 0 {
                self.truncate_by(1);
            }
            return false;
        }
        for suffix in ["ed", "ing"] {
            if self.ends_with(suffix) {
                let stem_len = self.len() - suffix.len();
                if self.has_vowel(stem_len) {
                    self.splice(stem_len, "");
                    return true;
                }
                return false;
            }
        }
        false
    }

    fn step1b_cleanup(&mut self) {
        let n = self.len();
        if self.ends_with("at") || self.ends_with("bl") || self.ends_with("iz") {
            self.splice(n, "e");
        } else if self.ends_double_consonant() {
            if !matches!(self.bytes[n - 1], b'l' | b's' | b'z') {
                self.truncate_by(1);
            }
        } else if self.measure(n) == 1 && self.ends_cvc(n) {
            self.splice(n, "e");
        }
    }

    fn step1c(&mut self) {
        if self.ends_with("y") {
            let stem_len = self.len() - 1;
            if self.has_vowel(stem_len) {
                self.splice(stem_len, "i");
            }
        }
    }

    /// First suffix in `table` that matches ends the scan; it is replaced only
    /// when the remaining stem has measure > 0.
    fn replace_first(&mut self, table: &[(&str, &str)]) {
        if let Some(&(suffix, replacement)) = table.iter().find(|(s, _)| self.ends_with(s)) {
            let stem_len = self.len() - suffix.len();
            if self.measure(stem_len) > 0 {
                self.splice(stem_len, replacement);
            }
        }
    }

    fn step4(&mut self) {
        if let Some(suffix) = STEP4.iter().find(|s| self.ends_with(s)) {
            let stem_len = self.len() - suffix.len();
            if self.measure(stem_len) > 1 {
                self.splice(stem_len, "");
            }
        }
    }

    fn step5(&mut self) {
        if self.ends_with("e") {
            let stem_len = self.len() - 1;
            let m = self.measure(stem_len);
            if m > 1 || (m == 1 && !self.ends_cvc(stem_len)) {
                self.splice(stem_len, "");
            }
        }
    }
}

/// `y` is a consonant at position 0 or after a vowel, a vowel after a consonant.
fn classify(bytes: &[u8]) -> Vec<bool> {
    let mut flags: Vec<bool> = Vec::with_capacity(bytes.len());
    for (i, &b) in bytes.iter().enumerate() {
        let consonant = match b {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !flags[i - 1],
            _ => true,
        };
        flags.push(consonant);
    }
    flags
}

/// Number of vowel runs that follow the leading consonants, a trailing run
/// included: `tr` -> 0, `tre` -> 1, `trouble` -> 2.
fn measure(consonant: &[bool]) -> usize {
    let mut m = 0;
    let mut prev_consonant = true;
    for &c in consonant {
        if !c && prev_consonant {
            m += 1;
        }
        prev_consonant = c;
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(word: &str) -> usize {
        measure(&classify(word.as_bytes()))
    }

    #[test]
    fn measure_counts_every_vowel_run() {
        for w in ["", "tr", "y"] {
            assert_eq!(m(w), 0, "{w}");
        }
        for w in ["ee", "tre", "tree", "by", "oats", "trees"] {
            assert_eq!(m(w), 1, "{w}");
        }
        for w in ["trouble", "troubles", "ivy", "oaten", "agre"] {
            assert_eq!(m(w), 2, "{w}");
        }
        for w in ["private", "orrery"] {
            assert_eq!(m(w), 3, "{w}");
        }
    }

    #[test]
    fn trailing_vowel_run_counts_toward_final_e() {
        assert_eq!(stem("tree"), "tre");
        assert_eq!(stem("see"), "se");
        assert_eq!(stem("free"), "fre");
        assert_eq!(stem("aation"), "aat");
        assert_eq!(stem("acaous"), "aca");
    }

    #[test]
    fn y_classification() {
        // consonant at the start, vowel after a consonant, consonant after a vowel
        assert_eq!(classify(b"yay"), vec![true, false, true]);
        assert_eq!(classify(b"syzygy"), vec![true, false, true, false, true, false]);
    }

    #[test]
    fn step1b_restores_ee() {
        let mut w = Word::new("agreed");
        assert!(!w.step1b());
        assert_eq!(w.into_string(), "agree");
    }

    #[test]
    fn step1b_cleanup_rules() {
        for (input, expected) in [
            ("conflated", "conflate"),
            ("troubled", "trouble"),
            ("sized", "size"),
            ("hopping", "hop"),
            ("tanned", "tan"),
            ("falling", "fall"),
            ("hissing", "hiss"),
            ("fizzed", "fizz"),
            ("failing", "fail"),
            ("filing", "file"),
        ] {
            let mut w = Word::new(input);
            assert!(w.step1b(), "{input}");
            w.step1b_cleanup();
            assert_eq!(w.into_string(), expected);
        }
    }

    #[test]
    fn short_words_untouched() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("a"), "a");
        assert_eq!(stem(""), "");
    }
}
