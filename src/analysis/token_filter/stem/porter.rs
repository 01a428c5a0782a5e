//! Porter stemming algorithm.
//!
//! The five rewrite steps of M.F. Porter, "An algorithm for suffix
//! stripping" (1980):
//! 1. Plurals and -ed/-ing suffixes
//! 2. Double suffixes such as -ational and -ization
//! 3. -icate, -ative, -ful, -ness and friends
//! 4. Remove -al, -ance, -ence, etc. from long stems
//! 5. Remove a final -e and reduce -ll
//!
//! The rules are defined over the lowercase ASCII alphabet. Words containing
//! any other character are returned unchanged.
//!
//! # Examples
//!
//! ```
//! use scour::analysis::token_filter::stem::Stemmer;
//! use scour::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("flies"), "fli");
//! assert_eq!(stemmer.stem("traditional"), "tradit");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
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
    ("logi", "log"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Porter stemming algorithm.
#[derive(Debug, Clone, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        PorterStemmer
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word.to_string();
        }

        let mut word = Word {
            b: word.as_bytes().to_vec(),
        };
        word.step1a();
        word.step1b();
        word.step1c();
        word.step2();
        word.step3();
        word.step4();
        word.step5();

        // Only ASCII letters were ever written.
        String::from_utf8_lossy(&word.b).into_owned()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

fn is_consonant(s: &[u8], i: usize) -> bool {
    match s[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(s, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `s`, the `m` of `[C](VC)^m[V]`.
fn measure(s: &[u8]) -> usize {
    let n = s.len();
    let mut i = 0;
    while i < n && is_consonant(s, i) {
        i += 1;
    }

    let mut m = 0;
    loop {
        while i < n && !is_consonant(s, i) {
            i += 1;
        }
        if i >= n {
            return m;
        }
        while i < n && is_consonant(s, i) {
            i += 1;
        }
        m += 1;
    }
}

fn has_vowel(s: &[u8]) -> bool {
    (0..s.len()).any(|i| !is_consonant(s, i))
}

fn ends_double_consonant(s: &[u8]) -> bool {
    let n = s.len();
    n >= 2 && s[n - 1] == s[n - 2] && is_consonant(s, n - 1)
}

/// Consonant-vowel-consonant ending where the last consonant is not w, x or y.
fn ends_cvc(s: &[u8]) -> bool {
    let n = s.len();
    n >= 3
        && is_consonant(s, n - 3)
        && !is_consonant(s, n - 2)
        && is_consonant(s, n - 1)
        && !matches!(s[n - 1], b'w' | b'x' | b'y')
}

struct Word {
    b: Vec<u8>,
}

impl Word {
    /// Length of the stem left when `suffix` is removed, if the word ends with it.
    fn stem_len(&self, suffix: &str) -> Option<usize> {
        self.b
            .ends_with(suffix.as_bytes())
            .then(|| self.b.len() - suffix.len())
    }

    fn replace(&mut self, stem_len: usize, replacement: &str) {
        self.b.truncate(stem_len);
        self.b.extend_from_slice(replacement.as_bytes());
    }

    /// Apply the first rule whose suffix matches, if the stem measure exceeds
    /// `min_measure`. Later rules are not tried once a suffix matched.
    fn apply_rules(&mut self, rules: &[(&str, &str)], min_measure: usize) {
        for (suffix, replacement) in rules {
            if let Some(stem_len) = self.stem_len(suffix) {
                if measure(&self.b[..stem_len]) > min_measure {
                    self.replace(stem_len, replacement);
                }
                return;
            }
        }
    }

    fn step1a(&mut self) {
        if let Some(stem_len) = self.stem_len("sses") {
            self.replace(stem_len, "ss");
        } else if let Some(stem_len) = self.stem_len("ies") {
            self.replace(stem_len, "i");
        } else if self.b.ends_with(b"s") && !self.b.ends_with(b"ss") {
            self.b.pop();
        }
    }

    fn step1b(&mut self) {
        if let Some(stem_len) = self.stem_len("eed") {
            if measure(&self.b[..stem_len]) > 0 {
                self.b.pop();
            }
            return;
        }

        let stem_len = match self.stem_len("ed").or_else(|| self.stem_len("ing")) {
            Some(stem_len) if has_vowel(&self.b[..stem_len]) => stem_len,
            _ => return,
        };
        self.b.truncate(stem_len);

        if self.b.ends_with(b"at") || self.b.ends_with(b"bl") || self.b.ends_with(b"iz") {
            self.b.push(b'e');
        } else if ends_double_consonant(&self.b) {
            if !matches!(self.b.last(), Some(b'l' | b's' | b'z')) {
                self.b.pop();
            }
        } else if measure(&self.b) == 1 && ends_cvc(&self.b) {
            self.b.push(b'e');
        }
    }

    fn step1c(&mut self) {
        if let Some(stem_len) = self.stem_len("y") {
            if has_vowel(&self.b[..stem_len]) {
                self.replace(stem_len, "i");
            }
        }
    }

    fn step2(&mut self) {
        self.apply_rules(STEP2_RULES, 0);
    }

    fn step3(&mut self) {
        self.apply_rules(STEP3_RULES, 0);
    }

    fn step4(&mut self) {
        for suffix in STEP4_SUFFIXES {
            let Some(stem_len) = self.stem_len(suffix) else {
                continue;
            };
            if *suffix == "ion" && !matches!(self.b[..stem_len].last(), Some(b's' | b't')) {
                continue;
            }
            if measure(&self.b[..stem_len]) > 1 {
                self.b.truncate(stem_len);
            }
            return;
        }
    }

    fn step5(&mut self) {
        if let Some(stem_len) = self.stem_len("e") {
            let stem = &self.b[..stem_len];
            let m = measure(stem);
            if m > 1 || (m == 1 && !ends_cvc(stem)) {
                self.b.truncate(stem_len);
            }
        }

        if measure(&self.b) > 1 && ends_double_consonant(&self.b) && self.b.last() == Some(&b'l')
        {
            self.b.pop();
        }
    }
}
