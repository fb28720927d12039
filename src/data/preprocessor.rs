// ============================================================
// Layer 4: Review Text Preprocessor
// ============================================================
// Normalises raw review text before it reaches the vectorizer.
//
// Raw reviews arrive with mixed case, punctuation glued to
// words ("great!"), digits, quotes and stray symbols. The
// vectorizer splits on whitespace only, so without cleaning
// "great!" and "Great" would be two different tokens.
//
// Cleaning steps (applied in order):
//   1. Lowercase everything
//   2. Pad . , ! ? with spaces so they become standalone tokens
//      (the vectorizer then skips them as pure punctuation)
//   3. Replace every other non-letter character with a space
//   4. Collapse runs of whitespace and trim
//
//   "The food was GREAT!!  5/5"  →  "the food was great ! !"
//
// The same cleaning runs when the corpus is prepared and when
// a single review is classified, so both sides see identical
// token streams.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

/// Punctuation kept as separate tokens.
const KEPT_PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw review for vectorisation.
    pub fn clean(&self, text: &str) -> String {
        let mut spaced = String::with_capacity(text.len() + 8);

        for c in text.chars().flat_map(char::to_lowercase) {
            match c {
                c if KEPT_PUNCTUATION.contains(&c) => {
                    spaced.push(' ');
                    spaced.push(c);
                    spaced.push(' ');
                }
                c if c.is_ascii_alphabetic() => spaced.push(c),
                _ => spaced.push(' '),
            }
        }

        spaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
