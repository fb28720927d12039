// ============================================================
// Layer 4: Vocabulary
// ============================================================
// A bidirectional token <-> index mapping.
//
//   token_to_index:  "<UNK>" → 0, "good" → 1, "movie" → 2, ...
//   index_to_token:  [ "<UNK>", "good", "movie", ... ]
//
// Indices are handed out in insertion order starting at 0, so
// the inverse mapping is simply a Vec and the forward mapping a
// HashMap that always agrees with it.
//
// With an unknown token enabled, that token is inserted first
// (index 0) and every lookup of an absent token resolves to it.
// Without one (the label vocabulary), an absent token is an
// error: a label that was never seen must not be mapped onto a
// class silently.
//
// Serialised form (JSON via serde):
//   {
//     "index_to_token": { "0": "<UNK>", "1": "good", ... },
//     "allow_unknown":  true,
//     "unknown_token":  "<UNK>"
//   }
// The forward mapping is rebuilt from the inverse on load.
//
// Reference: Rust Book §8 (HashMap), §9 (Error Handling)

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::error::VocabularyError;

/// Default placeholder for tokens outside the vocabulary.
pub const DEFAULT_UNKNOWN_TOKEN: &str = "<UNK>";

// ─── VocabularyContents ───────────────────────────────────────────────────────
/// Plain structural representation of a `Vocabulary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyContents {
    pub index_to_token: BTreeMap<usize, String>,
    pub allow_unknown:  bool,
    pub unknown_token:  String,
}

// ─── Vocabulary ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyContents", into = "VocabularyContents")]
pub struct Vocabulary {
    token_to_index: HashMap<String, usize>,
    index_to_token: Vec<String>,
    allow_unknown:  bool,
    unknown_token:  String,
    /// `Some(0)` when `allow_unknown`, otherwise `None`.
    unknown_index:  Option<usize>,
}

impl Vocabulary {
    /// Create an empty vocabulary. With `allow_unknown`, `unknown_token`
    /// is inserted immediately and receives index 0.
    pub fn new(allow_unknown: bool, unknown_token: impl Into<String>) -> Self {
        let mut vocab = Self {
            token_to_index: HashMap::new(),
            index_to_token: Vec::new(),
            allow_unknown,
            unknown_token: unknown_token.into(),
            unknown_index: None,
        };
        if allow_unknown {
            let token = vocab.unknown_token.clone();
            vocab.unknown_index = Some(vocab.add_token(&token));
        }
        vocab
    }

    /// Vocabulary with an unknown fallback, used for review tokens.
    pub fn with_unknown() -> Self {
        Self::new(true, DEFAULT_UNKNOWN_TOKEN)
    }

    /// Vocabulary without a fallback, used for labels.
    pub fn without_unknown() -> Self {
        Self::new(false, DEFAULT_UNKNOWN_TOKEN)
    }

    /// Insert `token` if absent and return its index.
    /// Re-adding an existing token returns the existing index.
    pub fn add_token(&mut self, token: &str) -> usize {
        if let Some(&index) = self.token_to_index.get(token) {
            return index;
        }
        let index = self.index_to_token.len();
        self.token_to_index.insert(token.to_string(), index);
        self.index_to_token.push(token.to_string());
        index
    }

    /// Add every token in order, returning their indices.
    pub fn add_many<'a, I>(&mut self, tokens: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tokens.into_iter().map(|t| self.add_token(t)).collect()
    }

    /// Index of `token`, falling back to the unknown index when enabled.
    pub fn lookup_token(&self, token: &str) -> Result<usize, VocabularyError> {
        match (self.token_to_index.get(token), self.unknown_index) {
            (Some(&index), _)    => Ok(index),
            (None, Some(unk))    => Ok(unk),
            (None, None)         => Err(VocabularyError::KeyLookup(token.to_string())),
        }
    }

    /// Token stored at `index`.
    pub fn lookup_index(&self, index: usize) -> Result<&str, VocabularyError> {
        self.index_to_token
            .get(index)
            .map(String::as_str)
            .ok_or(VocabularyError::IndexLookup { index, size: self.len() })
    }

    /// Whether `token` has its own entry (the unknown fallback does not count).
    pub fn contains(&self, token: &str) -> bool {
        self.token_to_index.contains_key(token)
    }

    /// Number of distinct tokens, the unknown token included.
    pub fn len(&self) -> usize {
        self.index_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_token.is_empty()
    }

    pub fn allow_unknown(&self) -> bool {
        self.allow_unknown
    }

    pub fn unknown_token(&self) -> &str {
        &self.unknown_token
    }

    pub fn unknown_index(&self) -> Option<usize> {
        self.unknown_index
    }

    /// Tokens in index order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.index_to_token.iter().map(String::as_str)
    }

    /// Serialisable snapshot of this vocabulary.
    pub fn to_contents(&self) -> VocabularyContents {
        VocabularyContents {
            index_to_token: self.index_to_token
                .iter()
                .cloned()
                .enumerate()
                .collect(),
            allow_unknown:  self.allow_unknown,
            unknown_token:  self.unknown_token.clone(),
        }
    }

    /// Rebuild a vocabulary from its snapshot.
    ///
    /// Rejects snapshots whose indices are not exactly `0..n`, that
    /// repeat a token, or that enable the unknown fallback without
    /// storing the unknown token at index 0.
    pub fn from_contents(contents: VocabularyContents) -> Result<Self, VocabularyError> {
        let VocabularyContents { index_to_token, allow_unknown, unknown_token } = contents;

        let mut token_to_index = HashMap::with_capacity(index_to_token.len());
        let mut tokens         = Vec::with_capacity(index_to_token.len());

        // BTreeMap iterates in key order, so contiguity means key == position
        for (position, (index, token)) in index_to_token.into_iter().enumerate() {
            if index != position {
                return Err(VocabularyError::Malformed(format!(
                    "indices must be contiguous from 0, found {index} at position {position}"
                )));
            }
            if token_to_index.insert(token.clone(), index).is_some() {
                return Err(VocabularyError::Malformed(format!(
                    "token '{token}' appears more than once"
                )));
            }
            tokens.push(token);
        }

        let unknown_index = if allow_unknown {
            if tokens.first() != Some(&unknown_token) {
                return Err(VocabularyError::Malformed(format!(
                    "unknown token '{unknown_token}' must be stored at index 0"
                )));
            }
            Some(0)
        } else {
            None
        };

        Ok(Self {
            token_to_index,
            index_to_token: tokens,
            allow_unknown,
            unknown_token,
            unknown_index,
        })
    }
}

impl TryFrom<VocabularyContents> for Vocabulary {
    type Error = VocabularyError;

    fn try_from(contents: VocabularyContents) -> Result<Self, Self::Error> {
        Self::from_contents(contents)
    }
}

impl From<Vocabulary> for VocabularyContents {
    fn from(vocab: Vocabulary) -> Self {
        vocab.to_contents()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn vocab_ab() -> Vocabulary {
        let mut v = Vocabulary::with_unknown();
        v.add_many(["a", "b"]);
        v
    }

    #[test]
    fn test_unknown_token_gets_index_zero() {
        let v = Vocabulary::with_unknown();
        assert_eq!(v.len(), 1);
        assert_eq!(v.unknown_index(), Some(0));
        assert_eq!(v.lookup_index(0), Ok(DEFAULT_UNKNOWN_TOKEN));
    }

    #[test]
    fn test_indices_follow_insertion_order() {
        let mut v = Vocabulary::without_unknown();
        assert_eq!(v.add_many(["neg", "pos", "mixed"]), vec![0, 1, 2]);
        assert!(v.unknown_index().is_none());
    }

    #[test]
    fn test_add_token_is_idempotent() {
        let mut v = Vocabulary::with_unknown();
        let first  = v.add_token("tasty");
        let size   = v.len();
        let second = v.add_token("tasty");
        assert_eq!(first, second);
        assert_eq!(v.len(), size);
    }

    #[test]
    fn test_adding_the_unknown_token_again_is_a_noop() {
        let mut v = Vocabulary::with_unknown();
        assert_eq!(v.add_token(DEFAULT_UNKNOWN_TOKEN), 0);
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_inverse_mapping_consistency() {
        let mut v = vocab_ab();
        v.add_many(["c", "a", "d"]);
        for i in 0..v.len() {
            let token = v.lookup_index(i).unwrap().to_string();
            assert_eq!(v.lookup_token(&token), Ok(i));
        }
    }

    #[test]
    fn test_unknown_fallback() {
        let v = vocab_ab();
        assert_eq!(v.lookup_token("z"), v.lookup_token(DEFAULT_UNKNOWN_TOKEN));
        assert_eq!(v.lookup_token("z"), Ok(0));
        assert!(!v.contains("z"));
    }

    #[test]
    fn test_missing_token_without_fallback_is_an_error() {
        let mut v = Vocabulary::without_unknown();
        v.add_token("positive");
        assert_eq!(
            v.lookup_token("neutral"),
            Err(VocabularyError::KeyLookup("neutral".into()))
        );
    }

    #[test]
    fn test_lookup_index_out_of_range() {
        let v = vocab_ab();
        assert_eq!(v.lookup_index(3), Err(VocabularyError::IndexLookup { index: 3, size: 3 }));
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut v = vocab_ab();
        v.add_token("c");
        let json     = serde_json::to_string(&v).unwrap();
        let restored: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, v);
        assert_eq!(restored.unknown_index(), Some(0));
        assert_eq!(restored.lookup_token("c"), Ok(3));
    }

    #[test]
    fn test_serialized_shape() {
        let v    = vocab_ab();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["index_to_token"]["1"], "a");
        assert_eq!(json["allow_unknown"], true);
        assert_eq!(json["unknown_token"], "<UNK>");
    }

    #[test]
    fn test_from_contents_rejects_gaps() {
        let contents = VocabularyContents {
            index_to_token: BTreeMap::from([(0, "a".to_string()), (2, "b".to_string())]),
            allow_unknown:  false,
            unknown_token:  DEFAULT_UNKNOWN_TOKEN.to_string(),
        };
        assert!(matches!(
            Vocabulary::from_contents(contents),
            Err(VocabularyError::Malformed(_))
        ));
    }

    #[test]
    fn test_from_contents_rejects_duplicates() {
        let contents = VocabularyContents {
            index_to_token: BTreeMap::from([(0, "a".to_string()), (1, "a".to_string())]),
            allow_unknown:  false,
            unknown_token:  DEFAULT_UNKNOWN_TOKEN.to_string(),
        };
        assert!(Vocabulary::from_contents(contents).is_err());
    }

    #[test]
    fn test_from_contents_requires_unknown_at_zero() {
        let contents = VocabularyContents {
            index_to_token: BTreeMap::from([(0, "a".to_string()), (1, "<UNK>".to_string())]),
            allow_unknown:  true,
            unknown_token:  DEFAULT_UNKNOWN_TOKEN.to_string(),
        };
        assert!(Vocabulary::from_contents(contents).is_err());
    }
}
