// ============================================================
// Layer 4: Review Vectorizer
// ============================================================
// Owns the two vocabularies of the pipeline and turns review
// text into fixed-length feature vectors.
//
//   token vocabulary   <UNK>, good, movie, bad, day, ...
//   label vocabulary   pos, neg
//
// Building from a corpus is two passes:
//   1. every distinct label, in encounter order
//   2. token frequencies; tokens seen MORE than `cutoff` times
//      are added in first-seen order, the rest fold into <UNK>
//
// Vectorising is presence encoding ("bag of words" with 0/1):
//
//   "good good day" → [0, 1, 0, 0, 1]
//                         ^good     ^day
//
// A token that appears twice still sets a single 1, and every
// out-of-vocabulary token lands on the <UNK> position.
//
// The vocabularies are frozen after construction: the vectorizer
// exposes no way to add tokens, so feature dimensionality can not
// drift under a trained classifier.
//
// Reference: Rust Book §8 (Strings, HashMap), §13 (Iterators)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::vocabulary::Vocabulary;
use crate::domain::error::VocabularyError;
use crate::domain::review::ReviewRecord;

/// Characters that make up "pure punctuation" tokens.
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// True when every character of `token` is in `PUNCTUATION`.
pub fn is_punctuation(token: &str) -> bool {
    token.chars().all(|c| PUNCTUATION.contains(c))
}

/// Whitespace tokens of `text` that are not pure punctuation.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace().filter(|t| !is_punctuation(t))
}

/// Serialized form, checked by `TryFrom` before it becomes a vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerContents {
    pub token_vocabulary: Vocabulary,
    pub label_vocabulary: Vocabulary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VectorizerContents")]
pub struct ReviewVectorizer {
    token_vocabulary: Vocabulary,
    label_vocabulary: Vocabulary,
}

impl TryFrom<VectorizerContents> for ReviewVectorizer {
    type Error = VocabularyError;

    fn try_from(contents: VectorizerContents) -> Result<Self, Self::Error> {
        Self::new(contents.token_vocabulary, contents.label_vocabulary)
    }
}

impl ReviewVectorizer {
    /// Pair two existing vocabularies, e.g. ones restored from disk.
    ///
    /// Unknown tokens must fold into `<UNK>`, while an unseen label
    /// must stay an error, so the token vocabulary has to allow
    /// unknowns and the label vocabulary must not.
    pub fn new(token_vocabulary: Vocabulary, label_vocabulary: Vocabulary) -> Result<Self, VocabularyError> {
        if !token_vocabulary.allow_unknown() {
            return Err(VocabularyError::Malformed(
                "token vocabulary must map unknown tokens to an unknown index".into(),
            ));
        }
        if label_vocabulary.allow_unknown() {
            return Err(VocabularyError::Malformed(
                "label vocabulary must not allow unknown labels".into(),
            ));
        }
        Ok(Self { token_vocabulary, label_vocabulary })
    }

    /// Build both vocabularies from `records`.
    ///
    /// Callers pass the training subset only; see
    /// `SplitDataset::with_fresh_vectorizer`.
    pub fn from_corpus(records: &[ReviewRecord], frequency_cutoff: usize) -> Self {
        // ── Pass 1: labels in encounter order ─────────────────────────────────
        let mut label_vocabulary = Vocabulary::without_unknown();
        for record in records {
            label_vocabulary.add_token(&record.label);
        }

        // ── Pass 2: token frequencies, remembering first-seen order ───────────
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order:  Vec<&str>            = Vec::new();

        for record in records {
            for token in tokenize(&record.text) {
                let count = counts.entry(token).or_insert_with(|| {
                    order.push(token);
                    0
                });
                *count += 1;
            }
        }

        let mut token_vocabulary = Vocabulary::with_unknown();
        for token in order {
            if counts[token] > frequency_cutoff {
                token_vocabulary.add_token(token);
            }
        }

        tracing::debug!(
            "Vectorizer built from {} records: {} tokens (cutoff {}), {} labels",
            records.len(),
            token_vocabulary.len(),
            frequency_cutoff,
            label_vocabulary.len(),
        );

        Self { token_vocabulary, label_vocabulary }
    }

    /// Presence-encoded feature vector of length `feature_dim()`.
    pub fn vectorize(&self, text: &str) -> Result<Vec<f32>, VocabularyError> {
        let mut one_hot = vec![0.0f32; self.token_vocabulary.len()];
        for token in tokenize(text) {
            let index = self.token_vocabulary.lookup_token(token)?;
            one_hot[index] = 1.0;
        }
        Ok(one_hot)
    }

    /// Class index of `label`; unseen labels are an error.
    pub fn label_index(&self, label: &str) -> Result<usize, VocabularyError> {
        self.label_vocabulary.lookup_token(label)
    }

    /// Label name of a class index.
    pub fn label_name(&self, index: usize) -> Result<&str, VocabularyError> {
        self.label_vocabulary.lookup_index(index)
    }

    /// Length of every vector produced by `vectorize`.
    pub fn feature_dim(&self) -> usize {
        self.token_vocabulary.len()
    }

    pub fn num_labels(&self) -> usize {
        self.label_vocabulary.len()
    }

    pub fn token_vocabulary(&self) -> &Vocabulary {
        &self.token_vocabulary
    }

    pub fn label_vocabulary(&self) -> &Vocabulary {
        &self.label_vocabulary
    }
}
