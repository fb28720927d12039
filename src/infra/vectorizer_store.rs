// ============================================================
// Layer 6: Vectorizer Store
// ============================================================
// Persists the vectorizer next to the classifier checkpoint.
//
// A trained classifier only makes sense together with the exact
// vocabulary it was trained on: feature i of the model is token
// i of that vocabulary. Inference must therefore reload the
// saved vectorizer and never rebuild one from data.
//
// Format: vectorizer.json
//   {
//     "token_vocabulary": { "index_to_token": {...}, "allow_unknown": true,  "unknown_token": "<UNK>" },
//     "label_vocabulary": { "index_to_token": {...}, "allow_unknown": false, "unknown_token": "<UNK>" }
//   }
//
// `ensure_compatible` is the load-time guard against vocabulary
// drift: it refuses a vectorizer whose feature dimension differs
// from the classifier's input width, or whose label vocabulary is
// not binary.
//
// Reference: serde_json documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::data::vectorizer::ReviewVectorizer;
use crate::domain::traits::Persistable;
use crate::ml::model::ReviewClassifierConfig;

const VECTORIZER_FILE: &str = "vectorizer.json";

impl Persistable for ReviewVectorizer {
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write vectorizer to '{}'", path.display()))?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read vectorizer from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid vectorizer file '{}'", path.display()))
    }
}

pub struct VectorizerStore {
    dir: PathBuf,
}

impl VectorizerStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(VECTORIZER_FILE)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    pub fn save(&self, vectorizer: &ReviewVectorizer) -> Result<()> {
        let path = self.path();
        vectorizer.save(&path)?;
        tracing::info!(
            "Vectorizer saved to '{}' ({} features, {} labels)",
            path.display(),
            vectorizer.feature_dim(),
            vectorizer.num_labels(),
        );
        Ok(())
    }

    pub fn load(&self) -> Result<ReviewVectorizer> {
        let path       = self.path();
        let vectorizer = ReviewVectorizer::load(&path)?;
        tracing::info!("Loaded vectorizer from '{}'", path.display());
        Ok(vectorizer)
    }
}

/// Refuse to pair a classifier with a vectorizer it was not trained on.
pub fn ensure_compatible(vectorizer: &ReviewVectorizer, cfg: &ReviewClassifierConfig) -> Result<()> {
    if vectorizer.feature_dim() != cfg.num_features {
        bail!(
            "vectorizer produces {} features but the classifier expects {}; \
             the saved vectorizer does not belong to this checkpoint",
            vectorizer.feature_dim(),
            cfg.num_features,
        );
    }
    if vectorizer.num_labels() != 2 {
        bail!(
            "binary classifier needs exactly 2 labels, vectorizer has {}",
            vectorizer.num_labels()
        );
    }
    Ok(())
}
