// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything from CSV rows to tensor batches.
//
//   reviews.csv
//       │
//       ▼
//   loader            → reads rows into ReviewRecords
//       │
//       ▼
//   preprocessor      → lowercases, isolates punctuation
//       │
//       ▼
//   splitter          → stratified train/val/test tags
//       │
//       ▼
//   vocabulary        → token <-> index mapping
//   vectorizer        → text → presence-encoded feature vector
//       │
//       ▼
//   dataset           → SplitDataset, one active split at a time
//       │
//       ▼
//   batch_iter        → lazy, optionally shuffled batches
//       │
//       ▼
//   batcher           → Burn tensors for the model
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Reads and writes review CSV files
pub mod loader;

/// Cleans and normalises raw review text
pub mod preprocessor;

/// Assigns stratified train/val/test splits
pub mod splitter;

/// Bidirectional token <-> index mapping
pub mod vocabulary;

/// Builds vocabularies from a corpus and vectorises text
pub mod vectorizer;

/// Split-aware dataset over the record table
pub mod dataset;

/// Lazy batch iteration over the active split
pub mod batch_iter;

/// Converts batches into Burn tensors
pub mod batcher;
