// ============================================================
// Layer 4: Review CSV Loader
// ============================================================
// Reads and writes the review tables with the csv crate.
//
// Two layouts are understood:
//
//   raw (unsplit)            split
//   rating,review            rating,review,split
//   positive,great food !    positive,great food !,train
//
// Rows are deserialised straight into the domain structs via
// serde; extra columns are ignored. A malformed row fails the
// whole load with its line number in the error context.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::review::{RawReview, ReviewRecord};
use crate::domain::traits::RecordSource;

/// Loads the split-tagged review table from a CSV file.
pub struct ReviewCsvLoader {
    path: PathBuf,
}

impl ReviewCsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for ReviewCsvLoader {
    fn load_all(&self) -> Result<Vec<ReviewRecord>> {
        let records: Vec<ReviewRecord> = read_rows(&self.path)?;
        tracing::info!("Loaded {} reviews from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}

/// Load unsplit `rating,review` rows.
pub fn load_raw(path: &Path) -> Result<Vec<RawReview>> {
    let reviews: Vec<RawReview> = read_rows(path)?;
    tracing::info!("Loaded {} raw reviews from '{}'", reviews.len(), path.display());
    Ok(reviews)
}

/// Write records as `rating,review,split`.
pub fn write_records(path: &Path, records: &[ReviewRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} reviews to '{}'", records.len(), path.display());
    Ok(())
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Cannot open review CSV '{}'", path.display()))?;

    let mut rows = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row = row.with_context(|| format!("Bad row at line {} of '{}'", i + 2, path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_loads_split_table_and_ignores_extra_columns() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        fs::write(
            &path,
            "rating,review,split,stars\n\
             positive,great food !,train,5\n\
             negative,\"cold , bland\",val,1\n",
        ).unwrap();

        let records = ReviewCsvLoader::new(&path).load_all().unwrap();
        assert_eq!(records, vec![
            ReviewRecord::new("positive", "great food !", "train"),
            ReviewRecord::new("negative", "cold , bland",  "val"),
        ]);
    }

    #[test]
    fn test_write_then_load_split_table() {
        let dir     = tempfile::tempdir().unwrap();
        let path    = dir.path().join("out").join("split.csv");
        let records = vec![
            ReviewRecord::new("positive", "tasty", "train"),
            ReviewRecord::new("negative", "meh , slow", "test"),
        ];

        write_records(&path, &records).unwrap();
        assert_eq!(ReviewCsvLoader::new(&path).load_all().unwrap(), records);
    }

    #[test]
    fn test_load_raw() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(&path, "rating,review\nnegative,never again\n").unwrap();

        let reviews = load_raw(&path).unwrap();
        assert_eq!(reviews, vec![RawReview::new("negative", "never again")]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "rating,review\npositive,fine\n").unwrap();

        let err = ReviewCsvLoader::new(&path).load_all().unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err:#}");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = ReviewCsvLoader::new("/definitely/not/here.csv");
        assert!(loader.load_all().is_err());
    }
}
