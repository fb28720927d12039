// ============================================================
// Layer 3: Review Domain Types
// ============================================================
// A review is a piece of free text with a categorical label
// ("positive" / "negative" for the sentiment task). Once the
// corpus has been split, every review also carries the name of
// the partition it belongs to.
//
// The serde renames match the CSV column headers:
//
//   rating,review,split
//   positive,the food was great !,train
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DatasetError;

// ─── Split ────────────────────────────────────────────────────────────────────
/// One of the three disjoint partitions of the record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    /// All splits in canonical order.
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    /// The tag used in CSV files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val   => "val",
            Split::Test  => "test",
        }
    }

    /// Position of this split in `Split::ALL`.
    pub fn position(self) -> usize {
        match self {
            Split::Train => 0,
            Split::Val   => 1,
            Split::Test  => 2,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = DatasetError;

    /// Exact, case-sensitive match on the three tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "val"   => Ok(Split::Val),
            "test"  => Ok(Split::Test),
            other   => Err(DatasetError::UnknownSplit(other.to_string())),
        }
    }
}

// ─── ReviewRecord ─────────────────────────────────────────────────────────────
/// One row of the split record table.
///
/// `split` stays a raw string here: the CSV is external input and
/// an invalid tag must be reported by `SplitDataset::new` together
/// with the offending row number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "rating")]
    pub label: String,

    #[serde(rename = "review")]
    pub text: String,

    pub split: String,
}

impl ReviewRecord {
    pub fn new(
        label: impl Into<String>,
        text:  impl Into<String>,
        split: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            text:  text.into(),
            split: split.into(),
        }
    }
}

// ─── RawReview ────────────────────────────────────────────────────────────────
/// A labelled review that has not been assigned to a split yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReview {
    #[serde(rename = "rating")]
    pub label: String,

    #[serde(rename = "review")]
    pub text: String,
}

impl RawReview {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self { label: label.into(), text: text.into() }
    }

    /// Attach a split tag, producing a full record.
    pub fn into_record(self, split: Split) -> ReviewRecord {
        ReviewRecord {
            label: self.label,
            text:  self.text,
            split: split.as_str().to_string(),
        }
    }
}
