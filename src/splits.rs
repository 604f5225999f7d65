use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::partition::{
    BUCKET_SPACE, DEFAULT_TESTING_PERCENTAGE, DEFAULT_VALIDATION_PERCENTAGE, GROUPING_MARKER,
    LABEL_TESTING, LABEL_TRAINING, LABEL_VALIDATION,
};
use crate::errors::PartitionError;
use crate::hash::{BucketHasher, Sha1Buckets};

/// Dataset partition a sample belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionLabel {
    /// Training partition.
    Training,
    /// Validation partition.
    Validation,
    /// Testing partition.
    Testing,
}

impl PartitionLabel {
    /// Canonical lowercase name (`training`, `validation`, `testing`).
    pub fn as_str(self) -> &'static str {
        match self {
            PartitionLabel::Training => LABEL_TRAINING,
            PartitionLabel::Validation => LABEL_VALIDATION,
            PartitionLabel::Testing => LABEL_TESTING,
        }
    }
}

impl fmt::Display for PartitionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionLabel {
    type Err = PartitionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            LABEL_TRAINING => Ok(PartitionLabel::Training),
            LABEL_VALIDATION => Ok(PartitionLabel::Validation),
            LABEL_TESTING => Ok(PartitionLabel::Testing),
            other => Err(PartitionError::Configuration(format!(
                "unknown partition label '{other}'"
            ))),
        }
    }
}

/// Validation/testing shares, in percent. Training receives the remainder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionPercentages {
    /// Percent of grouping keys routed to validation.
    pub validation: f64,
    /// Percent of grouping keys routed to testing.
    pub testing: f64,
}

impl Default for PartitionPercentages {
    fn default() -> Self {
        Self {
            validation: DEFAULT_VALIDATION_PERCENTAGE,
            testing: DEFAULT_TESTING_PERCENTAGE,
        }
    }
}

impl PartitionPercentages {
    /// Build and validate a percentage pair.
    pub fn new(validation: f64, testing: f64) -> Result<Self, PartitionError> {
        Self {
            validation,
            testing,
        }
        .normalized()
    }

    /// Validate that both shares are finite, non-negative, and sum to at most 100.
    pub fn normalized(self) -> Result<Self, PartitionError> {
        if !self.validation.is_finite() || !self.testing.is_finite() {
            return Err(PartitionError::Configuration(
                "partition percentages must be finite".to_string(),
            ));
        }
        if self.validation < 0.0 || self.testing < 0.0 {
            return Err(PartitionError::Configuration(
                "partition percentages must be non-negative".to_string(),
            ));
        }
        let sum = self.validation + self.testing;
        if sum > 100.0 {
            return Err(PartitionError::Configuration(format!(
                "validation + testing must not exceed 100, got {sum}"
            )));
        }
        Ok(self)
    }

    /// Percent of grouping keys left for training.
    pub fn training(&self) -> f64 {
        (100.0 - self.validation - self.testing).max(0.0)
    }
}

/// Reusable assignment policy: validated percentages plus a hash primitive.
#[derive(Clone, Debug)]
pub struct Partitioner<H = Sha1Buckets> {
    percentages: PartitionPercentages,
    hasher: H,
}

impl Partitioner<Sha1Buckets> {
    /// SHA-1 backed partitioner.
    pub fn new(percentages: PartitionPercentages) -> Result<Self, PartitionError> {
        Self::with_hasher(percentages, Sha1Buckets)
    }
}

impl<H: BucketHasher> Partitioner<H> {
    /// Partitioner backed by a caller-supplied hash primitive.
    pub fn with_hasher(
        percentages: PartitionPercentages,
        hasher: H,
    ) -> Result<Self, PartitionError> {
        Ok(Self {
            percentages: percentages.normalized()?,
            hasher,
        })
    }

    /// Configured percentages.
    pub fn percentages(&self) -> PartitionPercentages {
        self.percentages
    }

    /// Partition for the sample at `file_path`.
    pub fn label_for(&self, file_path: &str) -> PartitionLabel {
        assign_partition_with(
            file_path,
            self.percentages.validation,
            self.percentages.testing,
            &self.hasher,
        )
    }
}

/// Base name of `file_path`: everything after the last `/` or `\`.
pub fn base_name(file_path: &str) -> &str {
    file_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_path)
}

/// Grouping key for `file_path`.
///
/// Clips named `<key>_nohash_<variant>` share `<key>`, so every variant lands
/// in the same partition. Names without the marker are their own key.
pub fn grouping_key(file_path: &str) -> &str {
    let name = base_name(file_path);
    match name.find(GROUPING_MARKER) {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Pseudo-random percentage in `[0, 100)` for a grouping key.
pub fn percentage_hash<H>(key: &str, hasher: &H) -> f64
where
    H: BucketHasher + ?Sized,
{
    let bucket = hasher.hash_key(key.as_bytes()) % BUCKET_SPACE;
    bucket as f64 * (100.0 / BUCKET_SPACE as f64)
}

/// Partition for `file_path` using the SHA-1 hasher.
///
/// The result depends only on the grouping key and the two thresholds, so
/// adding or removing other files never moves an existing sample.
pub fn assign_partition(
    file_path: &str,
    validation_percentage: f64,
    testing_percentage: f64,
) -> PartitionLabel {
    assign_partition_with(
        file_path,
        validation_percentage,
        testing_percentage,
        &Sha1Buckets,
    )
}

/// Partition for `file_path` using an injected hash primitive.
pub fn assign_partition_with<H>(
    file_path: &str,
    validation_percentage: f64,
    testing_percentage: f64,
    hasher: &H,
) -> PartitionLabel
where
    H: BucketHasher + ?Sized,
{
    let pct = percentage_hash(grouping_key(file_path), hasher);
    label_for_percentage(pct, validation_percentage, testing_percentage)
}

fn label_for_percentage(pct: f64, validation: f64, testing: f64) -> PartitionLabel {
    if pct < validation {
        PartitionLabel::Validation
    } else if pct < validation + testing {
        PartitionLabel::Testing
    } else {
        PartitionLabel::Training
    }
}
