use std::collections::BTreeMap;

use crate::constants::partition::ALL_PARTITIONS;
use crate::splits::{PartitionLabel, PartitionPercentages};

/// Observed vs. configured share of one partition.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionShare {
    /// Partition described.
    pub label: PartitionLabel,
    /// Clips observed in the partition.
    pub count: usize,
    /// Observed fraction of all clips, in percent.
    pub observed_percentage: f64,
    /// Configured fraction, in percent.
    pub expected_percentage: f64,
}

/// Clip counts a perfectly uniform hash would produce for `total` clips.
///
/// Validation and testing are floored; training takes the remainder.
pub fn expected_partition_counts(
    total: usize,
    percentages: PartitionPercentages,
) -> [(PartitionLabel, usize); 3] {
    let validation = ((total as f64) * percentages.validation / 100.0).floor() as usize;
    let testing = ((total as f64) * percentages.testing / 100.0).floor() as usize;
    let training = total.saturating_sub(validation.saturating_add(testing));
    [
        (PartitionLabel::Training, training),
        (PartitionLabel::Validation, validation),
        (PartitionLabel::Testing, testing),
    ]
}

/// Per-partition shares in canonical order. Missing labels count as zero.
pub fn partition_shares(
    counts: &BTreeMap<PartitionLabel, usize>,
    percentages: PartitionPercentages,
) -> Vec<PartitionShare> {
    let total: usize = counts.values().sum();
    ALL_PARTITIONS
        .iter()
        .map(|label| {
            let count = counts.get(label).copied().unwrap_or(0);
            PartitionShare {
                label: *label,
                count,
                observed_percentage: if total == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / total as f64
                },
                expected_percentage: match label {
                    PartitionLabel::Training => percentages.training(),
                    PartitionLabel::Validation => percentages.validation,
                    PartitionLabel::Testing => percentages.testing,
                },
            }
        })
        .collect()
}

/// Format an integer with comma-separated thousands.
pub fn format_with_commas(value: usize) -> String {
    let digits = value.to_string();
    let lead = match digits.len() % 3 {
        0 => 3,
        rem => rem,
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    out.push_str(&digits[..lead]);
    for group in digits.as_bytes()[lead..].chunks(3) {
        out.push(',');
        // ASCII digits, so every chunk is valid UTF-8.
        out.extend(group.iter().map(|byte| char::from(*byte)));
    }
    out
}
