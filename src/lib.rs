#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runners shared by the crate binaries.
pub mod apps;
/// Audio front-end settings derivation.
pub mod audio;
/// Model, processor, and run configuration types.
pub mod config;
/// Centralized constants used across partitioning, settings, and corpus scanning.
pub mod constants;
/// Dataset directory indexing.
pub mod corpus;
/// Hash primitives for bucket assignment.
pub mod hash;
/// Partition share metrics and report formatting.
pub mod metrics;
/// Settings assembly and model input declaration.
pub mod settings;
/// Deterministic partition assignment.
pub mod splits;
/// Shared type aliases.
pub mod types;

mod errors;

pub use audio::{AudioSettings, prepare_audio_settings};
pub use config::{LstmModelSettings, ProcessorConfig, TrainingFlags};
pub use corpus::{CorpusIndex, CorpusSample, CorpusScanner};
pub use errors::PartitionError;
pub use hash::{BucketHasher, Sha1Buckets};
pub use settings::{InputDType, InputSpec, PreparedSettings, prepare_settings};
pub use splits::{
    PartitionLabel, PartitionPercentages, Partitioner, assign_partition, assign_partition_with,
    grouping_key,
};
pub use types::{GroupingKey, SamplePath, WordLabel};
