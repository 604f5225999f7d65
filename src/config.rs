use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::audio::{
    DEFAULT_CLIP_DURATION_MS, DEFAULT_NUM_COEFFICIENT, DEFAULT_SAMPLE_RATE,
    DEFAULT_WINDOW_SIZE_MS, DEFAULT_WINDOW_STRIDE_MS,
};
use crate::constants::corpus::DEFAULT_DATA_DIR;
use crate::constants::model::{
    DEFAULT_BATCH_SIZE, DEFAULT_DIMENSION_PROJECTION, DEFAULT_NUM_LAYERS, DEFAULT_NUM_REPEATS,
    DEFAULT_NUM_UNITS, DEFAULT_NUM_UTT_ENROLLMENT,
};
use crate::splits::PartitionPercentages;

/// Hyperparameters for the stacked LSTM speaker model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LstmModelSettings {
    /// Hidden units per LSTM cell.
    pub num_units: usize,
    /// Output projection size of each cell.
    pub dimension_projection: usize,
    /// Number of stacked layers.
    pub num_layers: usize,
}

impl Default for LstmModelSettings {
    fn default() -> Self {
        Self {
            num_units: DEFAULT_NUM_UNITS,
            dimension_projection: DEFAULT_DIMENSION_PROJECTION,
            num_layers: DEFAULT_NUM_LAYERS,
        }
    }
}

/// Settings handed to the audio processor that loads and batches clips.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Dataset root scanned for clips.
    pub data_dir: PathBuf,
    /// Times each clip is repeated per epoch.
    pub num_repeats: usize,
    /// Enrollment utterances paired with each evaluation utterance.
    pub num_utt_enrollment: usize,
    /// Whether batches are drawn for training (vs. evaluation).
    pub is_training: bool,
    /// Partition shares used when assigning clips.
    pub percentages: PartitionPercentages,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            num_repeats: DEFAULT_NUM_REPEATS,
            num_utt_enrollment: DEFAULT_NUM_UTT_ENROLLMENT,
            is_training: true,
            percentages: PartitionPercentages::default(),
        }
    }
}

/// Top-level flags for one training or evaluation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingFlags {
    /// Dataset root.
    pub data_dir: PathBuf,
    /// Hidden units per LSTM cell.
    pub num_units: usize,
    /// Output projection size of each cell.
    pub dimension_projection: usize,
    /// Number of stacked LSTM layers.
    pub num_layers: usize,
    /// Expected clip sample rate, in Hz.
    pub sample_rate: u32,
    /// Clip duration, in milliseconds.
    pub clip_duration_ms: u32,
    /// Analysis window length, in milliseconds.
    pub window_size_ms: f64,
    /// Analysis window hop, in milliseconds.
    pub window_stride_ms: f64,
    /// Coefficients per spectrogram frame.
    pub num_coefficient: usize,
    /// Times each clip is repeated per epoch.
    pub num_repeats: usize,
    /// Enrollment utterances paired with each evaluation utterance.
    pub num_utt_enrollment: usize,
    /// Whether this run trains the model.
    pub is_training: bool,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Percent of speakers held out for validation.
    pub validation_percentage: f64,
    /// Percent of speakers held out for testing.
    pub testing_percentage: f64,
}

impl Default for TrainingFlags {
    fn default() -> Self {
        let model = LstmModelSettings::default();
        let processor = ProcessorConfig::default();
        Self {
            data_dir: processor.data_dir,
            num_units: model.num_units,
            dimension_projection: model.dimension_projection,
            num_layers: model.num_layers,
            sample_rate: DEFAULT_SAMPLE_RATE,
            clip_duration_ms: DEFAULT_CLIP_DURATION_MS,
            window_size_ms: DEFAULT_WINDOW_SIZE_MS,
            window_stride_ms: DEFAULT_WINDOW_STRIDE_MS,
            num_coefficient: DEFAULT_NUM_COEFFICIENT,
            num_repeats: processor.num_repeats,
            num_utt_enrollment: processor.num_utt_enrollment,
            is_training: processor.is_training,
            batch_size: DEFAULT_BATCH_SIZE,
            validation_percentage: processor.percentages.validation,
            testing_percentage: processor.percentages.testing,
        }
    }
}

impl TrainingFlags {
    /// Percentages carried by these flags (unvalidated).
    pub fn percentages(&self) -> PartitionPercentages {
        PartitionPercentages {
            validation: self.validation_percentage,
            testing: self.testing_percentage,
        }
    }
}
