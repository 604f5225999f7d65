use crate::splits::PartitionLabel;

/// Constants used by hash-based partition assignment.
pub mod partition {
    use super::PartitionLabel;

    /// Marker whose first occurrence (and everything after it) is ignored when
    /// deriving the grouping key, e.g. `bobby_nohash_0.wav` -> `bobby`.
    pub const GROUPING_MARKER: &str = "_nohash_";
    /// Upper bound on distinct clips per class the bucket space is sized for.
    pub const MAX_NUM_WAVS_PER_CLASS: u64 = (1 << 27) - 1;
    /// Number of hash buckets (`MAX_NUM_WAVS_PER_CLASS + 1`).
    pub const BUCKET_SPACE: u64 = MAX_NUM_WAVS_PER_CLASS + 1;
    /// Label string for the training partition.
    pub const LABEL_TRAINING: &str = "training";
    /// Label string for the validation partition.
    pub const LABEL_VALIDATION: &str = "validation";
    /// Label string for the testing partition.
    pub const LABEL_TESTING: &str = "testing";
    /// Canonical partition order used for reports and count tables.
    pub const ALL_PARTITIONS: [PartitionLabel; 3] = [
        PartitionLabel::Training,
        PartitionLabel::Validation,
        PartitionLabel::Testing,
    ];
    /// Default share of samples routed to validation.
    pub const DEFAULT_VALIDATION_PERCENTAGE: f64 = 10.0;
    /// Default share of samples routed to testing.
    pub const DEFAULT_TESTING_PERCENTAGE: f64 = 10.0;
}

/// Defaults for audio feature settings.
pub mod audio {
    /// Expected sample rate of the input clips.
    pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;
    /// Clip duration fed to the model.
    pub const DEFAULT_CLIP_DURATION_MS: u32 = 1_000;
    /// Spectrogram analysis window length.
    pub const DEFAULT_WINDOW_SIZE_MS: f64 = 30.0;
    /// Spectrogram analysis window hop.
    pub const DEFAULT_WINDOW_STRIDE_MS: f64 = 10.0;
    /// Number of cepstral coefficients per frame.
    pub const DEFAULT_NUM_COEFFICIENT: usize = 40;
}

/// Defaults for the LSTM model and training loop.
pub mod model {
    /// Hidden units per LSTM cell.
    pub const DEFAULT_NUM_UNITS: usize = 128;
    /// Size of the output projection.
    pub const DEFAULT_DIMENSION_PROJECTION: usize = 64;
    /// Stacked LSTM layers.
    pub const DEFAULT_NUM_LAYERS: usize = 3;
    /// Mini-batch size.
    pub const DEFAULT_BATCH_SIZE: usize = 80;
    /// Times each clip is repeated per epoch by the audio processor.
    pub const DEFAULT_NUM_REPEATS: usize = 1;
    /// Enrollment utterances paired with each evaluation utterance.
    pub const DEFAULT_NUM_UTT_ENROLLMENT: usize = 5;
    /// Name given to the model input tensor.
    pub const INPUT_TENSOR_NAME: &str = "input_audio_data";
}

/// Constants used when indexing a dataset directory.
pub mod corpus {
    /// File extension (case-insensitive) of indexed audio clips.
    pub const AUDIO_EXTENSION: &str = "wav";
    /// Directory holding background noise clips; never partitioned.
    pub const BACKGROUND_NOISE_DIR: &str = "_background_noise_";
    /// Default dataset root used by the runners.
    pub const DEFAULT_DATA_DIR: &str = "data";
}
