//! Assembly of everything the training loop needs from one set of flags.

use serde::{Deserialize, Serialize};

use crate::audio::{AudioSettings, prepare_audio_settings};
use crate::config::{LstmModelSettings, ProcessorConfig, TrainingFlags};
use crate::constants::model::INPUT_TENSOR_NAME;
use crate::errors::PartitionError;

/// Element type of the model input tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputDType {
    /// 32-bit float.
    F32,
}

/// Declared model input: `[batch, 1 + enrollment, frames, coefficients]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Tensor name.
    pub name: String,
    /// Element type.
    pub dtype: InputDType,
    /// Tensor shape.
    pub shape: [usize; 4],
}

impl InputSpec {
    /// Build the input spec for the given batch and audio settings.
    ///
    /// The second axis holds the evaluation utterance followed by its
    /// `num_utt_enrollment` enrollment utterances.
    pub fn for_audio(
        batch_size: usize,
        num_utt_enrollment: usize,
        audio: &AudioSettings,
    ) -> Result<Self, PartitionError> {
        let utterances = num_utt_enrollment.checked_add(1).ok_or_else(|| {
            PartitionError::Configuration(format!(
                "num_utt_enrollment {num_utt_enrollment} leaves no room for the evaluation utterance"
            ))
        })?;
        Ok(Self {
            name: INPUT_TENSOR_NAME.to_string(),
            dtype: InputDType::F32,
            shape: [
                batch_size,
                utterances,
                audio.spectrogram_length,
                audio.num_coefficient,
            ],
        })
    }

    /// Number of scalar elements in one input batch, `None` if it overflows `usize`.
    pub fn element_count(&self) -> Option<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, dim| acc.checked_mul(*dim))
    }
}

/// Settings derived from [`TrainingFlags`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreparedSettings {
    /// Model hyperparameters.
    pub lstm: LstmModelSettings,
    /// Audio front-end settings.
    pub audio: AudioSettings,
    /// Audio processor settings.
    pub processor: ProcessorConfig,
    /// Model input declaration.
    pub input: InputSpec,
}

impl PreparedSettings {
    /// Pretty JSON rendering for handing to external tooling.
    pub fn to_json(&self) -> Result<String, PartitionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build model, audio, processor, and input settings from `flags`.
pub fn prepare_settings(flags: &TrainingFlags) -> Result<PreparedSettings, PartitionError> {
    if flags.batch_size == 0 {
        return Err(PartitionError::Configuration(
            "batch_size must be greater than zero".to_string(),
        ));
    }
    let percentages = flags.percentages().normalized()?;
    let lstm = LstmModelSettings {
        num_units: flags.num_units,
        dimension_projection: flags.dimension_projection,
        num_layers: flags.num_layers,
    };
    let audio = prepare_audio_settings(
        flags.sample_rate,
        flags.clip_duration_ms,
        flags.window_size_ms,
        flags.window_stride_ms,
        flags.num_coefficient,
    )?;
    let processor = ProcessorConfig {
        data_dir: flags.data_dir.clone(),
        num_repeats: flags.num_repeats,
        num_utt_enrollment: flags.num_utt_enrollment,
        is_training: flags.is_training,
        percentages,
    };
    let input = InputSpec::for_audio(flags.batch_size, flags.num_utt_enrollment, &audio)?;
    Ok(PreparedSettings {
        lstm,
        audio,
        processor,
        input,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_produce_expected_shape() {
        let prepared = prepare_settings(&TrainingFlags::default()).unwrap();
        assert_eq!(prepared.input.name, "input_audio_data");
        assert_eq!(prepared.input.dtype, InputDType::F32);
        assert_eq!(prepared.input.shape, [80, 6, 98, 40]);
        assert_eq!(prepared.input.element_count(), Some(80 * 6 * 98 * 40));
        assert_eq!(prepared.lstm, LstmModelSettings::default());
        assert_eq!(prepared.processor, ProcessorConfig::default());
    }

    #[test]
    fn flags_are_forwarded_verbatim() {
        let flags = TrainingFlags {
            num_units: 256,
            dimension_projection: 32,
            num_layers: 2,
            num_utt_enrollment: 0,
            batch_size: 4,
            num_coefficient: 13,
            is_training: false,
            num_repeats: 3,
            ..TrainingFlags::default()
        };
        let prepared = prepare_settings(&flags).unwrap();
        assert_eq!(prepared.lstm.num_units, 256);
        assert_eq!(prepared.lstm.dimension_projection, 32);
        assert_eq!(prepared.lstm.num_layers, 2);
        assert_eq!(prepared.input.shape, [4, 1, 98, 13]);
        assert!(!prepared.processor.is_training);
        assert_eq!(prepared.processor.num_repeats, 3);
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let zero_batch = TrainingFlags {
            batch_size: 0,
            ..TrainingFlags::default()
        };
        assert!(prepare_settings(&zero_batch).is_err());

        let oversubscribed = TrainingFlags {
            validation_percentage: 70.0,
            testing_percentage: 40.0,
            ..TrainingFlags::default()
        };
        assert!(matches!(
            prepare_settings(&oversubscribed),
            Err(PartitionError::Configuration(_))
        ));
    }

    #[test]
    fn enrollment_count_at_usize_max_is_a_configuration_error() {
        let flags = TrainingFlags {
            num_utt_enrollment: usize::MAX,
            ..TrainingFlags::default()
        };
        assert!(matches!(
            prepare_settings(&flags),
            Err(PartitionError::Configuration(_))
        ));
    }

    #[test]
    fn element_count_reports_overflow() {
        let spec = InputSpec {
            name: INPUT_TENSOR_NAME.to_string(),
            dtype: InputDType::F32,
            shape: [usize::MAX, 2, 1, 1],
        };
        assert_eq!(spec.element_count(), None);
        let empty = InputSpec {
            shape: [4, 1, 0, 40],
            ..spec
        };
        assert_eq!(empty.element_count(), Some(0));
    }

    #[test]
    fn json_rendering_uses_lowercase_enums() {
        let json = prepare_settings(&TrainingFlags::default())
            .unwrap()
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["input"]["dtype"], "f32");
        assert_eq!(value["input"]["shape"][2], 98);
        assert_eq!(value["audio"]["spectrogram_length"], 98);
        assert_eq!(value["lstm"]["num_layers"], 3);
    }
}
