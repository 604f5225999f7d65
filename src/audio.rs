use serde::{Deserialize, Serialize};

use crate::constants::audio::{
    DEFAULT_CLIP_DURATION_MS, DEFAULT_NUM_COEFFICIENT, DEFAULT_SAMPLE_RATE,
    DEFAULT_WINDOW_SIZE_MS, DEFAULT_WINDOW_STRIDE_MS,
};
use crate::errors::PartitionError;

/// Audio feature settings shared with the spectrogram front end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Sample rate of the input clips, in Hz.
    pub sample_rate: u32,
    /// Clip duration fed to the model, in milliseconds.
    pub clip_duration_ms: u32,
    /// Analysis window length, in milliseconds.
    pub window_size_ms: f64,
    /// Analysis window hop, in milliseconds.
    pub window_stride_ms: f64,
    /// Coefficients per spectrogram frame.
    pub num_coefficient: usize,
    /// Samples per clip.
    pub desired_samples: usize,
    /// Samples per analysis window.
    pub window_size_samples: usize,
    /// Samples between consecutive windows.
    pub window_stride_samples: usize,
    /// Frames per clip.
    pub spectrogram_length: usize,
}

impl Default for AudioSettings {
    fn default() -> Self {
        let sample_rate = DEFAULT_SAMPLE_RATE;
        let desired_samples = ms_to_samples(sample_rate, f64::from(DEFAULT_CLIP_DURATION_MS));
        let window_size_samples = ms_to_samples(sample_rate, DEFAULT_WINDOW_SIZE_MS);
        let window_stride_samples = ms_to_samples(sample_rate, DEFAULT_WINDOW_STRIDE_MS);
        Self {
            sample_rate,
            clip_duration_ms: DEFAULT_CLIP_DURATION_MS,
            window_size_ms: DEFAULT_WINDOW_SIZE_MS,
            window_stride_ms: DEFAULT_WINDOW_STRIDE_MS,
            num_coefficient: DEFAULT_NUM_COEFFICIENT,
            desired_samples,
            window_size_samples,
            window_stride_samples,
            spectrogram_length: spectrogram_length(
                desired_samples,
                window_size_samples,
                window_stride_samples,
            ),
        }
    }
}

/// Derive sample counts and spectrogram length from clip and window timings.
///
/// Clips shorter than one window produce a spectrogram length of zero.
pub fn prepare_audio_settings(
    sample_rate: u32,
    clip_duration_ms: u32,
    window_size_ms: f64,
    window_stride_ms: f64,
    num_coefficient: usize,
) -> Result<AudioSettings, PartitionError> {
    if sample_rate == 0 {
        return Err(PartitionError::Configuration(
            "sample_rate must be greater than zero".to_string(),
        ));
    }
    if num_coefficient == 0 {
        return Err(PartitionError::Configuration(
            "num_coefficient must be greater than zero".to_string(),
        ));
    }
    if !window_size_ms.is_finite() || !window_stride_ms.is_finite() {
        return Err(PartitionError::Configuration(
            "window timings must be finite".to_string(),
        ));
    }
    let desired_samples = ms_to_samples(sample_rate, f64::from(clip_duration_ms));
    let window_size_samples = ms_to_samples(sample_rate, window_size_ms);
    let window_stride_samples = ms_to_samples(sample_rate, window_stride_ms);
    if window_size_samples == 0 {
        return Err(PartitionError::Configuration(format!(
            "window_size_ms {window_size_ms} is shorter than one sample at {sample_rate} Hz"
        )));
    }
    if window_stride_samples == 0 {
        return Err(PartitionError::Configuration(format!(
            "window_stride_ms {window_stride_ms} is shorter than one sample at {sample_rate} Hz"
        )));
    }
    Ok(AudioSettings {
        sample_rate,
        clip_duration_ms,
        window_size_ms,
        window_stride_ms,
        num_coefficient,
        desired_samples,
        window_size_samples,
        window_stride_samples,
        spectrogram_length: spectrogram_length(
            desired_samples,
            window_size_samples,
            window_stride_samples,
        ),
    })
}

fn ms_to_samples(sample_rate: u32, ms: f64) -> usize {
    // Negative timings saturate to zero on the cast.
    (f64::from(sample_rate) * ms / 1000.0) as usize
}

fn spectrogram_length(desired: usize, window: usize, stride: usize) -> usize {
    if desired < window {
        0
    } else {
        1 + (desired - window) / stride
    }
}
