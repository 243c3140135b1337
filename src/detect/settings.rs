use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

use super::loudness::step_size;

pub const DEFAULT_THRESHOLD_RATIO: f64 = 2.0;
pub const DEFAULT_MIN_DURATION: f64 = 1.0;
pub const DEFAULT_WINDOW_MS: u32 = 1000;
pub const DEFAULT_MERGE_GAP: f64 = 5.0;
pub const DEFAULT_SIGNIFICANT_OVERLAP: f64 = 10.0;
pub const DEFAULT_EXTENSION_SECONDS: f64 = 60.0;
pub const DEFAULT_EXTENSION_SCORE_CUTOFF: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window duration must be positive (got {0} ms)")]
    WindowDuration(u32),
    #[error("threshold ratio must be a positive number (got {0})")]
    ThresholdRatio(f64),
    #[error("minimum duration must be zero or positive (got {0}s)")]
    MinDuration(f64),
    #[error("{name} is out of range (got {value})")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("sample rate must be positive")]
    SampleRate,
}

/// Which post-processing steps run after spike detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Raw spikes only, no merging or extension
    Simple,
    /// Merge nearby and overlapping spikes
    #[default]
    Merged,
    /// Merge, then extend high-scoring segments
    Extended,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeConfig {
    /// Merge when the next segment starts at most this many seconds after the current one ends.
    pub gap_tolerance: f64,
    /// Overlap in seconds above which segments are always merged.
    pub significant_overlap: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            gap_tolerance: DEFAULT_MERGE_GAP,
            significant_overlap: DEFAULT_SIGNIFICANT_OVERLAP,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtensionConfig {
    pub seconds: f64,
    /// Only segments scoring strictly above this are extended.
    pub score_cutoff: f64,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            seconds: DEFAULT_EXTENSION_SECONDS,
            score_cutoff: DEFAULT_EXTENSION_SCORE_CUTOFF,
        }
    }
}

/// User-facing detection settings, independent of any sample rate.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionSettings {
    pub threshold_ratio: f64,
    pub min_duration: f64,
    pub window_ms: u32,
    pub merge: Option<MergeConfig>,
    pub extension: Option<ExtensionConfig>,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl DetectionSettings {
    pub fn from_preset(preset: Preset) -> Self {
        let (merge, extension) = match preset {
            Preset::Simple => (None, None),
            Preset::Merged => (Some(MergeConfig::default()), None),
            Preset::Extended => (Some(MergeConfig::default()), Some(ExtensionConfig::default())),
        };
        Self {
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
            min_duration: DEFAULT_MIN_DURATION,
            window_ms: DEFAULT_WINDOW_MS,
            merge,
            extension,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_ms == 0 {
            return Err(ConfigError::WindowDuration(self.window_ms));
        }
        if !self.threshold_ratio.is_finite() || self.threshold_ratio <= 0.0 {
            return Err(ConfigError::ThresholdRatio(self.threshold_ratio));
        }
        if !self.min_duration.is_finite() || self.min_duration < 0.0 {
            return Err(ConfigError::MinDuration(self.min_duration));
        }
        if let Some(merge) = &self.merge {
            non_negative("merge gap tolerance", merge.gap_tolerance)?;
            non_negative("significant overlap", merge.significant_overlap)?;
        }
        if let Some(ext) = &self.extension {
            non_negative("extension duration", ext.seconds)?;
            if !ext.score_cutoff.is_finite() {
                return Err(ConfigError::OutOfRange {
                    name: "extension score cutoff",
                    value: ext.score_cutoff,
                });
            }
        }
        Ok(())
    }

    /// Fix the window geometry against the decoded track's real sample rate.
    pub fn resolve(&self, sample_rate: u32) -> Result<AnalyzerConfig, ConfigError> {
        self.validate()?;
        if sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }

        let window_size = ((self.window_ms as u64 * sample_rate as u64) / 1000).max(1) as usize;

        Ok(AnalyzerConfig {
            sample_rate,
            window_size,
            threshold_ratio: self.threshold_ratio,
            min_duration: self.min_duration,
            merge: self.merge,
            extension: self.extension,
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value })
    }
}

/// Detection parameters bound to one sample rate. Built once per run.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzerConfig {
    pub sample_rate: u32,
    pub window_size: usize,
    pub threshold_ratio: f64,
    pub min_duration: f64,
    pub merge: Option<MergeConfig>,
    pub extension: Option<ExtensionConfig>,
}

impl AnalyzerConfig {
    pub fn step_size(&self) -> usize {
        step_size(self.window_size)
    }

    /// Seconds between the starts of consecutive windows.
    pub fn step_duration(&self) -> f64 {
        self.step_size() as f64 / self.sample_rate as f64
    }
}
