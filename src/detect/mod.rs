pub mod baseline;
pub mod loudness;
pub mod postprocess;
pub mod settings;
pub mod spike;

use self::spike::{Candidate, SpikeParams};
pub use self::settings::{AnalyzerConfig, DetectionSettings, Preset};

/// Fewer windows than this can't produce a meaningful baseline.
pub const MIN_WINDOWS: usize = 10;
/// Baselines at or below this are treated as a silent track.
pub const SILENCE_FLOOR: f64 = 1e-6;

/// A detected excitement span, ready for export.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub start_time: f64,
    pub end_time: f64,
    pub label: String,
    pub score: f64,
}

impl From<Candidate> for Marker {
    fn from(c: Candidate) -> Self {
        Self {
            start_time: c.start,
            end_time: c.end,
            label: format!("Excitement ({:.1}x)", c.score),
            score: c.score,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Markers(Vec<Marker>),
    /// Too few windows to analyze.
    InsufficientData { windows: usize },
    /// Baseline loudness is zero or close to it.
    Silent { baseline: f64 },
}

impl Outcome {
    pub fn markers(&self) -> &[Marker] {
        match self {
            Outcome::Markers(markers) => markers,
            _ => &[],
        }
    }
}

/// Run the full detection pipeline over a mono sample buffer.
pub fn analyze(samples: &[f32], config: &AnalyzerConfig) -> Outcome {
    let sample_rate = config.sample_rate as f64;
    let track_duration = samples.len() as f64 / sample_rate;

    log::info!(
        "Analyzing {} samples ({:.2}s @ {}Hz), window={} samples, step={:.3}s",
        samples.len(),
        track_duration,
        config.sample_rate,
        config.window_size,
        config.step_duration()
    );

    let loudness = loudness::loudness_sequence(samples, config.window_size);
    if loudness.len() < MIN_WINDOWS {
        log::warn!(
            "Not enough audio data for analysis ({} windows, need {})",
            loudness.len(),
            MIN_WINDOWS
        );
        return Outcome::InsufficientData { windows: loudness.len() };
    }

    let baseline = baseline::median(&loudness);
    if baseline <= SILENCE_FLOOR {
        log::warn!("Track is silent (baseline {:.2e}), nothing to detect", baseline);
        return Outcome::Silent { baseline };
    }
    log::info!(
        "Baseline volume: {:.6}, threshold: {:.6}",
        baseline,
        baseline * config.threshold_ratio
    );

    let candidates = spike::find_spikes(
        &loudness,
        &SpikeParams {
            baseline,
            threshold_ratio: config.threshold_ratio,
            min_duration: config.min_duration,
            step_duration: config.step_duration(),
            track_duration,
        },
    );
    log::info!("Spike detection: {} candidate segments", candidates.len());

    let mut segments = match &config.merge {
        Some(merge_cfg) => {
            let merged = postprocess::merge(candidates, merge_cfg);
            log::info!("After merging: {} segments", merged.len());
            merged
        }
        None => candidates,
    };

    if let Some(ext) = &config.extension {
        postprocess::extend(&mut segments, ext, track_duration);
    }

    Outcome::Markers(segments.into_iter().map(Marker::from).collect())
}
