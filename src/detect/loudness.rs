use rayon::prelude::*;

/// Per-window RMS loudness with a hop of half the window (50% overlap).
///
/// A window longer than the buffer is clamped to the buffer, so any
/// non-empty buffer yields at least one value. Trailing samples that do not
/// fill a whole window are dropped.
pub fn loudness_sequence(samples: &[f32], window_size: usize) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }

    let window = window_size.clamp(1, samples.len());
    let step = step_size(window);
    let count = (samples.len() - window) / step + 1;

    (0..count)
        .into_par_iter()
        .map(|i| {
            let start = i * step;
            rms(&samples[start..start + window])
        })
        .collect()
}

pub fn step_size(window_size: usize) -> usize {
    (window_size / 2).max(1)
}

fn rms(window: &[f32]) -> f64 {
    let sum: f64 = window.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / window.len() as f64).sqrt()
}
