/// A raw excitement span produced by the spike detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub start: f64,
    pub end: f64,
    /// Peak loudness / baseline inside the span.
    pub score: f64,
}

impl Candidate {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

pub struct SpikeParams {
    pub baseline: f64,
    pub threshold_ratio: f64,
    pub min_duration: f64,
    /// Seconds between consecutive window starts.
    pub step_duration: f64,
    /// Closing time for a spike still running at the end of the track.
    pub track_duration: f64,
}

enum State {
    Quiet,
    Excited { start: f64, peak: f64 },
}

/// Walk the loudness sequence once and emit spans that stay above
/// `baseline * threshold_ratio` for at least `min_duration` seconds.
///
/// `params.baseline` must be positive.
pub fn find_spikes(loudness: &[f64], params: &SpikeParams) -> Vec<Candidate> {
    let threshold = params.baseline * params.threshold_ratio;
    let mut candidates = Vec::new();
    let mut state = State::Quiet;

    for (i, &volume) in loudness.iter().enumerate() {
        let time = i as f64 * params.step_duration;
        let ratio = volume / params.baseline;

        state = match state {
            State::Quiet if volume > threshold => {
                log::debug!("Excitement start at {:.2}s (ratio {:.2})", time, ratio);
                State::Excited { start: time, peak: ratio }
            }
            State::Quiet => State::Quiet,
            State::Excited { start, peak } => {
                let peak = peak.max(ratio);
                if volume > threshold {
                    State::Excited { start, peak }
                } else {
                    close(&mut candidates, start, time, peak, params.min_duration);
                    State::Quiet
                }
            }
        };
    }

    if let State::Excited { start, peak } = state {
        close(&mut candidates, start, params.track_duration, peak, params.min_duration);
    }

    candidates
}

fn close(out: &mut Vec<Candidate>, start: f64, end: f64, peak: f64, min_duration: f64) {
    let candidate = Candidate { start, end, score: peak };
    let duration = candidate.duration();
    // A zero-length span can't be emitted even with min_duration = 0.
    if duration >= min_duration && duration > 0.0 {
        log::debug!(
            "Excitement end at {:.2}s (duration {:.2}s, score {:.1}x)",
            end, duration, peak
        );
        out.push(candidate);
    } else {
        log::debug!("Excitement too short: {:.2}s", duration);
    }
}
