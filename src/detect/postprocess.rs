use super::settings::{ExtensionConfig, MergeConfig};
use super::spike::Candidate;

/// Sort candidates by start time and fold neighbours together.
///
/// `next` is absorbed into `current` when they overlap by more than
/// `significant_overlap` seconds, or otherwise when `next` starts no more
/// than `gap_tolerance` seconds after `current` ends. The absorbed span keeps
/// the higher of the two scores.
pub fn merge(mut candidates: Vec<Candidate>, cfg: &MergeConfig) -> Vec<Candidate> {
    candidates.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut iter = candidates.into_iter();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    for next in iter {
        let overlap = current.end - next.start;
        let gap = next.start - current.end;

        if overlap > cfg.significant_overlap || gap <= cfg.gap_tolerance {
            log::debug!(
                "Merging {:.2}-{:.2}s into {:.2}-{:.2}s",
                next.start, next.end, current.start, current.end
            );
            current.end = current.end.max(next.end);
            if next.score > current.score {
                current.score = next.score;
            }
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    merged
}

/// Push the end of every segment scoring above the cutoff forward by the
/// configured duration.
///
/// Ends are clamped to `track_duration` and to the start of the following
/// segment. Input must already be sorted and non-overlapping.
pub fn extend(segments: &mut [Candidate], cfg: &ExtensionConfig, track_duration: f64) {
    for i in 0..segments.len() {
        if segments[i].score <= cfg.score_cutoff {
            continue;
        }

        let limit = segments
            .get(i + 1)
            .map_or(track_duration, |next| next.start.min(track_duration));
        let seg = &mut segments[i];
        let extended = (seg.end + cfg.seconds).min(limit);
        if extended > seg.end {
            log::debug!("Extending {:.2}-{:.2}s to {:.2}s", seg.start, seg.end, extended);
            seg.end = extended;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, score: f64) -> Candidate {
        Candidate { start, end, score }
    }

    const CFG: MergeConfig = MergeConfig {
        gap_tolerance: 5.0,
        significant_overlap: 10.0,
    };

    #[test]
    fn merges_within_gap_tolerance() {
        let out = merge(vec![seg(0.0, 10.0, 2.0), seg(12.0, 20.0, 3.0)], &CFG);
        assert_eq!(out, vec![seg(0.0, 20.0, 3.0)]);
    }

    #[test]
    fn keeps_distant_segments_apart() {
        let out = merge(vec![seg(0.0, 10.0, 2.0), seg(30.0, 40.0, 3.0)], &CFG);
        assert_eq!(out, vec![seg(0.0, 10.0, 2.0), seg(30.0, 40.0, 3.0)]);
    }

    #[test]
    fn gap_boundary_is_inclusive() {
        let at = merge(vec![seg(0.0, 10.0, 2.0), seg(15.0, 20.0, 2.0)], &CFG);
        assert_eq!(at.len(), 1);
        let past = merge(vec![seg(0.0, 10.0, 2.0), seg(15.5, 20.0, 2.0)], &CFG);
        assert_eq!(past.len(), 2);
    }

    #[test]
    fn significant_overlap_merges_regardless_of_gap() {
        let cfg = MergeConfig { gap_tolerance: 0.0, significant_overlap: 10.0 };
        let out = merge(vec![seg(0.0, 40.0, 2.0), seg(20.0, 30.0, 4.0)], &cfg);
        assert_eq!(out, vec![seg(0.0, 40.0, 4.0)]);
    }

    #[test]
    fn keeps_higher_score_and_sorts_input() {
        let out = merge(
            vec![seg(50.0, 55.0, 2.5), seg(3.0, 8.0, 4.0), seg(0.0, 4.0, 2.0)],
            &CFG,
        );
        assert_eq!(out, vec![seg(0.0, 8.0, 4.0), seg(50.0, 55.0, 2.5)]);
    }

    #[test]
    fn contained_segment_does_not_shrink_end() {
        let out = merge(vec![seg(0.0, 30.0, 2.0), seg(5.0, 10.0, 2.2)], &CFG);
        assert_eq!(out, vec![seg(0.0, 30.0, 2.2)]);
    }

    #[test]
    fn merge_is_idempotent_and_non_overlapping() {
        let input = vec![
            seg(0.0, 2.0, 2.1),
            seg(4.0, 6.0, 2.4),
            seg(20.0, 22.0, 3.0),
            seg(21.0, 40.0, 2.2),
            seg(60.0, 61.0, 5.0),
            seg(100.0, 130.0, 2.0),
            seg(104.0, 112.0, 2.9),
        ];
        let once = merge(input, &CFG);
        let twice = merge(once.clone(), &CFG);
        assert_eq!(once, twice);
        for w in once.windows(2) {
            assert!(w[0].end < w[1].start);
        }
    }

    #[test]
    fn empty_input() {
        assert!(merge(Vec::new(), &CFG).is_empty());
    }

    #[test]
    fn extension_is_clamped_to_track_end() {
        let mut segs = vec![seg(30.0, 40.0, 1.5)];
        extend(&mut segs, &ExtensionConfig { seconds: 60.0, score_cutoff: 1.0 }, 50.0);
        assert_eq!(segs, vec![seg(30.0, 50.0, 1.5)]);
    }

    #[test]
    fn extension_respects_cutoff_and_next_segment() {
        let cfg = ExtensionConfig { seconds: 60.0, score_cutoff: 1.0 };
        let mut segs = vec![seg(0.0, 10.0, 2.0), seg(30.0, 40.0, 1.0), seg(200.0, 210.0, 3.0)];
        extend(&mut segs, &cfg, 1000.0);
        assert_eq!(
            segs,
            vec![seg(0.0, 30.0, 2.0), seg(30.0, 40.0, 1.0), seg(200.0, 270.0, 3.0)]
        );
    }
}
