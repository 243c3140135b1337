/// Median of the loudness sequence. Returns 0.0 for an empty sequence.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_and_even_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[7.0]), 7.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn permutation_invariant() {
        let values = vec![0.1, 0.9, 0.3, 0.3, 2.5, 0.2, 0.15, 0.4];
        let expected = median(&values);

        let mut reversed = values.clone();
        reversed.reverse();
        assert_eq!(median(&reversed), expected);

        let mut rotated = values.clone();
        rotated.rotate_left(3);
        assert_eq!(median(&rotated), expected);

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(median(&sorted), expected);
    }

    #[test]
    fn spikes_do_not_drag_baseline() {
        let mut values = vec![0.1; 20];
        values.extend([5.0, 8.0, 9.0]);
        assert_eq!(median(&values), 0.1);
    }
}
