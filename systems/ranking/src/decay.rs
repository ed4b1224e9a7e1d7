/// Exponentially decaying weighted sum of `values`.
///
/// Equivalent to `s_init * alpha^n + Σ (1 - alpha) * alpha^i * values[i]`: the
/// front of the list dominates and the tail is padded with an infinite run of
/// `s_init`. Empty input returns `s_init` exactly.
#[must_use]
pub fn decay_sum(values: &[f64], alpha: f64, s_init: f64) -> f64 {
    values
        .iter()
        .rev()
        .fold(s_init, |sum, value| alpha * sum + (1.0 - alpha) * value)
}

#[cfg(test)]
mod tests {
    use super::decay_sum;

    #[test]
    fn empty_input_returns_initial_value() {
        assert_eq!(decay_sum(&[], 0.95, 1.0), 1.0);
        assert_eq!(decay_sum(&[], 0.9, 0.0), 0.0);
    }

    #[test]
    fn front_values_dominate() {
        let front_heavy = decay_sum(&[1.0, 0.0, 0.0], 0.9, 0.0);
        let back_heavy = decay_sum(&[0.0, 0.0, 1.0], 0.9, 0.0);
        assert!(front_heavy > back_heavy);
        assert!((front_heavy - 0.1).abs() < 1e-12);
        assert!((back_heavy - 0.1 * 0.81).abs() < 1e-12);
    }

    #[test]
    fn matches_closed_form() {
        let values = [0.25, 0.5, 0.75];
        let alpha: f64 = 0.95;
        let expected = 1.0 * alpha.powi(3)
            + values
                .iter()
                .enumerate()
                .map(|(i, value)| (1.0 - alpha) * alpha.powi(i as i32) * value)
                .sum::<f64>();
        assert!((decay_sum(&values, alpha, 1.0) - expected).abs() < 1e-12);
    }
}
