//! Small statistics helpers used by the summary output.

/// Arithmetic mean of the samples. Zero for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation (n-1 denominator).
///
/// Returns `None` for fewer than two samples, where the statistic is
/// undefined.
pub fn sample_stdev(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let m = mean(samples);
    let variance =
        samples.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn mean_of_samples() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn stdev_undefined_below_two_samples() {
        assert_eq!(sample_stdev(&[]), None);
        assert_eq!(sample_stdev(&[1.0]), None);
    }

    #[test]
    fn stdev_of_symmetric_pair() {
        // mean 0.2, deviations +-0.1 -> sample stdev sqrt(0.02 / 1)
        let s = sample_stdev(&[0.1, 0.3]).unwrap();
        assert!((s - 0.02f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn stdev_of_identical_samples_is_zero() {
        let s = sample_stdev(&[0.5, 0.5, 0.5]).unwrap();
        assert_eq!(s, 0.0);
    }
}
