use ndarray::Array2;

/// Batch-averaged cross-entropy `-(1/M) * sum(labels * ln(y_hat))`.
///
/// Probabilities are not clipped: a predicted zero produces an infinite or NaN
/// cost, which is handed back to the caller as is.
pub fn cross_entropy(y_hat: &Array2<f64>, labels: &Array2<f64>) -> f64 {
    let batch_size = y_hat.nrows() as f64;
    let log_likelihood = (y_hat.mapv(f64::ln) * labels).sum();
    -log_likelihood / batch_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn cross_entropy_averages_over_batch() {
        let y_hat = array![[0.5, 0.5], [0.25, 0.75]];
        let labels = array![[1., 0.], [0., 1.]];

        let expected = -(0.5_f64.ln() + 0.75_f64.ln()) / 2.;
        assert_abs_diff_eq!(cross_entropy(&y_hat, &labels), expected, epsilon = 1e-12);
    }

    #[test]
    fn cross_entropy_ignores_non_label_entries() {
        let y_hat = array![[0.2, 0.8], [1., 1e-300]];
        let labels = array![[0., 1.], [1., 0.]];
        let cost = cross_entropy(&y_hat, &labels);
        assert_abs_diff_eq!(cost, -(0.8_f64.ln()) / 2., epsilon = 1e-12);
    }

    #[test]
    fn zero_probability_surfaces_as_non_finite() {
        let y_hat = array![[0., 1.]];
        let labels = array![[1., 0.]];
        assert!(!cross_entropy(&y_hat, &labels).is_finite());
    }
}
