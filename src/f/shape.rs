use ndarray::{Array2, Axis};
use ndarray_stats::QuantileExt;

/// True when exactly one entry is `1.` and every other entry is `0.`.
pub fn is_one_hot(row: &[f64]) -> bool {
    let ones = row.iter().filter(|v| **v == 1.).count();
    let zeros = row.iter().filter(|v| **v == 0.).count();
    ones == 1 && ones + zeros == row.len()
}

/// Row-wise softmax. The row max is subtracted before exponentiating so large
/// scores cannot overflow.
pub fn softmax(x: &Array2<f64>) -> Array2<f64> {
    let max_vals = x.map_axis(Axis(1), |row| *row.max_skipnan());
    let exps = (x - &max_vals.insert_axis(Axis(1))).mapv_into(f64::exp);
    let sum_exps = exps.sum_axis(Axis(1)).insert_axis(Axis(1));

    exps / &sum_exps
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn is_one_hot_requires_a_single_one() {
        assert!(is_one_hot(&[0., 0., 1., 0.]));
        assert!(is_one_hot(&[1.]));
        assert!(!is_one_hot(&[0., 0., 0.]));
        assert!(!is_one_hot(&[]));
        assert!(!is_one_hot(&[0.5, 0.5]));
        assert!(!is_one_hot(&[1., 1.]));
    }

    #[test]
    fn softmax_rows_sum_to_one() {
        let x = array![[1., 2., 3.], [-4., 0., 4.], [0., 0., 0.]];
        let y = softmax(&x);

        for row in y.rows() {
            assert_abs_diff_eq!(row.sum(), 1., epsilon = 1e-12);
            assert!(row.iter().all(|v| *v > 0.));
        }
        assert_abs_diff_eq!(y[[2, 0]], 1. / 3., epsilon = 1e-12);
    }

    #[test]
    fn softmax_is_shift_invariant_and_stable() {
        let x = array![[1., 2., 3.]];
        let shifted = array![[1001., 1002., 1003.]];

        let a = softmax(&x);
        let b = softmax(&shifted);
        assert!(b.iter().all(|v| v.is_finite()));
        for (av, bv) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(*av, *bv, epsilon = 1e-12);
        }
    }
}
