use ndarray::Array2;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::params::Dims;

/// Standard-normal inputs paired with uniformly drawn one-hot labels.
pub fn random_batch<R: Rng + ?Sized>(
    batch_size: usize,
    dims: Dims,
    rng: &mut R,
) -> (Array2<f64>, Array2<f64>) {
    let data = Array2::random_using((batch_size, dims.input), StandardNormal, rng);

    let mut labels = Array2::zeros((batch_size, dims.output));
    for mut row in labels.rows_mut() {
        row[rng.gen_range(0..dims.output)] = 1.;
    }

    (data, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::f::is_one_hot;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn batch_has_requested_shape_and_one_hot_rows() {
        let dims = Dims::new(6, 4, 3).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let (data, labels) = random_batch(9, dims, &mut rng);

        assert_eq!(data.dim(), (9, 6));
        assert_eq!(labels.dim(), (9, 3));
        for row in labels.rows() {
            assert!(is_one_hot(&row.to_vec()));
        }
    }

    #[test]
    fn same_seed_same_batch() {
        let dims = Dims::new(3, 2, 4).unwrap();
        let a = random_batch(5, dims, &mut ChaCha8Rng::seed_from_u64(3));
        let b = random_batch(5, dims, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
