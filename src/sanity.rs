use ndarray::Array1;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::SanityConfig;
use crate::error::Result;
use crate::gradcheck::{GradCheck, GradCheckReport};
use crate::nn::propagate;
use crate::params::Params;
use crate::util::random_batch;

/// Gradient-checks [`propagate`] on a random batch and random parameters.
pub fn run(config: &SanityConfig) -> Result<GradCheckReport> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let dims = config.dims;
    let (data, labels) = random_batch(config.batch_size, dims, &mut rng);
    let mut params = Params::random(dims, &mut rng).pack();

    info!(
        name = %config.name,
        batch_size = config.batch_size,
        %dims,
        params = params.len(),
        distributed = config.distributed,
        "running sanity check"
    );

    let objective = |p: &Array1<f64>| propagate(&data, &labels, p, dims);

    let mut check = GradCheck::new();
    check
        .set_epsilon(config.epsilon)
        .set_tolerance(config.tolerance);

    if config.distributed {
        check.run_distributed(&objective, &params)
    } else {
        check.run(&objective, &mut params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Dims;

    fn seeded(seed: u64) -> SanityConfig {
        SanityConfig {
            name: String::from("test"),
            batch_size: 6,
            dims: Dims::new(4, 3, 5).unwrap(),
            seed: Some(seed),
            ..SanityConfig::default()
        }
    }

    #[test]
    fn seeded_run_passes_and_is_reproducible() {
        let a = run(&seeded(5)).unwrap();
        let b = run(&seeded(5)).unwrap();

        assert!(a.passed(), "{a}");
        assert_eq!(a, b);
        assert_eq!(a.entries.len(), Dims::new(4, 3, 5).unwrap().param_count());
    }

    #[test]
    fn distributed_run_agrees() {
        let sequential = run(&seeded(21)).unwrap();
        let distributed = run(&SanityConfig {
            distributed: true,
            ..seeded(21)
        })
        .unwrap();

        assert_eq!(sequential, distributed);
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = SanityConfig {
            batch_size: 0,
            ..seeded(1)
        };
        assert!(run(&config).is_err());
    }
}
