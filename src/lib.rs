//! Forward and backward propagation for a two-layer sigmoid/softmax network,
//! validated against a finite-difference gradient checker.
//!
//! ```
//! use backprop::{gradcheck, nn::propagate, util::random_batch, Dims, Params};
//! use ndarray::Array1;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! # fn main() -> backprop::Result<()> {
//! let dims = Dims::new(10, 5, 10)?;
//! let mut rng = ChaCha8Rng::seed_from_u64(0);
//! let (data, labels) = random_batch(20, dims, &mut rng);
//! let mut params = Params::random(dims, &mut rng).pack();
//!
//! let report = gradcheck(
//!     &|p: &Array1<f64>| propagate(&data, &labels, p, dims),
//!     &mut params,
//! )?;
//! assert!(report.passed());
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
pub mod f;
pub mod gradcheck;
pub mod nn;
pub mod params;
pub mod sanity;
pub mod util;

pub use config::SanityConfig;
pub use error::{Error, Result};
pub use gradcheck::{gradcheck, GradCheck, GradCheckReport, GradEntry, Objective};
pub use nn::{propagate, TwoLayer};
pub use params::{Dims, Params};
