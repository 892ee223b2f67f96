use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Layer sizes of the two-layer network: input `Dx`, hidden `H`, output `Dy`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
}

impl Dims {
    pub fn new(input: usize, hidden: usize, output: usize) -> Result<Dims> {
        let dims = Dims {
            input,
            hidden,
            output,
        };
        dims.validate()?;
        Ok(dims)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input == 0 || self.hidden == 0 || self.output == 0 {
            return Err(Error::InvalidDims(format!(
                "every layer needs at least one unit, got {self}"
            )));
        }
        if self.checked_offsets().is_none() {
            return Err(Error::InvalidDims(format!(
                "parameter count overflows usize for {self}"
            )));
        }
        Ok(())
    }

    /// `Dx*H + H + H*Dy + Dy`
    pub fn param_count(&self) -> usize {
        let [.., end] = self.offsets();
        end
    }

    /// Start offsets of W1, b1, W2, b2 followed by the total length.
    ///
    /// Saturates at `usize::MAX` for dims that fail [`Dims::validate`].
    pub fn offsets(&self) -> [usize; 5] {
        self.checked_offsets().unwrap_or([usize::MAX; 5])
    }

    fn checked_offsets(&self) -> Option<[usize; 5]> {
        let w1 = 0;
        let b1 = self.input.checked_mul(self.hidden)?;
        let w2 = b1.checked_add(self.hidden)?;
        let b2 = w2.checked_add(self.hidden.checked_mul(self.output)?)?;
        let end = b2.checked_add(self.output)?;
        Some([w1, b1, w2, b2, end])
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dims ({}, {}, {})", self.input, self.hidden, self.output)
    }
}

/// The four parameter blocks of the network, each in its own buffer.
///
/// Gradients share this type: backprop fills a `Params` whose entries are partial
/// derivatives, and both go through the same [`Params::pack`], so the flat
/// gradient always lines up with the flat parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub w1: Array2<f64>,
    pub b1: Array1<f64>,
    pub w2: Array2<f64>,
    pub b2: Array1<f64>,
}

impl Params {
    pub fn zeros(dims: Dims) -> Params {
        Params {
            w1: Array2::zeros((dims.input, dims.hidden)),
            b1: Array1::zeros(dims.hidden),
            w2: Array2::zeros((dims.hidden, dims.output)),
            b2: Array1::zeros(dims.output),
        }
    }

    /// Every entry drawn from a standard normal.
    pub fn random<R: Rng + ?Sized>(dims: Dims, rng: &mut R) -> Params {
        Params {
            w1: Array2::random_using((dims.input, dims.hidden), StandardNormal, rng),
            b1: Array1::random_using(dims.hidden, StandardNormal, rng),
            w2: Array2::random_using((dims.hidden, dims.output), StandardNormal, rng),
            b2: Array1::random_using(dims.output, StandardNormal, rng),
        }
    }

    /// Splits a flat `[W1, b1, W2, b2]` vector (matrices row-major) into blocks.
    pub fn unpack(flat: ArrayView1<f64>, dims: Dims) -> Result<Params> {
        dims.validate()?;

        let expected = dims.param_count();
        if flat.len() != expected {
            return Err(Error::ParamLength {
                expected,
                got: flat.len(),
                dims,
            });
        }

        let [w1, b1, w2, b2, _] = dims.offsets();
        let (h, dy) = (dims.hidden, dims.output);

        Ok(Params {
            w1: Array2::from_shape_fn((dims.input, h), |(i, j)| flat[w1 + i * h + j]),
            b1: Array1::from_shape_fn(h, |j| flat[b1 + j]),
            w2: Array2::from_shape_fn((h, dy), |(i, j)| flat[w2 + i * dy + j]),
            b2: Array1::from_shape_fn(dy, |j| flat[b2 + j]),
        })
    }

    /// Inverse of [`Params::unpack`].
    pub fn pack(&self) -> Array1<f64> {
        self.w1
            .iter()
            .chain(self.b1.iter())
            .chain(self.w2.iter())
            .chain(self.b2.iter())
            .copied()
            .collect()
    }

    pub fn dims(&self) -> Dims {
        Dims {
            input: self.w1.nrows(),
            hidden: self.w1.ncols(),
            output: self.w2.ncols(),
        }
    }
}
