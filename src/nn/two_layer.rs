use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::error::{Error, Result};
use crate::f::{cross_entropy, sigmoid_array, sigmoid_grad_array, softmax};
use crate::params::{Dims, Params};

/// Intermediate values of a forward pass, reused by [`TwoLayer::backward`].
#[derive(Debug, Clone)]
pub struct Forward {
    pub h: Array2<f64>,
    pub y_hat: Array2<f64>,
    pub cost: f64,
}

/// Sigmoid hidden layer followed by a softmax output layer.
#[derive(Debug, Clone)]
pub struct TwoLayer {
    params: Params,
    dims: Dims,
}

impl TwoLayer {
    pub fn new(params: Params) -> Result<TwoLayer> {
        let dims = params.dims();
        dims.validate()?;

        if params.b1.len() != dims.hidden {
            return Err(Error::ShapeMismatch {
                what: "b1",
                expected: (1, dims.hidden),
                got: (1, params.b1.len()),
            });
        }
        if params.b2.len() != dims.output {
            return Err(Error::ShapeMismatch {
                what: "b2",
                expected: (1, dims.output),
                got: (1, params.b2.len()),
            });
        }
        if params.w2.nrows() != dims.hidden {
            return Err(Error::ShapeMismatch {
                what: "W2",
                expected: (dims.hidden, dims.output),
                got: params.w2.dim(),
            });
        }

        Ok(TwoLayer { params, dims })
    }

    pub fn unpack(flat: ArrayView1<f64>, dims: Dims) -> Result<TwoLayer> {
        TwoLayer::new(Params::unpack(flat, dims)?)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Row-wise class probabilities for a batch.
    pub fn predict(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_data(data)?;
        let (_, y_hat) = self.activations(data);
        Ok(y_hat)
    }

    pub fn forward(&self, data: &Array2<f64>, labels: &Array2<f64>) -> Result<Forward> {
        self.check_batch(data, labels)?;

        let (h, y_hat) = self.activations(data);
        let cost = cross_entropy(&y_hat, labels);

        Ok(Forward { h, y_hat, cost })
    }

    /// Exact gradients of the averaged cross-entropy, laid out like the parameters.
    ///
    /// `data` and `labels` must be the batch `pass` was computed from.
    pub fn backward(&self, data: &Array2<f64>, labels: &Array2<f64>, pass: &Forward) -> Params {
        let batch_size = data.nrows() as f64;
        let Params { w2, .. } = &self.params;

        // softmax + cross-entropy collapse to (y_hat - labels)
        let dz2 = (&pass.y_hat - labels) / batch_size;
        let b2 = dz2.sum_axis(Axis(0));
        let grad_w2 = pass.h.t().dot(&dz2);

        let dh = dz2.dot(&w2.t());
        let dz1 = dh * sigmoid_grad_array(&pass.h);
        let b1 = dz1.sum_axis(Axis(0));
        let grad_w1 = data.t().dot(&dz1);

        Params {
            w1: grad_w1,
            b1,
            w2: grad_w2,
            b2,
        }
    }

    fn activations(&self, data: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
        let Params { w1, b1, w2, b2 } = &self.params;

        let z1 = data.dot(w1) + b1;
        let h = sigmoid_array(&z1);
        let z2 = h.dot(w2) + b2;
        let y_hat = softmax(&z2);

        (h, y_hat)
    }

    fn check_data(&self, data: &Array2<f64>) -> Result<()> {
        if data.nrows() == 0 {
            return Err(Error::EmptyBatch);
        }
        if data.ncols() != self.dims.input {
            return Err(Error::ShapeMismatch {
                what: "data",
                expected: (data.nrows(), self.dims.input),
                got: data.dim(),
            });
        }
        Ok(())
    }

    fn check_batch(&self, data: &Array2<f64>, labels: &Array2<f64>) -> Result<()> {
        self.check_data(data)?;
        let expected = (data.nrows(), self.dims.output);
        if labels.dim() != expected {
            return Err(Error::ShapeMismatch {
                what: "labels",
                expected,
                got: labels.dim(),
            });
        }
        Ok(())
    }
}

/// Forward and backward pass over a flat parameter vector.
///
/// Returns the batch-averaged cross-entropy and its gradient, packed in the same
/// `[W1, b1, W2, b2]` order as `params`.
pub fn propagate(
    data: &Array2<f64>,
    labels: &Array2<f64>,
    params: &Array1<f64>,
    dims: Dims,
) -> Result<(f64, Array1<f64>)> {
    let net = TwoLayer::unpack(params.view(), dims)?;
    let pass = net.forward(data, labels)?;
    let grad = net.backward(data, labels, &pass);

    Ok((pass.cost, grad.pack()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn tiny() -> (Dims, Array1<f64>) {
        let dims = Dims::new(2, 3, 2).unwrap();
        let params = Array1::from_iter((0..dims.param_count()).map(|i| 0.1 * i as f64 - 0.7));
        (dims, params)
    }

    #[test]
    fn gradient_has_parameter_length() {
        let (dims, params) = tiny();
        let data = array![[0.5, -1.], [2., 0.25], [-0.3, 0.3]];
        let labels = array![[1., 0.], [0., 1.], [0., 1.]];

        let (cost, grad) = propagate(&data, &labels, &params, dims).unwrap();
        assert!(cost > 0.);
        assert_eq!(grad.len(), params.len());
    }

    #[test]
    fn predictions_are_distributions() {
        let (dims, params) = tiny();
        let net = TwoLayer::unpack(params.view(), dims).unwrap();
        let y_hat = net.predict(&array![[1., 2.], [-3., 0.]]).unwrap();

        for row in y_hat.rows() {
            assert_abs_diff_eq!(row.sum(), 1., epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let (dims, params) = tiny();

        let wide = array![[1., 2., 3.]];
        let labels = array![[1., 0.]];
        assert!(matches!(
            propagate(&wide, &labels, &params, dims),
            Err(Error::ShapeMismatch { what: "data", .. })
        ));

        let data = array![[1., 2.], [3., 4.]];
        assert!(matches!(
            propagate(&data, &labels, &params, dims),
            Err(Error::ShapeMismatch { what: "labels", .. })
        ));

        let empty = Array2::<f64>::zeros((0, 2));
        let no_labels = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            propagate(&empty, &no_labels, &params, dims),
            Err(Error::EmptyBatch)
        ));
    }

    #[test]
    fn rejects_wrong_parameter_length() {
        let (dims, params) = tiny();
        let data = array![[1., 2.]];
        let labels = array![[0., 1.]];
        let short = params.slice(ndarray::s![..params.len() - 1]).to_owned();

        assert!(matches!(
            propagate(&data, &labels, &short, dims),
            Err(Error::ParamLength { .. })
        ));
    }

    #[test]
    fn inconsistent_blocks_are_rejected() {
        let dims = Dims::new(2, 3, 2).unwrap();
        let mut params = Params::zeros(dims);
        params.b1 = Array1::zeros(4);
        assert!(matches!(
            TwoLayer::new(params),
            Err(Error::ShapeMismatch {
                what: "b1",
                expected: (1, 3),
                got: (1, 4)
            })
        ));

        let mut params = Params::zeros(dims);
        params.b2 = Array1::zeros(1);
        assert!(matches!(
            TwoLayer::new(params),
            Err(Error::ShapeMismatch { what: "b2", .. })
        ));

        let mut params = Params::zeros(dims);
        params.w2 = Array2::zeros((4, 2));
        assert!(matches!(
            TwoLayer::new(params),
            Err(Error::ShapeMismatch { what: "W2", .. })
        ));
    }
}
