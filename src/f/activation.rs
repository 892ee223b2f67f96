use ndarray::Array2;

/// Logistic function `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1. / (1. + (-x).exp())
}

/// Sigmoid derivative expressed through an already-activated value `s = sigmoid(x)`.
pub fn sigmoid_grad(s: f64) -> f64 {
    s * (1. - s)
}

pub fn sigmoid_array(x: &Array2<f64>) -> Array2<f64> {
    x.mapv(sigmoid)
}

pub fn sigmoid_grad_array(s: &Array2<f64>) -> Array2<f64> {
    s.mapv(sigmoid_grad)
}
