//! Finite-difference validation of analytic gradients.
//!
//! Every parameter is nudged by `+eps` and `-eps` in turn, the objective is
//! re-evaluated, and the central difference `(f(x+eps) - f(x-eps)) / 2eps` is
//! compared against the analytic gradient the objective reports at `x`.

mod report;

use std::thread::available_parallelism;

use ndarray::Array1;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::f::{distributed, Task};

pub use report::{relative_error, GradCheckReport, GradEntry};

/// A scalar function of a flat parameter vector that also reports its own gradient.
pub trait Objective {
    fn evaluate(&self, params: &Array1<f64>) -> Result<(f64, Array1<f64>)>;
}

impl<F> Objective for F
where
    F: Fn(&Array1<f64>) -> Result<(f64, Array1<f64>)>,
{
    fn evaluate(&self, params: &Array1<f64>) -> Result<(f64, Array1<f64>)> {
        self(params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheck {
    epsilon: f64,
    tolerance: f64,
}

impl Default for GradCheck {
    fn default() -> Self {
        GradCheck::new()
    }
}

impl GradCheck {
    pub fn new() -> GradCheck {
        GradCheck {
            epsilon: 1e-4,
            tolerance: 1e-5,
        }
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> &mut Self {
        self.epsilon = epsilon;
        self
    }

    pub fn set_tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.tolerance = tolerance;
        self
    }

    /// Both the perturbation and the tolerance must be finite and positive.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.) {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Checks every index sequentially, perturbing `params` in place.
    ///
    /// Each entry is put back to its saved value before the next index is touched,
    /// so `params` is left exactly as it was passed in, even when the objective errors.
    pub fn run<F>(&self, f: &F, params: &mut Array1<f64>) -> Result<GradCheckReport>
    where
        F: Objective + ?Sized,
    {
        let analytic = self.analytic(f, params)?;

        let mut entries = Vec::with_capacity(params.len());
        for i in 0..params.len() {
            let numeric = self.central_difference(f, params, i)?;
            entries.push(self.entry(i, analytic[i], numeric));
        }

        Ok(self.report(entries))
    }

    /// Splits the indices across worker threads. Each worker perturbs its own copy
    /// of `params`; the caller's vector is never written.
    pub fn run_distributed<F>(&self, f: &F, params: &Array1<f64>) -> Result<GradCheckReport>
    where
        F: Objective + Sync + ?Sized,
    {
        let analytic = self.analytic(f, params)?;
        let len = params.len();
        let cores: usize = available_parallelism().map(|n| n.get()).unwrap_or(1);
        let chunk = ((len + cores - 1) / cores).max(1);

        let tasks: Vec<Task<Result<Vec<GradEntry>>>> = (0..len)
            .step_by(chunk)
            .map(|start| {
                let end = (start + chunk).min(len);
                let analytic = &analytic;
                Box::new(move || {
                    let mut local = params.clone();
                    (start..end)
                        .map(|i| {
                            let numeric = self.central_difference(f, &mut local, i)?;
                            Ok(self.entry(i, analytic[i], numeric))
                        })
                        .collect::<Result<Vec<GradEntry>>>()
                }) as Task<Result<Vec<GradEntry>>>
            })
            .collect();

        let mut entries = Vec::with_capacity(len);
        for batch in distributed(tasks) {
            entries.extend(batch?);
        }

        Ok(self.report(entries))
    }

    fn analytic<F>(&self, f: &F, params: &Array1<f64>) -> Result<Array1<f64>>
    where
        F: Objective + ?Sized,
    {
        self.validate()?;

        let (_, analytic) = f.evaluate(params)?;
        if analytic.len() != params.len() {
            return Err(Error::GradientLength {
                expected: params.len(),
                got: analytic.len(),
            });
        }
        Ok(analytic)
    }

    fn central_difference<F>(&self, f: &F, params: &mut Array1<f64>, i: usize) -> Result<f64>
    where
        F: Objective + ?Sized,
    {
        let original = params[i];

        params[i] = original + self.epsilon;
        let plus = f.evaluate(params).map(|(cost, _)| cost);
        params[i] = original - self.epsilon;
        let minus = f.evaluate(params).map(|(cost, _)| cost);
        params[i] = original;

        Ok((plus? - minus?) / (2. * self.epsilon))
    }

    fn entry(&self, index: usize, analytic: f64, numeric: f64) -> GradEntry {
        let entry = GradEntry {
            index,
            analytic,
            numeric,
            rel_error: relative_error(numeric, analytic),
        };
        debug!(
            index,
            analytic,
            numeric,
            rel_error = entry.rel_error,
            "checked gradient entry"
        );
        entry
    }

    fn report(&self, entries: Vec<GradEntry>) -> GradCheckReport {
        let report = GradCheckReport::new(entries, self.tolerance);
        report.log_failures();
        info!(
            params = report.entries.len(),
            failures = report.failures().count(),
            max_rel_error = report.max_rel_error,
            "{}",
            if report.passed() {
                "gradient check passed"
            } else {
                "gradient check failed"
            }
        );
        report
    }
}

/// Runs [`GradCheck::run`] with `eps = 1e-4` and a `1e-5` tolerance.
pub fn gradcheck<F>(f: &F, params: &mut Array1<f64>) -> Result<GradCheckReport>
where
    F: Objective + ?Sized,
{
    GradCheck::new().run(f, params)
}
