use std::fmt;

use tracing::warn;

/// `|numeric - analytic| / max(1, |numeric| + |analytic|)`
pub fn relative_error(numeric: f64, analytic: f64) -> f64 {
    (numeric - analytic).abs() / f64::max(1., numeric.abs() + analytic.abs())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradEntry {
    pub index: usize,
    pub analytic: f64,
    pub numeric: f64,
    pub rel_error: f64,
}

impl GradEntry {
    /// A NaN error never passes.
    pub fn passes(&self, tolerance: f64) -> bool {
        self.rel_error <= tolerance
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradCheckReport {
    pub entries: Vec<GradEntry>,
    pub tolerance: f64,
    pub max_rel_error: f64,
    pub max_index: Option<usize>,
}

impl GradCheckReport {
    pub fn new(entries: Vec<GradEntry>, tolerance: f64) -> GradCheckReport {
        let rank = |e: &GradEntry| {
            if e.rel_error.is_nan() {
                f64::INFINITY
            } else {
                e.rel_error
            }
        };

        let worst = entries.iter().fold(None, |worst: Option<&GradEntry>, e| match worst {
            Some(w) if rank(w) >= rank(e) => Some(w),
            _ => Some(e),
        });

        GradCheckReport {
            max_rel_error: worst.map(|e| e.rel_error).unwrap_or(0.),
            max_index: worst.map(|e| e.index),
            entries,
            tolerance,
        }
    }

    pub fn passed(&self) -> bool {
        self.entries.iter().all(|e| e.passes(self.tolerance))
    }

    pub fn failures(&self) -> impl Iterator<Item = &GradEntry> {
        self.entries.iter().filter(|e| !e.passes(self.tolerance))
    }

    pub fn first_failure(&self) -> Option<&GradEntry> {
        self.failures().next()
    }

    pub(crate) fn log_failures(&self) {
        for e in self.failures() {
            warn!(
                index = e.index,
                analytic = e.analytic,
                numeric = e.numeric,
                rel_error = e.rel_error,
                tolerance = self.tolerance,
                "gradient mismatch"
            );
        }
    }
}

impl fmt::Display for GradCheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "passed" } else { "failed" };
        write!(
            f,
            "gradient check {status}: {} of {} entries beyond tolerance {:e}, max relative error {:e}",
            self.failures().count(),
            self.entries.len(),
            self.tolerance,
            self.max_rel_error
        )?;
        if let Some(i) = self.max_index {
            write!(f, " at index {i}")?;
        }
        Ok(())
    }
}
