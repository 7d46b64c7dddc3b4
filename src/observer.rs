//! Per-iteration hooks for progress reporting.
//!
//! Observers see every update but cannot influence the fit; stopping is decided by a
//! [`StoppingRule`](crate::StoppingRule) alone.

use crate::stopping::Progress;

/// Called by the solver after every parameter update.
///
/// Any `FnMut(&Progress, &[f64])` closure is an observer.
pub trait Observer {
    /// `parameters` are the values after the update, bias first.
    fn on_iteration(&mut self, progress: &Progress, parameters: &[f64]);
}

impl<F> Observer for F
where
    F: FnMut(&Progress, &[f64]),
{
    fn on_iteration(&mut self, progress: &Progress, parameters: &[f64]) {
        self(progress, parameters)
    }
}

/// Observer that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Observer for Silent {
    fn on_iteration(&mut self, _progress: &Progress, _parameters: &[f64]) {}
}

/// Logs parameters and cost at `debug` level every `period` updates, starting with the first.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    period: usize,
}

impl LogObserver {
    /// A zero period is treated as one.
    pub fn every(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    fn is_due(&self, iterations: usize) -> bool {
        (iterations - 1) % self.period == 0
    }
}

impl Observer for LogObserver {
    fn on_iteration(&mut self, progress: &Progress, parameters: &[f64]) {
        if self.is_due(progress.iterations) && log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "iteration {}: parameters = {:?}, cost = {}",
                progress.iterations,
                parameters,
                progress.cost
            );
        }
    }
}

/// Records the cost trajectory of a fit: the initial cost followed by the cost after
/// every update.
#[derive(Debug, Clone, Default)]
pub struct CostHistory {
    costs: Vec<f64>,
}

impl CostHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Returns true if no update raised the cost.
    pub fn is_non_increasing(&self) -> bool {
        self.costs.windows(2).all(|pair| pair[1] <= pair[0])
    }
}

impl Observer for CostHistory {
    fn on_iteration(&mut self, progress: &Progress, _parameters: &[f64]) {
        if self.costs.is_empty() {
            self.costs.push(progress.previous_cost);
        }
        self.costs.push(progress.cost);
    }
}
