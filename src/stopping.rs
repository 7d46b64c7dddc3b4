//! Rules deciding when gradient descent stops.
//!
//! The solver asks its rule before every update whether to perform another one,
//! passing the [`Progress`] made so far. Before the first update `iterations` is zero
//! and both costs equal the cost of the all-zero parameters.

/// State of a fit after `iterations` completed updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Number of updates performed so far.
    pub iterations: usize,
    /// Cost before the most recent update.
    pub previous_cost: f64,
    /// Cost after the most recent update.
    pub cost: f64,
}

impl Progress {
    pub(crate) fn start(cost: f64) -> Self {
        Self {
            iterations: 0,
            previous_cost: cost,
            cost,
        }
    }

    pub(crate) fn advance(&self, cost: f64) -> Self {
        Self {
            iterations: self.iterations + 1,
            previous_cost: self.cost,
            cost,
        }
    }

    /// How much the last update lowered the cost. Negative when the cost rose.
    pub fn improvement(&self) -> f64 {
        self.previous_cost - self.cost
    }
}

/// Predicate over the progress of a fit deciding whether to run another update.
///
/// Any `FnMut(&Progress) -> bool` closure is a rule.
pub trait StoppingRule {
    /// Returns `true` to perform another update, `false` to stop.
    fn should_continue(&mut self, progress: &Progress) -> bool;

    /// Limits the rule to at most `max_iterations` updates.
    fn capped(self, max_iterations: usize) -> Capped<Self>
    where
        Self: Sized,
    {
        Capped {
            rule: self,
            max_iterations,
        }
    }
}

impl<F> StoppingRule for F
where
    F: FnMut(&Progress) -> bool,
{
    fn should_continue(&mut self, progress: &Progress) -> bool {
        self(progress)
    }
}

/// Runs exactly `iterations` updates, with no early exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIterations {
    iterations: usize,
}

impl FixedIterations {
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl StoppingRule for FixedIterations {
    fn should_continue(&mut self, progress: &Progress) -> bool {
        progress.iterations < self.iterations
    }
}

/// Runs at least one update, then keeps going while each update lowers the cost by
/// more than `threshold`.
///
/// A diverging fit raises the cost, so its improvement is negative and the rule stops
/// right after the first such update. Non-finite costs stop it too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostThreshold {
    threshold: f64,
}

impl CostThreshold {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl StoppingRule for CostThreshold {
    fn should_continue(&mut self, progress: &Progress) -> bool {
        progress.iterations == 0 || progress.improvement() > self.threshold
    }
}

/// A rule with a hard upper bound on the number of updates. See [`StoppingRule::capped`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capped<R> {
    rule: R,
    max_iterations: usize,
}

impl<R> StoppingRule for Capped<R>
where
    R: StoppingRule,
{
    fn should_continue(&mut self, progress: &Progress) -> bool {
        progress.iterations < self.max_iterations && self.rule.should_continue(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_iterations() {
        let mut rule = FixedIterations::new(2);
        let progress = Progress::start(10.0);

        assert!(rule.should_continue(&progress));
        assert!(rule.should_continue(&progress.advance(5.0)));
        assert!(!rule.should_continue(&progress.advance(5.0).advance(4.0)));

        assert!(!FixedIterations::new(0).should_continue(&progress));
    }

    #[test]
    fn test_cost_threshold_runs_once() {
        let mut rule = CostThreshold::new(f64::MAX);
        let progress = Progress::start(10.0);

        assert!(rule.should_continue(&progress));
        assert!(!rule.should_continue(&progress.advance(0.0)));
    }

    #[test]
    fn test_cost_threshold_compares_improvement() {
        let mut rule = CostThreshold::new(0.5);
        let progress = Progress::start(10.0).advance(9.0);

        assert!(rule.should_continue(&progress));
        assert!(!rule.should_continue(&progress.advance(8.5)));
        assert!(!rule.should_continue(&progress.advance(12.0)));
        assert!(!rule.should_continue(&progress.advance(f64::NAN)));
    }

    #[test]
    fn test_capped() {
        let mut rule = CostThreshold::new(0.0).capped(1);
        let progress = Progress::start(10.0);

        assert!(rule.should_continue(&progress));
        assert!(!rule.should_continue(&progress.advance(1.0)));
    }

    #[test]
    fn test_closure_rule() {
        let mut calls = 0;
        let mut rule = |progress: &Progress| {
            calls += 1;
            progress.cost > 1.0
        };

        assert!(rule.should_continue(&Progress::start(2.0)));
        assert!(!rule.should_continue(&Progress::start(0.5)));
        assert_eq!(2, calls);
    }
}
