//! `VrpRouteOptimizer` implementation backed by `vrp-core`.

use std::time::Duration;

use courier_core::{OrderingProblem, RouteOptimizer, Stop, TravelMatrix};
use log::{debug, warn};

use crate::vrp::VrpSolveContext;


/// Configuration for [`VrpRouteOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrpOptimizerConfig {
    /// Upper bound on `vrp-core` generations.
    pub max_generations: usize,
}

impl Default for VrpOptimizerConfig {
    fn default() -> Self {
        Self {
            max_generations: 200,
        }
    }
}

/// Metaheuristic open-path optimiser.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use courier_core::{RouteOptimizer, TravelMatrix};
/// use courier_core::test_support::depot_at;
/// use courier_solver_vrp::VrpRouteOptimizer;
///
/// let depot = depot_at(0, 53.8, -1.55);
/// let matrix = TravelMatrix::zeroed(vec![0]);
/// let order = VrpRouteOptimizer::default().optimize(&depot, &[], &matrix, Duration::from_secs(1));
/// assert!(order.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct VrpRouteOptimizer {
    config: VrpOptimizerConfig,
}

impl VrpRouteOptimizer {
    /// Construct an optimiser with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpOptimizerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpOptimizerConfig {
        &self.config
    }
}

/// Whole seconds covering `budget`, at least one.
fn budget_seconds(budget: Duration) -> usize {
    let seconds = budget
        .as_secs()
        .saturating_add(u64::from(budget.subsec_nanos() > 0))
        .max(1);
    usize::try_from(seconds).unwrap_or(usize::MAX)
}

/// `vrp-core` only accepts whole-second time limits, so a non-zero
/// `time_budget` is rounded up to the next whole second. The search may
/// therefore run up to one second past a fractional budget. A zero budget
/// skips the search.
impl RouteOptimizer for VrpRouteOptimizer {
    fn optimize(
        &self,
        depot: &Stop,
        stops: &[Stop],
        matrix: &TravelMatrix,
        time_budget: Duration,
    ) -> Vec<Stop> {
        if OrderingProblem::is_trivial(stops, time_budget) {
            return stops.to_vec();
        }
        let Some(problem) = OrderingProblem::new(depot, stops, matrix) else {
            warn!(
                "vehicle starting at {:?} has stops missing from its matrix; keeping input order",
                depot.name
            );
            return stops.to_vec();
        };

        let context = VrpSolveContext::new(&self.config, budget_seconds(time_budget));
        let candidate = context
            .solve(&problem)
            .inspect_err(|err| warn!("route optimisation failed: {err}; keeping input order"))
            .ok();
        debug!(
            "optimised {} stops for depot {:?} within {}s",
            problem.len(),
            depot.name,
            time_budget.as_secs()
        );
        problem.accept(candidate)
    }
}
