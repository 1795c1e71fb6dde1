//! `vrp-core` modelling helpers for `VrpRouteOptimizer`.
//!
//! This module turns an [`OrderingProblem`] into a single-vehicle `vrp-core`
//! problem, runs the solver, and translates the resulting tour back into
//! input positions.
//!
//! Locations are local to the problem: `0` is the depot and `i + 1` is the
//! stop at input position `i`.

use std::sync::Arc;

use courier_core::OrderingProblem;
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

use crate::optimizer::VrpOptimizerConfig;

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let unassigned_feature = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-duration")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_duration()?;

    GoalContextBuilder::with_features(&[unassigned_feature, transport_feature])?.build()
}

fn define_problem(
    stop_count: usize,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
) -> GenericResult<Problem> {
    let jobs = (1..=stop_count)
        .map(|location| {
            SingleBuilder::default()
                .id(format!("stop{location}").as_str())
                .location(location)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    // No end location: the route finishes at its last delivery.
    let vehicle = VehicleBuilder::default()
        .id("van")
        .add_detail(
            VehicleDetailBuilder::default()
                .set_start_location(0)
                .set_start_time(0.0)
                .build()?,
        )
        .build()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(std::iter::once(vehicle))
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

struct TravelTimeTransportCost {
    durations: Vec<Vec<f64>>,
}

impl TravelTimeTransportCost {
    /// Project the problem's penalised matrix onto local locations.
    fn new(problem: &OrderingProblem) -> Self {
        let indices: Vec<usize> = std::iter::once(problem.depot_index())
            .chain(problem.stop_indices().iter().copied())
            .collect();
        let durations = indices
            .iter()
            .map(|from| {
                indices
                    .iter()
                    .map(|to| problem.duration(*from, *to).as_secs_f64())
                    .collect()
            })
            .collect();
        Self { durations }
    }

    fn duration_seconds(&self, from: Location, to: Location) -> f64 {
        let result = self
            .durations
            .get(from)
            .and_then(|row| row.get(to))
            .copied();
        debug_assert!(result.is_some(), "matrix lookup failed: from={from}, to={to}");
        result.unwrap_or(0.0)
    }
}

impl TransportCost for TravelTimeTransportCost {
    // Costs depend only on the matrix, so route and departure are ignored.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.duration_seconds(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.duration_seconds(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_seconds(from, to)
    }
}

/// Context for running a `vrp-core` solve with shared settings.
pub(super) struct VrpSolveContext<'a> {
    config: &'a VrpOptimizerConfig,
    max_seconds: usize,
}

impl<'a> VrpSolveContext<'a> {
    /// Create a new solve context bounded by `max_seconds` of search.
    pub(super) const fn new(config: &'a VrpOptimizerConfig, max_seconds: usize) -> Self {
        Self {
            config,
            max_seconds,
        }
    }

    /// Solve `problem`, returning input positions in visiting order.
    ///
    /// A solution that leaves any stop unassigned is reported as an error.
    pub(super) fn solve(&self, problem: &OrderingProblem) -> GenericResult<Vec<usize>> {
        let transport = Arc::new(TravelTimeTransportCost::new(problem));
        let goal = define_goal(transport.clone())?;
        let vrp_problem = Arc::new(define_problem(problem.len(), transport, goal)?);

        let vrp_config = VrpConfigBuilder::new(vrp_problem.clone())
            .prebuild()?
            .with_max_time(Some(self.max_seconds))
            .with_max_generations(Some(self.config.max_generations))
            .build()?;

        let solution = vrp_core::solver::Solver::new(vrp_problem, vrp_config).solve()?;
        if !solution.unassigned.is_empty() {
            return Err(format!("{} stops left unassigned", solution.unassigned.len()).into());
        }

        Ok(solution
            .get_locations()
            .flatten()
            .filter_map(|location| location.checked_sub(1))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use courier_core::TravelMatrix;
    use courier_core::test_support::{delivery_at, depot_at};
    use rstest::rstest;

    #[rstest]
    fn transport_projects_matrix_onto_local_locations() {
        let secs = Duration::from_secs;
        let depot = depot_at(7, 53.8, -1.55);
        let stops = vec![delivery_at(9, 53.81, -1.55), delivery_at(8, 53.82, -1.55)];
        let matrix = TravelMatrix::from_durations(
            vec![8, 7, 9],
            vec![
                vec![secs(0), secs(11), secs(12)],
                vec![secs(21), secs(0), secs(22)],
                vec![secs(31), secs(32), secs(0)],
            ],
        )
        .expect("square grid");
        let problem = OrderingProblem::new(&depot, &stops, &matrix).expect("stops present");
        let transport = TravelTimeTransportCost::new(&problem);

        assert_eq!(transport.duration_seconds(0, 1), 22.0);
        assert_eq!(transport.duration_seconds(0, 2), 21.0);
        assert_eq!(transport.duration_seconds(1, 2), 31.0);
        assert_eq!(transport.duration_seconds(2, 1), 12.0);
    }
}
