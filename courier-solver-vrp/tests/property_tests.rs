//! Property-based tests for the VRP route optimiser.
//!
//! # Invariants tested
//!
//! - **Permutation:** the result visits every input stop exactly once.
//! - **Never worse:** the result's travel time never exceeds the input order's.
//! - **Zero budget:** a zero time budget returns the input order unchanged.
//! - **Degraded cells:** with random cells degraded the result is still a
//!   permutation and never slower than the input order once degraded cells
//!   carry the penalty time.

use std::time::Duration;

use courier_core::test_support::{delivery_at, depot_at};
use courier_core::{OrderingProblem, RouteOptimizer, Stop, TravelMatrix};
use courier_solver_vrp::{VrpOptimizerConfig, VrpRouteOptimizer};
use proptest::prelude::*;

/// Depot followed by `count` deliveries and a random travel-time grid.
fn scenario_strategy() -> impl Strategy<Value = (Stop, Vec<Stop>, TravelMatrix)> {
    (2_usize..=6).prop_flat_map(|count| {
        let size = count + 1;
        proptest::collection::vec(proptest::collection::vec(1_u64..=900, size), size).prop_map(
            move |grid| {
                let depot = depot_at(0, 53.8, -1.55);
                let stops: Vec<Stop> = (2..)
                    .take(count)
                    .map(|id| delivery_at(id, 53.8, -1.55))
                    .collect();
                let ids = std::iter::once(0).chain(stops.iter().map(|stop| stop.id)).collect();
                let durations = grid
                    .iter()
                    .enumerate()
                    .map(|(row, cells)| {
                        cells
                            .iter()
                            .enumerate()
                            .map(|(col, secs)| {
                                if row == col {
                                    Duration::ZERO
                                } else {
                                    Duration::from_secs(*secs)
                                }
                            })
                            .collect()
                    })
                    .collect();
                let matrix = TravelMatrix::from_durations(ids, durations).expect("square grid");
                (depot, stops, matrix)
            },
        )
    })
}

/// The base scenario with a random subset of off-diagonal cells degraded.
fn degraded_scenario_strategy() -> impl Strategy<Value = (Stop, Vec<Stop>, TravelMatrix)> {
    scenario_strategy().prop_flat_map(|(depot, stops, matrix)| {
        let size = matrix.len();
        proptest::collection::vec(any::<bool>(), size * size).prop_map(move |mask| {
            let mut degraded = matrix.clone();
            let cells = (0..size).flat_map(|row| (0..size).map(move |col| (row, col)));
            for ((row, col), flagged) in cells.zip(mask) {
                if flagged {
                    degraded.mark_degraded(row, col);
                }
            }
            (depot.clone(), stops.clone(), degraded)
        })
    })
}

fn optimizer() -> VrpRouteOptimizer {
    VrpRouteOptimizer::with_config(VrpOptimizerConfig {
        max_generations: 20,
    })
}

fn ids(stops: &[Stop]) -> Vec<u64> {
    stops.iter().map(|stop| stop.id).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: every stop appears exactly once in the optimised order.
    #[test]
    fn result_is_a_permutation((depot, stops, matrix) in scenario_strategy()) {
        let order = optimizer().optimize(&depot, &stops, &matrix, Duration::from_secs(1));
        let mut expected = ids(&stops);
        let mut actual = ids(&order);
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
    }

    /// Property: the optimised order is never slower than the input order.
    #[test]
    fn result_never_increases_travel_time((depot, stops, matrix) in scenario_strategy()) {
        let order = optimizer().optimize(&depot, &stops, &matrix, Duration::from_secs(1));
        let problem = OrderingProblem::new(&depot, &stops, &matrix).expect("stops present");
        let positions: Vec<usize> = order
            .iter()
            .filter_map(|stop| stops.iter().position(|candidate| candidate.id == stop.id))
            .collect();
        prop_assert!(problem.cost(&positions) <= problem.cost(&problem.input_order()));
    }

    /// Property: degraded cells never let the optimiser pick a slower order.
    #[test]
    fn degraded_cells_keep_result_valid((depot, stops, matrix) in degraded_scenario_strategy()) {
        let order = optimizer().optimize(&depot, &stops, &matrix, Duration::from_secs(1));
        let problem = OrderingProblem::new(&depot, &stops, &matrix).expect("stops present");
        let positions: Vec<usize> = order
            .iter()
            .filter_map(|stop| stops.iter().position(|candidate| candidate.id == stop.id))
            .collect();
        prop_assert!(problem.is_permutation(&positions));
        prop_assert!(problem.cost(&positions) <= problem.cost(&problem.input_order()));
    }

    /// Property: a zero budget skips the search entirely.
    #[test]
    fn zero_budget_returns_input_order((depot, stops, matrix) in scenario_strategy()) {
        let order = optimizer().optimize(&depot, &stops, &matrix, Duration::ZERO);
        prop_assert_eq!(ids(&order), ids(&stops));
    }
}
