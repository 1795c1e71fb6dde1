//! Route ordering contract and the open-path problem it solves.
//!
//! A [`RouteOptimizer`] orders one vehicle's stops to minimise the summed
//! travel time of the open path starting at the depot. Implementations
//! build an [`OrderingProblem`], hand it to a solver and let
//! [`OrderingProblem::accept`] decide between the solver's order and the
//! input order.

use std::time::Duration;

use log::{debug, warn};

use crate::matrix::TravelMatrix;
use crate::stop::Stop;

/// Order a vehicle's stops within a time budget.
///
/// Optimisers never fail: any internal problem yields the input order.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use courier_core::{RouteOptimizer, Stop, TravelMatrix};
///
/// struct Reverse;
///
/// impl RouteOptimizer for Reverse {
///     fn optimize(
///         &self,
///         _depot: &Stop,
///         stops: &[Stop],
///         _matrix: &TravelMatrix,
///         _time_budget: Duration,
///     ) -> Vec<Stop> {
///         stops.iter().rev().cloned().collect()
///     }
/// }
///
/// let matrix = TravelMatrix::zeroed(Vec::new());
/// # let depot = courier_core::Stop {
/// #     id: 0,
/// #     name: "Depot".into(),
/// #     raw_address: "1 Dock Road".into(),
/// #     normalised_address: "1 dock road".into(),
/// #     location: geo::Coord { x: 0.0, y: 0.0 },
/// #     is_depot: true,
/// # };
/// assert!(Reverse.optimize(&depot, &[], &matrix, Duration::ZERO).is_empty());
/// ```
pub trait RouteOptimizer {
    /// Return `stops` in visiting order after `depot`.
    ///
    /// The result is always a permutation of `stops`.
    fn optimize(
        &self,
        depot: &Stop,
        stops: &[Stop],
        matrix: &TravelMatrix,
        time_budget: Duration,
    ) -> Vec<Stop>;
}

/// Open-path ordering problem over a penalised duration matrix.
///
/// Positions `0..len()` refer to the input stops in order; each maps to a
/// matrix index via [`OrderingProblem::stop_indices`].
#[derive(Debug, Clone)]
pub struct OrderingProblem {
    stops: Vec<Stop>,
    depot_index: usize,
    stop_indices: Vec<usize>,
    durations: Vec<Vec<Duration>>,
}

impl OrderingProblem {
    /// Build the problem, or `None` when a stop is absent from `matrix`.
    #[must_use]
    pub fn new(depot: &Stop, stops: &[Stop], matrix: &TravelMatrix) -> Option<Self> {
        let depot_index = matrix.index_of(depot.id)?;
        let stop_indices = stops
            .iter()
            .map(|stop| matrix.index_of(stop.id))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            stops: stops.to_vec(),
            depot_index,
            stop_indices,
            durations: matrix.penalised_durations(),
        })
    }

    /// Whether optimisation is worthwhile for `stops` within `time_budget`.
    #[must_use]
    pub const fn is_trivial(stops: &[Stop], time_budget: Duration) -> bool {
        stops.len() < 2 || time_budget.is_zero()
    }

    /// Number of stops to order.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether there is nothing to order.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Matrix index of the depot.
    #[must_use]
    pub const fn depot_index(&self) -> usize {
        self.depot_index
    }

    /// Matrix index of each input stop.
    #[must_use]
    pub fn stop_indices(&self) -> &[usize] {
        &self.stop_indices
    }

    /// Penalised travel time between matrix indices.
    #[must_use]
    pub fn duration(&self, from: usize, to: usize) -> Duration {
        self.durations
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(Duration::MAX)
    }

    /// Summed travel time of visiting `order` (input positions) after the
    /// depot.
    #[must_use]
    pub fn cost(&self, order: &[usize]) -> Duration {
        let mut current = self.depot_index;
        let mut total = Duration::ZERO;
        for position in order {
            let next = self
                .stop_indices
                .get(*position)
                .copied()
                .unwrap_or(usize::MAX);
            total = total.saturating_add(self.duration(current, next));
            current = next;
        }
        total
    }

    /// Whether `order` visits every input position exactly once.
    #[must_use]
    pub fn is_permutation(&self, order: &[usize]) -> bool {
        let mut seen = vec![false; self.stops.len()];
        order.len() == self.stops.len()
            && order.iter().all(|position| {
                seen.get_mut(*position)
                    .is_some_and(|flag| !std::mem::replace(flag, true))
            })
    }

    /// Input positions in their original order.
    #[must_use]
    pub fn input_order(&self) -> Vec<usize> {
        (0..self.stops.len()).collect()
    }

    /// Keep `candidate` only if it is a permutation strictly cheaper than the
    /// input order; otherwise return the input order.
    #[must_use]
    pub fn accept(&self, candidate: Option<Vec<usize>>) -> Vec<Stop> {
        let baseline = self.cost(&self.input_order());
        match candidate {
            Some(order) if !self.is_permutation(&order) => {
                warn!("optimiser returned an invalid order; keeping input order");
                self.stops.clone()
            }
            Some(order) => {
                let cost = self.cost(&order);
                if cost < baseline {
                    debug!(
                        "optimised order improves travel time from {}s to {}s",
                        baseline.as_secs(),
                        cost.as_secs()
                    );
                    self.resolve(&order)
                } else {
                    self.stops.clone()
                }
            }
            None => self.stops.clone(),
        }
    }

    fn resolve(&self, order: &[usize]) -> Vec<Stop> {
        order
            .iter()
            .filter_map(|position| self.stops.get(*position).cloned())
            .collect()
    }
}
