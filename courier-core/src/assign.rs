//! Balanced nearest-neighbour partition of deliveries between two vehicles.

use std::cmp::Ordering;

use geo::Coord;
use log::debug;
use thiserror::Error;

use crate::geodesy::haversine_metres;
use crate::route::VehicleRoute;
use crate::stop::Stop;

/// Number of vehicles in every run.
pub const VEHICLE_COUNT: usize = 2;

/// Errors from [`BalancedAssigner::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssignError {
    /// The run requires exactly two depots.
    #[error("exactly {VEHICLE_COUNT} depots are required, found {found}")]
    InvalidDepotCount {
        /// Depots supplied.
        found: usize,
    },
}

/// Greedy assignment that keeps both vehicles within one stop of each other.
///
/// Each vehicle keeps a tail, initially its depot. On every step the globally
/// closest `(delivery, vehicle)` pair by haversine distance is chosen among
/// vehicles below the load cap `ceil(N / 2)`; the delivery is appended and the
/// vehicle's tail moves to it. Ties prefer the lower delivery input index,
/// then the vehicle with fewer stops, then the lower vehicle index.
///
/// # Examples
///
/// ```
/// use courier_core::{AssignError, BalancedAssigner};
///
/// let err = BalancedAssigner.assign(&[], &[]).expect_err("no depots");
/// assert_eq!(err, AssignError::InvalidDepotCount { found: 0 });
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct BalancedAssigner;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    delivery: usize,
    load: usize,
    vehicle: usize,
}

impl Candidate {
    fn cmp_priority(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.delivery.cmp(&other.delivery))
            .then(self.load.cmp(&other.load))
            .then(self.vehicle.cmp(&other.vehicle))
    }
}

impl BalancedAssigner {
    /// Partition `deliveries` between the vehicles starting at `depots`.
    ///
    /// Routes carry stops in assignment order with no legs computed.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::InvalidDepotCount`] unless exactly two depots
    /// are supplied.
    pub fn assign(
        &self,
        depots: &[Stop],
        deliveries: &[Stop],
    ) -> Result<[VehicleRoute; VEHICLE_COUNT], AssignError> {
        let [first, second] = depots else {
            return Err(AssignError::InvalidDepotCount {
                found: depots.len(),
            });
        };
        let mut routes = [
            VehicleRoute::unordered(0, first.clone()),
            VehicleRoute::unordered(1, second.clone()),
        ];
        let cap = deliveries.len().div_ceil(VEHICLE_COUNT);
        let mut tails: [Coord<f64>; VEHICLE_COUNT] = [first.location, second.location];
        let mut assigned = vec![false; deliveries.len()];

        for _ in 0..deliveries.len() {
            let Some(best) = select_next(deliveries, &assigned, &routes, &tails, cap) else {
                break;
            };
            let (Some(stop), Some(route), Some(flag), Some(tail)) = (
                deliveries.get(best.delivery),
                routes.get_mut(best.vehicle),
                assigned.get_mut(best.delivery),
                tails.get_mut(best.vehicle),
            ) else {
                break;
            };
            *flag = true;
            *tail = stop.location;
            route.stops.push(stop.clone());
        }

        debug!(
            "assigned {} deliveries: vehicle 1 has {}, vehicle 2 has {}",
            deliveries.len(),
            routes[0].stops.len(),
            routes[1].stops.len()
        );
        Ok(routes)
    }
}

/// Closest unassigned `(delivery, vehicle)` pair among vehicles below `cap`.
fn select_next(
    deliveries: &[Stop],
    assigned: &[bool],
    routes: &[VehicleRoute],
    tails: &[Coord<f64>],
    cap: usize,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let open = deliveries
        .iter()
        .zip(assigned)
        .enumerate()
        .filter(|(_, (_, done))| !**done);
    for (delivery, (stop, _)) in open {
        for (route, tail) in routes.iter().zip(tails) {
            if route.stops.len() >= cap {
                continue;
            }
            let candidate = Candidate {
                distance: haversine_metres(*tail, stop.location),
                delivery,
                load: route.stops.len(),
                vehicle: route.vehicle,
            };
            if best.is_none_or(|current| candidate.cmp_priority(&current).is_lt()) {
                best = Some(candidate);
            }
        }
    }
    best
}
