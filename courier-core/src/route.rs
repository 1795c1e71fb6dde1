//! Per-vehicle routes and the legs between consecutive stops.

use std::time::Duration;

use crate::matrix::TravelMatrix;
use crate::stop::{Stop, StopId};

/// Travel between two consecutive stops of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    /// Stop the leg departs from.
    pub from: StopId,
    /// Stop the leg arrives at.
    pub to: StopId,
    /// Driving distance in metres.
    pub distance_metres: f64,
    /// Driving time.
    pub duration: Duration,
    /// Whether the values come from a degraded matrix cell.
    pub degraded: bool,
}

/// A vehicle's open path: depot first, then its deliveries in order.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRoute {
    /// Zero-based vehicle index.
    pub vehicle: usize,
    /// The vehicle's origin.
    pub depot: Stop,
    /// Deliveries in visiting order.
    pub stops: Vec<Stop>,
    /// One leg per consecutive pair of `[depot, stops..]`.
    pub legs: Vec<Leg>,
    /// Sum of leg distances in metres.
    pub total_distance_metres: f64,
    /// Sum of leg durations.
    pub total_duration: Duration,
}

impl VehicleRoute {
    /// A route with no deliveries and no legs.
    #[must_use]
    pub const fn unordered(vehicle: usize, depot: Stop) -> Self {
        Self {
            vehicle,
            depot,
            stops: Vec::new(),
            legs: Vec::new(),
            total_distance_metres: 0.0,
            total_duration: Duration::ZERO,
        }
    }

    /// Replace the stop order and recompute legs and totals from `matrix`.
    ///
    /// A pair missing from the matrix yields a zero leg flagged as degraded.
    pub fn apply_order(&mut self, ordered: Vec<Stop>, matrix: &TravelMatrix) {
        self.stops = ordered;
        let path: Vec<&Stop> = std::iter::once(&self.depot).chain(&self.stops).collect();
        self.legs = path
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some(leg_between(from, to, matrix)),
                _ => None,
            })
            .collect();
        self.total_distance_metres = self.legs.iter().map(|leg| leg.distance_metres).sum();
        self.total_duration = self.legs.iter().map(|leg| leg.duration).sum();
    }

    /// Depot followed by the deliveries.
    pub fn path(&self) -> impl Iterator<Item = &Stop> {
        std::iter::once(&self.depot).chain(&self.stops)
    }

    /// Depot followed by the deliveries, as owned values.
    #[must_use]
    pub fn path_stops(&self) -> Vec<Stop> {
        self.path().cloned().collect()
    }

    /// Whether any leg uses degraded matrix values.
    #[must_use]
    pub fn has_degraded_legs(&self) -> bool {
        self.legs.iter().any(|leg| leg.degraded)
    }
}

fn leg_between(from: &Stop, to: &Stop, matrix: &TravelMatrix) -> Leg {
    let cell = matrix
        .index_of(from.id)
        .zip(matrix.index_of(to.id))
        .and_then(|(i, j)| {
            Some((
                matrix.distance(i, j)?,
                matrix.duration(i, j)?,
                matrix.is_degraded(i, j),
            ))
        });
    let (distance_metres, duration, degraded) = cell.unwrap_or((0.0, Duration::ZERO, true));
    Leg {
        from: from.id,
        to: to.id,
        distance_metres,
        duration,
        degraded,
    }
}
