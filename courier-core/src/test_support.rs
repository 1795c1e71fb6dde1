//! Deterministic collaborators for unit and behaviour tests.
//!
//! Available to dependants through the `test-support` feature.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use geo::Coord;

use crate::{
    GeocodeError, GeocodingProvider, MatrixBlock, MatrixError, MatrixProvider, RouteOptimizer,
    Stop, StopId, TravelMatrix, haversine_metres, normalise_address,
};

/// Travel speed used by [`StubMatrixProvider`], in metres per second.
pub const STUB_SPEED_METRES_PER_SECOND: f64 = 10.0;

fn stop_at(id: StopId, latitude: f64, longitude: f64, is_depot: bool) -> Stop {
    let label = if is_depot { "Depot" } else { "Stop" };
    let address = format!("{label} {id}");
    Stop {
        id,
        name: format!("{label}_{id}"),
        normalised_address: normalise_address(&address),
        raw_address: address,
        location: Coord {
            x: longitude,
            y: latitude,
        },
        is_depot,
    }
}

/// A depot stop at the given position.
#[must_use]
pub fn depot_at(id: StopId, latitude: f64, longitude: f64) -> Stop {
    stop_at(id, latitude, longitude, true)
}

/// A delivery stop at the given position.
#[must_use]
pub fn delivery_at(id: StopId, latitude: f64, longitude: f64) -> Stop {
    stop_at(id, latitude, longitude, false)
}

/// Geocoder answering from a fixed table and counting calls.
///
/// Addresses are matched after normalisation; unknown addresses yield
/// [`GeocodeError::NoResult`].
#[derive(Debug, Clone, Default)]
pub struct StubGeocoder {
    entries: BTreeMap<String, Coord<f64>>,
    calls: Arc<AtomicUsize>,
}

impl StubGeocoder {
    /// Register `address` at `location`.
    #[must_use]
    pub fn with_address(mut self, address: &str, location: Coord<f64>) -> Self {
        self.entries.insert(normalise_address(address), location);
        self
    }

    /// Shared counter of `geocode` calls, usable after the stub is moved.
    #[must_use]
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl GeocodingProvider for StubGeocoder {
    fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .get(&normalise_address(address))
            .copied()
            .ok_or_else(|| GeocodeError::NoResult {
                address: address.to_owned(),
            })
    }
}

/// Matrix provider deriving values from straight-line distance.
///
/// Distances are haversine metres and durations assume
/// [`STUB_SPEED_METRES_PER_SECOND`]. Specific calls, origins or pairs can be
/// configured to fail.
#[derive(Debug, Default)]
pub struct StubMatrixProvider {
    failing_calls: BTreeSet<usize>,
    failing_origins: Vec<Coord<f64>>,
    unreachable: Vec<(Coord<f64>, Coord<f64>)>,
    calls: AtomicUsize,
}

impl StubMatrixProvider {
    /// Fail the zero-based calls listed in `calls`.
    #[must_use]
    pub fn failing_on(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_calls.extend(calls);
        self
    }

    /// Fail every request whose origins include `origin`.
    #[must_use]
    pub fn failing_from(mut self, origin: Coord<f64>) -> Self {
        self.failing_origins.push(origin);
        self
    }

    /// Report the pair `from → to` as unroutable.
    #[must_use]
    pub fn unreachable_between(mut self, from: Coord<f64>, to: Coord<f64>) -> Self {
        self.unreachable.push((from, to));
        self
    }

    /// Requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn cell(&self, from: Coord<f64>, to: Coord<f64>) -> (Option<Duration>, Option<f64>) {
        if self.unreachable.contains(&(from, to)) {
            return (None, None);
        }
        let metres = haversine_metres(from, to);
        let seconds = (metres / STUB_SPEED_METRES_PER_SECOND).max(1.0);
        (Some(Duration::from_secs_f64(seconds)), Some(metres))
    }
}

impl MatrixProvider for StubMatrixProvider {
    fn fetch_block(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<MatrixBlock, MatrixError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let failing_origin = origins
            .iter()
            .any(|origin| self.failing_origins.contains(origin));
        if self.failing_calls.contains(&call) || failing_origin {
            return Err(MatrixError::NetworkError {
                url: "http://stub.invalid/table".to_owned(),
                message: format!("stubbed failure on call {call}"),
            });
        }
        let mut block = MatrixBlock::default();
        for origin in origins {
            let (durations, distances): (Vec<_>, Vec<_>) = destinations
                .iter()
                .map(|destination| self.cell(*origin, *destination))
                .unzip();
            block.durations.push(durations);
            block.distances.push(distances);
        }
        Ok(block)
    }
}

/// Optimiser that keeps the assignment order.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputOrderOptimizer;

impl RouteOptimizer for InputOrderOptimizer {
    fn optimize(
        &self,
        _depot: &Stop,
        stops: &[Stop],
        _matrix: &TravelMatrix,
        _time_budget: Duration,
    ) -> Vec<Stop> {
        stops.to_vec()
    }
}
