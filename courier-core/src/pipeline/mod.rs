//! End-to-end planning of a two-vehicle delivery run.
//!
//! [`Pipeline::run`] geocodes depots and deliveries, partitions the
//! deliveries between the two vehicles and then, for both vehicles in
//! parallel, builds a travel matrix and orders the stops. All matrix requests
//! share one [`RequestDispatcher`] so the quota spans both vehicles.

mod error;

use std::panic;
use std::thread;
use std::time::Duration;

use log::{info, warn};

pub use error::{PipelineError, Stage};

use crate::assign::{AssignError, BalancedAssigner, VEHICLE_COUNT};
use crate::dispatch::RequestDispatcher;
use crate::geocode::{GeocodeCache, Geocoder, GeocodingProvider};
use crate::matrix::{
    ChunkReport, DEFAULT_CHUNK_SIZE, DistanceMatrixBuilder, MatrixProvider, TravelMatrix,
};
use crate::optimize::RouteOptimizer;
use crate::route::VehicleRoute;
use crate::stop::{AddressRecord, Stop, StopId};

/// Per-run tuning for the matrix and optimisation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Side of each square matrix chunk.
    pub chunk_size: usize,
    /// Optimiser budget per vehicle.
    pub time_budget: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            time_budget: Duration::from_secs(15),
        }
    }
}

/// Planned route for one vehicle with the data it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePlan {
    /// Ordered route with legs and totals.
    pub route: VehicleRoute,
    /// Matrix over `[depot, stops..]` in assignment order.
    pub matrix: TravelMatrix,
    /// Per-chunk outcomes of the matrix build.
    pub chunks: Vec<ChunkReport>,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    /// One plan per vehicle, ordered by vehicle index.
    pub vehicles: Vec<VehiclePlan>,
    /// Geocoding provider calls issued during the run.
    pub geocoding_lookups: usize,
}

impl PlanOutcome {
    /// Routes in vehicle order.
    pub fn routes(&self) -> impl Iterator<Item = &VehicleRoute> {
        self.vehicles.iter().map(|plan| &plan.route)
    }
}

/// Orchestrates geocoding, assignment, matrix retrieval and ordering.
///
/// # Examples
///
/// ```
/// use courier_core::test_support::{InputOrderOptimizer, StubGeocoder, StubMatrixProvider};
/// use courier_core::{AddressRecord, Geocoder, MemoryGeocodeCache, Pipeline};
/// use geo::Coord;
///
/// let provider = StubGeocoder::default()
///     .with_address("North Depot", Coord { x: -1.55, y: 53.80 })
///     .with_address("South Depot", Coord { x: -1.55, y: 53.70 })
///     .with_address("1 High St", Coord { x: -1.54, y: 53.79 });
/// let geocoder = Geocoder::new(provider, MemoryGeocodeCache::default());
/// let mut pipeline =
///     Pipeline::new(geocoder, StubMatrixProvider::default(), InputOrderOptimizer);
///
/// let depots = [
///     AddressRecord::new("North", "North Depot"),
///     AddressRecord::new("South", "South Depot"),
/// ];
/// let deliveries = [AddressRecord::new("Customer", "1 High St")];
/// let outcome = pipeline.run(&depots, &deliveries)?;
/// assert_eq!(outcome.vehicles.len(), 2);
/// # Ok::<(), courier_core::PipelineError>(())
/// ```
#[derive(Debug)]
pub struct Pipeline<G, C, M, O> {
    geocoder: Geocoder<G, C>,
    matrix_provider: M,
    optimizer: O,
    dispatcher: RequestDispatcher,
    config: PipelineConfig,
}

impl<G, C, M, O> Pipeline<G, C, M, O>
where
    G: GeocodingProvider,
    C: GeocodeCache,
    M: MatrixProvider + Sync,
    O: RouteOptimizer + Sync,
{
    /// Create a pipeline with an unlimited dispatcher and default tuning.
    pub fn new(geocoder: Geocoder<G, C>, matrix_provider: M, optimizer: O) -> Self {
        Self {
            geocoder,
            matrix_provider,
            optimizer,
            dispatcher: RequestDispatcher::unlimited(),
            config: PipelineConfig::default(),
        }
    }

    /// Use `dispatcher` for every matrix request.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: RequestDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Override the matrix and optimisation tuning.
    #[must_use]
    pub const fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Borrow the geocoder.
    pub const fn geocoder(&self) -> &Geocoder<G, C> {
        &self.geocoder
    }

    /// Borrow the shared matrix request dispatcher.
    pub const fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Plan routes for both vehicles.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Assign`] when the depot count is not two,
    /// before any external call, and [`PipelineError::Geocode`] when any
    /// address cannot be resolved. Matrix and optimiser problems degrade the
    /// result instead of failing.
    pub fn run(
        &mut self,
        depots: &[AddressRecord],
        deliveries: &[AddressRecord],
    ) -> Result<PlanOutcome, PipelineError> {
        if depots.len() != VEHICLE_COUNT {
            return Err(AssignError::InvalidDepotCount {
                found: depots.len(),
            }
            .into());
        }
        let lookups_before = self.geocoder.lookups();
        let depot_stops = self.geocode_all(Stage::Depots, depots, 0)?;
        let first_delivery_id = StopId::try_from(depots.len()).unwrap_or(StopId::MAX);
        let delivery_stops = self.geocode_all(Stage::Deliveries, deliveries, first_delivery_id)?;
        let geocoding_lookups = self.geocoder.lookups() - lookups_before;
        info!(
            "geocoded {} addresses with {geocoding_lookups} external lookups",
            depot_stops.len() + delivery_stops.len()
        );

        let routes = BalancedAssigner.assign(&depot_stops, &delivery_stops)?;
        let vehicles = self.plan_vehicles(routes);

        if let Err(err) = self.geocoder.flush_cache() {
            warn!("failed to flush geocode cache: {err}");
        }
        Ok(PlanOutcome {
            vehicles,
            geocoding_lookups,
        })
    }

    fn geocode_all(
        &mut self,
        stage: Stage,
        records: &[AddressRecord],
        first_id: StopId,
    ) -> Result<Vec<Stop>, PipelineError> {
        records
            .iter()
            .zip(first_id..)
            .map(|(record, id)| {
                let resolved = self.geocoder.resolve(&record.address).map_err(|source| {
                    PipelineError::Geocode {
                        stage,
                        name: record.name.clone(),
                        address: record.address.clone(),
                        source,
                    }
                })?;
                Ok(match stage {
                    Stage::Depots => Stop::depot(id, record, resolved),
                    Stage::Deliveries => Stop::delivery(id, record, resolved),
                })
            })
            .collect()
    }

    fn plan_vehicles(&self, routes: [VehicleRoute; VEHICLE_COUNT]) -> Vec<VehiclePlan> {
        let provider = &self.matrix_provider;
        let optimizer = &self.optimizer;
        let dispatcher = &self.dispatcher;
        let config = self.config;
        thread::scope(|scope| {
            let handles: Vec<_> = routes
                .into_iter()
                .map(|route| {
                    scope.spawn(move || {
                        plan_vehicle(route, provider, optimizer, dispatcher, config)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| panic::resume_unwind(payload))
                })
                .collect()
        })
    }
}

fn plan_vehicle<M, O>(
    mut route: VehicleRoute,
    provider: &M,
    optimizer: &O,
    dispatcher: &RequestDispatcher,
    config: PipelineConfig,
) -> VehiclePlan
where
    M: MatrixProvider,
    O: RouteOptimizer,
{
    let build = DistanceMatrixBuilder::new(provider, dispatcher)
        .with_chunk_size(config.chunk_size)
        .build(&route.path_stops());
    let ordered = optimizer.optimize(
        &route.depot,
        &route.stops,
        &build.matrix,
        config.time_budget,
    );
    route.apply_order(ordered, &build.matrix);
    info!(
        "vehicle {}: {} stops, {:.1} km, {} min{}",
        route.vehicle + 1,
        route.stops.len(),
        route.total_distance_metres / 1_000.0,
        route.total_duration.as_secs() / 60,
        if route.has_degraded_legs() {
            " (degraded legs present)"
        } else {
            ""
        }
    );
    VehiclePlan {
        route,
        matrix: build.matrix,
        chunks: build.reports,
    }
}
