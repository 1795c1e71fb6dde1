//! Facade crate for the Courier delivery planner.
//!
//! This crate re-exports the core planning types and exposes the HTTP
//! collaborators and the `vrp-core` optimiser behind feature flags.

#![forbid(unsafe_code)]

pub use courier_core::{
    AddressRecord, AssignError, BalancedAssigner, CacheError, ChunkOutcome, ChunkReport,
    DegradeReason, DistanceMatrixBuilder, GeocodeCache, GeocodeError, Geocoder, GeocodingProvider,
    Leg, MatrixBlock, MatrixError, MatrixProvider, MemoryGeocodeCache, Pipeline, PipelineConfig,
    PipelineError, PlanOutcome, RequestDispatcher, RouteOptimizer, Stop, TravelMatrix,
    VehiclePlan, VehicleRoute,
};

#[cfg(feature = "http")]
pub use courier_data::{
    ExportError, InputError, JsonFileGeocodeCache, NominatimGeocoder, OsrmMatrixProvider,
    load_address_records,
};

#[cfg(feature = "solver-vrp")]
pub use courier_solver_vrp::{VrpOptimizerConfig, VrpRouteOptimizer};
