//! Core domain types for the Courier delivery planner.
//!
//! The crate holds the delivery-assignment-and-ordering pipeline: address
//! normalisation and cached geocoding, the balanced two-vehicle assignment,
//! chunked travel matrix retrieval with fail-soft degradation and the route
//! optimiser contract. External services sit behind traits
//! ([`GeocodingProvider`], [`MatrixProvider`], [`RouteOptimizer`]) so that
//! HTTP adapters and solvers live in sibling crates.
//!
//! Invariants:
//! - Exactly two depots per run.
//! - No global mutable state; caches and request budgets are injected.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod address;
pub mod assign;
pub mod dispatch;
pub mod geocode;
pub mod geodesy;
pub mod matrix;
pub mod optimize;
pub mod pipeline;
pub mod route;
pub mod stop;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use address::normalise_address;
pub use assign::{AssignError, BalancedAssigner, VEHICLE_COUNT};
pub use dispatch::{DispatchError, RequestDispatcher};
pub use geocode::{
    CacheError, GeocodeCache, GeocodeError, Geocoder, GeocodingProvider, MemoryGeocodeCache,
    ResolvedAddress,
};
pub use geodesy::haversine_metres;
pub use matrix::{
    ChunkOutcome, ChunkReport, DEFAULT_CHUNK_SIZE, DegradeReason, DistanceMatrixBuilder,
    MatrixBlock, MatrixBuild, MatrixError, MatrixProvider, TravelMatrix,
};
pub use optimize::{OrderingProblem, RouteOptimizer};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, PlanOutcome, Stage, VehiclePlan};
pub use route::{Leg, VehicleRoute};
pub use stop::{AddressRecord, Stop, StopId};
