//! Travel distance and time matrices assembled from chunked provider calls.
//!
//! A [`MatrixProvider`] answers one rectangular block of origin/destination
//! pairs per call. [`DistanceMatrixBuilder`] tiles an `M×M` grid into square
//! chunks, issues one call per chunk through a shared
//! [`RequestDispatcher`](crate::RequestDispatcher) and degrades failing
//! chunks to zero values instead of failing the build.

mod builder;
mod error;
mod provider;
mod travel_matrix;

pub use builder::{
    ChunkOutcome, ChunkReport, DEFAULT_CHUNK_SIZE, DegradeReason, DistanceMatrixBuilder,
    MatrixBuild, chunk_count,
};
pub use error::MatrixError;
pub use provider::{MatrixBlock, MatrixProvider};
pub use travel_matrix::TravelMatrix;
