//! OSRM-backed travel matrix retrieval.
//!
//! [`OsrmMatrixProvider`] implements [`courier_core::MatrixProvider`] with
//! one OSRM Table API request per block. Origins and destinations are sent
//! as a single coordinate list with `sources` and `destinations` index
//! lists, asking for both `duration` and `distance` annotations.
//!
//! # Example
//!
//! ```no_run
//! use courier_core::MatrixProvider;
//! use courier_data::routing::OsrmMatrixProvider;
//! use geo::Coord;
//!
//! let provider = OsrmMatrixProvider::new("http://localhost:5000")?;
//! let origins = [Coord { x: -1.55, y: 53.80 }];
//! let destinations = [Coord { x: -1.54, y: 53.81 }, Coord { x: -1.35, y: 53.80 }];
//! let block = provider.fetch_block(&origins, &destinations)?;
//! println!("{:?}", block.durations);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

pub use provider::OsrmMatrixProvider;
