//! Data access adapters for the Courier engine.
//!
//! Responsibilities:
//! - Load depot and delivery address lists from CSV.
//! - Talk to the Nominatim geocoder and the OSRM Table service over HTTP.
//! - Persist the geocode cache as a JSON file.
//! - Export planned routes as CSV files, text summaries and map links.
//!
//! Boundaries:
//! - Do not encode planning rules (those live in `courier-core`).
//! - Present synchronous provider traits; async HTTP stays internal.
//!
//! Invariants:
//! - No global mutable state.
//! - Files are replaced atomically, never truncated in place.

#![forbid(unsafe_code)]

pub mod cache;
pub mod export;
pub mod geocoding;
pub mod http;
pub mod input;
pub mod routing;

pub use cache::JsonFileGeocodeCache;
pub use export::ExportError;
pub use geocoding::NominatimGeocoder;
pub use http::{HttpProviderConfig, ProviderBuildError};
pub use input::{InputError, load_address_records};
pub use routing::OsrmMatrixProvider;
