//! Resolve addresses to coordinates with a persistent cache.
//!
//! [`Geocoder`] normalises an address, consults a [`GeocodeCache`] and only
//! falls back to the external [`GeocodingProvider`] on a miss, writing the
//! result back before returning so an interrupted run still benefits later
//! runs.

mod cache;
mod error;
mod provider;
mod resolver;

pub use cache::{CacheError, GeocodeCache, MemoryGeocodeCache};
pub use error::GeocodeError;
pub use provider::GeocodingProvider;
pub use resolver::{Geocoder, ResolvedAddress};
