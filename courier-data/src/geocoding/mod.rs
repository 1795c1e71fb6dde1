//! Nominatim-backed address geocoding.
//!
//! [`NominatimGeocoder`] implements [`courier_core::GeocodingProvider`] with
//! one `search` request per address, asking for the single best match.
//! Caching and pacing are the caller's concern; wrap the provider in a
//! [`courier_core::Geocoder`] for both.

mod nominatim;
mod provider;

pub use provider::NominatimGeocoder;
