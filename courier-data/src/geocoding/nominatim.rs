//! Nominatim `search` response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use serde::Deserialize;

/// One `jsonv2` search hit. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
pub struct SearchHit {
    /// Latitude in decimal degrees.
    pub lat: String,
    /// Longitude in decimal degrees.
    pub lon: String,
    /// Formatted address of the match.
    #[serde(default)]
    pub display_name: Option<String>,
}
