//! Blocking [`GeocodingProvider`] over the Nominatim search API.

use courier_core::{GeocodeError, GeocodingProvider};
use geo::Coord;
use log::debug;
use url::Url;

use super::nominatim::SearchHit;
use crate::http::{BlockingClient, HttpProviderConfig, ProviderBuildError, TransportFailure, classify};

/// Geocoder backed by a Nominatim server.
///
/// # Example
///
/// ```no_run
/// use courier_core::GeocodingProvider;
/// use courier_data::NominatimGeocoder;
///
/// let geocoder = NominatimGeocoder::new("https://nominatim.openstreetmap.org")?;
/// let location = geocoder.geocode("Vitosha Blvd 15, Sofia")?;
/// println!("{}, {}", location.y, location.x);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct NominatimGeocoder {
    http: BlockingClient,
    config: HttpProviderConfig,
    search_url: Url,
}

impl NominatimGeocoder {
    /// Create a geocoder for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let http = BlockingClient::build(&config)?;
        let raw = format!("{}/search", config.trimmed_base_url());
        let search_url =
            Url::parse(&raw).map_err(|source| ProviderBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        Ok(Self {
            http,
            config,
            search_url,
        })
    }

    fn build_search_url(&self, address: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        url
    }

    async fn geocode_async(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        let url = self.build_search_url(address);
        debug!("geocoding {address:?}");

        let response = self
            .http
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;

        let hits: Vec<SearchHit> =
            response
                .json()
                .await
                .map_err(|err| GeocodeError::ParseError {
                    message: err.to_string(),
                })?;

        convert_hits(address, hits)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> GeocodeError {
        match classify(error) {
            TransportFailure::Timeout => GeocodeError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            },
            TransportFailure::Status(status) => GeocodeError::HttpError {
                url: url.to_owned(),
                status,
                message: error.to_string(),
            },
            TransportFailure::Network => GeocodeError::NetworkError {
                url: url.to_owned(),
                message: error.to_string(),
            },
        }
    }
}

fn convert_hits(address: &str, hits: Vec<SearchHit>) -> Result<Coord<f64>, GeocodeError> {
    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NoResult {
            address: address.to_owned(),
        })?;
    let y = parse_degrees(&hit.lat, "lat")?;
    let x = parse_degrees(&hit.lon, "lon")?;
    Ok(Coord { x, y })
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| GeocodeError::ParseError {
            message: format!("invalid {field} value {raw:?}"),
        })
}

impl GeocodingProvider for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        self.http.block_on(self.geocode_async(address))
    }
}
