//! Blocking [`MatrixProvider`] over the OSRM Table API.

use std::time::Duration;

use courier_core::{MatrixBlock, MatrixError, MatrixProvider};
use geo::Coord;
use log::debug;

use super::osrm::{TableResponse, TableRows};
use crate::http::{BlockingClient, HttpProviderConfig, ProviderBuildError, TransportFailure, classify};

/// Travel matrix provider backed by an OSRM server.
///
/// The provider owns a Tokio runtime reused across calls; see
/// [`crate::http`] for how calls made from inside a runtime are handled.
#[derive(Debug)]
pub struct OsrmMatrixProvider {
    http: BlockingClient,
    config: HttpProviderConfig,
}

impl OsrmMatrixProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let http = BlockingClient::build(&config)?;
        Ok(Self { http, config })
    }

    /// Build the Table API URL.
    ///
    /// Coordinates are `lon,lat` pairs; origins come first and are listed as
    /// `sources`, destinations follow and are listed as `destinations`.
    fn build_table_url(&self, origins: &[Coord<f64>], destinations: &[Coord<f64>]) -> String {
        let coords = origins
            .iter()
            .chain(destinations)
            .map(|coord| format!("{},{}", coord.x, coord.y))
            .collect::<Vec<_>>()
            .join(";");
        let sources = index_list(0..origins.len());
        let targets = index_list(origins.len()..origins.len() + destinations.len());
        format!(
            "{}/table/v1/driving/{coords}?sources={sources}&destinations={targets}\
             &annotations=duration,distance",
            self.config.trimmed_base_url()
        )
    }

    async fn fetch_block_async(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<MatrixBlock, MatrixError> {
        let url = self.build_table_url(origins, destinations);
        debug!(
            "requesting {}x{} travel matrix block",
            origins.len(),
            destinations.len()
        );

        let response = self
            .http
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let table: TableResponse =
            response
                .json()
                .await
                .map_err(|err| MatrixError::ParseError {
                    message: err.to_string(),
                })?;

        convert_response(table)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> MatrixError {
        match classify(error) {
            TransportFailure::Timeout => MatrixError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            },
            TransportFailure::Status(status) => MatrixError::HttpError {
                url: url.to_owned(),
                status,
                message: error.to_string(),
            },
            TransportFailure::Network => MatrixError::NetworkError {
                url: url.to_owned(),
                message: error.to_string(),
            },
        }
    }
}

fn index_list(range: std::ops::Range<usize>) -> String {
    range
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

/// Convert an OSRM response into a block, mapping invalid cells to `None`.
fn convert_response(response: TableResponse) -> Result<MatrixBlock, MatrixError> {
    if !response.is_ok() {
        return Err(MatrixError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let durations = response
        .durations
        .ok_or_else(|| missing_annotation("durations"))?;
    let distances = response
        .distances
        .ok_or_else(|| missing_annotation("distances"))?;

    Ok(MatrixBlock {
        durations: map_cells(durations, |secs| Duration::try_from_secs_f64(secs).ok()),
        distances: map_cells(distances, Some),
    })
}

fn missing_annotation(name: &str) -> MatrixError {
    MatrixError::ParseError {
        message: format!("OSRM response missing {name} array"),
    }
}

/// Negative, NaN and infinite values, and values `convert` rejects, become
/// `None`.
fn map_cells<T>(
    rows: TableRows,
    convert: impl Fn(f64) -> Option<T> + Copy,
) -> Vec<Vec<Option<T>>> {
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| {
                    cell.filter(|v| *v >= 0.0 && v.is_finite())
                        .and_then(convert)
                })
                .collect()
        })
        .collect()
}

impl MatrixProvider for OsrmMatrixProvider {
    /// Fetch one block of the travel matrix.
    ///
    /// # Runtime requirements
    ///
    /// Inside an existing Tokio runtime the runtime must be multi-threaded;
    /// inside a `current_thread` runtime the provider falls back to its own
    /// runtime, which may deadlock if the caller's runtime drives I/O this
    /// request depends on.
    fn fetch_block(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<MatrixBlock, MatrixError> {
        if origins.is_empty() || destinations.is_empty() {
            return Ok(MatrixBlock::default());
        }
        self.http
            .block_on(self.fetch_block_async(origins, destinations))
    }
}
