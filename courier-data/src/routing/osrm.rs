//! OSRM Table service response types.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#table-service>

use serde::Deserialize;

/// Cell values as returned by OSRM; `None` when no route exists.
pub type TableRows = Vec<Vec<Option<f64>>>;

/// OSRM Table API response.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    /// Status code, `"Ok"` on success.
    pub code: String,

    /// Error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Travel times in seconds, one row per source.
    pub durations: Option<TableRows>,

    /// Travel distances in metres, one row per source.
    pub distances: Option<TableRows>,
}

impl TableResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}
