//! Test helpers for composing plan inputs and stubbed collaborators.

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::test_support::{InputOrderOptimizer, StubGeocoder, StubMatrixProvider};
use courier_data::JsonFileGeocodeCache;
use geo::Coord;
use tempfile::TempDir;
use time::{Date, Month};

use crate::CliError;
use crate::plan::{PlanCollaborators, PlanConfig};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture file");
}

pub(super) fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace")
}

/// Fixed planning date so route file names are predictable.
pub(super) fn plan_date() -> Date {
    Date::from_calendar_date(2026, Month::March, 14).expect("valid date")
}

pub(super) const DEPOTS_CSV: &[u8] = b"name,address\n\
North,1 Dock Road\n\
South,2 Quay Street\n";

pub(super) const THREE_DEPOTS_CSV: &[u8] = b"name,address\n\
North,1 Dock Road\n\
South,2 Quay Street\n\
East,3 Mill Lane\n";

pub(super) const DELIVERIES_CSV: &[u8] = b"name,address\n\
Alpha,10 High Street\n\
Bravo,11 Low Road\n\
Charlie,12 High Street\n\
Delta,13 Low Road\n";

/// Geocoder knowing every address used by [`DEPOTS_CSV`],
/// [`THREE_DEPOTS_CSV`] and [`DELIVERIES_CSV`].
pub(super) fn known_addresses() -> StubGeocoder {
    let at = |lat: f64, lon: f64| Coord { x: lon, y: lat };
    StubGeocoder::default()
        .with_address("1 Dock Road", at(53.80, -1.55))
        .with_address("2 Quay Street", at(53.80, -1.35))
        .with_address("3 Mill Lane", at(53.90, -1.45))
        .with_address("10 High Street", at(53.81, -1.55))
        .with_address("11 Low Road", at(53.81, -1.35))
        .with_address("12 High Street", at(53.82, -1.55))
        .with_address("13 Low Road", at(53.82, -1.35))
}

/// Stub geocoder, the real JSON cache, straight-line matrices and input
/// ordering.
#[derive(Debug, Clone)]
pub(super) struct StubCollaborators {
    pub(super) geocoder: StubGeocoder,
}

impl PlanCollaborators for StubCollaborators {
    type Geocoding = StubGeocoder;
    type Cache = JsonFileGeocodeCache;
    type Matrix = StubMatrixProvider;
    type Optimizer = InputOrderOptimizer;

    fn geocoding(&self, _config: &PlanConfig) -> Result<Self::Geocoding, CliError> {
        Ok(self.geocoder.clone())
    }

    fn cache(&self, config: &PlanConfig) -> Result<Self::Cache, CliError> {
        JsonFileGeocodeCache::load(config.cache_path.clone()).map_err(CliError::OpenCache)
    }

    fn matrix(&self, _config: &PlanConfig) -> Result<Self::Matrix, CliError> {
        Ok(StubMatrixProvider::default())
    }

    fn optimizer(&self, _config: &PlanConfig) -> Self::Optimizer {
        InputOrderOptimizer
    }
}
