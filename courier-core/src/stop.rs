//! Stops participating in a delivery run.

use geo::Coord;

use crate::geocode::ResolvedAddress;

/// Identifier of a stop within a single run.
pub type StopId = u64;

/// An address line supplied by the input collaborator.
///
/// # Examples
///
/// ```
/// use courier_core::AddressRecord;
///
/// let record = AddressRecord::new("Warehouse", "1 Dock Road, Leeds");
/// assert_eq!(record.name, "Warehouse");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    /// Display label for the stop.
    pub name: String,
    /// Free-form address text to geocode.
    pub address: String,
}

impl AddressRecord {
    /// Construct a record from a display name and address.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// A geocoded address taking part in a route, either a depot or a delivery.
///
/// Stops are immutable once geocoded. The normalised address is retained so
/// that later stages can correlate a stop with its cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Identifier unique within the run.
    pub id: StopId,
    /// Display label.
    pub name: String,
    /// Address text as supplied.
    pub raw_address: String,
    /// Cache key derived from the raw address.
    pub normalised_address: String,
    /// Geographic position (`x` = longitude, `y` = latitude).
    pub location: Coord<f64>,
    /// Whether this stop is a vehicle's origin.
    pub is_depot: bool,
}

impl Stop {
    /// Build a depot stop from an input record and its geocoding result.
    #[must_use]
    pub fn depot(id: StopId, record: &AddressRecord, resolved: ResolvedAddress) -> Self {
        Self::from_record(id, record, resolved, true)
    }

    /// Build a delivery stop from an input record and its geocoding result.
    #[must_use]
    pub fn delivery(id: StopId, record: &AddressRecord, resolved: ResolvedAddress) -> Self {
        Self::from_record(id, record, resolved, false)
    }

    fn from_record(
        id: StopId,
        record: &AddressRecord,
        resolved: ResolvedAddress,
        is_depot: bool,
    ) -> Self {
        Self {
            id,
            name: record.name.clone(),
            raw_address: record.address.clone(),
            normalised_address: resolved.normalised_address,
            location: resolved.location,
            is_depot,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }
}
