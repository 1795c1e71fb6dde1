//! Geocoding collaborator trait.

use geo::Coord;

use super::error::GeocodeError;

/// Look up the coordinate of a free-form address.
///
/// Implementations make at most one external call per invocation and never
/// retry; callers decide whether a failure is fatal.
///
/// # Examples
///
/// ```rust
/// use courier_core::{GeocodeError, GeocodingProvider};
/// use geo::Coord;
///
/// struct Origin;
///
/// impl GeocodingProvider for Origin {
///     fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
///         if address.trim().is_empty() {
///             return Err(GeocodeError::EmptyAddress);
///         }
///         Ok(Coord { x: 0.0, y: 0.0 })
///     }
/// }
///
/// let location = Origin.geocode("Null Island")?;
/// assert_eq!(location, Coord { x: 0.0, y: 0.0 });
/// # Ok::<(), GeocodeError>(())
/// ```
pub trait GeocodingProvider {
    /// Return the location of `address` (`x` = longitude, `y` = latitude).
    fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError>;
}
