//! Straight-line distances between coordinates.
//!
//! Coordinates follow the `geo` convention: `x` is longitude and `y` is
//! latitude, both in degrees.

use geo::{Coord, Distance, Haversine, Point};

/// Great-circle distance between two coordinates in metres.
///
/// Uses the `geo` haversine measure with its mean Earth radius.
///
/// # Examples
///
/// ```
/// use courier_core::haversine_metres;
/// use geo::Coord;
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// assert!(haversine_metres(origin, origin).abs() < f64::EPSILON);
/// ```
#[must_use]
pub fn haversine_metres(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to))
}
