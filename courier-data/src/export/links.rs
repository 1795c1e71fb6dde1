//! Google Maps direction links for a route.
//!
//! A single link holds at most [`MAX_ADDRESSES_PER_LINK`] addresses (origin,
//! waypoints and destination). Longer routes are split into segments that
//! overlap by one address so the links chain end to start.

use courier_core::VehicleRoute;
use url::form_urlencoded;

/// Addresses per link, origin and destination included.
pub const MAX_ADDRESSES_PER_LINK: usize = 8;

const DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";

/// Split `addresses` into segments of at most `max` entries overlapping by
/// one. `max` below two is treated as two.
///
/// # Examples
///
/// ```
/// use courier_data::export::split_segments;
///
/// let stops = ["a", "b", "c", "d", "e"];
/// assert_eq!(
///     split_segments(&stops, 3),
///     vec![vec!["a", "b", "c"], vec!["c", "d", "e"]]
/// );
/// ```
#[must_use]
pub fn split_segments<T: Clone>(addresses: &[T], max: usize) -> Vec<Vec<T>> {
    let max = max.max(2);
    if addresses.len() <= max {
        return vec![addresses.to_vec()];
    }
    let step = max - 1;
    let mut segments = Vec::new();
    let mut start = 0;
    while start + 1 < addresses.len() {
        let end = (start + max).min(addresses.len());
        if let Some(segment) = addresses.get(start..end)
            && segment.len() >= 2
        {
            segments.push(segment.to_vec());
        }
        start += step;
    }
    segments
}

fn directions_url(segment: &[&str]) -> Option<String> {
    let (origin, rest) = segment.split_first()?;
    let (destination, waypoints) = rest.split_last()?;
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("api", "1")
        .append_pair("origin", origin)
        .append_pair("destination", destination)
        .append_pair("travelmode", "driving");
    if !waypoints.is_empty() {
        query.append_pair("waypoints", &waypoints.join("|"));
    }
    Some(format!("{DIRECTIONS_URL}?{}", query.finish()))
}

/// Direction links covering the depot followed by every delivery.
///
/// A route without deliveries has no links.
#[must_use]
pub fn map_links(route: &VehicleRoute) -> Vec<String> {
    let addresses: Vec<&str> = route
        .path()
        .map(|stop| stop.raw_address.trim())
        .filter(|address| !address.is_empty())
        .collect();
    if addresses.len() < 2 {
        return Vec::new();
    }
    split_segments(&addresses, MAX_ADDRESSES_PER_LINK)
        .iter()
        .filter_map(|segment| directions_url(segment))
        .collect()
}
