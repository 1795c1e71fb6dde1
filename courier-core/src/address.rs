//! Address normalisation shared by the geocoder and its cache.

/// Normalise an address into the key used by the geocode cache.
///
/// Leading and trailing whitespace is removed, internal runs of whitespace
/// collapse to a single space and the text is lower-cased, so addresses that
/// only differ in formatting map to the same key.
///
/// # Examples
///
/// ```
/// use courier_core::normalise_address;
///
/// assert_eq!(
///     normalise_address("  12 High   Street,\tLONDON "),
///     "12 high street, london"
/// );
/// ```
#[must_use]
pub fn normalise_address(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
