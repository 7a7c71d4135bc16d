//! Parsing of KML `<coordinates>` text.
//!
//! The text is a whitespace-separated list of tuples, each tuple being
//! `lng,lat[,alt]`. Tuples that cannot be read are dropped one by one rather
//! than failing the surrounding element.

use fieldmap_geo::Coordinate;

/// Parse a coordinate list, dropping malformed tuples.
///
/// # Example
/// ```
/// use fieldmap_kmz::parse_coordinates;
///
/// let coords = parse_coordinates("20.0,10.0,5 notanumber,20 21.0,11.0");
/// assert_eq!(coords.len(), 2);
/// assert_eq!(coords[0].lat, 10.0);
/// assert_eq!(coords[0].lng, 20.0);
/// assert_eq!(coords[0].alt, Some(5.0));
/// ```
pub fn parse_coordinates(text: &str) -> Vec<Coordinate> {
    text.split_whitespace()
        .filter_map(|group| {
            let parsed = parse_tuple(group);
            if parsed.is_none() {
                tracing::debug!(group, "Dropping malformed coordinate tuple");
            }
            parsed
        })
        .collect()
}

/// Parse a single `lng,lat[,alt]` tuple.
///
/// Longitude and latitude must be finite numbers. An unreadable altitude is
/// left unset instead of rejecting the tuple.
fn parse_tuple(group: &str) -> Option<Coordinate> {
    let mut parts = group.split(',');
    let lng = parse_finite(parts.next()?)?;
    let lat = parse_finite(parts.next()?)?;

    let coord = Coordinate::new(lat, lng);
    Some(match parts.next().and_then(parse_finite) {
        Some(alt) => coord.with_altitude(alt),
        None => coord,
    })
}

#[inline]
fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
