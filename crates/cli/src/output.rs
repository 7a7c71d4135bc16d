//! Terminal output utilities
//!
//! Status lines go to stderr so that JSON on stdout can be piped.

use fieldmap_geo::{BoundingBox, Coordinate};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        eprintln!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `label: value` row
    pub fn field(label: &str, value: &str) {
        println!("  {:<18} {}", format!("{label}:").dimmed(), value);
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{:.1}s", secs)
    }
}

/// Format a distance given in kilometres
///
/// Sub-kilometre values are shown in whole metres.
pub fn format_distance_km(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else if km < 100.0 {
        format!("{:.2} km", km)
    } else {
        format!("{:.0} km", km)
    }
}

/// Format a coordinate as `lat, lng` with six decimals
pub fn format_coordinate(coordinate: &Coordinate) -> String {
    format!("{:.6}, {:.6}", coordinate.lat, coordinate.lng)
}

/// Format a bounding box as `N.. S.. E.. W..`, or `empty`
pub fn format_bounds(bounds: &BoundingBox) -> String {
    if bounds.is_empty() {
        return "empty".to_string();
    }
    format!(
        "N {:.4}  S {:.4}  E {:.4}  W {:.4}",
        bounds.north, bounds.south, bounds.east, bounds.west
    )
}

/// Format a file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration(Duration::from_secs_f32(5.5)), "5.5s");
    }

    #[test]
    fn test_format_distance_metres() {
        assert_eq!(format_distance_km(0.25), "250 m");
    }

    #[test]
    fn test_format_distance_km() {
        assert_eq!(format_distance_km(12.3456), "12.35 km");
        assert_eq!(format_distance_km(3935.7), "3936 km");
    }

    #[test]
    fn test_format_coordinate() {
        let c = Coordinate::new(37.7749, -122.4194);
        assert_eq!(format_coordinate(&c), "37.774900, -122.419400");
    }

    #[test]
    fn test_format_bounds_empty() {
        assert_eq!(format_bounds(&BoundingBox::EMPTY), "empty");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "placemark", "placemarks"), "1 placemark");
        assert_eq!(format_count(0, "folder", "folders"), "0 folders");
    }
}
