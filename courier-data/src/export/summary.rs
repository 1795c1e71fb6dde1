//! Human-readable route summaries.

use std::fmt::Write as _;
use std::time::Duration;

use courier_core::VehicleRoute;

const RULE: &str = "==============================";

/// Format metres as `850 m` below a kilometre and `1.2 km` above.
///
/// # Examples
///
/// ```
/// use courier_data::export::format_distance;
///
/// assert_eq!(format_distance(850.0), "850 m");
/// assert_eq!(format_distance(1_234.0), "1.2 km");
/// ```
#[must_use]
pub fn format_distance(metres: f64) -> String {
    let rounded = metres.max(0.0).round();
    if rounded >= 1000.0 {
        format!("{:.1} km", rounded / 1000.0)
    } else {
        format!("{rounded:.0} m")
    }
}

/// Format a duration as hours and minutes, e.g. `1h 5m` or `7m`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use courier_data::export::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(3_900)), "1h 5m");
/// assert_eq!(format_duration(Duration::from_secs(7 * 60 + 30)), "7m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    match (hours, minutes) {
        (0, minutes) => format!("{minutes}m"),
        (hours, 0) => format!("{hours}h"),
        (hours, minutes) => format!("{hours}h {minutes}m"),
    }
}

/// Render every route followed by fleet totals.
///
/// Stops reached over a degraded leg are marked `[degraded]`.
#[must_use]
pub fn render_summary(routes: &[VehicleRoute]) -> String {
    let mut out = String::new();
    for route in routes {
        render_route(&mut out, route);
    }
    let distance: f64 = routes.iter().map(|route| route.total_distance_metres).sum();
    let duration: Duration = routes.iter().map(|route| route.total_duration).sum();
    let _ = writeln!(out, "\nSummary\n{RULE}");
    let _ = writeln!(out, "Vehicles:       {}", routes.len());
    let _ = writeln!(out, "Total distance: {}", format_distance(distance));
    let _ = writeln!(out, "Total time:     {}", format_duration(duration));
    out
}

fn render_route(out: &mut String, route: &VehicleRoute) {
    let _ = writeln!(
        out,
        "\nVehicle {} ({})\n{RULE}",
        route.vehicle + 1,
        route.depot.name
    );
    let _ = writeln!(out, "Stops: {}", route.stops.len());
    for (position, (stop, leg)) in route.stops.iter().zip(&route.legs).enumerate() {
        let marker = if leg.degraded { " [degraded]" } else { "" };
        let _ = writeln!(
            out,
            "{:02}. {} - {}{marker}",
            position + 1,
            stop.name,
            stop.raw_address
        );
    }
    let _ = writeln!(out, "Distance: {}", format_distance(route.total_distance_metres));
    let _ = writeln!(out, "Time:     {}", format_duration(route.total_duration));
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::Leg;
    use courier_core::test_support::{delivery_at, depot_at};
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0 m")]
    #[case(999.4, "999 m")]
    #[case(999.6, "1.0 km")]
    #[case(12_345.0, "12.3 km")]
    fn distances(#[case] metres: f64, #[case] expected: &str) {
        assert_eq!(format_distance(metres), expected);
    }

    #[rstest]
    #[case(0, "0m")]
    #[case(59, "0m")]
    #[case(7 * 60, "7m")]
    #[case(3_600, "1h")]
    #[case(3_900, "1h 5m")]
    fn durations(#[case] seconds: u64, #[case] expected: &str) {
        assert_eq!(format_duration(Duration::from_secs(seconds)), expected);
    }

    #[rstest]
    fn summary_lists_stops_and_marks_degraded_legs() {
        let mut route = VehicleRoute::unordered(0, depot_at(0, 53.8, -1.55));
        route.stops = vec![delivery_at(2, 53.81, -1.55)];
        route.legs = vec![Leg {
            from: 0,
            to: 2,
            distance_metres: 0.0,
            duration: Duration::ZERO,
            degraded: true,
        }];
        let text = render_summary(&[route]);
        assert!(text.contains("Vehicle 1 (Depot_0)"));
        assert!(text.contains("01. Stop_2 - Stop 2 [degraded]"));
        assert!(text.contains("Vehicles:       1"));
    }
}
