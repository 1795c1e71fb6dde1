//! Per-vehicle CSV with leg and cumulative figures.

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::VehicleRoute;
use time::Date;

use super::error::ExportError;
use super::files::route_file_name;

const HEADER: [&str; 8] = [
    "Stop",
    "Name",
    "Address",
    "Distance_km",
    "TravelTime_min",
    "Cumulative_km",
    "Cumulative_min",
    "Degraded",
];

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Encode `route` as CSV.
///
/// The depot is row 1 with zero leg values; each delivery row carries the
/// leg arriving at it. A trailing `Total` row repeats the cumulative
/// figures. Distances use two decimals, times one.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] when a row cannot be encoded.
pub fn render_route_csv(route: &VehicleRoute) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    let depot = &route.depot;
    writer.write_record([
        "1",
        depot.name.as_str(),
        depot.raw_address.as_str(),
        "0.00",
        "0.0",
        "0.00",
        "0.0",
        yes_no(false),
    ])?;

    let mut cumulative_km = 0.0;
    let mut cumulative_min = 0.0;
    for (position, (stop, leg)) in route.stops.iter().zip(&route.legs).enumerate() {
        let km = leg.distance_metres / 1000.0;
        let minutes = leg.duration.as_secs_f64() / 60.0;
        cumulative_km += km;
        cumulative_min += minutes;
        writer.write_record([
            (position + 2).to_string(),
            stop.name.clone(),
            stop.raw_address.clone(),
            format!("{km:.2}"),
            format!("{minutes:.1}"),
            format!("{cumulative_km:.2}"),
            format!("{cumulative_min:.1}"),
            yes_no(leg.degraded).to_owned(),
        ])?;
    }

    let degraded = if route.has_degraded_legs() { "yes" } else { "" };
    writer.write_record([
        "Total".to_owned(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        format!("{cumulative_km:.2}"),
        format!("{cumulative_min:.1}"),
        degraded.to_owned(),
    ])?;

    writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))
}

/// Write `route` to `vehicle_{n}_{date}.csv` inside `dir`.
///
/// # Errors
///
/// Returns [`ExportError::Write`] when the file cannot be written.
pub fn write_route_csv(
    dir: &Utf8Path,
    route: &VehicleRoute,
    date: Date,
) -> Result<Utf8PathBuf, ExportError> {
    let path = dir.join(route_file_name(route.vehicle, date));
    let bytes = render_route_csv(route)?;
    courier_fs::write_atomic(&path, &bytes).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
