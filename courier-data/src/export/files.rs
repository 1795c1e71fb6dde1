//! Artefact naming, reuse and cleanup.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::VehicleRoute;
use log::info;
use time::Date;

use super::error::ExportError;
use super::links::map_links;
use super::table::write_route_csv;

/// `vehicle_{n}_{date}.csv` for the zero-based `vehicle`.
#[must_use]
pub fn route_file_name(vehicle: usize, date: Date) -> String {
    format!("vehicle_{}_{date}.csv", vehicle + 1)
}

/// `vehicle_{n}_google_map_link_{i}.txt` for the zero-based `vehicle` and
/// one-based `index`.
#[must_use]
pub fn link_file_name(vehicle: usize, index: usize) -> String {
    format!("vehicle_{}_google_map_link_{index}.txt", vehicle + 1)
}

/// Whether `name` is a file this module writes.
#[must_use]
pub fn is_route_artefact(name: &str) -> bool {
    name.starts_with("vehicle_")
        && (name.ends_with(".csv") || (name.contains("_google_map_link_") && name.ends_with(".txt")))
}

/// Files written by [`export_routes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedFiles {
    /// One CSV per vehicle.
    pub route_csvs: Vec<Utf8PathBuf>,
    /// Map link files for every vehicle, in vehicle then segment order.
    pub map_links: Vec<Utf8PathBuf>,
}

/// Write the CSV and map link files for every route into `dir`.
///
/// # Errors
///
/// Returns [`ExportError`] when any artefact cannot be written.
pub fn export_routes(
    dir: &Utf8Path,
    routes: &[VehicleRoute],
    date: Date,
) -> Result<ExportedFiles, ExportError> {
    let mut files = ExportedFiles::default();
    for route in routes {
        files.route_csvs.push(write_route_csv(dir, route, date)?);
        for (index, link) in map_links(route).iter().enumerate() {
            let path = dir.join(link_file_name(route.vehicle, index + 1));
            courier_fs::write_atomic(&path, link.as_bytes()).map_err(|source| {
                ExportError::Write {
                    path: path.clone(),
                    source,
                }
            })?;
            files.map_links.push(path);
        }
    }
    info!(
        "exported {} route files and {} map links to {dir}",
        files.route_csvs.len(),
        files.map_links.len()
    );
    Ok(files)
}

/// Return the route CSVs for `date` when every vehicle already has one.
///
/// # Errors
///
/// Returns [`ExportError::Inspect`] when a file cannot be checked for a
/// reason other than its absence.
pub fn cached_route_files(
    dir: &Utf8Path,
    vehicles: usize,
    date: Date,
) -> Result<Option<Vec<Utf8PathBuf>>, ExportError> {
    let mut found = Vec::with_capacity(vehicles);
    for vehicle in 0..vehicles {
        let path = dir.join(route_file_name(vehicle, date));
        match courier_fs::file_is_file(&path) {
            Ok(true) => found.push(path),
            Ok(false) => return Ok(None),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ExportError::Inspect { path, source }),
        }
    }
    Ok(Some(found))
}

/// Remove every route artefact from `dir`, returning the removed names.
///
/// # Errors
///
/// Returns [`ExportError::Clean`] when the directory cannot be listed or a
/// file cannot be removed.
pub fn clean_route_artefacts(dir: &Utf8Path) -> Result<Vec<String>, ExportError> {
    let removed =
        courier_fs::remove_files_matching(dir, is_route_artefact).map_err(|source| {
            ExportError::Clean {
                dir: dir.to_path_buf(),
                source,
            }
        })?;
    if !removed.is_empty() {
        info!("removed {} previous route files from {dir}", removed.len());
    }
    Ok(removed)
}
