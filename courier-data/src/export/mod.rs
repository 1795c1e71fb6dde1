//! Route export: per-vehicle CSV files, text summaries and map links.
//!
//! Artefacts are named after the vehicle's one-based number and the run
//! date, e.g. `vehicle_1_2026-03-14.csv` and
//! `vehicle_1_google_map_link_1.txt`, and live together in one output
//! directory. [`cached_route_files`] and [`clean_route_artefacts`] let a
//! caller reuse or discard a previous run's files.

mod error;
mod files;
mod links;
mod summary;
mod table;

pub use error::ExportError;
pub use files::{
    ExportedFiles, cached_route_files, clean_route_artefacts, export_routes, is_route_artefact,
    link_file_name, route_file_name,
};
pub use links::{MAX_ADDRESSES_PER_LINK, map_links, split_segments};
pub use summary::{format_distance, format_duration, render_summary};
pub use table::{render_route_csv, write_route_csv};
