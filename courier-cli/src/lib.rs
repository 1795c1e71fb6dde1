//! Command-line interface for planning Courier delivery runs.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;

use plan::PlanArgs;

pub(crate) const ARG_DEPOTS: &str = "depots";
pub(crate) const ARG_DELIVERIES: &str = "deliveries";
pub(crate) const ARG_OUTPUT_DIR: &str = "output-dir";
pub(crate) const ARG_CACHE_PATH: &str = "cache-path";
pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_NOMINATIM_BASE_URL: &str = "nominatim-base-url";
pub(crate) const ARG_CHUNK_SIZE: &str = "chunk-size";
pub(crate) const ARG_DAILY_REQUEST_QUOTA: &str = "daily-request-quota";
pub(crate) const ARG_TIME_BUDGET_SECS: &str = "time-budget-secs";
pub(crate) const ARG_MAX_GENERATIONS: &str = "max-generations";
pub(crate) const ARG_FORCE: &str = "force";

/// Run the Courier CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, inputs
/// cannot be read, planning fails or outputs cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => plan::run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "courier",
    about = "Plan two-vehicle delivery routes from address lists",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Geocode, assign and order deliveries, then export the routes.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
