//! Plan command implementation for the Courier CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use courier_core::{
    AddressRecord, DEFAULT_CHUNK_SIZE, GeocodeCache, Geocoder, GeocodingProvider, MatrixProvider,
    Pipeline, PipelineConfig, RequestDispatcher, RouteOptimizer, VEHICLE_COUNT, VehicleRoute,
};
use courier_data::export::{
    cached_route_files, clean_route_artefacts, export_routes, render_summary,
};
use courier_data::{JsonFileGeocodeCache, NominatimGeocoder, OsrmMatrixProvider};
use courier_solver_vrp::{VrpOptimizerConfig, VrpRouteOptimizer};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    ARG_CACHE_PATH, ARG_CHUNK_SIZE, ARG_DAILY_REQUEST_QUOTA, ARG_DELIVERIES, ARG_DEPOTS, ARG_FORCE,
    ARG_MAX_GENERATIONS, ARG_NOMINATIM_BASE_URL, ARG_OSRM_BASE_URL, ARG_OUTPUT_DIR,
    ARG_TIME_BUDGET_SECS, CliError,
};

pub(crate) const DEFAULT_DEPOTS: &str = "data/input/depots.csv";
pub(crate) const DEFAULT_DELIVERIES: &str = "data/input/deliveries.csv";
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "data/output";
pub(crate) const DEFAULT_CACHE_PATH: &str = "data/cache/coords.json";
pub(crate) const DEFAULT_OSRM_BASE_URL: &str = "http://localhost:5000";
pub(crate) const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub(crate) const DEFAULT_DAILY_REQUEST_QUOTA: u32 = 950;
pub(crate) const DEFAULT_TIME_BUDGET_SECS: u64 = 15;
/// Largest chunk side accepted by the public OSRM table service.
pub(crate) const MAX_CHUNK_SIZE: usize = 10;
/// Pause between consecutive geocoding requests.
pub(crate) const GEOCODE_MIN_INTERVAL: Duration = Duration::from_millis(200);

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Geocode the depot and delivery address lists, split the \
                 deliveries between the two vehicles, order each route \
                 against OSRM travel times and write per-vehicle CSV files, \
                 map links and a summary. Values can come from CLI flags, \
                 configuration files, or COURIER_* environment variables.",
    about = "Plan routes for both vehicles"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct PlanArgs {
    /// CSV listing exactly two depots.
    #[arg(long = ARG_DEPOTS, value_name = "path")]
    #[serde(default)]
    pub(crate) depots: Option<Utf8PathBuf>,
    /// CSV listing the deliveries.
    #[arg(long = ARG_DELIVERIES, value_name = "path")]
    #[serde(default)]
    pub(crate) deliveries: Option<Utf8PathBuf>,
    /// Directory receiving route CSVs and map links.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// JSON file persisting geocoded coordinates between runs.
    #[arg(long = ARG_CACHE_PATH, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_path: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Base URL for the Nominatim search service.
    #[arg(long = ARG_NOMINATIM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_base_url: Option<String>,
    /// Side of each square matrix request (1 to 10).
    #[arg(long = ARG_CHUNK_SIZE, value_name = "n")]
    #[serde(default)]
    pub(crate) chunk_size: Option<usize>,
    /// Maximum matrix requests per run.
    #[arg(long = ARG_DAILY_REQUEST_QUOTA, value_name = "n")]
    #[serde(default)]
    pub(crate) daily_request_quota: Option<u32>,
    /// Optimisation budget per vehicle, in seconds.
    #[arg(long = ARG_TIME_BUDGET_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_budget_secs: Option<u64>,
    /// Upper bound on optimiser generations.
    #[arg(long = ARG_MAX_GENERATIONS, value_name = "n")]
    #[serde(default)]
    pub(crate) max_generations: Option<usize>,
    /// Recompute even when today's route files already exist.
    #[arg(long = ARG_FORCE)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) force: bool,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    pub(crate) depots: Utf8PathBuf,
    pub(crate) deliveries: Utf8PathBuf,
    pub(crate) output_dir: Utf8PathBuf,
    pub(crate) cache_path: Utf8PathBuf,
    pub(crate) osrm_base_url: String,
    pub(crate) nominatim_base_url: String,
    pub(crate) chunk_size: usize,
    pub(crate) daily_request_quota: u32,
    pub(crate) time_budget: Duration,
    pub(crate) max_generations: usize,
    pub(crate) force: bool,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.depots, ARG_DEPOTS)?;
        Self::require_existing(&self.deliveries, ARG_DELIVERIES)?;
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match courier_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    const fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            chunk_size: self.chunk_size,
            time_budget: self.time_budget,
        }
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let chunk_size = args.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        if !(1..=MAX_CHUNK_SIZE).contains(&chunk_size) {
            return Err(CliError::InvalidChunkSize {
                field: ARG_CHUNK_SIZE,
                value: chunk_size,
                max: MAX_CHUNK_SIZE,
            });
        }
        let default_generations = VrpOptimizerConfig::default().max_generations;
        Ok(Self {
            depots: args.depots.unwrap_or_else(|| DEFAULT_DEPOTS.into()),
            deliveries: args.deliveries.unwrap_or_else(|| DEFAULT_DELIVERIES.into()),
            output_dir: args.output_dir.unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into()),
            cache_path: args.cache_path.unwrap_or_else(|| DEFAULT_CACHE_PATH.into()),
            osrm_base_url: args
                .osrm_base_url
                .unwrap_or_else(|| DEFAULT_OSRM_BASE_URL.to_owned()),
            nominatim_base_url: args
                .nominatim_base_url
                .unwrap_or_else(|| DEFAULT_NOMINATIM_BASE_URL.to_owned()),
            chunk_size,
            daily_request_quota: args
                .daily_request_quota
                .unwrap_or(DEFAULT_DAILY_REQUEST_QUOTA),
            time_budget: Duration::from_secs(
                args.time_budget_secs.unwrap_or(DEFAULT_TIME_BUDGET_SECS),
            ),
            max_generations: args.max_generations.unwrap_or(default_generations),
            force: args.force,
        })
    }
}

/// Builds the external collaborators for one plan invocation.
pub(crate) trait PlanCollaborators {
    type Geocoding: GeocodingProvider;
    type Cache: GeocodeCache;
    type Matrix: MatrixProvider + Sync;
    type Optimizer: RouteOptimizer + Sync;

    fn geocoding(&self, config: &PlanConfig) -> Result<Self::Geocoding, CliError>;
    fn cache(&self, config: &PlanConfig) -> Result<Self::Cache, CliError>;
    fn matrix(&self, config: &PlanConfig) -> Result<Self::Matrix, CliError>;
    fn optimizer(&self, config: &PlanConfig) -> Self::Optimizer;
}

/// Nominatim, OSRM, a JSON cache file and the `vrp-core` optimiser.
pub(crate) struct DefaultPlanCollaborators;

impl PlanCollaborators for DefaultPlanCollaborators {
    type Geocoding = NominatimGeocoder;
    type Cache = JsonFileGeocodeCache;
    type Matrix = OsrmMatrixProvider;
    type Optimizer = VrpRouteOptimizer;

    fn geocoding(&self, config: &PlanConfig) -> Result<Self::Geocoding, CliError> {
        NominatimGeocoder::new(config.nominatim_base_url.clone()).map_err(|source| {
            CliError::BuildProvider {
                service: "Nominatim",
                base_url: config.nominatim_base_url.clone(),
                source,
            }
        })
    }

    fn cache(&self, config: &PlanConfig) -> Result<Self::Cache, CliError> {
        JsonFileGeocodeCache::load(config.cache_path.clone()).map_err(CliError::OpenCache)
    }

    fn matrix(&self, config: &PlanConfig) -> Result<Self::Matrix, CliError> {
        OsrmMatrixProvider::new(config.osrm_base_url.clone()).map_err(|source| {
            CliError::BuildProvider {
                service: "OSRM",
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })
    }

    fn optimizer(&self, config: &PlanConfig) -> Self::Optimizer {
        VrpRouteOptimizer::with_config(VrpOptimizerConfig {
            max_generations: config.max_generations,
        })
    }
}

/// What a plan invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlanReport {
    /// Today's route files already existed and were left untouched.
    Reused { route_csvs: Vec<Utf8PathBuf> },
    /// Routes were computed and exported.
    Planned {
        route_csvs: Vec<Utf8PathBuf>,
        map_links: Vec<Utf8PathBuf>,
        geocoding_lookups: usize,
    },
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultPlanCollaborators, today(), &mut stdout).map(|_| ())
}

pub(crate) fn run_plan_with<B: PlanCollaborators>(
    args: PlanArgs,
    builder: &B,
    date: Date,
    writer: &mut dyn Write,
) -> Result<PlanReport, CliError> {
    let config = resolve_plan_config(args)?;

    if config.force {
        clean_route_artefacts(&config.output_dir)?;
    } else if let Some(route_csvs) =
        cached_route_files(&config.output_dir, VEHICLE_COUNT, date)?
    {
        info!("routes for {date} already exist in {}", config.output_dir);
        write_reused(writer, date, &route_csvs)?;
        return Ok(PlanReport::Reused { route_csvs });
    }

    let depots = load_records(&config.depots, ARG_DEPOTS)?;
    let deliveries = load_records(&config.deliveries, ARG_DELIVERIES)?;

    let geocoder = Geocoder::new(builder.geocoding(&config)?, builder.cache(&config)?)
        .with_dispatcher(RequestDispatcher::unlimited().with_min_interval(GEOCODE_MIN_INTERVAL));
    let mut pipeline = Pipeline::new(geocoder, builder.matrix(&config)?, builder.optimizer(&config))
        .with_dispatcher(RequestDispatcher::with_quota(config.daily_request_quota))
        .with_config(config.pipeline_config());

    let outcome = pipeline.run(&depots, &deliveries)?;
    let routes: Vec<VehicleRoute> = outcome.routes().cloned().collect();
    let files = export_routes(&config.output_dir, &routes, date)?;

    writer
        .write_all(render_summary(&routes).as_bytes())
        .map_err(CliError::WriteSummary)?;

    Ok(PlanReport::Planned {
        route_csvs: files.route_csvs,
        map_links: files.map_links,
        geocoding_lookups: outcome.geocoding_lookups,
    })
}

fn resolve_plan_config(args: PlanArgs) -> Result<PlanConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn load_records(path: &Utf8Path, field: &'static str) -> Result<Vec<AddressRecord>, CliError> {
    courier_data::load_address_records(path).map_err(|source| CliError::LoadInput { field, source })
}

fn write_reused(
    writer: &mut dyn Write,
    date: Date,
    route_csvs: &[Utf8PathBuf],
) -> Result<(), CliError> {
    writeln!(writer, "Routes for {date} already exist; pass --{ARG_FORCE} to recompute.")
        .map_err(CliError::WriteSummary)?;
    for path in route_csvs {
        writeln!(writer, "  {path}").map_err(CliError::WriteSummary)?;
    }
    Ok(())
}

/// Local calendar date, falling back to UTC when the offset is unknown.
fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
