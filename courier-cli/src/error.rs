//! Error types emitted by the Courier CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use courier_core::{CacheError, PipelineError};
use courier_data::{ExportError, InputError, ProviderBuildError};
use thiserror::Error;

/// Errors emitted by the Courier CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The chunk size lies outside the supported range.
    #[error("{field} must be between 1 and {max}, got {value}")]
    InvalidChunkSize {
        field: &'static str,
        value: usize,
        max: usize,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An address list could not be loaded.
    #[error("failed to load {field}: {source}")]
    LoadInput {
        field: &'static str,
        #[source]
        source: InputError,
    },
    /// The geocode cache file could not be read.
    #[error("failed to open geocode cache: {0}")]
    OpenCache(#[source] CacheError),
    /// Constructing an HTTP collaborator failed.
    #[error("failed to build {service} client for {base_url:?}: {source}")]
    BuildProvider {
        service: &'static str,
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Planning the run failed.
    #[error("planning failed: {0}")]
    Plan(#[from] PipelineError),
    /// Writing or cleaning route artefacts failed.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Writing the route summary failed.
    #[error("failed to write route summary: {0}")]
    WriteSummary(#[source] std::io::Error),
}
