use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while writing or inspecting route artefacts.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Encoding a CSV row failed.
    #[error("failed to encode route CSV")]
    Csv(#[from] csv::Error),
    /// Writing an artefact failed.
    #[error("failed to write {path}")]
    Write {
        /// Artefact being written.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: std::io::Error,
    },
    /// Checking for an existing artefact failed.
    #[error("failed to inspect {path}")]
    Inspect {
        /// Artefact being checked.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: std::io::Error,
    },
    /// Removing previous artefacts failed.
    #[error("failed to clean output directory {dir}")]
    Clean {
        /// Output directory.
        dir: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: std::io::Error,
    },
}
