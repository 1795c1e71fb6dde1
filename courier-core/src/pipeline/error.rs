use std::fmt;

use thiserror::Error;

use crate::assign::AssignError;
use crate::geocode::GeocodeError;

/// Input group being processed when a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Vehicle origins.
    Depots,
    /// Delivery stops.
    Deliveries,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Depots => "depot",
            Self::Deliveries => "delivery",
        })
    }
}

/// Fatal errors from [`crate::pipeline::Pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The depot set is unusable.
    #[error(transparent)]
    Assign(#[from] AssignError),
    /// An address could not be geocoded.
    #[error("failed to geocode {stage} {name:?} at {address:?}")]
    Geocode {
        /// Input group the address belongs to.
        stage: Stage,
        /// Display name of the stop.
        name: String,
        /// Address as supplied.
        address: String,
        /// Underlying geocoding failure.
        #[source]
        source: GeocodeError,
    },
}
