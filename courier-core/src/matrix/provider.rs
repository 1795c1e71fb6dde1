//! Routing collaborator trait and the block it returns.

use std::time::Duration;

use geo::Coord;

use super::error::MatrixError;

/// Durations and distances for one origin/destination block.
///
/// `None` marks a pair the provider could not route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixBlock {
    /// `durations[i][j]` is the travel time from origin `i` to destination `j`.
    pub durations: Vec<Vec<Option<Duration>>>,
    /// `distances[i][j]` is the driving distance in metres.
    pub distances: Vec<Vec<Option<f64>>>,
}

impl MatrixBlock {
    /// Whether both grids are `rows × columns`.
    #[must_use]
    pub fn has_shape(&self, rows: usize, columns: usize) -> bool {
        self.durations.len() == rows
            && self.distances.len() == rows
            && self.durations.iter().all(|row| row.len() == columns)
            && self.distances.iter().all(|row| row.len() == columns)
    }
}

/// Fetch driving durations and distances between coordinates.
///
/// Each call corresponds to exactly one outbound request. Implementations do
/// not retry.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use courier_core::{MatrixBlock, MatrixError, MatrixProvider};
/// use geo::Coord;
///
/// struct Flat;
///
/// impl MatrixProvider for Flat {
///     fn fetch_block(
///         &self,
///         origins: &[Coord<f64>],
///         destinations: &[Coord<f64>],
///     ) -> Result<MatrixBlock, MatrixError> {
///         let row = vec![Some(Duration::from_secs(60)); destinations.len()];
///         let distances = vec![Some(1_000.0); destinations.len()];
///         Ok(MatrixBlock {
///             durations: vec![row; origins.len()],
///             distances: vec![distances; origins.len()],
///         })
///     }
/// }
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let block = Flat.fetch_block(&[origin], &[origin, origin])?;
/// assert!(block.has_shape(1, 2));
/// # Ok::<(), MatrixError>(())
/// ```
pub trait MatrixProvider {
    /// Return the block for every `origins × destinations` pair.
    fn fetch_block(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<MatrixBlock, MatrixError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2, 2, true)]
    #[case(2, 3, false)]
    #[case(1, 2, false)]
    fn shape_check(#[case] rows: usize, #[case] columns: usize, #[case] expected: bool) {
        let block = MatrixBlock {
            durations: vec![vec![Some(Duration::ZERO); 2]; 2],
            distances: vec![vec![Some(0.0); 2]; 2],
        };
        assert_eq!(block.has_shape(rows, columns), expected);
    }

    #[rstest]
    fn ragged_block_is_rejected() {
        let block = MatrixBlock {
            durations: vec![vec![None; 2], vec![None]],
            distances: vec![vec![None; 2]; 2],
        };
        assert!(!block.has_shape(2, 2));
    }
}
