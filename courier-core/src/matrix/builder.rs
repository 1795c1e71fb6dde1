//! Chunked assembly of a [`TravelMatrix`].

use std::ops::Range;

use geo::Coord;
use log::{debug, warn};
use thiserror::Error;

use super::{MatrixBlock, MatrixError, MatrixProvider, TravelMatrix};
use crate::dispatch::{DispatchError, RequestDispatcher};
use crate::stop::Stop;

/// Default chunk side; `10 × 10` is the element cap per provider request.
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Why a chunk was degraded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DegradeReason {
    /// The provider call failed or returned an unusable block.
    #[error(transparent)]
    Request(#[from] MatrixError),
    /// The dispatcher refused to issue the request.
    #[error(transparent)]
    Budget(#[from] DispatchError),
}

/// Result of processing one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// The block was fetched; `unreachable` cells were degraded individually.
    Fetched {
        /// Off-diagonal cells the provider could not route.
        unreachable: usize,
    },
    /// Every off-diagonal cell in the chunk was degraded.
    Degraded(DegradeReason),
    /// The chunk only covers a diagonal cell and was not requested.
    DiagonalOnly,
}

impl ChunkOutcome {
    /// Whether any cell in the chunk was degraded.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        match self {
            Self::Fetched { unreachable } => *unreachable > 0,
            Self::Degraded(_) => true,
            Self::DiagonalOnly => false,
        }
    }
}

/// Outcome of one chunk together with the cells it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    /// Origin indices covered.
    pub origins: Range<usize>,
    /// Destination indices covered.
    pub destinations: Range<usize>,
    /// What happened to the chunk.
    pub outcome: ChunkOutcome,
}

/// Matrix plus the per-chunk reports produced while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBuild {
    /// Assembled matrix.
    pub matrix: TravelMatrix,
    /// One report per chunk in row-major order.
    pub reports: Vec<ChunkReport>,
}

impl MatrixBuild {
    /// Number of chunks that degraded at least one cell.
    #[must_use]
    pub fn degraded_chunks(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| report.outcome.is_degraded())
            .count()
    }
}

/// Number of chunks needed to cover an `m × m` grid with side `chunk_size`.
///
/// # Examples
///
/// ```
/// use courier_core::matrix::chunk_count;
///
/// assert_eq!(chunk_count(25, 10), 9);
/// assert_eq!(chunk_count(10, 10), 1);
/// assert_eq!(chunk_count(0, 10), 0);
/// ```
#[must_use]
pub fn chunk_count(m: usize, chunk_size: usize) -> usize {
    let side = m.div_ceil(chunk_size.max(1));
    side * side
}

fn chunk_ranges(m: usize, chunk_size: usize) -> Vec<Range<usize>> {
    (0..m)
        .step_by(chunk_size.max(1))
        .map(|start| start..(start + chunk_size.max(1)).min(m))
        .collect()
}

/// Builds a [`TravelMatrix`] from chunked provider requests.
///
/// Every request passes through the shared dispatcher. A chunk that cannot
/// be fetched is zeroed and its off-diagonal cells flagged as degraded;
/// [`DistanceMatrixBuilder::build`] itself never fails.
#[derive(Debug)]
pub struct DistanceMatrixBuilder<'a, P> {
    provider: &'a P,
    dispatcher: &'a RequestDispatcher,
    chunk_size: usize,
}

impl<'a, P> DistanceMatrixBuilder<'a, P>
where
    P: MatrixProvider,
{
    /// Create a builder with [`DEFAULT_CHUNK_SIZE`].
    pub const fn new(provider: &'a P, dispatcher: &'a RequestDispatcher) -> Self {
        Self {
            provider,
            dispatcher,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the chunk side. Values below one are treated as one.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Chunk side in use.
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Assemble the matrix for `stops` in the given order.
    pub fn build(&self, stops: &[Stop]) -> MatrixBuild {
        let mut matrix = TravelMatrix::zeroed(stops.iter().map(|stop| stop.id).collect());
        let coords: Vec<Coord<f64>> = stops.iter().map(|stop| stop.location).collect();
        let ranges = chunk_ranges(stops.len(), self.chunk_size);
        let mut reports = Vec::with_capacity(chunk_count(stops.len(), self.chunk_size));

        for origins in &ranges {
            for destinations in &ranges {
                let outcome = self.fetch_chunk(&mut matrix, &coords, origins, destinations);
                if let ChunkOutcome::Degraded(reason) = &outcome {
                    warn!(
                        "degraded matrix chunk [{}..{}]x[{}..{}]: {reason}",
                        origins.start, origins.end, destinations.start, destinations.end
                    );
                }
                reports.push(ChunkReport {
                    origins: origins.clone(),
                    destinations: destinations.clone(),
                    outcome,
                });
            }
        }

        debug!(
            "built {}x{} matrix from {} chunks, {} degraded cells",
            matrix.len(),
            matrix.len(),
            reports.len(),
            matrix.degraded().len()
        );
        MatrixBuild { matrix, reports }
    }

    fn fetch_chunk(
        &self,
        matrix: &mut TravelMatrix,
        coords: &[Coord<f64>],
        origins: &Range<usize>,
        destinations: &Range<usize>,
    ) -> ChunkOutcome {
        if origins.len() == 1 && origins == destinations {
            return ChunkOutcome::DiagonalOnly;
        }
        let block = self
            .dispatcher
            .acquire()
            .map_err(DegradeReason::from)
            .and_then(|()| self.request(coords, origins, destinations));
        match block {
            Ok(block) => ChunkOutcome::Fetched {
                unreachable: write_block(matrix, &block, origins, destinations),
            },
            Err(reason) => {
                for i in origins.clone() {
                    for j in destinations.clone() {
                        matrix.mark_degraded(i, j);
                    }
                }
                ChunkOutcome::Degraded(reason)
            }
        }
    }

    fn request(
        &self,
        coords: &[Coord<f64>],
        origins: &Range<usize>,
        destinations: &Range<usize>,
    ) -> Result<MatrixBlock, DegradeReason> {
        let (Some(from), Some(to)) = (
            coords.get(origins.clone()),
            coords.get(destinations.clone()),
        ) else {
            return Err(MatrixError::ShapeMismatch {
                rows: origins.len(),
                columns: destinations.len(),
            }
            .into());
        };
        let block = self.provider.fetch_block(from, to)?;
        if !block.has_shape(origins.len(), destinations.len()) {
            return Err(MatrixError::ShapeMismatch {
                rows: origins.len(),
                columns: destinations.len(),
            }
            .into());
        }
        Ok(block)
    }
}

/// Copy a fetched block into the matrix, returning the number of
/// off-diagonal cells degraded because the provider left them empty.
fn write_block(
    matrix: &mut TravelMatrix,
    block: &MatrixBlock,
    origins: &Range<usize>,
    destinations: &Range<usize>,
) -> usize {
    let mut unreachable = 0;
    for (row, i) in origins.clone().enumerate() {
        for (column, j) in destinations.clone().enumerate() {
            if i == j {
                continue;
            }
            let duration = block
                .durations
                .get(row)
                .and_then(|cells| cells.get(column))
                .copied()
                .flatten();
            let distance = block
                .distances
                .get(row)
                .and_then(|cells| cells.get(column))
                .copied()
                .flatten();
            match (duration, distance) {
                (Some(duration), Some(distance)) => matrix.set_cell(i, j, distance, duration),
                _ => {
                    matrix.mark_degraded(i, j);
                    unreachable += 1;
                }
            }
        }
    }
    unreachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubMatrixProvider, delivery_at};
    use rstest::{fixture, rstest};
    use std::time::Duration;

    #[fixture]
    fn stops() -> Vec<Stop> {
        [53.80, 53.81, 53.82, 53.83]
            .into_iter()
            .zip(0..)
            .map(|(latitude, id)| delivery_at(id, latitude, -1.55))
            .collect()
    }

    #[rstest]
    #[case(0, 3, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 4)]
    #[case(25, 10, 9)]
    #[case(4, 2, 4)]
    #[case(5, 1, 25)]
    fn chunk_count_is_square_of_tiles(
        #[case] m: usize,
        #[case] chunk_size: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(chunk_count(m, chunk_size), expected);
    }

    #[rstest]
    fn ranges_cover_grid_without_overlap() {
        assert_eq!(chunk_ranges(5, 2), vec![0..2, 2..4, 4..5]);
        assert!(chunk_ranges(0, 2).is_empty());
    }

    #[rstest]
    fn fetched_matrix_has_zero_diagonal(stops: Vec<Stop>) {
        let provider = StubMatrixProvider::default();
        let dispatcher = RequestDispatcher::unlimited();
        let build = DistanceMatrixBuilder::new(&provider, &dispatcher)
            .with_chunk_size(2)
            .build(&stops);
        assert_eq!(build.reports.len(), 4);
        assert_eq!(dispatcher.issued(), 4);
        for i in 0..4 {
            assert_eq!(build.matrix.duration(i, i), Some(Duration::ZERO));
            for j in 0..4 {
                if i != j {
                    assert!(
                        build
                            .matrix
                            .duration(i, j)
                            .is_some_and(|d| d > Duration::ZERO)
                    );
                }
            }
        }
        assert!(build.matrix.degraded().is_empty());
    }

    #[rstest]
    fn failing_chunk_is_degraded_and_others_survive(stops: Vec<Stop>) {
        // Row-major chunk order with side 2: [0..2]x[0..2], [0..2]x[2..4],
        // [2..4]x[0..2], [2..4]x[2..4].
        let provider = StubMatrixProvider::default().failing_on([3]);
        let dispatcher = RequestDispatcher::unlimited();
        let build = DistanceMatrixBuilder::new(&provider, &dispatcher)
            .with_chunk_size(2)
            .build(&stops);

        let expected: Vec<(usize, usize)> = vec![(2, 3), (3, 2)];
        assert_eq!(
            build.matrix.degraded().iter().copied().collect::<Vec<_>>(),
            expected
        );
        assert_eq!(build.matrix.duration(2, 3), Some(Duration::ZERO));
        assert_eq!(build.matrix.distance(3, 2), Some(0.0));
        assert!(build.matrix.duration(1, 2).is_some_and(|d| d > Duration::ZERO));
        assert!(matches!(
            build.reports[3].outcome,
            ChunkOutcome::Degraded(DegradeReason::Request(_))
        ));
        assert_eq!(build.degraded_chunks(), 1);
    }

    #[rstest]
    fn exhausted_quota_degrades_remaining_chunks(stops: Vec<Stop>) {
        let provider = StubMatrixProvider::default();
        let dispatcher = RequestDispatcher::with_quota(1);
        let build = DistanceMatrixBuilder::new(&provider, &dispatcher)
            .with_chunk_size(2)
            .build(&stops);
        assert_eq!(provider.call_count(), 1);
        assert!(matches!(
            build.reports[1].outcome,
            ChunkOutcome::Degraded(DegradeReason::Budget(DispatchError::QuotaExhausted {
                quota: 1
            }))
        ));
        assert_eq!(build.degraded_chunks(), 3);
    }

    #[rstest]
    fn single_diagonal_chunks_are_not_requested(stops: Vec<Stop>) {
        let provider = StubMatrixProvider::default();
        let dispatcher = RequestDispatcher::unlimited();
        let build = DistanceMatrixBuilder::new(&provider, &dispatcher)
            .with_chunk_size(1)
            .build(&stops);
        assert_eq!(build.reports.len(), 16);
        assert_eq!(provider.call_count(), 12);
        assert_eq!(
            build
                .reports
                .iter()
                .filter(|r| r.outcome == ChunkOutcome::DiagonalOnly)
                .count(),
            4
        );
    }

    #[rstest]
    fn null_elements_degrade_only_their_cell(stops: Vec<Stop>) {
        let provider =
            StubMatrixProvider::default().unreachable_between(stops[0].location, stops[1].location);
        let dispatcher = RequestDispatcher::unlimited();
        let build = DistanceMatrixBuilder::new(&provider, &dispatcher).build(&stops);
        assert_eq!(
            build.reports[0].outcome,
            ChunkOutcome::Fetched { unreachable: 1 }
        );
        assert!(build.matrix.is_degraded(0, 1));
        assert!(!build.matrix.is_degraded(1, 0));
    }

    #[rstest]
    fn single_stop_issues_no_request() {
        let provider = StubMatrixProvider::default();
        let dispatcher = RequestDispatcher::unlimited();
        let build = DistanceMatrixBuilder::new(&provider, &dispatcher)
            .build(&[delivery_at(0, 53.8, -1.55)]);
        assert_eq!(provider.call_count(), 0);
        assert_eq!(build.matrix.len(), 1);
    }
}
