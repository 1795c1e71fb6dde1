//! Square travel matrix for one vehicle's stops.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::stop::StopId;

/// Pairwise driving distances and times between a vehicle's stops.
///
/// Index 0 is the vehicle's depot, followed by its stops in assignment
/// order. Cells the provider could not answer hold zero and are listed in
/// [`TravelMatrix::degraded`]. The diagonal is always zero and never
/// degraded.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrix {
    stop_ids: Vec<StopId>,
    distances: Vec<Vec<f64>>,
    durations: Vec<Vec<Duration>>,
    degraded: BTreeSet<(usize, usize)>,
}

impl TravelMatrix {
    /// A matrix over `stop_ids` with every cell zero and nothing degraded.
    #[must_use]
    pub fn zeroed(stop_ids: Vec<StopId>) -> Self {
        let n = stop_ids.len();
        Self {
            stop_ids,
            distances: vec![vec![0.0; n]; n],
            durations: vec![vec![Duration::ZERO; n]; n],
            degraded: BTreeSet::new(),
        }
    }

    /// Build a matrix from a square duration grid with zero distances.
    ///
    /// Returns `None` when `durations` is not `n×n` for `n = stop_ids.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use courier_core::TravelMatrix;
    ///
    /// let secs = Duration::from_secs;
    /// let matrix = TravelMatrix::from_durations(
    ///     vec![10, 11],
    ///     vec![vec![secs(0), secs(5)], vec![secs(7), secs(0)]],
    /// )
    /// .expect("square grid");
    /// assert_eq!(matrix.duration(0, 1), Some(secs(5)));
    /// ```
    #[must_use]
    pub fn from_durations(stop_ids: Vec<StopId>, durations: Vec<Vec<Duration>>) -> Option<Self> {
        let n = stop_ids.len();
        if durations.len() != n || durations.iter().any(|row| row.len() != n) {
            return None;
        }
        let mut matrix = Self::zeroed(stop_ids);
        matrix.durations = durations;
        for (i, row) in matrix.durations.iter_mut().enumerate() {
            if let Some(cell) = row.get_mut(i) {
                *cell = Duration::ZERO;
            }
        }
        Some(matrix)
    }

    /// Write a cell. Diagonal writes are ignored.
    pub fn set_cell(&mut self, from: usize, to: usize, distance_metres: f64, duration: Duration) {
        if from == to {
            return;
        }
        if let Some(cell) = self.distances.get_mut(from).and_then(|row| row.get_mut(to)) {
            *cell = distance_metres;
        }
        if let Some(cell) = self.durations.get_mut(from).and_then(|row| row.get_mut(to)) {
            *cell = duration;
        }
    }

    /// Zero a cell and flag it as degraded. Diagonal cells are left alone.
    pub fn mark_degraded(&mut self, from: usize, to: usize) {
        if from == to || from >= self.len() || to >= self.len() {
            return;
        }
        self.set_cell(from, to, 0.0, Duration::ZERO);
        self.degraded.insert((from, to));
    }

    /// Stop identifiers in matrix order.
    #[must_use]
    pub fn stop_ids(&self) -> &[StopId] {
        &self.stop_ids
    }

    /// Matrix index of `stop_id`.
    #[must_use]
    pub fn index_of(&self, stop_id: StopId) -> Option<usize> {
        self.stop_ids.iter().position(|id| *id == stop_id)
    }

    /// Driving distance in metres from `from` to `to`.
    #[must_use]
    pub fn distance(&self, from: usize, to: usize) -> Option<f64> {
        self.distances.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Driving time from `from` to `to`.
    #[must_use]
    pub fn duration(&self, from: usize, to: usize) -> Option<Duration> {
        self.durations.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Whether the cell was degraded.
    #[must_use]
    pub fn is_degraded(&self, from: usize, to: usize) -> bool {
        self.degraded.contains(&(from, to))
    }

    /// Every degraded `(from, to)` cell in row-major order.
    #[must_use]
    pub const fn degraded(&self) -> &BTreeSet<(usize, usize)> {
        &self.degraded
    }

    /// Time substituted for degraded cells during optimisation.
    ///
    /// The largest non-degraded off-diagonal time, or one second when no
    /// such cell exists.
    #[must_use]
    pub fn penalty(&self) -> Duration {
        self.durations
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, d)| (i, j, *d)))
            .filter(|(i, j, _)| i != j && !self.degraded.contains(&(*i, *j)))
            .map(|(_, _, d)| d)
            .max()
            .unwrap_or(Duration::from_secs(1))
    }

    /// Durations with every degraded cell replaced by [`Self::penalty`].
    #[must_use]
    pub fn penalised_durations(&self) -> Vec<Vec<Duration>> {
        let penalty = self.penalty();
        let mut durations = self.durations.clone();
        for &(i, j) in &self.degraded {
            if let Some(cell) = durations.get_mut(i).and_then(|row| row.get_mut(j)) {
                *cell = penalty;
            }
        }
        durations
    }

    /// Number of stops covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stop_ids.len()
    }

    /// Whether the matrix covers no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stop_ids.is_empty()
    }
}
