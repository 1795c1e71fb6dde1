//! Property tests for chunked matrix assembly.

use std::time::Duration;

use courier_core::matrix::chunk_count;
use courier_core::test_support::{StubMatrixProvider, delivery_at};
use courier_core::{DistanceMatrixBuilder, RequestDispatcher, Stop};
use proptest::prelude::*;

fn stops(count: usize) -> Vec<Stop> {
    (0..count)
        .zip(0_u64..)
        .map(|(offset, id)| {
            let step = f64::from(u32::try_from(offset).unwrap_or(u32::MAX));
            delivery_at(id, 53.8 + step * 0.005, -1.55 + step * 0.003)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chunk_count_matches_reports(m in 0_usize..25, chunk_size in 1_usize..=10) {
        let provider = StubMatrixProvider::default();
        let dispatcher = RequestDispatcher::unlimited();
        let build = DistanceMatrixBuilder::new(&provider, &dispatcher)
            .with_chunk_size(chunk_size)
            .build(&stops(m));
        prop_assert_eq!(build.reports.len(), chunk_count(m, chunk_size));
        prop_assert_eq!(chunk_count(m, chunk_size), m.div_ceil(chunk_size).pow(2));
    }

    #[test]
    fn every_cell_is_present_with_zero_diagonal(
        m in 1_usize..20,
        chunk_size in 1_usize..=10,
        failing in prop::collection::btree_set(0_usize..16, 0..4),
    ) {
        let provider = StubMatrixProvider::default().failing_on(failing);
        let dispatcher = RequestDispatcher::unlimited();
        let build = DistanceMatrixBuilder::new(&provider, &dispatcher)
            .with_chunk_size(chunk_size)
            .build(&stops(m));

        prop_assert_eq!(build.matrix.len(), m);
        for i in 0..m {
            prop_assert_eq!(build.matrix.duration(i, i), Some(Duration::ZERO));
            prop_assert!(!build.matrix.is_degraded(i, i));
            for j in 0..m {
                prop_assert!(build.matrix.duration(i, j).is_some());
                prop_assert!(build.matrix.distance(i, j).is_some());
                if build.matrix.is_degraded(i, j) {
                    prop_assert_eq!(build.matrix.duration(i, j), Some(Duration::ZERO));
                }
            }
        }
    }
}
