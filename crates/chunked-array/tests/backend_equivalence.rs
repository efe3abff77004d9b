//! Eager and lazy backends must agree on every capability.

use chunked_array::{ChunkConfig, CoordArray};
use ndarray::Array2;
use proptest::prelude::*;
use test_utils::{assert_allclose, ramp};

fn lazy(array: &Array2<f64>, chunks: (usize, usize)) -> CoordArray {
    CoordArray::lazy(array.clone(), &[chunks.0, chunks.1]).unwrap()
}

/// Interior differences along axis 1: `a[:, 1:] - a[:, :-1]`.
fn column_steps(coords: &CoordArray) -> CoordArray {
    let cols = coords.len_of(1);
    let right = coords.slice_axis(1, 1, cols).unwrap();
    let left = coords.slice_axis(1, 0, cols - 1).unwrap();
    right.sub(&left).unwrap()
}

#[test]
fn test_pipeline_matches_across_chunkings() {
    let data = ramp(7, 5);
    let eager = CoordArray::from(data.clone());
    let expected = column_steps(&eager).compute();

    for chunks in [(1, 1), (2, 3), (7, 5), (3, 2)] {
        let out = column_steps(&lazy(&data, chunks));
        assert!(out.is_lazy());
        assert_allclose!(out.compute(), expected);
    }
}

#[test]
fn test_repeated_compute_is_stable() {
    let data = ramp(4, 4);
    let coords = lazy(&data, (3, 3)).map(|v| v * 0.5);
    let first = coords.compute();
    let second = coords.compute_with(&ChunkConfig {
        parallel: false,
        ..ChunkConfig::default()
    });
    assert_eq!(first, second);
}

#[test]
fn test_into_lazy_uses_config() {
    let coords = CoordArray::from(ramp(10, 3))
        .into_lazy(&ChunkConfig::with_chunk_size(4))
        .unwrap();
    let grid = coords.chunks().unwrap();
    assert_eq!(grid.axis_chunks(0), &[4, 4, 2]);
    assert_eq!(grid.axis_chunks(1), &[3]);
}

proptest! {
    #[test]
    fn prop_slice_concat_reverse_agree(
        rows in 2usize..9,
        cols in 2usize..9,
        row_chunk in 1usize..5,
        col_chunk in 1usize..5,
        split in 0usize..9,
    ) {
        let data = ramp(rows, cols);
        let split = split.min(rows);
        let eager = CoordArray::from(data.clone());
        let chunked = lazy(&data, (row_chunk, col_chunk));

        for coords in [eager, chunked] {
            let top = coords.slice_axis(0, 0, split).unwrap();
            let bottom = coords.slice_axis(0, split, rows).unwrap();
            let rejoined = CoordArray::concatenate(0, &[top, bottom]).unwrap();
            prop_assert_eq!(rejoined.compute(), data.clone().into_dyn());

            let reversed = coords.reverse_axis(1).unwrap().reverse_axis(1).unwrap();
            prop_assert_eq!(reversed.compute(), data.clone().into_dyn());
        }
    }

    #[test]
    fn prop_stack_then_index_recovers_parts(
        rows in 1usize..6,
        cols in 1usize..6,
        chunk in 1usize..4,
    ) {
        let a = lazy(&ramp(rows, cols), (chunk, chunk));
        let b = CoordArray::from(ramp(rows, cols).mapv(|v| -v));
        let stacked = CoordArray::stack(&[a, b]).unwrap();
        prop_assert_eq!(stacked.shape(), vec![rows, cols, 2]);
        let second = stacked.index_axis(2, 1).unwrap();
        prop_assert_eq!(second.to_array2().unwrap(), ramp(rows, cols).mapv(|v| -v));
    }
}
