//! Block partitioning of n-dimensional arrays.

use std::ops::Range;

use ndarray::{Dimension, IxDyn};
use serde::{Deserialize, Serialize};

use crate::error::{ArrayError, Result};

/// Per-axis chunk sizes of a block-partitioned array.
///
/// Axis `k` of the array is split into `chunks[k].len()` consecutive blocks
/// whose lengths sum to the axis length. An empty axis is represented by a
/// single chunk of length 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkGrid {
    chunks: Vec<Vec<usize>>,
}

impl ChunkGrid {
    /// Create a grid from explicit chunk sizes.
    pub fn new(chunks: Vec<Vec<usize>>) -> Result<Self> {
        for (axis, sizes) in chunks.iter().enumerate() {
            let valid = match sizes.as_slice() {
                [] => false,
                [0] => true,
                _ => sizes.iter().all(|&c| c > 0),
            };
            if !valid {
                return Err(ArrayError::InvalidChunks {
                    axis,
                    chunks: sizes.clone(),
                });
            }
        }
        Ok(Self { chunks })
    }

    /// Split every axis into chunks of `chunk_shape` (the last chunk of an
    /// axis may be shorter).
    pub fn regular(shape: &[usize], chunk_shape: &[usize]) -> Result<Self> {
        if shape.len() != chunk_shape.len() || chunk_shape.iter().any(|&c| c == 0) {
            return Err(ArrayError::InvalidChunkShape {
                shape: shape.to_vec(),
                chunks: chunk_shape.to_vec(),
            });
        }

        let chunks = shape
            .iter()
            .zip(chunk_shape)
            .map(|(&len, &size)| split_axis(len, size))
            .collect();
        Ok(Self { chunks })
    }

    /// A grid holding the whole array in one block.
    pub fn single(shape: &[usize]) -> Self {
        Self {
            chunks: shape.iter().map(|&len| vec![len]).collect(),
        }
    }

    /// Shape of the partitioned array.
    pub fn shape(&self) -> Vec<usize> {
        self.chunks.iter().map(|c| c.iter().sum()).collect()
    }

    pub fn ndim(&self) -> usize {
        self.chunks.len()
    }

    /// Chunk sizes along one axis.
    pub fn axis_chunks(&self, axis: usize) -> &[usize] {
        &self.chunks[axis]
    }

    /// Number of blocks along each axis.
    pub fn blocks_per_axis(&self) -> Vec<usize> {
        self.chunks.iter().map(Vec::len).collect()
    }

    /// Total number of blocks.
    pub fn num_blocks(&self) -> usize {
        self.chunks.iter().map(Vec::len).product()
    }

    /// Start offsets of every block along an axis, plus the axis length.
    pub fn axis_offsets(&self, axis: usize) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.chunks[axis].len() + 1);
        let mut acc = 0;
        offsets.push(acc);
        for &c in &self.chunks[axis] {
            acc += c;
            offsets.push(acc);
        }
        offsets
    }

    /// Element offset of the block at `index`.
    pub fn block_offset(&self, index: &[usize]) -> Vec<usize> {
        index
            .iter()
            .enumerate()
            .map(|(axis, &b)| self.chunks[axis][..b].iter().sum())
            .collect()
    }

    /// Shape of the block at `index`.
    pub fn block_shape(&self, index: &[usize]) -> Vec<usize> {
        index
            .iter()
            .enumerate()
            .map(|(axis, &b)| self.chunks[axis][b])
            .collect()
    }

    /// Row-major position of the block at `index`.
    pub fn flat_index(&self, index: &[usize]) -> usize {
        index
            .iter()
            .zip(&self.chunks)
            .fold(0, |acc, (&b, chunks)| acc * chunks.len() + b)
    }

    /// All block indices in row-major order.
    pub fn block_indices(&self) -> Vec<Vec<usize>> {
        ndarray::indices(IxDyn(&self.blocks_per_axis()))
            .into_iter()
            .map(|idx| idx.slice().to_vec())
            .collect()
    }

    /// Block indices along `axis` whose extent intersects `[start, end)`.
    pub fn overlapping(&self, axis: usize, start: usize, end: usize) -> Range<usize> {
        let offsets = self.axis_offsets(axis);
        let n = self.chunks[axis].len();
        if start >= end {
            return 0..0;
        }
        let first = (0..n).find(|&b| offsets[b + 1] > start).unwrap_or(n);
        let last = (first..n).take_while(|&b| offsets[b] < end).last();
        match last {
            Some(last) => first..last + 1,
            None => first..first,
        }
    }

    /// Block index along `axis` containing element `position`.
    pub fn block_containing(&self, axis: usize, position: usize) -> usize {
        self.overlapping(axis, position, position + 1).start
    }

    /// Replace the chunks of one axis.
    pub fn with_axis(&self, axis: usize, chunks: Vec<usize>) -> Self {
        let mut grid = self.clone();
        grid.chunks[axis] = chunks;
        grid
    }

    /// Remove one axis.
    pub fn without_axis(&self, axis: usize) -> Self {
        let mut grid = self.clone();
        grid.chunks.remove(axis);
        grid
    }

    /// Insert a new axis of length `len` held in a single chunk.
    pub fn insert_axis(&self, axis: usize, len: usize) -> Self {
        let mut grid = self.clone();
        grid.chunks.insert(axis, vec![len]);
        grid
    }

    /// Restrict one axis to `[start, end)`, keeping the original chunk
    /// boundaries that fall inside the range.
    pub fn slice_axis(&self, axis: usize, start: usize, end: usize) -> Self {
        if start >= end {
            return self.with_axis(axis, vec![0]);
        }
        let offsets = self.axis_offsets(axis);
        let chunks = self
            .overlapping(axis, start, end)
            .map(|b| offsets[b + 1].min(end) - offsets[b].max(start))
            .collect();
        self.with_axis(axis, chunks)
    }
}

/// Split an axis of `len` elements into chunks of at most `size`.
fn split_axis(len: usize, size: usize) -> Vec<usize> {
    if len == 0 {
        return vec![0];
    }
    let mut chunks = vec![size; len / size];
    if len % size != 0 {
        chunks.push(len % size);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_grid() {
        let grid = ChunkGrid::regular(&[5, 4], &[2, 4]).unwrap();
        assert_eq!(grid.axis_chunks(0), &[2, 2, 1]);
        assert_eq!(grid.axis_chunks(1), &[4]);
        assert_eq!(grid.shape(), vec![5, 4]);
        assert_eq!(grid.num_blocks(), 3);
        assert_eq!(grid.block_offset(&[2, 0]), vec![4, 0]);
        assert_eq!(grid.block_shape(&[2, 0]), vec![1, 4]);
    }

    #[test]
    fn test_regular_grid_rejects_bad_chunks() {
        assert!(ChunkGrid::regular(&[5, 4], &[2]).is_err());
        assert!(ChunkGrid::regular(&[5, 4], &[0, 2]).is_err());
        assert!(ChunkGrid::new(vec![vec![2, 0]]).is_err());
        assert!(ChunkGrid::new(vec![vec![]]).is_err());
    }

    #[test]
    fn test_empty_axis() {
        let grid = ChunkGrid::regular(&[0, 3], &[2, 2]).unwrap();
        assert_eq!(grid.axis_chunks(0), &[0]);
        assert_eq!(grid.shape(), vec![0, 3]);
    }

    #[test]
    fn test_flat_index_is_row_major() {
        let grid = ChunkGrid::regular(&[4, 6], &[2, 2]).unwrap();
        let indices = grid.block_indices();
        assert_eq!(indices.len(), 6);
        for (flat, index) in indices.iter().enumerate() {
            assert_eq!(grid.flat_index(index), flat);
        }
        assert_eq!(indices[1], vec![0, 1]);
    }

    #[test]
    fn test_overlapping() {
        let grid = ChunkGrid::regular(&[10], &[3]).unwrap(); // 3,3,3,1
        assert_eq!(grid.overlapping(0, 0, 3), 0..1);
        assert_eq!(grid.overlapping(0, 2, 4), 0..2);
        assert_eq!(grid.overlapping(0, 9, 10), 3..4);
        assert_eq!(grid.overlapping(0, 4, 4), 0..0);
        assert_eq!(grid.block_containing(0, 6), 2);
    }

    #[test]
    fn test_slice_axis() {
        let grid = ChunkGrid::regular(&[10], &[3]).unwrap();
        let sliced = grid.slice_axis(0, 2, 8);
        assert_eq!(sliced.axis_chunks(0), &[1, 3, 2]);
        assert_eq!(sliced.shape(), vec![6]);
        assert_eq!(grid.slice_axis(0, 5, 5).axis_chunks(0), &[0]);
    }
}
