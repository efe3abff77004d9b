//! Block-partitioned arrays with deferred computation.
//!
//! A [`LazyArray`] is a grid of blocks. Each block owns a kernel, a closure
//! that produces the block's values from blocks of other lazy arrays. Kernels
//! only run when a consumer asks for the block, and each block memoises its
//! result, so a graph built from many operations evaluates every block at
//! most once.

use std::fmt;
use std::sync::{Arc, OnceLock};

use ndarray::{ArrayD, ArrayViewD, Axis, Dimension, IxDyn, Slice, Zip};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::chunks::ChunkGrid;
use crate::config::ChunkConfig;
use crate::error::{ArrayError, Result};

type Kernel = dyn Fn() -> ArrayD<f64> + Send + Sync;

/// A deferred block: a kernel and its memoised result.
struct Block {
    value: OnceLock<Arc<ArrayD<f64>>>,
    kernel: Box<Kernel>,
}

impl Block {
    fn new(kernel: Box<Kernel>) -> Arc<Self> {
        Arc::new(Self {
            value: OnceLock::new(),
            kernel,
        })
    }

    fn get(&self) -> Arc<ArrayD<f64>> {
        self.value
            .get_or_init(|| Arc::new((self.kernel)()))
            .clone()
    }

    fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }
}

/// An n-dimensional `f64` array whose blocks are computed on demand.
///
/// Cloning is cheap: clones share the block graph.
#[derive(Clone)]
pub struct LazyArray {
    grid: ChunkGrid,
    blocks: Arc<Vec<Arc<Block>>>,
}

impl fmt::Debug for LazyArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyArray")
            .field("shape", &self.shape())
            .field("chunks", &self.grid)
            .field("evaluated_blocks", &self.evaluated_blocks())
            .finish()
    }
}

impl LazyArray {
    /// Build an array by creating one kernel per block index.
    fn build<F>(grid: ChunkGrid, mut make_kernel: F) -> Self
    where
        F: FnMut(&[usize]) -> Box<Kernel>,
    {
        let blocks = grid
            .block_indices()
            .iter()
            .map(|index| Block::new(make_kernel(index)))
            .collect();
        Self {
            grid,
            blocks: Arc::new(blocks),
        }
    }

    /// Partition an in-memory array into blocks of `chunk_shape`.
    pub fn from_array(array: ArrayD<f64>, chunk_shape: &[usize]) -> Result<Self> {
        let grid = ChunkGrid::regular(array.shape(), chunk_shape)?;
        Self::from_array_with_grid(array, grid)
    }

    /// Partition an in-memory array according to an existing grid.
    pub fn from_array_with_grid(array: ArrayD<f64>, grid: ChunkGrid) -> Result<Self> {
        if grid.shape() != array.shape() {
            return Err(ArrayError::shape_mismatch(array.shape(), &grid.shape()));
        }
        let source = Arc::new(array);
        let lazy = Self::build(grid.clone(), |index| {
            let source = Arc::clone(&source);
            let lo = grid.block_offset(index);
            let shape = grid.block_shape(index);
            Box::new(move || subview(&source, &lo, &shape).to_owned())
        });
        debug!(shape = ?lazy.shape(), blocks = lazy.num_blocks(), "Chunked array");
        Ok(lazy)
    }

    /// Shape of the array.
    pub fn shape(&self) -> Vec<usize> {
        self.grid.shape()
    }

    pub fn ndim(&self) -> usize {
        self.grid.ndim()
    }

    /// Block partitioning of the array.
    pub fn chunks(&self) -> &ChunkGrid {
        &self.grid
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Number of blocks whose values have already been computed.
    pub fn evaluated_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_evaluated()).count()
    }

    /// Values of the block at `index`, computing them if needed.
    pub fn block(&self, index: &[usize]) -> Arc<ArrayD<f64>> {
        self.blocks[self.grid.flat_index(index)].get()
    }

    /// Gather the hyper-rectangle starting at `start` with `shape` from the
    /// blocks that overlap it.
    pub fn region(&self, start: &[usize], shape: &[usize]) -> ArrayD<f64> {
        let mut out = ArrayD::zeros(IxDyn(shape));
        if shape.iter().any(|&len| len == 0) {
            return out;
        }

        let end: Vec<usize> = start.iter().zip(shape).map(|(s, l)| s + l).collect();
        let ranges: Vec<_> = (0..self.ndim())
            .map(|axis| self.grid.overlapping(axis, start[axis], end[axis]))
            .collect();
        let counts: Vec<usize> = ranges.iter().map(|r| r.len()).collect();

        for combo in ndarray::indices(IxDyn(&counts)) {
            let index: Vec<usize> = combo
                .slice()
                .iter()
                .zip(&ranges)
                .map(|(&c, r)| r.start + c)
                .collect();
            let block = self.block(&index);
            let offset = self.grid.block_offset(&index);
            let block_shape = self.grid.block_shape(&index);

            let lo: Vec<usize> = (0..index.len()).map(|k| start[k].max(offset[k])).collect();
            let hi: Vec<usize> = (0..index.len())
                .map(|k| end[k].min(offset[k] + block_shape[k]))
                .collect();

            let src_lo: Vec<usize> = lo.iter().zip(&offset).map(|(l, o)| l - o).collect();
            let extent: Vec<usize> = hi.iter().zip(&lo).map(|(h, l)| h - l).collect();
            let dst_lo: Vec<usize> = lo.iter().zip(start).map(|(l, s)| l - s).collect();

            let src = subview(&block, &src_lo, &extent);
            let mut dst = out.view_mut();
            for (axis, (&a, &n)) in dst_lo.iter().zip(&extent).enumerate() {
                dst.slice_axis_inplace(Axis(axis), Slice::from(a..a + n));
            }
            dst.assign(&src);
        }
        out
    }

    /// Materialise the array with the default configuration.
    pub fn compute(&self) -> ArrayD<f64> {
        self.compute_with(&ChunkConfig::default())
    }

    /// Materialise the array, evaluating blocks in parallel when
    /// `config.parallel` is set.
    pub fn compute_with(&self, config: &ChunkConfig) -> ArrayD<f64> {
        trace!(
            blocks = self.num_blocks(),
            parallel = config.parallel,
            "Computing lazy array"
        );
        let evaluated: Vec<Arc<ArrayD<f64>>> = if config.parallel {
            self.blocks.par_iter().map(|b| b.get()).collect()
        } else {
            self.blocks.iter().map(|b| b.get()).collect()
        };

        let mut out = ArrayD::zeros(IxDyn(&self.shape()));
        for (index, block) in self.grid.block_indices().iter().zip(evaluated) {
            let offset = self.grid.block_offset(index);
            let mut dst = out.view_mut();
            for (axis, (&o, &n)) in offset.iter().zip(block.shape()).enumerate() {
                dst.slice_axis_inplace(Axis(axis), Slice::from(o..o + n));
            }
            dst.assign(&*block);
        }
        out
    }

    /// Apply `f` to every element.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::build(self.grid.clone(), |index| {
            let src = self.clone();
            let index = index.to_vec();
            let f = Arc::clone(&f);
            Box::new(move || src.block(&index).mapv(|v| f(v)))
        })
    }

    /// Apply a shape-preserving function to every block.
    ///
    /// `f` must return an array of the same shape as its input.
    pub fn map_blocks<F>(&self, f: F) -> Self
    where
        F: Fn(ArrayViewD<'_, f64>) -> ArrayD<f64> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::build(self.grid.clone(), |index| {
            let src = self.clone();
            let index = index.to_vec();
            let f = Arc::clone(&f);
            Box::new(move || {
                let block = src.block(&index);
                let out = f(block.view());
                debug_assert_eq!(out.shape(), block.shape());
                out
            })
        })
    }

    /// Combine two arrays elementwise. `other` is rechunked to this array's
    /// grid when the grids differ.
    pub fn zip_with<F>(&self, other: &LazyArray, f: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        let other = other.aligned_to(&self.grid)?;
        let f = Arc::new(f);
        Ok(Self::build(self.grid.clone(), |index| {
            let a = self.clone();
            let b = other.clone();
            let index = index.to_vec();
            let f = Arc::clone(&f);
            Box::new(move || {
                let (x, y) = (a.block(&index), b.block(&index));
                Zip::from(&*x).and(&*y).map_collect(|&u, &v| f(u, v))
            })
        }))
    }

    /// Map three arrays elementwise to three outputs. Every block is computed
    /// once and shared by the three results.
    pub fn map3<F>(a: &LazyArray, b: &LazyArray, c: &LazyArray, f: F) -> Result<[Self; 3]>
    where
        F: Fn(f64, f64, f64) -> (f64, f64, f64) + Send + Sync + 'static,
    {
        let b = b.aligned_to(&a.grid)?;
        let c = c.aligned_to(&a.grid)?;
        let trailing = a.ndim();
        let f = Arc::new(f);
        let packed = Self::build(a.grid.insert_axis(trailing, 3), |index| {
            let (a, b, c) = (a.clone(), b.clone(), c.clone());
            let index = index[..trailing].to_vec();
            let f = Arc::clone(&f);
            Box::new(move || {
                let (x, y, z) = (a.block(&index), b.block(&index), c.block(&index));
                let mut p = ArrayD::zeros(x.raw_dim());
                let mut q = ArrayD::zeros(x.raw_dim());
                let mut r = ArrayD::zeros(x.raw_dim());
                Zip::from(&mut p)
                    .and(&mut q)
                    .and(&mut r)
                    .and(&*x)
                    .and(&*y)
                    .and(&*z)
                    .for_each(|p, q, r, &u, &v, &w| {
                        (*p, *q, *r) = f(u, v, w);
                    });
                stack_views(&[p.view(), q.view(), r.view()], trailing)
            })
        });
        Ok([
            packed.index_axis(trailing, 0)?,
            packed.index_axis(trailing, 1)?,
            packed.index_axis(trailing, 2)?,
        ])
    }

    fn aligned_to(&self, grid: &ChunkGrid) -> Result<Self> {
        if &self.grid == grid {
            Ok(self.clone())
        } else {
            self.rechunk(grid.clone())
        }
    }

    /// Repartition the array into a new grid of the same shape.
    pub fn rechunk(&self, grid: ChunkGrid) -> Result<Self> {
        if grid.shape() != self.shape() {
            return Err(ArrayError::shape_mismatch(&self.shape(), &grid.shape()));
        }
        if grid == self.grid {
            return Ok(self.clone());
        }
        Ok(Self::build(grid.clone(), |index| {
            let src = self.clone();
            let start = grid.block_offset(index);
            let shape = grid.block_shape(index);
            Box::new(move || src.region(&start, &shape))
        }))
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.ndim() {
            return Err(ArrayError::axis_out_of_range(axis, self.ndim()));
        }
        Ok(())
    }

    /// Elements `[start, end)` along `axis`.
    pub fn slice_axis(&self, axis: usize, start: usize, end: usize) -> Result<Self> {
        self.check_axis(axis)?;
        let len = self.shape()[axis];
        if start > end || end > len {
            return Err(ArrayError::out_of_bounds(axis, start, end, len));
        }
        let grid = self.grid.slice_axis(axis, start, end);
        Ok(Self::build(grid.clone(), |index| {
            let src = self.clone();
            let mut origin = grid.block_offset(index);
            origin[axis] += start;
            let shape = grid.block_shape(index);
            Box::new(move || src.region(&origin, &shape))
        }))
    }

    /// Join arrays along an existing axis.
    ///
    /// All parts are aligned to the first part's chunking on the other axes.
    pub fn concatenate(axis: usize, parts: &[LazyArray]) -> Result<Self> {
        let first = parts.first().ok_or(ArrayError::EmptyInput)?;
        first.check_axis(axis)?;

        let mut aligned = Vec::with_capacity(parts.len());
        for part in parts {
            let mut expected = first.shape();
            expected[axis] = part.shape().get(axis).copied().unwrap_or(0);
            if part.ndim() != first.ndim() || part.shape() != expected {
                return Err(ArrayError::shape_mismatch(&first.shape(), &part.shape()));
            }
            if part.shape()[axis] == 0 {
                continue;
            }
            let target = first
                .grid
                .with_axis(axis, part.grid.axis_chunks(axis).to_vec());
            aligned.push(part.aligned_to(&target)?);
        }

        if aligned.is_empty() {
            return Ok(first.clone());
        }

        // (part, local block) for every block along the joined axis
        let owners: Vec<(usize, usize)> = aligned
            .iter()
            .enumerate()
            .flat_map(|(p, part)| (0..part.grid.axis_chunks(axis).len()).map(move |b| (p, b)))
            .collect();
        let chunks: Vec<usize> = aligned
            .iter()
            .flat_map(|part| part.grid.axis_chunks(axis).to_vec())
            .collect();
        let grid = first.grid.with_axis(axis, chunks);

        Ok(Self::build(grid, |index| {
            let (p, local) = owners[index[axis]];
            let src = aligned[p].clone();
            let mut local_index = index.to_vec();
            local_index[axis] = local;
            Box::new(move || (*src.block(&local_index)).clone())
        }))
    }

    /// Stack arrays of identical shape along a new trailing axis.
    pub fn stack(parts: &[LazyArray]) -> Result<Self> {
        let first = parts.first().ok_or(ArrayError::EmptyInput)?;
        let aligned = parts
            .iter()
            .map(|part| {
                if part.shape() != first.shape() {
                    return Err(ArrayError::shape_mismatch(&first.shape(), &part.shape()));
                }
                part.aligned_to(&first.grid)
            })
            .collect::<Result<Vec<_>>>()?;

        let trailing = first.ndim();
        let grid = first.grid.insert_axis(trailing, parts.len());
        Ok(Self::build(grid, |index| {
            let parts = aligned.clone();
            let index = index[..trailing].to_vec();
            Box::new(move || {
                let blocks: Vec<_> = parts.iter().map(|p| p.block(&index)).collect();
                let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
                stack_views(&views, trailing)
            })
        }))
    }

    /// The sub-array at `index` along `axis`, with that axis removed.
    pub fn index_axis(&self, axis: usize, index: usize) -> Result<Self> {
        self.check_axis(axis)?;
        let len = self.shape()[axis];
        if index >= len {
            return Err(ArrayError::out_of_bounds(axis, index, index + 1, len));
        }
        let block_on_axis = self.grid.block_containing(axis, index);
        let local = index - self.grid.axis_offsets(axis)[block_on_axis];

        Ok(Self::build(self.grid.without_axis(axis), |out_index| {
            let src = self.clone();
            let mut src_index = out_index.to_vec();
            src_index.insert(axis, block_on_axis);
            Box::new(move || {
                src.block(&src_index)
                    .index_axis(Axis(axis), local)
                    .to_owned()
            })
        }))
    }

    /// Reverse the element order along `axis`.
    pub fn reverse_axis(&self, axis: usize) -> Result<Self> {
        self.check_axis(axis)?;
        let mut chunks = self.grid.axis_chunks(axis).to_vec();
        chunks.reverse();
        let n = chunks.len();
        let grid = self.grid.with_axis(axis, chunks);

        Ok(Self::build(grid, |index| {
            let src = self.clone();
            let mut src_index = index.to_vec();
            src_index[axis] = n - 1 - index[axis];
            Box::new(move || {
                let mut block = (*src.block(&src_index)).clone();
                block.invert_axis(Axis(axis));
                block.as_standard_layout().into_owned()
            })
        }))
    }

    /// Insert a new axis at `axis` along which the array is repeated `len`
    /// times.
    pub fn broadcast_axis(&self, axis: usize, len: usize) -> Result<Self> {
        if axis > self.ndim() {
            return Err(ArrayError::axis_out_of_range(axis, self.ndim() + 1));
        }
        Ok(Self::build(self.grid.insert_axis(axis, len), |index| {
            let src = self.clone();
            let mut src_index = index.to_vec();
            src_index.remove(axis);
            Box::new(move || repeat_along_new_axis(src.block(&src_index).view(), axis, len))
        }))
    }
}

/// View of `array` starting at `lo` with extent `shape`.
pub(crate) fn subview<'a>(
    array: &'a ArrayD<f64>,
    lo: &[usize],
    shape: &[usize],
) -> ArrayViewD<'a, f64> {
    let mut view = array.view();
    for (axis, (&start, &len)) in lo.iter().zip(shape).enumerate() {
        view.slice_axis_inplace(Axis(axis), Slice::from(start..start + len));
    }
    view
}

/// Stack views of identical shape along a new axis at position `axis`.
pub(crate) fn stack_views(views: &[ArrayViewD<'_, f64>], axis: usize) -> ArrayD<f64> {
    let shape = views.first().map(|v| v.shape().to_vec()).unwrap_or_default();
    let mut out_shape = shape;
    out_shape.insert(axis, views.len());
    let mut out = ArrayD::zeros(IxDyn(&out_shape));
    for (mut lane, view) in out.axis_iter_mut(Axis(axis)).zip(views) {
        lane.assign(view);
    }
    out
}

/// Repeat `view` `len` times along a new axis at position `axis`.
pub(crate) fn repeat_along_new_axis(view: ArrayViewD<'_, f64>, axis: usize, len: usize) -> ArrayD<f64> {
    let mut out_shape = view.shape().to_vec();
    out_shape.insert(axis, len);
    let mut out = ArrayD::zeros(IxDyn(&out_shape));
    for mut lane in out.axis_iter_mut(Axis(axis)) {
        lane.assign(&view);
    }
    out
}
