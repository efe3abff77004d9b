//! Backend-agnostic coordinate arrays.
//!
//! Geometry code is written once against [`CoordArray`]. Every operation
//! dispatches on the backend of its inputs: eager inputs produce eager
//! results immediately, lazy inputs extend the block graph. When eager and
//! lazy operands meet, the eager one is promoted to the lazy backend.

use ndarray::{
    Array, Array1, Array2, Array3, Array4, ArrayD, ArrayViewD, Axis, Dimension, Ix1, Ix2, Ix3,
    Ix4, IxDyn, Slice, Zip,
};
use swath_common::Backend;

use crate::chunks::ChunkGrid;
use crate::config::ChunkConfig;
use crate::error::{ArrayError, Result};
use crate::lazy::{repeat_along_new_axis, stack_views, LazyArray};

/// An `f64` coordinate array held either in memory or as a lazy block graph.
#[derive(Debug, Clone)]
pub enum CoordArray {
    Eager(ArrayD<f64>),
    Lazy(LazyArray),
}

impl<D: Dimension> From<Array<f64, D>> for CoordArray {
    fn from(array: Array<f64, D>) -> Self {
        Self::Eager(array.into_dyn())
    }
}

impl From<LazyArray> for CoordArray {
    fn from(array: LazyArray) -> Self {
        Self::Lazy(array)
    }
}

impl CoordArray {
    /// One-dimensional eager array.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Array1::from(values).into()
    }

    /// Eager array of `shape` from row-major values.
    pub fn from_shape_vec(shape: &[usize], values: Vec<f64>) -> Result<Self> {
        Ok(Self::Eager(ArrayD::from_shape_vec(IxDyn(shape), values)?))
    }

    /// Lazy array chunked into blocks of `chunk_shape`.
    pub fn lazy<D: Dimension>(array: Array<f64, D>, chunk_shape: &[usize]) -> Result<Self> {
        Ok(Self::Lazy(LazyArray::from_array(
            array.into_dyn(),
            chunk_shape,
        )?))
    }

    /// Lazy array chunked according to `config`.
    pub fn lazy_with_config<D: Dimension>(array: Array<f64, D>, config: &ChunkConfig) -> Result<Self> {
        let chunk_shape = config.chunk_shape_for(array.shape());
        Self::lazy(array, &chunk_shape)
    }

    /// This array on the lazy backend. Lazy arrays are returned unchanged.
    pub fn into_lazy(self, config: &ChunkConfig) -> Result<Self> {
        match self {
            Self::Eager(array) => Self::lazy_with_config(array, config),
            lazy @ Self::Lazy(_) => Ok(lazy),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Self::Eager(_) => Backend::Eager,
            Self::Lazy(_) => Backend::Lazy,
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Eager(a) => a.shape().to_vec(),
            Self::Lazy(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        match self {
            Self::Eager(a) => a.ndim(),
            Self::Lazy(a) => a.ndim(),
        }
    }

    /// Length along `axis`, or 0 when the axis does not exist.
    pub fn len_of(&self, axis: usize) -> usize {
        self.shape().get(axis).copied().unwrap_or(0)
    }

    /// True when the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.shape().iter().any(|&len| len == 0)
    }

    /// Block partitioning of a lazy array.
    pub fn chunks(&self) -> Option<&ChunkGrid> {
        match self {
            Self::Eager(_) => None,
            Self::Lazy(a) => Some(a.chunks()),
        }
    }

    /// Materialise the values.
    pub fn compute(&self) -> ArrayD<f64> {
        self.compute_with(&ChunkConfig::default())
    }

    pub fn compute_with(&self, config: &ChunkConfig) -> ArrayD<f64> {
        match self {
            Self::Eager(a) => a.clone(),
            Self::Lazy(a) => a.compute_with(config),
        }
    }

    pub fn to_array1(&self) -> Result<Array1<f64>> {
        Ok(self.compute().into_dimensionality::<Ix1>()?)
    }

    pub fn to_array2(&self) -> Result<Array2<f64>> {
        Ok(self.compute().into_dimensionality::<Ix2>()?)
    }

    pub fn to_array3(&self) -> Result<Array3<f64>> {
        Ok(self.compute().into_dimensionality::<Ix3>()?)
    }

    pub fn to_array4(&self) -> Result<Array4<f64>> {
        Ok(self.compute().into_dimensionality::<Ix4>()?)
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.ndim() {
            return Err(ArrayError::axis_out_of_range(axis, self.ndim()));
        }
        Ok(())
    }

    /// Elements `[start, end)` along `axis`.
    pub fn slice_axis(&self, axis: usize, start: usize, end: usize) -> Result<Self> {
        match self {
            Self::Eager(a) => {
                self.check_axis(axis)?;
                let len = a.len_of(Axis(axis));
                if start > end || end > len {
                    return Err(ArrayError::out_of_bounds(axis, start, end, len));
                }
                Ok(Self::Eager(
                    a.slice_axis(Axis(axis), Slice::from(start..end)).to_owned(),
                ))
            }
            Self::Lazy(a) => Ok(Self::Lazy(a.slice_axis(axis, start, end)?)),
        }
    }

    /// Sub-array at `index` along `axis`, with that axis removed.
    pub fn index_axis(&self, axis: usize, index: usize) -> Result<Self> {
        match self {
            Self::Eager(a) => {
                self.check_axis(axis)?;
                let len = a.len_of(Axis(axis));
                if index >= len {
                    return Err(ArrayError::out_of_bounds(axis, index, index + 1, len));
                }
                Ok(Self::Eager(a.index_axis(Axis(axis), index).to_owned()))
            }
            Self::Lazy(a) => Ok(Self::Lazy(a.index_axis(axis, index)?)),
        }
    }

    /// Reverse the element order along `axis`.
    pub fn reverse_axis(&self, axis: usize) -> Result<Self> {
        match self {
            Self::Eager(a) => {
                self.check_axis(axis)?;
                let mut out = a.clone();
                out.invert_axis(Axis(axis));
                Ok(Self::Eager(out.as_standard_layout().into_owned()))
            }
            Self::Lazy(a) => Ok(Self::Lazy(a.reverse_axis(axis)?)),
        }
    }

    /// Insert a new axis at `axis` along which the values repeat `len` times.
    pub fn broadcast_axis(&self, axis: usize, len: usize) -> Result<Self> {
        match self {
            Self::Eager(a) => {
                if axis > a.ndim() {
                    return Err(ArrayError::axis_out_of_range(axis, a.ndim() + 1));
                }
                Ok(Self::Eager(repeat_along_new_axis(a.view(), axis, len)))
            }
            Self::Lazy(a) => Ok(Self::Lazy(a.broadcast_axis(axis, len)?)),
        }
    }

    /// Repartition a lazy array so that each of `axes` lies in a single
    /// chunk. Eager arrays are returned unchanged.
    pub fn merge_chunks(&self, axes: &[usize]) -> Result<Self> {
        match self {
            Self::Eager(_) => Ok(self.clone()),
            Self::Lazy(a) => {
                let mut grid = a.chunks().clone();
                for &axis in axes {
                    self.check_axis(axis)?;
                    grid = grid.with_axis(axis, vec![a.shape()[axis]]);
                }
                Ok(Self::Lazy(a.rechunk(grid)?))
            }
        }
    }

    /// Apply `f` to every element.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        match self {
            Self::Eager(a) => Self::Eager(a.mapv(f)),
            Self::Lazy(a) => Self::Lazy(a.map(f)),
        }
    }

    /// Apply a shape-preserving function blockwise. Each of `whole_axes` is
    /// guaranteed to be complete within every block `f` sees.
    pub fn map_blocks<F>(&self, whole_axes: &[usize], f: F) -> Result<Self>
    where
        F: Fn(ArrayViewD<'_, f64>) -> ArrayD<f64> + Send + Sync + 'static,
    {
        match self.merge_chunks(whole_axes)? {
            Self::Eager(a) => {
                let out = f(a.view());
                if out.shape() != a.shape() {
                    return Err(ArrayError::shape_mismatch(a.shape(), out.shape()));
                }
                Ok(Self::Eager(out))
            }
            Self::Lazy(a) => Ok(Self::Lazy(a.map_blocks(f))),
        }
    }

    /// Combine two arrays of identical shape elementwise.
    pub fn zip_with<F>(&self, other: &CoordArray, f: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        match (self, other) {
            (Self::Eager(a), Self::Eager(b)) => {
                if a.shape() != b.shape() {
                    return Err(ArrayError::shape_mismatch(a.shape(), b.shape()));
                }
                Ok(Self::Eager(
                    Zip::from(a).and(b).map_collect(|&u, &v| f(u, v)),
                ))
            }
            (Self::Lazy(a), other) => {
                let b = other.promote_to(a.chunks())?;
                Ok(Self::Lazy(a.zip_with(&b, f)?))
            }
            (Self::Eager(_), Self::Lazy(b)) => {
                let a = self.promote_to(b.chunks())?;
                Ok(Self::Lazy(a.zip_with(b, f)?))
            }
        }
    }

    /// Map three arrays of identical shape elementwise to three outputs.
    pub fn map3<F>(a: &CoordArray, b: &CoordArray, c: &CoordArray, f: F) -> Result<[Self; 3]>
    where
        F: Fn(f64, f64, f64) -> (f64, f64, f64) + Send + Sync + 'static,
    {
        match (a, b, c) {
            (Self::Eager(x), Self::Eager(y), Self::Eager(z)) => {
                if x.shape() != y.shape() {
                    return Err(ArrayError::shape_mismatch(x.shape(), y.shape()));
                }
                if x.shape() != z.shape() {
                    return Err(ArrayError::shape_mismatch(x.shape(), z.shape()));
                }
                let mut p = ArrayD::zeros(x.raw_dim());
                let mut q = ArrayD::zeros(x.raw_dim());
                let mut r = ArrayD::zeros(x.raw_dim());
                Zip::from(&mut p)
                    .and(&mut q)
                    .and(&mut r)
                    .and(x)
                    .and(y)
                    .and(z)
                    .for_each(|p, q, r, &u, &v, &w| {
                        (*p, *q, *r) = f(u, v, w);
                    });
                Ok([Self::Eager(p), Self::Eager(q), Self::Eager(r)])
            }
            _ => {
                let grid = [a, b, c]
                    .into_iter()
                    .find_map(CoordArray::chunks)
                    .cloned()
                    .unwrap_or_else(|| ChunkGrid::single(&a.shape()));
                let x = a.promote_to(&grid)?;
                let y = b.promote_to(&grid)?;
                let z = c.promote_to(&grid)?;
                let [p, q, r] = LazyArray::map3(&x, &y, &z, f)?;
                Ok([Self::Lazy(p), Self::Lazy(q), Self::Lazy(r)])
            }
        }
    }

    /// This array as a lazy array. Eager arrays are chunked with `grid`.
    fn promote_to(&self, grid: &ChunkGrid) -> Result<LazyArray> {
        match self {
            Self::Eager(a) => LazyArray::from_array_with_grid(a.clone(), grid.clone()),
            Self::Lazy(a) => Ok(a.clone()),
        }
    }

    /// Join arrays along an existing axis.
    pub fn concatenate(axis: usize, parts: &[CoordArray]) -> Result<Self> {
        if parts.is_empty() {
            return Err(ArrayError::EmptyInput);
        }
        if parts.iter().all(|p| !p.is_lazy()) {
            let views: Vec<_> = parts.iter().filter_map(CoordArray::as_eager).collect();
            let first = &views[0];
            if axis >= first.ndim() {
                return Err(ArrayError::axis_out_of_range(axis, first.ndim()));
            }
            return Ok(Self::Eager(ndarray::concatenate(Axis(axis), &views)?));
        }
        let lazy = parts
            .iter()
            .map(|p| p.promote_to(&ChunkGrid::single(&p.shape())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Lazy(LazyArray::concatenate(axis, &lazy)?))
    }

    /// Stack arrays of identical shape along a new trailing axis.
    pub fn stack(parts: &[CoordArray]) -> Result<Self> {
        let first = parts.first().ok_or(ArrayError::EmptyInput)?;
        if let Some(other) = parts.iter().find(|p| p.shape() != first.shape()) {
            return Err(ArrayError::shape_mismatch(&first.shape(), &other.shape()));
        }
        if parts.iter().all(|p| !p.is_lazy()) {
            let views: Vec<_> = parts.iter().filter_map(CoordArray::as_eager).collect();
            return Ok(Self::Eager(stack_views(&views, first.ndim())));
        }
        let grid = parts
            .iter()
            .find_map(CoordArray::chunks)
            .cloned()
            .unwrap_or_else(|| ChunkGrid::single(&first.shape()));
        let lazy = parts
            .iter()
            .map(|p| p.promote_to(&grid))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Lazy(LazyArray::stack(&lazy)?))
    }

    fn as_eager(&self) -> Option<ArrayViewD<'_, f64>> {
        match self {
            Self::Eager(a) => Some(a.view()),
            Self::Lazy(_) => None,
        }
    }

    pub fn add(&self, other: &CoordArray) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &CoordArray) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &CoordArray) -> Result<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn mul_scalar(&self, factor: f64) -> Self {
        self.map(move |v| v * factor)
    }

    pub fn add_scalar(&self, offset: f64) -> Self {
        self.map(move |v| v + offset)
    }

    /// `Σ weight * term` over arrays of identical shape.
    pub fn weighted_sum(terms: &[(&CoordArray, f64)]) -> Result<Self> {
        let ((first, w0), rest) = terms.split_first().ok_or(ArrayError::EmptyInput)?;
        let w0 = *w0;
        let mut acc = first.mul_scalar(w0);
        for &(term, weight) in rest {
            acc = acc.zip_with(term, move |a, b| a + weight * b)?;
        }
        Ok(acc)
    }
}
