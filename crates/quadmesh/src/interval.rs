//! Interval inference: boundaries between consecutive samples.

use chunked_array::CoordArray;

use crate::error::{GeometryError, Result};

/// Infer the `N + 1` breaks around `N` ordered samples along `axis`.
///
/// Interior breaks are midpoints of neighbouring samples; the two outer
/// breaks extrapolate the first and last spacing by half a step. Lazy input
/// yields a lazy result.
///
/// ```
/// use chunked_array::CoordArray;
/// use quadmesh::infer_interval_breaks;
///
/// let breaks = infer_interval_breaks(&CoordArray::from_vec(vec![0.0, 10.0, 20.0]), 0).unwrap();
/// assert_eq!(breaks.to_array1().unwrap().to_vec(), vec![-5.0, 5.0, 15.0, 25.0]);
/// ```
pub fn infer_interval_breaks(coord: &CoordArray, axis: usize) -> Result<CoordArray> {
    if axis >= coord.ndim() {
        return Err(GeometryError::unsupported_dimensionality(
            "an axis within the array",
            coord.ndim(),
        ));
    }
    let n = coord.len_of(axis);
    if n < 2 {
        return Err(GeometryError::degenerate(format!(
            "at least 2 samples are needed along axis {axis} to infer breaks, got {n}"
        )));
    }

    let head = coord.slice_axis(axis, 0, n - 1)?;
    let tail = coord.slice_axis(axis, 1, n)?;
    let midpoints = CoordArray::weighted_sum(&[(&head, 0.5), (&tail, 0.5)])?;

    let (first, second) = (coord.slice_axis(axis, 0, 1)?, coord.slice_axis(axis, 1, 2)?);
    let (last, before_last) = (
        coord.slice_axis(axis, n - 1, n)?,
        coord.slice_axis(axis, n - 2, n - 1)?,
    );
    let start = CoordArray::weighted_sum(&[(&first, 1.5), (&second, -0.5)])?;
    let end = CoordArray::weighted_sum(&[(&last, 1.5), (&before_last, -0.5)])?;

    Ok(CoordArray::concatenate(axis, &[start, midpoints, end])?)
}

/// Step between consecutive samples along `axis`, assigned to each of the
/// `N + 1` breaks: the outer breaks reuse the first and last step, interior
/// break `k` takes the step between samples `k - 1` and `k`.
pub(crate) fn break_steps(coord: &CoordArray, axis: usize) -> Result<CoordArray> {
    let n = coord.len_of(axis);
    if n < 2 {
        return Err(GeometryError::degenerate(format!(
            "at least 2 samples are needed along axis {axis} to infer steps, got {n}"
        )));
    }
    let steps = coord
        .slice_axis(axis, 1, n)?
        .sub(&coord.slice_axis(axis, 0, n - 1)?)?;
    let first = steps.slice_axis(axis, 0, 1)?;
    let last = steps.slice_axis(axis, n - 2, n - 1)?;
    Ok(CoordArray::concatenate(axis, &[first, steps, last])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use test_utils::assert_allclose;

    #[test]
    fn test_breaks() {
        let breaks = infer_interval_breaks(&CoordArray::from_vec(vec![0.0, 10.0, 20.0]), 0).unwrap();
        assert_allclose!(breaks.to_array1().unwrap(), array![-5.0, 5.0, 15.0, 25.0]);
    }

    #[test]
    fn test_breaks_uneven_and_descending() {
        let breaks = infer_interval_breaks(&CoordArray::from_vec(vec![4.0, 2.0, -4.0]), 0).unwrap();
        assert_allclose!(breaks.to_array1().unwrap(), array![5.0, 3.0, -1.0, -7.0]);
    }

    #[test]
    fn test_breaks_along_axis_of_2d() {
        let coords = CoordArray::from(array![[0.0, 1.0], [10.0, 11.0]]);
        let breaks = infer_interval_breaks(&coords, 1).unwrap();
        assert_allclose!(
            breaks.to_array2().unwrap(),
            array![[-0.5, 0.5, 1.5], [9.5, 10.5, 11.5]]
        );
    }

    #[test]
    fn test_breaks_lazy_matches_eager() {
        let values = array![1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
        let eager = infer_interval_breaks(&CoordArray::from(values.clone()), 0).unwrap();
        for chunk in [1, 2, 4, 6] {
            let lazy = CoordArray::lazy(values.clone(), &[chunk]).unwrap();
            let breaks = infer_interval_breaks(&lazy, 0).unwrap();
            assert!(breaks.is_lazy());
            assert_allclose!(breaks.compute(), eager.compute());
        }
    }

    #[test]
    fn test_breaks_need_two_samples() {
        let err = infer_interval_breaks(&CoordArray::from_vec(vec![1.0]), 0).unwrap_err();
        assert_eq!(err.kind(), "degenerate_input");
    }

    #[test]
    fn test_break_steps() {
        let steps = break_steps(&CoordArray::from_vec(vec![0.0, 1.0, 3.0, 6.0]), 0).unwrap();
        assert_allclose!(steps.to_array1().unwrap(), array![1.0, 1.0, 2.0, 3.0, 3.0]);
    }
}
