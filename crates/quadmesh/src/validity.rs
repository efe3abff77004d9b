//! Coordinate range checks and antimeridian detection.

use chunked_array::CoordArray;
use ndarray::{Array2, Zip};
use tracing::debug;

use crate::error::Result;
use crate::layout::{check_ndim, check_same_shape};

/// Longitude jump (degrees) between neighbouring cells that indicates a
/// wrap across the antimeridian.
pub const ANTIMERIDIAN_JUMP: f64 = 180.0;

/// Valid longitude range (degrees).
pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);

/// Valid latitude range (degrees).
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

#[inline]
fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    (min..=max).contains(&value)
}

#[inline]
fn is_valid_lonlat(lon: f64, lat: f64) -> bool {
    in_range(lon, LON_RANGE) && in_range(lat, LAT_RANGE)
}

/// Replace every position with an out-of-range or NaN longitude or latitude
/// by NaN in both arrays. Lazy input stays lazy.
pub fn mask_invalid_coords(lon: &CoordArray, lat: &CoordArray) -> Result<(CoordArray, CoordArray)> {
    check_same_shape(lon, lat)?;
    let masked_lon = lon.zip_with(lat, |lon, lat| {
        if is_valid_lonlat(lon, lat) {
            lon
        } else {
            f64::NAN
        }
    })?;
    let masked_lat = lat.zip_with(lon, |lat, lon| {
        if is_valid_lonlat(lon, lat) {
            lat
        } else {
            f64::NAN
        }
    })?;
    Ok((masked_lon, masked_lat))
}

/// Number of positions with an out-of-range or NaN coordinate. Forces
/// evaluation of lazy input.
pub fn count_invalid_coords(lon: &CoordArray, lat: &CoordArray) -> Result<usize> {
    check_same_shape(lon, lat)?;
    let (lon, lat) = (lon.compute(), lat.compute());
    let count = lon
        .iter()
        .zip(lat.iter())
        .filter(|&(&lon, &lat)| !is_valid_lonlat(lon, lat))
        .count();
    debug!(count, "Counted invalid coordinates");
    Ok(count)
}

/// Replace every value outside `range` (or NaN) by NaN. Used for the 1D
/// axes of a regular grid, where longitude and latitude are checked
/// independently. Lazy input stays lazy.
pub fn mask_out_of_range(coord: &CoordArray, range: (f64, f64)) -> CoordArray {
    coord.map(move |v| if in_range(v, range) { v } else { f64::NAN })
}

/// Number of values outside `range` (or NaN). Forces evaluation of lazy
/// input.
pub fn count_out_of_range(coord: &CoordArray, range: (f64, f64)) -> usize {
    coord.compute().iter().filter(|&&v| !in_range(v, range)).count()
}

/// Flag cells of a 2D longitude grid whose longitude differs from a row or
/// column neighbour by more than 180°. With `buffer`, every flagged cell
/// also flags its 3×3 neighbourhood. Forces evaluation of lazy input.
pub fn antimeridian_mask(lons: &CoordArray, buffer: bool) -> Result<Array2<bool>> {
    check_ndim(lons, 2, "2")?;
    let lons = lons.to_array2()?;
    let (rows, cols) = lons.dim();
    let mut mask = Array2::from_elem((rows, cols), false);

    let jumps = |a: f64, b: f64| (a - b).abs() > ANTIMERIDIAN_JUMP;
    for i in 0..rows {
        for j in 0..cols {
            if j + 1 < cols && jumps(lons[[i, j]], lons[[i, j + 1]]) {
                mask[[i, j]] = true;
                mask[[i, j + 1]] = true;
            }
            if i + 1 < rows && jumps(lons[[i, j]], lons[[i + 1, j]]) {
                mask[[i, j]] = true;
                mask[[i + 1, j]] = true;
            }
        }
    }

    if buffer {
        mask = dilate(&mask);
    }
    Ok(mask)
}

/// 3×3 binary dilation.
fn dilate(mask: &Array2<bool>) -> Array2<bool> {
    let (rows, cols) = mask.dim();
    let mut out = mask.clone();
    Zip::indexed(&mut out).for_each(|(i, j), cell| {
        let (i0, i1) = (i.saturating_sub(1), (i + 1).min(rows - 1));
        let (j0, j1) = (j.saturating_sub(1), (j + 1).min(cols - 1));
        *cell = (i0..=i1).any(|r| (j0..=j1).any(|c| mask[[r, c]]));
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mask_invalid_coords() {
        let lon = CoordArray::from(array![[0.0, 200.0], [f64::NAN, 10.0]]);
        let lat = CoordArray::from(array![[0.0, 10.0], [5.0, -95.0]]);
        let (lon_m, lat_m) = mask_invalid_coords(&lon, &lat).unwrap();
        let (lon_m, lat_m) = (lon_m.to_array2().unwrap(), lat_m.to_array2().unwrap());
        assert_eq!(lon_m[[0, 0]], 0.0);
        assert_eq!(lat_m[[0, 0]], 0.0);
        for idx in [[0, 1], [1, 0], [1, 1]] {
            assert!(lon_m[idx].is_nan());
            assert!(lat_m[idx].is_nan());
        }
        assert_eq!(count_invalid_coords(&lon, &lat).unwrap(), 3);
    }

    #[test]
    fn test_mask_invalid_coords_lazy() {
        let lon = CoordArray::lazy(array![[-180.0, 180.0, 181.0]], &[1, 2]).unwrap();
        let lat = CoordArray::lazy(array![[90.0, -90.0, 0.0]], &[1, 2]).unwrap();
        let (lon_m, _) = mask_invalid_coords(&lon, &lat).unwrap();
        assert!(lon_m.is_lazy());
        let lon_m = lon_m.to_array2().unwrap();
        assert_eq!(lon_m[[0, 1]], 180.0);
        assert!(lon_m[[0, 2]].is_nan());
    }

    #[test]
    fn test_antimeridian_mask() {
        let lons = CoordArray::from(array![
            [170.0, 175.0, -179.0, -174.0],
            [170.0, 175.0, 179.0, -176.0],
            [10.0, 11.0, 12.0, -13.0]
        ]);
        let mask = antimeridian_mask(&lons, false).unwrap();
        assert_eq!(
            mask,
            array![
                [false, true, true, false],
                [false, false, true, true],
                [false, false, false, false]
            ]
        );
        let buffered = antimeridian_mask(&lons, true).unwrap();
        assert!(buffered[[0, 0]]);
        assert!(buffered[[2, 1]]);
        assert!(!buffered[[2, 0]]);
        assert_eq!(buffered.iter().filter(|&&f| f).count(), 11);
    }

    #[test]
    fn test_antimeridian_mask_clean_grid() {
        let lons = CoordArray::from(array![[0.0, 10.0], [0.0, 10.0]]);
        assert!(!antimeridian_mask(&lons, true).unwrap().iter().any(|&f| f));
    }

    #[test]
    fn test_axis_ranges() {
        let lon = CoordArray::from_vec(vec![0.0, 500.0, 10.0]);
        let lat = CoordArray::lazy(array![95.0, 10.0], &[1]).unwrap();
        assert_eq!(count_out_of_range(&lon, LON_RANGE), 1);
        assert_eq!(count_out_of_range(&lat, LAT_RANGE), 1);

        let lat_m = mask_out_of_range(&lat, LAT_RANGE);
        assert!(lat_m.is_lazy());
        let lat_m = lat_m.to_array1().unwrap();
        assert!(lat_m[0].is_nan());
        assert_eq!(lat_m[1], 10.0);
    }
}
