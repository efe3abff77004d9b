//! Corners of single-row and single-column swaths.
//!
//! A swath that is one footprint wide (e.g. a nadir-only track) has no
//! neighbour across the track to extrapolate from. Breaks are inferred along
//! the track and pushed out to both sides, perpendicular to the local track
//! direction, by half the local footprint spacing. The output keeps the
//! input layout: `(1, N)` centroids give `(2, N + 1)` corners and `(N, 1)`
//! centroids give `(N + 1, 2)`.

use chunked_array::CoordArray;
use ndarray::{ArrayViewD, Ix1};

use crate::corners::CornerPair;
use crate::ellipsoid::Ellipsoid;
use crate::error::Result;
use crate::interval::{break_steps, infer_interval_breaks};

/// Axis along which a one-footprint-wide swath runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Track {
    /// Shape `(1, N)`: the track runs along columns.
    Row,
    /// Shape `(N, 1)`: the track runs along rows.
    Column,
}

impl Track {
    /// Axis of length 1 in the centroid grid.
    fn cross_axis(self) -> usize {
        match self {
            Track::Row => 0,
            Track::Column => 1,
        }
    }

    /// Sign applied to the left-hand normal of the track for the first
    /// corner row/column. Row 0 of a single row lies to the left of the
    /// track; column 0 of a single column lies to its right.
    fn first_side(self) -> f64 {
        match self {
            Track::Row => 1.0,
            Track::Column => -1.0,
        }
    }

    /// The centroids as a 1D sequence along the track.
    fn samples(self, coord: &CoordArray) -> Result<CoordArray> {
        Ok(coord.index_axis(self.cross_axis(), 0)?)
    }

    /// Join the two sides into a 2D corner grid.
    fn assemble(self, first: &CoordArray, second: &CoordArray) -> Result<CoordArray> {
        let axis = self.cross_axis();
        Ok(CoordArray::concatenate(
            axis,
            &[first.broadcast_axis(axis, 1)?, second.broadcast_axis(axis, 1)?],
        )?)
    }
}

/// Breaks shifted by `side * offset / 2` in every component.
fn shifted(breaks: &[CoordArray], offset: &[CoordArray], side: f64) -> Result<Vec<CoordArray>> {
    breaks
        .iter()
        .zip(offset)
        .map(|(b, o)| -> Result<CoordArray> {
            Ok(CoordArray::weighted_sum(&[(b, 1.0), (o, 0.5 * side)])?)
        })
        .collect()
}

/// Corners of a projected single-row or single-column swath.
pub(crate) fn projection_track_corners(
    x: &CoordArray,
    y: &CoordArray,
    track: Track,
) -> Result<CornerPair> {
    let (x, y) = (track.samples(x)?, track.samples(y)?);
    let breaks = [infer_interval_breaks(&x, 0)?, infer_interval_breaks(&y, 0)?];
    let (tx, ty) = (break_steps(&x, 0)?, break_steps(&y, 0)?);

    // Left-hand normal of the track: (-ty, tx)
    let normal = [ty.mul_scalar(-1.0), tx];

    let first = shifted(&breaks, &normal, track.first_side())?;
    let second = shifted(&breaks, &normal, -track.first_side())?;
    Ok((
        track.assemble(&first[0], &second[0])?,
        track.assemble(&first[1], &second[1])?,
    ))
}

/// Corners of a longitude/latitude single-row or single-column swath.
///
/// Breaks are inferred along the track in degrees. Each break is then moved
/// along the geodesic perpendicular to the local track azimuth, by half the
/// geodesic length of the local footprint step.
pub(crate) fn lonlat_track_corners(
    lon: &CoordArray,
    lat: &CoordArray,
    track: Track,
) -> Result<CornerPair> {
    let (lon, lat) = (track.samples(lon)?, track.samples(lat)?);
    let stacked = CoordArray::stack(&[
        infer_interval_breaks(&lon, 0)?,
        infer_interval_breaks(&lat, 0)?,
        break_steps(&lon, 0)?,
        break_steps(&lat, 0)?,
    ])?;

    let first_side = track.first_side();
    let sides = stacked.map_blocks(&[1], move |block: ArrayViewD<'_, f64>| {
        let mut out = block.to_owned();
        for row in out.outer_iter_mut() {
            let Ok(mut row) = row.into_dimensionality::<Ix1>() else {
                continue;
            };
            let [first, second] = offset_break(
                &Ellipsoid::WGS84,
                [row[0], row[1]],
                [row[2], row[3]],
                first_side,
            );
            for (k, value) in first.into_iter().chain(second).enumerate() {
                row[k] = value;
            }
        }
        out
    })?;

    let side = |k: usize| -> Result<CoordArray> { Ok(sides.index_axis(1, k)?) };
    Ok((
        track.assemble(&side(0)?, &side(2)?)?,
        track.assemble(&side(1)?, &side(3)?)?,
    ))
}

/// The two cross-track corners of one break, first side first.
fn offset_break(
    ellipsoid: &Ellipsoid,
    point: [f64; 2],
    step: [f64; 2],
    first_side: f64,
) -> [[f64; 2]; 2] {
    let [lon, lat] = point;
    let (half_lon, half_lat) = (step[0] / 2.0, step[1] / 2.0);
    let span =
        ellipsoid.geodesic_inverse(lon - half_lon, lat - half_lat, lon + half_lon, lat + half_lat);
    let heading = ellipsoid
        .geodesic_inverse(lon, lat, lon + half_lon, lat + half_lat)
        .initial_azimuth;

    // Left of the track is at heading - 90
    let corner = |side: f64| {
        let (lon, lat) =
            ellipsoid.geodesic_direct(lon, lat, heading - 90.0 * side, span.distance / 2.0);
        [lon, lat]
    };
    [corner(first_side), corner(-first_side)]
}
