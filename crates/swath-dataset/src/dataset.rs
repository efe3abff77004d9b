//! Swath and grid datasets and their quadmesh accessors.

use std::collections::BTreeMap;
use std::fmt;

use chunked_array::{ChunkConfig, CoordArray};
use ndarray::Array2;
use quadmesh::{
    antimeridian_mask, count_invalid_coords, count_out_of_range,
    get_lonlat_corners_from_centroids, get_lonlat_quadmesh_vertices,
    get_projection_corners_from_centroids, get_projection_quadmesh_vertices,
    mask_invalid_coords, mask_out_of_range, quadmesh_extent, CornerPair, LAT_RANGE, LON_RANGE,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use swath_common::{BoundingBox, CoordinateSystem, VertexOrder};
use tracing::{debug, warn};

use crate::error::{DatasetError, DatasetResult};
use crate::labeled::LabeledArray;

/// Dimension names that mark satellite orbit geometry.
pub const ORBIT_DIMS: [&str; 2] = ["along_track", "cross_track"];

/// Spatial arrangement of a dataset's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpatialLayout {
    /// Scan lines along the satellite track
    Orbit,
    /// A regular or curvilinear map grid
    Grid,
}

impl fmt::Display for SpatialLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialLayout::Orbit => write!(f, "orbit"),
            SpatialLayout::Grid => write!(f, "grid"),
        }
    }
}

/// Closed polygon ring of one cell: four vertices plus the first repeated.
pub type Ring = [[f64; 2]; 5];

/// A set of named coordinate arrays sharing one coordinate system.
#[derive(Debug, Clone)]
pub struct SwathDataset {
    crs: String,
    coordinate_system: CoordinateSystem,
    dims: Vec<String>,
    coords: BTreeMap<String, LabeledArray>,
    /// Free-form dataset metadata
    pub attrs: Map<String, Value>,
}

impl SwathDataset {
    /// Create an empty dataset with the given CRS string and dimensions.
    pub fn new<S: Into<String>>(crs: &str, dims: impl IntoIterator<Item = S>) -> DatasetResult<Self> {
        Ok(Self {
            crs: crs.to_string(),
            coordinate_system: CoordinateSystem::from_crs_string(crs)?,
            dims: dims.into_iter().map(Into::into).collect(),
            coords: BTreeMap::new(),
            attrs: Map::new(),
        })
    }

    /// Add or replace a coordinate. Every dimension of the coordinate must
    /// be one of the dataset's dimensions.
    pub fn with_coord(mut self, name: &str, coord: LabeledArray) -> DatasetResult<Self> {
        if let Some(unknown) = coord.dims().iter().find(|d| !self.dims.contains(d)) {
            return Err(DatasetError::InvalidFormat(format!(
                "coordinate '{name}' uses dimension '{unknown}' not in {:?}",
                self.dims
            )));
        }
        self.coords.insert(name.to_string(), coord);
        Ok(self)
    }

    pub fn crs(&self) -> &str {
        &self.crs
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn coords(&self) -> &BTreeMap<String, LabeledArray> {
        &self.coords
    }

    /// The coordinate called `name`.
    pub fn coord(&self, name: &str) -> DatasetResult<&LabeledArray> {
        self.coords
            .get(name)
            .ok_or_else(|| DatasetError::MissingCoordinate(name.to_string()))
    }

    /// Classify the dataset as an orbit swath or a map grid by its dimension
    /// names.
    pub fn layout(&self) -> DatasetResult<SpatialLayout> {
        let has = |name: &str| self.dims.iter().any(|d| d == name);
        if ORBIT_DIMS.iter().any(|d| has(d)) {
            Ok(SpatialLayout::Orbit)
        } else if (has("lon") && has("lat")) || (has("x") && has("y")) {
            Ok(SpatialLayout::Grid)
        } else {
            Err(DatasetError::UnknownLayout(self.dims.clone()))
        }
    }

    /// The centroid pair `(x, y)` or `(lon, lat)` for the dataset's
    /// coordinate system.
    pub fn quadmesh_centroids(&self) -> DatasetResult<(CoordArray, CoordArray)> {
        let (x_name, y_name) = self.coordinate_system.coordinate_names();
        Ok((
            self.coord(x_name)?.data().clone(),
            self.coord(y_name)?.data().clone(),
        ))
    }

    /// Corner grids of the centroid pair.
    pub fn quadmesh_corners(&self) -> DatasetResult<CornerPair> {
        let (x, y) = self.quadmesh_centroids()?;
        let corners = if self.coordinate_system.is_geographic() {
            get_lonlat_corners_from_centroids(&x, &y)?
        } else {
            get_projection_corners_from_centroids(&x, &y)?
        };
        Ok(corners)
    }

    /// `(R, C, 4, 2)` quadmesh vertices in `order`.
    pub fn quadmesh_vertices(&self, order: VertexOrder) -> DatasetResult<CoordArray> {
        let (x, y) = self.quadmesh_centroids()?;
        debug!(
            layout = ?self.layout().ok(),
            crs = %self.crs,
            backend = %x.backend(),
            "Deriving quadmesh vertices"
        );
        let vertices = if self.coordinate_system.is_geographic() {
            get_lonlat_quadmesh_vertices(&x, &y, order)?
        } else {
            get_projection_quadmesh_vertices(&x, &y, order)?
        };
        Ok(vertices)
    }

    /// One closed ring per cell, in row-major cell order. Forces evaluation.
    pub fn quadmesh_polygons(&self, order: VertexOrder) -> DatasetResult<Vec<Ring>> {
        polygon_rings(&self.quadmesh_vertices(order)?)
    }

    /// Bounding box of every finite quadmesh vertex.
    pub fn extent(&self) -> DatasetResult<Option<BoundingBox>> {
        let vertices = self.quadmesh_vertices(VertexOrder::default())?;
        Ok(quadmesh_extent(&vertices)?)
    }

    /// Cells next to an antimeridian crossing. Projected datasets and 1D
    /// longitude axes never cross.
    pub fn antimeridian_mask(&self, buffer: bool) -> DatasetResult<Array2<bool>> {
        let (x, y) = self.quadmesh_centroids()?;
        if !self.coordinate_system.is_geographic() || x.ndim() != 2 {
            let shape = if x.ndim() == 2 {
                (x.len_of(0), x.len_of(1))
            } else {
                (y.len_of(0), x.len_of(0))
            };
            return Ok(Array2::from_elem(shape, false));
        }
        Ok(antimeridian_mask(&x, buffer)?)
    }

    /// Check lon/lat ranges. With `strict`, any invalid value is an error;
    /// otherwise invalid positions are set to NaN with a warning. Paired 2D
    /// grids are masked jointly; the 1D axes of a regular grid are checked
    /// and masked each on its own. Projected datasets are returned unchanged.
    pub fn ensure_valid_coords(self, strict: bool) -> DatasetResult<Self> {
        if !self.coordinate_system.is_geographic() {
            return Ok(self);
        }
        let (lon, lat) = self.quadmesh_centroids()?;
        let axes = lon.ndim() == 1 && lat.ndim() == 1;
        let invalid = if axes {
            count_out_of_range(&lon, LON_RANGE) + count_out_of_range(&lat, LAT_RANGE)
        } else {
            count_invalid_coords(&lon, &lat)?
        };
        if invalid == 0 {
            return Ok(self);
        }
        if strict {
            return Err(DatasetError::InvalidCoordinates(invalid));
        }

        warn!(count = invalid, axes, "Masking invalid lon/lat coordinates");
        let (lon_masked, lat_masked) = if axes {
            (
                mask_out_of_range(&lon, LON_RANGE),
                mask_out_of_range(&lat, LAT_RANGE),
            )
        } else {
            mask_invalid_coords(&lon, &lat)?
        };
        let lon_coord = self.coord("lon")?.with_data(lon_masked);
        let lat_coord = self.coord("lat")?.with_data(lat_masked);
        self.with_coord("lon", lon_coord)?.with_coord("lat", lat_coord)
    }

    /// Every coordinate moved to the lazy backend.
    pub fn into_lazy(self, config: &ChunkConfig) -> DatasetResult<Self> {
        let coords = self
            .coords
            .into_iter()
            .map(|(name, coord)| Ok((name, coord.into_lazy(config)?)))
            .collect::<DatasetResult<BTreeMap<_, _>>>()?;
        Ok(Self { coords, ..self })
    }
}

/// Closed rings of an `(R, C, 4, 2)` quadmesh, row-major. Forces evaluation.
pub fn polygon_rings(vertices: &CoordArray) -> DatasetResult<Vec<Ring>> {
    let mesh = vertices.to_array4()?;
    let mut rings = Vec::with_capacity(mesh.shape()[0] * mesh.shape()[1]);
    for row in mesh.outer_iter() {
        for cell in row.outer_iter() {
            if cell.shape() != [4, 2] {
                return Err(DatasetError::InvalidFormat(format!(
                    "expected (R, C, 4, 2) vertices, got cells of shape {:?}",
                    cell.shape()
                )));
            }
            let mut ring = [[0.0; 2]; 5];
            for (k, point) in ring.iter_mut().enumerate() {
                let v = k % 4;
                *point = [cell[[v, 0]], cell[[v, 1]]];
            }
            rings.push(ring);
        }
    }
    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use test_utils::{assert_allclose, fixtures::wgs84};

    fn swath() -> SwathDataset {
        let dims = ["along_track", "cross_track"];
        SwathDataset::new("EPSG:4326", dims)
            .unwrap()
            .with_coord("lon", LabeledArray::new("lon", dims, wgs84::lons().into()).unwrap())
            .unwrap()
            .with_coord("lat", LabeledArray::new("lat", dims, wgs84::lats().into()).unwrap())
            .unwrap()
    }

    fn grid() -> SwathDataset {
        SwathDataset::new("EPSG:32633", ["y", "x"])
            .unwrap()
            .with_coord("x", LabeledArray::new("x", ["x"], array![0.0, 10.0, 20.0].into()).unwrap())
            .unwrap()
            .with_coord("y", LabeledArray::new("y", ["y"], array![0.0, 10.0].into()).unwrap())
            .unwrap()
    }

    #[test]
    fn test_layout() {
        assert_eq!(swath().layout().unwrap(), SpatialLayout::Orbit);
        assert_eq!(grid().layout().unwrap(), SpatialLayout::Grid);
        let other = SwathDataset::new("EPSG:4326", ["time"]).unwrap();
        assert!(matches!(other.layout(), Err(DatasetError::UnknownLayout(_))));
    }

    #[test]
    fn test_swath_corners() {
        let (lon, lat) = swath().quadmesh_corners().unwrap();
        assert_allclose!(lon.to_array2().unwrap(), wgs84::lon_corners(), wgs84::TOLERANCE);
        assert_allclose!(lat.to_array2().unwrap(), wgs84::lat_corners(), wgs84::TOLERANCE);
    }

    #[test]
    fn test_grid_vertices_from_axes() {
        let vertices = grid().quadmesh_vertices(VertexOrder::CounterClockwise).unwrap();
        assert_eq!(vertices.shape(), vec![2, 3, 4, 2]);
        let extent = grid().extent().unwrap().unwrap();
        assert_eq!(extent, BoundingBox::new(-5.0, -5.0, 25.0, 15.0));
    }

    #[test]
    fn test_polygons_are_closed() {
        let rings = grid().quadmesh_polygons(VertexOrder::CounterClockwise).unwrap();
        assert_eq!(rings.len(), 6);
        for ring in &rings {
            assert_eq!(ring[0], ring[4]);
        }
        assert_eq!(rings[0], [[-5.0, 15.0], [-5.0, 5.0], [5.0, 5.0], [5.0, 15.0], [-5.0, 15.0]]);
    }

    #[test]
    fn test_missing_coordinate() {
        let ds = SwathDataset::new("EPSG:4326", ["lat", "lon"]).unwrap();
        assert!(matches!(
            ds.quadmesh_vertices(VertexOrder::Clockwise),
            Err(DatasetError::MissingCoordinate(name)) if name == "lon"
        ));
    }

    #[test]
    fn test_unknown_dimension_rejected() {
        let coord = LabeledArray::new("lon", ["scan"], array![0.0].into()).unwrap();
        let err = SwathDataset::new("EPSG:4326", ["lon"])
            .unwrap()
            .with_coord("lon", coord)
            .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidFormat(_)));
    }

    #[test]
    fn test_ensure_valid_coords() {
        let dims = ["along_track", "cross_track"];
        let ds = SwathDataset::new("EPSG:4326", dims)
            .unwrap()
            .with_coord("lon", LabeledArray::new("lon", dims, array![[0.0, 500.0]].into()).unwrap())
            .unwrap()
            .with_coord("lat", LabeledArray::new("lat", dims, array![[0.0, 0.0]].into()).unwrap())
            .unwrap();

        assert!(matches!(
            ds.clone().ensure_valid_coords(true),
            Err(DatasetError::InvalidCoordinates(1))
        ));
        let masked = ds.ensure_valid_coords(false).unwrap();
        let lat = masked.coord("lat").unwrap().data().to_array2().unwrap();
        assert_eq!(lat[[0, 0]], 0.0);
        assert!(lat[[0, 1]].is_nan());
    }

    #[test]
    fn test_ensure_valid_coords_on_axes() {
        let ds = SwathDataset::new("EPSG:4326", ["lat", "lon"])
            .unwrap()
            .with_coord("lon", LabeledArray::new("lon", ["lon"], array![0.0, 500.0, 10.0].into()).unwrap())
            .unwrap()
            .with_coord("lat", LabeledArray::new("lat", ["lat"], array![95.0, 10.0].into()).unwrap())
            .unwrap();

        assert!(matches!(
            ds.clone().ensure_valid_coords(true),
            Err(DatasetError::InvalidCoordinates(2))
        ));
        let masked = ds.ensure_valid_coords(false).unwrap();
        let lon = masked.coord("lon").unwrap().data().to_array1().unwrap();
        let lat = masked.coord("lat").unwrap().data().to_array1().unwrap();
        assert_eq!(lon[0], 0.0);
        assert!(lon[1].is_nan());
        assert_eq!(lon[2], 10.0);
        assert!(lat[0].is_nan());
        assert_eq!(lat[1], 10.0);
    }

    #[test]
    fn test_antimeridian_mask() {
        let dims = ["along_track", "cross_track"];
        let ds = SwathDataset::new("EPSG:4326", dims)
            .unwrap()
            .with_coord("lon", LabeledArray::new("lon", dims, array![[179.0, -179.0], [178.0, 179.5]].into()).unwrap())
            .unwrap()
            .with_coord("lat", LabeledArray::new("lat", dims, array![[1.0, 1.0], [0.0, 0.0]].into()).unwrap())
            .unwrap();
        assert_eq!(ds.antimeridian_mask(false).unwrap(), array![[true, true], [false, true]]);
        assert_eq!(grid().antimeridian_mask(false).unwrap().dim(), (2, 3));
    }

    #[test]
    fn test_into_lazy_keeps_values() {
        let lazy = swath().into_lazy(&ChunkConfig::with_chunk_size(1)).unwrap();
        let vertices = lazy.quadmesh_vertices(VertexOrder::Clockwise).unwrap();
        assert!(vertices.is_lazy());
        let eager = swath().quadmesh_vertices(VertexOrder::Clockwise).unwrap();
        assert_allclose!(vertices.compute(), eager.compute(), 1e-9);
    }
}
