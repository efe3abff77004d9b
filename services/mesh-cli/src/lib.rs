//! `swath-mesh`: quadmesh geometry for coordinate documents.
//!
//! Reads a [`DatasetDocument`], optionally moves it to the lazy backend and
//! writes the requested geometry as
//! `{"kind": .., "order": .., "shape": [..], "data": ..}`.

pub mod config;

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use quadmesh::{orient_quadmesh, quadmesh_winding_counts, CoordArray};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use swath_common::VertexOrder;
use swath_dataset::{nested_values, polygon_rings, DatasetDocument, SwathDataset};
use tracing::{debug, info, Level};

pub use config::{Args, MeshConfig, OutputKind};

/// Geometry written by the tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshOutput {
    pub kind: OutputKind,
    pub order: VertexOrder,
    pub shape: Vec<usize>,
    pub data: Value,
}

/// Load the input document and compute the configured geometry.
pub fn run(config: &MeshConfig) -> Result<MeshOutput> {
    let dataset = DatasetDocument::from_path(&config.input)
        .with_context(|| format!("Failed to read {}", config.input.display()))?
        .into_dataset()
        .context("Invalid coordinate document")?;

    let layout = dataset.layout().context("Unrecognised dataset layout")?;
    info!(
        %layout,
        crs = dataset.crs(),
        coordinate_system = %dataset.coordinate_system(),
        "Loaded dataset"
    );

    let dataset = dataset.ensure_valid_coords(config.strict)?;
    let dataset = match &config.chunks {
        Some(chunks) => {
            debug!(chunk_size = chunks.chunk_size, "Using lazy backend");
            dataset.into_lazy(chunks)?
        }
        None => dataset,
    };

    build_output(&dataset, config)
}

/// Compute the configured geometry of an already loaded dataset.
pub fn build_output(dataset: &SwathDataset, config: &MeshConfig) -> Result<MeshOutput> {
    let order = config.order;
    let output = match config.output_kind {
        OutputKind::Vertices => {
            let vertices = mesh_vertices(dataset, config)?;
            let data = vertices.compute();
            MeshOutput {
                kind: OutputKind::Vertices,
                order,
                shape: data.shape().to_vec(),
                data: nested_values(&data.view()),
            }
        }
        OutputKind::Polygons => {
            let rings = polygon_rings(&mesh_vertices(dataset, config)?)?;
            MeshOutput {
                kind: OutputKind::Polygons,
                order,
                shape: vec![rings.len(), 5, 2],
                data: serde_json::to_value(&rings)?,
            }
        }
        OutputKind::Corners => {
            let (x, y) = dataset.quadmesh_corners()?;
            let (x_name, y_name) = dataset.coordinate_system().coordinate_names();
            let (x, y) = (x.compute(), y.compute());
            MeshOutput {
                kind: OutputKind::Corners,
                order,
                shape: x.shape().to_vec(),
                data: json!({
                    x_name: nested_values(&x.view()),
                    y_name: nested_values(&y.view()),
                }),
            }
        }
    };
    info!(kind = ?output.kind, shape = ?output.shape, "Computed geometry");
    Ok(output)
}

fn mesh_vertices(dataset: &SwathDataset, config: &MeshConfig) -> Result<CoordArray> {
    let vertices = dataset.quadmesh_vertices(config.order)?;
    if !config.normalize_winding {
        return Ok(vertices);
    }
    let oriented = orient_quadmesh(&vertices, config.order)?;
    // Counting evaluates the whole mesh
    if tracing::enabled!(Level::DEBUG) {
        let counts = quadmesh_winding_counts(&oriented)?;
        debug!(?counts, "Normalised cell winding");
    }
    Ok(oriented)
}

/// Write `output` to the configured file or stdout.
pub fn write_output(output: &MeshOutput, config: &MeshConfig) -> Result<()> {
    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, output)?;
            writer.flush()?;
            info!(path = %path.display(), "Wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer(&mut stdout, output)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunked_array::ChunkConfig;
    use std::path::PathBuf;
    use test_utils::fixtures;

    #[test]
    fn test_normalized_vertices_stay_unevaluated() {
        let doc: DatasetDocument =
            serde_json::from_value(fixtures::lonlat_swath_document()).unwrap();
        let dataset = doc
            .into_dataset()
            .unwrap()
            .into_lazy(&ChunkConfig::with_chunk_size(1))
            .unwrap();
        let config = MeshConfig {
            input: PathBuf::from("unused.json"),
            output: None,
            order: VertexOrder::CounterClockwise,
            output_kind: OutputKind::Vertices,
            chunks: None,
            normalize_winding: true,
            strict: false,
        };

        let vertices = mesh_vertices(&dataset, &config).unwrap();
        match vertices {
            CoordArray::Lazy(lazy) => assert_eq!(lazy.evaluated_blocks(), 0),
            CoordArray::Eager(_) => panic!("expected lazy vertices"),
        }
    }
}
