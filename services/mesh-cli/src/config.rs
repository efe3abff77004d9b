//! Command line arguments and resolved run configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chunked_array::ChunkConfig;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use swath_common::VertexOrder;

/// What the tool writes for each dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// `(R, C, 4, 2)` quadmesh vertices
    #[default]
    Vertices,
    /// `(R+1, C+1)` corner grids of both coordinates
    Corners,
    /// One closed 5-point ring per cell
    Polygons,
}

#[derive(Parser, Debug)]
#[command(name = "swath-mesh")]
#[command(about = "Derive quadmesh geometry from swath or grid coordinates")]
pub struct Args {
    /// Input coordinate document (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Vertex order: clockwise or counterclockwise
    #[arg(long, env = "SWATH_MESH_ORDER", default_value = "counterclockwise")]
    pub order: String,

    /// Kind of geometry to write
    #[arg(long, value_enum, default_value_t = OutputKind::Vertices)]
    pub output_kind: OutputKind,

    /// Evaluate lazily with chunks of this length along every axis
    #[arg(long, env = "SWATH_MESH_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Reverse cells wound against the requested order
    #[arg(long)]
    pub normalize_winding: bool,

    /// Fail on out-of-range lon/lat values instead of masking them
    #[arg(long)]
    pub strict: bool,

    /// Log level
    #[arg(long, env = "SWATH_MESH_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub order: VertexOrder,
    pub output_kind: OutputKind,
    /// `None` keeps the eager backend
    pub chunks: Option<ChunkConfig>,
    pub normalize_winding: bool,
    pub strict: bool,
}

impl MeshConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let order = args
            .order
            .parse::<VertexOrder>()
            .context("Invalid --order / SWATH_MESH_ORDER")?;

        let chunks = match args.chunk_size {
            Some(0) => anyhow::bail!("--chunk-size must be positive"),
            Some(size) => Some(ChunkConfig {
                chunk_size: size,
                ..ChunkConfig::from_env()
            }),
            None => None,
        };

        Ok(Self {
            input: args.input.clone(),
            output: args.output.clone(),
            order,
            output_kind: args.output_kind,
            chunks,
            normalize_winding: args.normalize_winding,
            strict: args.strict,
        })
    }
}
