//! Configuration for lazy array construction and evaluation.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Default chunk length along every axis.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Configuration for chunking and evaluating lazy arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Chunk length used along every axis when chunking an eager array.
    pub chunk_size: usize,

    /// Evaluate independent blocks in parallel on the rayon pool.
    pub parallel: bool,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            parallel: true,
        }
    }
}

impl ChunkConfig {
    /// Create a configuration with the given chunk size.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `SWATH_CHUNK_SIZE`: positive integer
    /// - `SWATH_PARALLEL_COMPUTE`: `true` / `false`
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("SWATH_CHUNK_SIZE") {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => config.chunk_size = size,
                _ => warn!(value = %raw, "Ignoring invalid SWATH_CHUNK_SIZE"),
            }
        }

        if let Ok(raw) = env::var("SWATH_PARALLEL_COMPUTE") {
            match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => config.parallel = true,
                "false" | "0" | "no" => config.parallel = false,
                _ => warn!(value = %raw, "Ignoring invalid SWATH_PARALLEL_COMPUTE"),
            }
        }

        config
    }

    /// Chunk shape for an array of `shape`, clamped to each axis length.
    pub fn chunk_shape_for(&self, shape: &[usize]) -> Vec<usize> {
        shape
            .iter()
            .map(|&len| self.chunk_size.min(len).max(1))
            .collect()
    }
}
