//! Vertex traversal order for quadrilateral cells.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rotational direction in which the four vertices of a cell are listed.
///
/// Both orders start at the cell's `(i, j)` corner. With row index running
/// towards decreasing y and column index towards increasing x:
/// - `CounterClockwise`: `(i, j)`, `(i+1, j)`, `(i+1, j+1)`, `(i, j+1)`
/// - `Clockwise`: `(i, j)`, `(i, j+1)`, `(i+1, j+1)`, `(i+1, j)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexOrder {
    Clockwise,
    #[default]
    CounterClockwise,
}

impl VertexOrder {
    /// Corner offsets `(di, dj)` of the four vertices, in traversal order.
    pub fn corner_offsets(&self) -> [(usize, usize); 4] {
        match self {
            VertexOrder::CounterClockwise => [(0, 0), (1, 0), (1, 1), (0, 1)],
            VertexOrder::Clockwise => [(0, 0), (0, 1), (1, 1), (1, 0)],
        }
    }

    /// Position in the traversal of the vertex at offset `(di, dj)`.
    pub fn position_of(&self, offset: (usize, usize)) -> usize {
        self.corner_offsets()
            .iter()
            .position(|o| *o == offset)
            .unwrap_or(0)
    }

    pub fn is_clockwise(&self) -> bool {
        matches!(self, VertexOrder::Clockwise)
    }
}

impl FromStr for VertexOrder {
    type Err = OrderParseError;

    /// Accepts `clockwise` / `counterclockwise` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clockwise" => Ok(VertexOrder::Clockwise),
            "counterclockwise" => Ok(VertexOrder::CounterClockwise),
            _ => Err(OrderParseError::InvalidOrder(s.to_string())),
        }
    }
}

impl fmt::Display for VertexOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexOrder::Clockwise => write!(f, "clockwise"),
            VertexOrder::CounterClockwise => write!(f, "counterclockwise"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderParseError {
    #[error("Invalid vertex order: {0}. Expected 'clockwise' or 'counterclockwise'")]
    InvalidOrder(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order() {
        assert_eq!(
            "clockwise".parse::<VertexOrder>().unwrap(),
            VertexOrder::Clockwise
        );
        assert_eq!(
            "CounterClockwise".parse::<VertexOrder>().unwrap(),
            VertexOrder::CounterClockwise
        );
        assert!("ccw".parse::<VertexOrder>().is_err());
    }

    #[test]
    fn test_default_is_counterclockwise() {
        assert_eq!(VertexOrder::default(), VertexOrder::CounterClockwise);
    }

    #[test]
    fn test_corner_offsets() {
        let ccw = VertexOrder::CounterClockwise;
        let cw = VertexOrder::Clockwise;
        assert_eq!(ccw.corner_offsets()[1], (1, 0));
        assert_eq!(cw.corner_offsets()[1], (0, 1));
        assert_eq!(ccw.position_of((0, 1)), 3);
        assert_eq!(cw.position_of((0, 1)), 1);
    }
}
