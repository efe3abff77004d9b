//! Array evaluation backends.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an array's values come into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Values are held in memory and operations run immediately.
    Eager,
    /// Values are partitioned into blocks whose computation is deferred
    /// until the caller asks for the result.
    Lazy,
}

impl Backend {
    pub fn is_lazy(&self) -> bool {
        matches!(self, Backend::Lazy)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Eager => write!(f, "eager"),
            Backend::Lazy => write!(f, "lazy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::Eager.to_string(), "eager");
        assert_eq!(Backend::Lazy.to_string(), "lazy");
        assert!(Backend::Lazy.is_lazy());
        assert!(!Backend::Eager.is_lazy());
    }
}
