use serde_json::{Map, Value};

use crate::core::types::{LinkOrientation, Orientation};

/// A contig (assembly graph node)
#[derive(Debug, Clone, PartialEq)]
pub struct Contig {
    /// Contig identifier
    pub name: String,

    /// Length in base pairs
    pub length: u64,

    /// Orientation assigned by the scaffolder
    pub orientation: Orientation,

    /// Attributes carried through from the input graph but not interpreted
    pub attributes: Map<String, Value>,
}

impl Contig {
    pub fn new(name: impl Into<String>, length: u64, orientation: Orientation) -> Self {
        Self {
            name: name.into(),
            length,
            orientation,
            attributes: Map::new(),
        }
    }

    /// Length as a signed coordinate offset
    #[allow(clippy::cast_possible_wrap)] // contig lengths are far below i64::MAX
    pub fn span(&self) -> i64 {
        self.length as i64
    }
}

/// A directed link between two contigs (assembly graph edge)
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Which contig ends are joined
    pub orientation: LinkOrientation,

    /// Estimated gap (positive) or overlap (negative) between the joined ends
    pub mean: f64,

    /// Attributes carried through from the input graph but not interpreted
    pub attributes: Map<String, Value>,
}

impl Link {
    pub fn new(orientation: LinkOrientation, mean: f64) -> Self {
        Self {
            orientation,
            mean,
            attributes: Map::new(),
        }
    }

    /// The gap estimate rounded to the nearest base
    #[allow(clippy::cast_possible_truncation)]
    pub fn gap(&self) -> i64 {
        self.mean.round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_rounds_to_nearest() {
        assert_eq!(Link::new(LinkOrientation::EB, 10.4).gap(), 10);
        assert_eq!(Link::new(LinkOrientation::EB, 10.6).gap(), 11);
        assert_eq!(Link::new(LinkOrientation::EB, -12.7).gap(), -13);
    }
}
