//! Bezier path geometry carried by vector shape paths and mask paths.

use serde::{Deserialize, Serialize};

/// Four parallel sequences plus the closed flag. Tangents are relative to
/// their vertex.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeGeometry {
    pub vertices: Vec<[f64; 2]>,
    #[serde(rename = "inTangents")]
    pub in_tangents: Vec<[f64; 2]>,
    #[serde(rename = "outTangents")]
    pub out_tangents: Vec<[f64; 2]>,
    #[serde(rename = "isClosed")]
    pub closed: bool,
}

impl ShapeGeometry {
    /// Straight-edged polygon: all tangents are zero.
    pub fn polygon(vertices: Vec<[f64; 2]>, closed: bool) -> Self {
        let n = vertices.len();
        Self {
            vertices,
            in_tangents: vec![[0.0, 0.0]; n],
            out_tangents: vec![[0.0, 0.0]; n],
            closed,
        }
    }

    /// The three sequences must line up one entry per vertex.
    pub fn is_consistent(&self) -> bool {
        self.in_tangents.len() == self.vertices.len()
            && self.out_tangents.len() == self.vertices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_has_zero_tangents() {
        let g = ShapeGeometry::polygon(vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]], true);
        assert!(g.is_consistent());
        assert!(g.in_tangents.iter().all(|t| *t == [0.0, 0.0]));
    }
}
