//! Per-piece edge classification.
//!
//! A seam is stored once in `JointTopology`; this module turns it into what each of the two
//! neighbouring pieces sees. Right and bottom edges take the seam's polarity, left and top
//! edges take the inverse, so neighbours always interlock.

use serde::{Deserialize, Serialize};

use crate::joints::{JointShape, JointTopology};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDir {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl EdgeDir {
    pub const ALL: [EdgeDir; 4] = [EdgeDir::Top, EdgeDir::Right, EdgeDir::Bottom, EdgeDir::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> EdgeDir {
        match self {
            EdgeDir::Top => EdgeDir::Bottom,
            EdgeDir::Right => EdgeDir::Left,
            EdgeDir::Bottom => EdgeDir::Top,
            EdgeDir::Left => EdgeDir::Right,
        }
    }

    /// Grid step (d_row, d_col) towards the neighbour across this edge.
    pub fn grid_step(self) -> (i64, i64) {
        match self {
            EdgeDir::Top => (-1, 0),
            EdgeDir::Right => (0, 1),
            EdgeDir::Bottom => (1, 0),
            EdgeDir::Left => (0, -1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceEdgeType {
    Flat,
    Knob,
    Indent,
}

impl PieceEdgeType {
    /// What the neighbour across the edge must have.
    pub fn complement(self) -> PieceEdgeType {
        match self {
            PieceEdgeType::Flat => PieceEdgeType::Flat,
            PieceEdgeType::Knob => PieceEdgeType::Indent,
            PieceEdgeType::Indent => PieceEdgeType::Knob,
        }
    }

    fn same_as(shape: JointShape) -> PieceEdgeType {
        match shape {
            JointShape::Knob => PieceEdgeType::Knob,
            JointShape::Indent => PieceEdgeType::Indent,
        }
    }

    fn inverse_of(shape: JointShape) -> PieceEdgeType {
        Self::same_as(shape).complement()
    }
}

/// The four edge types of one piece, indexed by `EdgeDir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceEdges([PieceEdgeType; 4]);

impl PieceEdges {
    pub const FLAT: PieceEdges = PieceEdges([PieceEdgeType::Flat; 4]);

    pub fn new(top: PieceEdgeType, right: PieceEdgeType, bottom: PieceEdgeType, left: PieceEdgeType) -> Self {
        Self([top, right, bottom, left])
    }

    pub fn get(&self, dir: EdgeDir) -> PieceEdgeType {
        self.0[dir.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeDir, PieceEdgeType)> + '_ {
        EdgeDir::ALL.iter().map(move |dir| (*dir, self.get(*dir)))
    }
}

/// Edge type of piece (`row`, `col`) in direction `dir`.
///
/// Border edges are flat regardless of the joint matrices.
pub fn classify(topology: &JointTopology, row: u32, col: u32, dir: EdgeDir) -> PieceEdgeType {
    let seam = match dir {
        EdgeDir::Top => {
            if row == 0 {
                return PieceEdgeType::Flat;
            }
            topology.vertical(row - 1, col).map(PieceEdgeType::inverse_of)
        }
        EdgeDir::Right => {
            if col + 1 >= topology.cols() {
                return PieceEdgeType::Flat;
            }
            topology.horizontal(row, col).map(PieceEdgeType::same_as)
        }
        EdgeDir::Bottom => {
            if row + 1 >= topology.rows() {
                return PieceEdgeType::Flat;
            }
            topology.vertical(row, col).map(PieceEdgeType::same_as)
        }
        EdgeDir::Left => {
            if col == 0 {
                return PieceEdgeType::Flat;
            }
            topology.horizontal(row, col - 1).map(PieceEdgeType::inverse_of)
        }
    };
    // Only reachable for positions outside the grid.
    seam.unwrap_or(PieceEdgeType::Flat)
}

pub fn classify_piece(topology: &JointTopology, row: u32, col: u32) -> PieceEdges {
    PieceEdges(EdgeDir::ALL.map(|dir| classify(topology, row, col, dir)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inversion_rules_match_table() {
        // 2x2 with every seam a knob.
        let topo = JointTopology::uniform(2, 2, JointShape::Knob);
        let top_left = classify_piece(&topo, 0, 0);
        assert_eq!(
            top_left,
            PieceEdges::new(
                PieceEdgeType::Flat,
                PieceEdgeType::Knob,
                PieceEdgeType::Knob,
                PieceEdgeType::Flat
            )
        );
        let bottom_right = classify_piece(&topo, 1, 1);
        assert_eq!(
            bottom_right,
            PieceEdges::new(
                PieceEdgeType::Indent,
                PieceEdgeType::Flat,
                PieceEdgeType::Flat,
                PieceEdgeType::Indent
            )
        );
    }

    #[test]
    fn single_piece_is_all_flat() {
        let topo = JointTopology::uniform(1, 1, JointShape::Indent);
        assert_eq!(classify_piece(&topo, 0, 0), PieceEdges::FLAT);
    }

    #[test]
    fn opposite_is_an_involution() {
        for dir in EdgeDir::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dr, dc) = dir.grid_step();
            let (or, oc) = dir.opposite().grid_step();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }
}
