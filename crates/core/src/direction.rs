//! Compass directions used for single-step movement queries. The grid
//! variants interpret these against their own topology: a square grid maps
//! all 8 of them to neighbors (diagonals permitting), while a hexagonal grid
//! only has neighbors for 6 of them and treats the other two as no-ops.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The 8 compass directions, in clockwise order starting at North. Remember
/// that in screen space, north is negative y.
#[derive(
    Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MovementDirection {
    /// North
    N,
    /// Northeast
    NE,
    /// East
    E,
    /// Southeast
    SE,
    /// South
    S,
    /// Southwest
    SW,
    /// West
    W,
    /// Northwest
    NW,
}

impl MovementDirection {
    /// All directions in clockwise compass order, starting at North
    pub const CLOCKWISE: &'static [Self] = &[
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// Get the index of this direction within the clockwise ordering
    pub fn clockwise_index(self) -> usize {
        Self::CLOCKWISE.iter().position(|dir| self == *dir).unwrap()
    }

    /// Get the direction directly opposite this one on the compass
    pub fn opposite(self) -> Self {
        let clockwise = Self::CLOCKWISE;
        clockwise[(self.clockwise_index() + clockwise.len() / 2)
            % clockwise.len()]
    }

    /// Does this direction change both the row and the column of a square
    /// grid cell?
    pub fn is_diagonal(self) -> bool {
        matches!(self, Self::NE | Self::SE | Self::SW | Self::NW)
    }

    /// The `(di, dj)` step this direction applies to a square grid cell.
    /// Rows (`i`) grow southward, columns (`j`) grow eastward.
    pub fn offset_step(self) -> (i32, i32) {
        match self {
            Self::N => (-1, 0),
            Self::NE => (-1, 1),
            Self::E => (0, 1),
            Self::SE => (1, 1),
            Self::S => (1, 0),
            Self::SW => (1, -1),
            Self::W => (0, -1),
            Self::NW => (-1, -1),
        }
    }

    /// The angle of this direction in degrees, 0° = east, clockwise positive
    /// (screen space)
    pub fn angle(self) -> f64 {
        match self {
            Self::E => 0.0,
            Self::SE => 45.0,
            Self::S => 90.0,
            Self::SW => 135.0,
            Self::W => 180.0,
            Self::NW => 225.0,
            Self::N => 270.0,
            Self::NE => 315.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_opposite() {
        assert_eq!(MovementDirection::N.opposite(), MovementDirection::S);
        assert_eq!(MovementDirection::NE.opposite(), MovementDirection::SW);
        assert_eq!(MovementDirection::E.opposite(), MovementDirection::W);
        assert_eq!(MovementDirection::SE.opposite(), MovementDirection::NW);
        // opposite() is an involution
        for dir in MovementDirection::iter() {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_offset_step_matches_opposite() {
        for dir in MovementDirection::iter() {
            let (di, dj) = dir.offset_step();
            let (odi, odj) = dir.opposite().offset_step();
            assert_eq!((di, dj), (-odi, -odj));
        }
    }

    #[test]
    fn test_diagonals() {
        let diagonals: Vec<_> = MovementDirection::iter()
            .filter(|dir| dir.is_diagonal())
            .collect();
        assert_eq!(
            diagonals,
            vec![
                MovementDirection::NE,
                MovementDirection::SE,
                MovementDirection::SW,
                MovementDirection::NW,
            ]
        );
    }
}
