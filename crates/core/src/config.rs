//! Configuration for grid construction. A [GridConfig] is owned by the
//! scene/document layer and handed to [Grid::new](crate::Grid::new) once;
//! grids never mutate it afterwards.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use validator::Validate;

/// The topology of a grid, as persisted in scene data.
///
/// **The numeric values of this enum are a stable contract.** They are
/// stored in external scene documents and must never be renumbered: 0 is
/// gridless, 1 is square, and 2-5 are the four hexagonal variants
/// distinguished by row/column orientation and odd/even offset parity.
/// Serialization goes through the bare number for exactly this reason.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GridType {
    /// No discrete cells; every point is its own position
    Gridless = 0,
    /// Square cells
    Square = 1,
    /// Pointy-top hexes in rows, odd rows shifted right
    HexOddR = 2,
    /// Pointy-top hexes in rows, even rows shifted right
    HexEvenR = 3,
    /// Flat-top hexes in columns, odd columns shifted down
    HexOddQ = 4,
    /// Flat-top hexes in columns, even columns shifted down
    HexEvenQ = 5,
}

impl GridType {
    pub fn is_gridless(self) -> bool {
        self == Self::Gridless
    }

    pub fn is_square(self) -> bool {
        self == Self::Square
    }

    pub fn is_hexagonal(self) -> bool {
        matches!(
            self,
            Self::HexOddR | Self::HexEvenR | Self::HexOddQ | Self::HexEvenQ
        )
    }

    /// Are hex cells arranged in flat-top columns (as opposed to pointy-top
    /// rows)? Only meaningful for hexagonal types.
    pub fn columns(self) -> bool {
        matches!(self, Self::HexOddQ | Self::HexEvenQ)
    }

    /// Is the *even* parity class of rows/columns the shifted one? Only
    /// meaningful for hexagonal types.
    pub fn even(self) -> bool {
        matches!(self, Self::HexEvenR | Self::HexEvenQ)
    }
}

impl From<GridType> for u8 {
    fn from(value: GridType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for GridType {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Gridless),
            1 => Ok(Self::Square),
            2 => Ok(Self::HexOddR),
            3 => Ok(Self::HexEvenR),
            4 => Ok(Self::HexOddQ),
            5 => Ok(Self::HexEvenQ),
            other => Err(anyhow!("unknown grid type {}", other)),
        }
    }
}

/// How diagonal steps on a square grid are priced. Like [GridType], the
/// numeric values are persisted in scene data and must stay fixed.
///
/// Each variant fixes one concrete cost formula (in grid spaces) for the
/// k-th diagonal step of a measured path:
///
/// - `Equidistant`: every diagonal costs 1
/// - `Exact`: every diagonal costs √2
/// - `Approximate`: every diagonal costs 1.5
/// - `Rectilinear`: every diagonal costs 2
/// - `Alternating1`: diagonals cost 1, 2, 1, 2, ... (k counted across the
///   entire measurement, not per segment)
/// - `Alternating2`: diagonals cost 2, 1, 2, 1, ...
/// - `Illegal`: diagonal movement is not allowed at all; direct paths only
///   ever step orthogonally and diagonal shift requests are no-ops
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DiagonalRule {
    Equidistant = 0,
    Exact = 1,
    Approximate = 2,
    Rectilinear = 3,
    Alternating1 = 4,
    Alternating2 = 5,
    Illegal = 6,
}

impl DiagonalRule {
    /// Can a direct path move diagonally under this rule?
    pub fn allows_diagonals(self) -> bool {
        self != Self::Illegal
    }

    /// Cost in grid spaces of the k-th diagonal step of a measurement
    /// (1-based). Never consulted for `Illegal`, whose paths contain no
    /// diagonal steps.
    pub fn diagonal_spaces(self, k: u32) -> f64 {
        match self {
            Self::Equidistant | Self::Illegal => 1.0,
            Self::Exact => std::f64::consts::SQRT_2,
            Self::Approximate => 1.5,
            Self::Rectilinear => 2.0,
            Self::Alternating1 => {
                if k % 2 == 1 {
                    1.0
                } else {
                    2.0
                }
            }
            Self::Alternating2 => {
                if k % 2 == 1 {
                    2.0
                } else {
                    1.0
                }
            }
        }
    }
}

impl From<DiagonalRule> for u8 {
    fn from(value: DiagonalRule) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for DiagonalRule {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Equidistant),
            1 => Ok(Self::Exact),
            2 => Ok(Self::Approximate),
            3 => Ok(Self::Rectilinear),
            4 => Ok(Self::Alternating1),
            5 => Ok(Self::Alternating2),
            6 => Ok(Self::Illegal),
            other => Err(anyhow!("unknown diagonal rule {}", other)),
        }
    }
}

/// Configuration that defines a grid. Two grids built from the same config
/// behave identically; a grid holds a copy of its config for its entire
/// lifetime and treats it as read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GridConfig {
    /// Topology, including hex orientation/parity. See [GridType] for the
    /// numeric contract with persisted scene data.
    pub grid_type: GridType,

    /// Pixels per grid unit. Must be strictly positive; for hexagonal grids
    /// this is the distance between opposite sides of a cell.
    #[validate(range(min = 0.0))]
    pub size: f64,

    /// Real-world distance covered by one grid unit (e.g. 5 for "5 ft per
    /// square"). Must be strictly positive.
    #[validate(range(min = 0.0))]
    pub distance: f64,

    /// Human-readable label for [Self::distance] (e.g. "ft"). Not
    /// interpreted by the engine, only carried along for display layers.
    pub units: String,

    /// Diagonal pricing policy. Only consulted by square grids.
    pub diagonals: DiagonalRule,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_type: GridType::Square,
            size: 100.0,
            distance: 5.0,
            units: "ft".into(),
            diagonals: DiagonalRule::Equidistant,
        }
    }
}
