//! The grid variant abstraction. A [Grid] is constructed once from a
//! [GridConfig] and is immutable from then on: every operation takes
//! `&self`, holds no interior mutability, and is safe to call from any
//! number of threads concurrently.
//!
//! The three topologies (gridless, square, hexagonal) share one operation
//! contract but differ entirely in algorithm, so each lives in its own
//! submodule and [Grid] dispatches by match. There is deliberately no
//! inheritance-style layering here; each variant is independently testable.

mod gridless;
mod hex;
mod square;

pub use gridless::GridlessGrid;
pub use hex::{Cube, FractionalCube, HexGrid};
pub use square::SquareGrid;

use crate::{
    config::{GridConfig, GridType},
    direction::MovementDirection,
    geom::{Point, Rectangle},
};
use anyhow::{bail, Context};
use derive_more::Display;
use log::debug;
use serde::{Deserialize, Serialize};
use std::ops;
use validator::Validate;

/// The discrete row/column address of a grid cell. Rows (`i`) grow
/// southward (down the screen), columns (`j`) grow eastward. Only
/// meaningful for square and hexagonal grids; a gridless grid fabricates
/// offsets by rounding pixel coordinates.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.i", "self.j")]
pub struct GridOffset {
    pub i: i32,
    pub j: i32,
}

impl GridOffset {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }
}

/// Either a discrete cell address or a continuous pixel point. Every grid
/// operation that locates a cell accepts both, so callers can feed pointer
/// input and stored offsets through the same API.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridCoordinates {
    Offset(GridOffset),
    Point(Point),
}

impl From<GridOffset> for GridCoordinates {
    fn from(offset: GridOffset) -> Self {
        Self::Offset(offset)
    }
}

impl From<Point> for GridCoordinates {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

/// The set of anchor classes a snap operation may land on. Combine classes
/// with `|`: `SnappingMode::CENTER | SnappingMode::VERTEX`. An empty set is
/// a caller contract violation and makes
/// [Grid::get_snapped_point] fail.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct SnappingMode {
    /// Snap to cell centers
    pub center: bool,
    /// Snap to cell vertices
    pub vertex: bool,
    /// Snap to the midpoints of cell edges
    pub edge_midpoint: bool,
}

impl SnappingMode {
    pub const CENTER: Self = Self {
        center: true,
        vertex: false,
        edge_midpoint: false,
    };
    pub const VERTEX: Self = Self {
        center: false,
        vertex: true,
        edge_midpoint: false,
    };
    pub const EDGE_MIDPOINT: Self = Self {
        center: false,
        vertex: false,
        edge_midpoint: true,
    };
    /// All anchor classes at once
    pub const ANY: Self = Self {
        center: true,
        vertex: true,
        edge_midpoint: true,
    };

    pub fn is_empty(self) -> bool {
        !(self.center || self.vertex || self.edge_midpoint)
    }
}

impl ops::BitOr for SnappingMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            center: self.center || rhs.center,
            vertex: self.vertex || rhs.vertex,
            edge_midpoint: self.edge_midpoint || rhs.edge_midpoint,
        }
    }
}

/// How [Grid::get_snapped_point] should behave: which anchor classes are
/// eligible, and at what sub-grid resolution. A resolution of 1 snaps to
/// the toplevel grid; a resolution of 2 overlays a half-size grid of the
/// same topology, and so on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnappingBehavior {
    pub mode: SnappingMode,
    pub resolution: u32,
}

impl Default for SnappingBehavior {
    fn default() -> Self {
        Self {
            mode: SnappingMode::CENTER,
            resolution: 1,
        }
    }
}

/// Inclusive range of grid offsets covering a pixel rectangle: `(i0, j0,
/// i1, j1)`, where `(i0, j0)` addresses the top-left-most overlapping cell
/// and `(i1, j1)` the bottom-right-most.
pub type OffsetRange = (i32, i32, i32, i32);

/// A grid variant, selected once at construction from
/// [GridConfig::grid_type]. All behavior documented on the methods below is
/// uniform across variants unless a topology is called out explicitly.
#[derive(Clone, Debug)]
pub enum Grid {
    Gridless(GridlessGrid),
    Square(SquareGrid),
    Hexagonal(HexGrid),
}

impl Grid {
    /// Build the grid variant described by the config. Fails if the config
    /// violates its numeric constraints (`size` and `distance` must be
    /// strictly positive).
    pub fn new(config: GridConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid grid config")?;
        // The validator ranges are inclusive; zero is still degenerate
        if config.size <= 0.0 {
            bail!("grid size must be > 0, got {}", config.size);
        }
        if config.distance <= 0.0 {
            bail!("grid distance must be > 0, got {}", config.distance);
        }

        debug!(
            "Constructing {:?} grid (size={}, distance={} {})",
            config.grid_type, config.size, config.distance, config.units
        );
        let grid = match config.grid_type {
            GridType::Gridless => Self::Gridless(GridlessGrid::new(config)),
            GridType::Square => Self::Square(SquareGrid::new(config)),
            _ => Self::Hexagonal(HexGrid::new(config)),
        };
        Ok(grid)
    }

    /// The config this grid was built from
    pub fn config(&self) -> &GridConfig {
        match self {
            Self::Gridless(grid) => grid.config(),
            Self::Square(grid) => grid.config(),
            Self::Hexagonal(grid) => grid.config(),
        }
    }

    pub fn grid_type(&self) -> GridType {
        self.config().grid_type
    }

    /// The cell containing the given coordinates. Total for all finite
    /// inputs: out-of-range points simply land in whatever cell the math
    /// says, they are never an error.
    pub fn get_offset(
        &self,
        coords: impl Into<GridCoordinates>,
    ) -> GridOffset {
        let coords = coords.into();
        match self {
            Self::Gridless(grid) => grid.get_offset(coords),
            Self::Square(grid) => grid.get_offset(coords),
            Self::Hexagonal(grid) => grid.get_offset(coords),
        }
    }

    /// The top-left corner of the bounding box of the cell containing the
    /// given coordinates. For gridless grids this is the point itself.
    pub fn get_top_left_point(
        &self,
        coords: impl Into<GridCoordinates>,
    ) -> Point {
        let coords = coords.into();
        match self {
            Self::Gridless(grid) => grid.get_top_left_point(coords),
            Self::Square(grid) => grid.get_top_left_point(coords),
            Self::Hexagonal(grid) => grid.get_top_left_point(coords),
        }
    }

    /// The center of the cell containing the given coordinates. For
    /// gridless grids this is the point itself.
    pub fn get_center_point(
        &self,
        coords: impl Into<GridCoordinates>,
    ) -> Point {
        let coords = coords.into();
        match self {
            Self::Gridless(grid) => grid.get_center_point(coords),
            Self::Square(grid) => grid.get_center_point(coords),
            Self::Hexagonal(grid) => grid.get_center_point(coords),
        }
    }

    /// The polygon of a single cell, relative to its own center, in
    /// clockwise screen-space order. Empty for gridless grids.
    pub fn get_shape(&self) -> Vec<Point> {
        match self {
            Self::Gridless(grid) => grid.get_shape(),
            Self::Square(grid) => grid.get_shape(),
            Self::Hexagonal(grid) => grid.get_shape(),
        }
    }

    /// [Self::get_shape] translated to the cell containing the given
    /// coordinates. Ordering starts at the topology's canonical vertex:
    /// top-left for squares, the top vertex for row-oriented hexes, the
    /// left vertex for column-oriented hexes.
    pub fn get_vertices(
        &self,
        coords: impl Into<GridCoordinates>,
    ) -> Vec<Point> {
        let coords = coords.into();
        match self {
            Self::Gridless(grid) => grid.get_vertices(coords),
            Self::Square(grid) => grid.get_vertices(coords),
            Self::Hexagonal(grid) => grid.get_vertices(coords),
        }
    }

    /// All cells adjacent to the given one. Gridless grids have no
    /// adjacency (empty); hexagonal cells always have exactly 6 neighbors;
    /// square cells have 4 or 8 depending on the diagonal rule.
    pub fn get_adjacent_offsets(
        &self,
        coords: impl Into<GridCoordinates>,
    ) -> Vec<GridOffset> {
        let coords = coords.into();
        match self {
            Self::Gridless(grid) => grid.get_adjacent_offsets(coords),
            Self::Square(grid) => grid.get_adjacent_offsets(coords),
            Self::Hexagonal(grid) => grid.get_adjacent_offsets(coords),
        }
    }

    /// Are the two cells neighbors? Symmetric by construction: `b` is
    /// checked against [Self::get_adjacent_offsets] of `a`.
    pub fn test_adjacency(
        &self,
        a: impl Into<GridCoordinates>,
        b: impl Into<GridCoordinates>,
    ) -> bool {
        let b = self.get_offset(b);
        self.get_adjacent_offsets(a).contains(&b)
    }

    /// Move one cell in a compass direction. Directions with no neighbor in
    /// this topology (diagonals under [crate::DiagonalRule::Illegal], N/S
    /// on row hexes, E/W on column hexes) return the input cell unchanged.
    pub fn get_shifted_offset(
        &self,
        coords: impl Into<GridCoordinates>,
        direction: MovementDirection,
    ) -> GridOffset {
        let coords = coords.into();
        match self {
            Self::Gridless(grid) => grid.get_shifted_offset(coords, direction),
            Self::Square(grid) => grid.get_shifted_offset(coords, direction),
            Self::Hexagonal(grid) => {
                grid.get_shifted_offset(coords, direction)
            }
        }
    }

    /// Move a point one cell in a compass direction, preserving its offset
    /// from the cell center. Subject to the same no-op policy as
    /// [Self::get_shifted_offset].
    pub fn get_shifted_point(
        &self,
        point: Point,
        direction: MovementDirection,
    ) -> Point {
        match self {
            Self::Gridless(grid) => grid.get_shifted_point(point, direction),
            Self::Square(grid) => grid.get_shifted_point(point, direction),
            Self::Hexagonal(grid) => grid.get_shifted_point(point, direction),
        }
    }

    /// The shortest sequence of mutually adjacent cells from `from` to
    /// `to`, both endpoints included. Gridless grids return just the two
    /// endpoint pseudo-offsets.
    pub fn get_direct_path(
        &self,
        from: impl Into<GridCoordinates>,
        to: impl Into<GridCoordinates>,
    ) -> Vec<GridOffset> {
        let from = from.into();
        let to = to.into();
        match self {
            Self::Gridless(grid) => grid.get_direct_path(from, to),
            Self::Square(grid) => grid.get_direct_path(from, to),
            Self::Hexagonal(grid) => grid.get_direct_path(from, to),
        }
    }

    /// The inclusive offset range of all cells overlapping a pixel
    /// rectangle. Useful for renderers iterating visible cells.
    pub fn get_offset_range(&self, bounds: Rectangle) -> OffsetRange {
        match self {
            Self::Gridless(grid) => grid.get_offset_range(bounds),
            Self::Square(grid) => grid.get_offset_range(bounds),
            Self::Hexagonal(grid) => grid.get_offset_range(bounds),
        }
    }

    /// Snap an arbitrary point to the nearest grid anchor allowed by the
    /// behavior. Gridless grids return the point untouched regardless of
    /// behavior. Fails if the behavior's mode is empty or its resolution is
    /// zero; both are caller contract violations.
    pub fn get_snapped_point(
        &self,
        point: Point,
        behavior: &SnappingBehavior,
    ) -> anyhow::Result<Point> {
        if let Self::Gridless(grid) = self {
            return Ok(grid.get_snapped_point(point));
        }
        if behavior.mode.is_empty() {
            bail!("snapping mode selects no anchor classes");
        }
        if behavior.resolution == 0 {
            bail!("snapping resolution must be >= 1");
        }
        let snapped = match self {
            Self::Gridless(_) => unreachable!(),
            Self::Square(grid) => grid.get_snapped_point(point, behavior),
            Self::Hexagonal(grid) => grid.get_snapped_point(point, behavior),
        };
        Ok(snapped)
    }

    /// Polygon approximation of a circle of `radius` grid distance units
    /// around `center`. Gridless grids return a smooth approximation
    /// (deviation < 0.25px); discrete grids return the stepped outline of
    /// the cells within range.
    pub fn get_circle(&self, center: Point, radius: f64) -> Vec<Point> {
        match self {
            Self::Gridless(grid) => grid.get_circle(center, radius),
            Self::Square(grid) => grid.get_circle(center, radius),
            Self::Hexagonal(grid) => grid.get_circle(center, radius),
        }
    }

    /// Polygon approximation of a cone: the part of
    /// [Self::get_circle]'s area within `angle` degrees centered on the
    /// `direction` angle (degrees, 0 = east, clockwise). An angle >= 360
    /// degenerates to the full circle.
    pub fn get_cone(
        &self,
        origin: Point,
        radius: f64,
        direction: f64,
        angle: f64,
    ) -> Vec<Point> {
        match self {
            Self::Gridless(grid) => {
                grid.get_cone(origin, radius, direction, angle)
            }
            Self::Square(grid) => {
                grid.get_cone(origin, radius, direction, angle)
            }
            Self::Hexagonal(grid) => {
                grid.get_cone(origin, radius, direction, angle)
            }
        }
    }

    /// Move a continuous point by `distance` grid units at `direction`
    /// degrees (0 = east, clockwise). The result is not snapped.
    pub fn get_translated_point(
        &self,
        point: Point,
        direction: f64,
        distance: f64,
    ) -> Point {
        let config = self.config();
        let pixels = distance / config.distance * config.size;
        let radians = direction.to_radians();
        Point::new(
            point.x + radians.cos() * pixels,
            point.y + radians.sin() * pixels,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagonalRule;
    use assert_approx_eq::assert_approx_eq;

    fn grid(grid_type: GridType) -> Grid {
        Grid::new(GridConfig {
            grid_type,
            ..GridConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        for (size, distance) in
            [(0.0, 5.0), (-100.0, 5.0), (100.0, 0.0), (100.0, -2.5)]
        {
            let result = Grid::new(GridConfig {
                size,
                distance,
                ..GridConfig::default()
            });
            assert!(
                result.is_err(),
                "size={} distance={} should be rejected",
                size,
                distance
            );
        }
    }

    #[test]
    fn test_variant_selection() {
        assert!(matches!(grid(GridType::Gridless), Grid::Gridless(_)));
        assert!(matches!(grid(GridType::Square), Grid::Square(_)));
        for grid_type in [
            GridType::HexOddR,
            GridType::HexEvenR,
            GridType::HexOddQ,
            GridType::HexEvenQ,
        ] {
            assert!(matches!(grid(grid_type), Grid::Hexagonal(_)));
        }
    }

    #[test]
    fn test_adjacency_symmetry() {
        // Symmetry must hold on every discrete topology, including with
        // diagonals enabled
        for grid_type in [
            GridType::Square,
            GridType::HexOddR,
            GridType::HexEvenR,
            GridType::HexOddQ,
            GridType::HexEvenQ,
        ] {
            let grid = Grid::new(GridConfig {
                grid_type,
                diagonals: DiagonalRule::Equidistant,
                ..GridConfig::default()
            })
            .unwrap();
            for i in -2..=2 {
                for j in -2..=2 {
                    let a = GridOffset::new(i, j);
                    for b in grid.get_adjacent_offsets(a) {
                        assert!(
                            grid.test_adjacency(b, a),
                            "{:?}: {} adj {} but not vice versa",
                            grid_type,
                            a,
                            b
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_snapping_contract_violations() {
        let grid = grid(GridType::Square);
        let point = Point::new(12.0, 30.0);
        let empty = SnappingBehavior {
            mode: SnappingMode::default(),
            resolution: 1,
        };
        assert!(grid.get_snapped_point(point, &empty).is_err());
        let zero_res = SnappingBehavior {
            mode: SnappingMode::CENTER,
            resolution: 0,
        };
        assert!(grid.get_snapped_point(point, &zero_res).is_err());
    }

    #[test]
    fn test_gridless_snapping_bypasses_behavior() {
        // Gridless ignores the behavior entirely, even a degenerate one
        let grid = grid(GridType::Gridless);
        let point = Point::new(123.4, -56.7);
        let empty = SnappingBehavior {
            mode: SnappingMode::default(),
            resolution: 0,
        };
        assert_eq!(grid.get_snapped_point(point, &empty).unwrap(), point);
    }

    #[test]
    fn test_translated_point() {
        let grid = grid(GridType::Square);
        // 5 distance units = 1 grid unit = 100px, heading east
        let moved =
            grid.get_translated_point(Point::new(50.0, 50.0), 0.0, 5.0);
        assert_approx_eq!(moved.x, 150.0);
        assert_approx_eq!(moved.y, 50.0);
        // Heading south (90° clockwise from east)
        let moved =
            grid.get_translated_point(Point::new(50.0, 50.0), 90.0, 2.5);
        assert_approx_eq!(moved.x, 50.0);
        assert_approx_eq!(moved.y, 100.0);
    }
}
