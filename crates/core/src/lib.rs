//! Battlemat is a grid geometry engine for tabletop battle maps. It models
//! square, hexagonal, and gridless play surfaces and answers the geometric
//! questions a map renderer or movement ruler asks: which cell is under
//! this point, which cells are adjacent, what does the shortest path
//! between two cells cost, where does a dragged token snap to, and what
//! outline does a distance template cover.
//!
//! ```
//! use battlemat::{Grid, GridConfig, GridOffset, MeasurePathWaypoint};
//!
//! let grid = Grid::new(GridConfig::default()).unwrap();
//! let path = [
//!     MeasurePathWaypoint::new(GridOffset::new(0, 0)),
//!     MeasurePathWaypoint::new(GridOffset::new(3, 4)),
//! ];
//! let result = grid.measure_path(&path, None).unwrap();
//! println!("{} {}", result.totals.distance, grid.config().units);
//! ```
//!
//! All coordinates live in screen space: the y axis grows downward and
//! angles are measured in degrees, clockwise from east. See [GridConfig]
//! for the knobs that select the grid type and its scale.

mod config;
mod direction;
mod geom;
mod grid;
mod path;
mod shape;

#[cfg(feature = "svg")]
pub mod render;

pub use crate::{
    config::{DiagonalRule, GridConfig, GridType},
    direction::MovementDirection,
    geom::{Point, Rectangle},
    grid::{
        Cube, FractionalCube, Grid, GridCoordinates, GridOffset,
        GridlessGrid, HexGrid, OffsetRange, SnappingBehavior,
        SnappingMode, SquareGrid,
    },
    path::{
        CostFn, MeasurePathResult, MeasurePathWaypoint, MeasuredWaypoint,
        PathMeasurement,
    },
};
