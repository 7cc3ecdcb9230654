//! 2D debug rendering of grids as SVG. Feature-gated because most
//! consumers bring their own renderer; this one exists for the CLI and for
//! eyeballing grid math during development.

mod svg;

pub use self::svg::{grid_to_svg, highlight_cells, outline_to_polygon};
