//! Hexagonal grid topology, covering all four offset layouts: rows or
//! columns, odd or even parity. All real math happens in cube coordinates
//! (`q + r + s = 0`); offsets exist only at the edges, for storage and
//! display, and each layout has its own bijection between the two.

use crate::{
    config::GridConfig,
    direction::MovementDirection,
    geom::{Point, Rectangle},
    grid::{
        GridCoordinates, GridOffset, OffsetRange, SnappingBehavior,
    },
    shape,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The flat-to-flat span of a hex with circumradius 1
const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// A cell position in cube coordinate space. Only `q` and `r` are stored;
/// `s` is always computable as `-(q + r)`, so there is no way to construct
/// an invalid triple.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {}, {})", q, r, "self.s()")]
pub struct Cube {
    pub q: i32,
    pub r: i32,
}

impl Cube {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn s(&self) -> i32 {
        -(self.q + self.r)
    }

    /// Number of cell steps between two cells
    pub fn distance_to(self, other: Cube) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    /// The six neighboring cells, clockwise from the eastern neighbor of a
    /// row-oriented grid
    pub fn neighbors(self) -> [Cube; 6] {
        [
            Cube::new(self.q + 1, self.r),
            Cube::new(self.q, self.r + 1),
            Cube::new(self.q - 1, self.r + 1),
            Cube::new(self.q - 1, self.r),
            Cube::new(self.q, self.r - 1),
            Cube::new(self.q + 1, self.r - 1),
        ]
    }
}

/// A point in cube coordinate space that is not necessarily on a cell
/// center. Produced by pixel conversions and path interpolation, consumed
/// by [Self::round].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FractionalCube {
    pub q: f64,
    pub r: f64,
    pub s: f64,
}

impl FractionalCube {
    pub fn new(q: f64, r: f64, s: f64) -> Self {
        Self { q, r, s }
    }

    /// Nearest cell. Rounds each component, then recomputes the component
    /// with the largest rounding error from the other two so the result
    /// still satisfies `q + r + s = 0`.
    pub fn round(self) -> Cube {
        let mut q = self.q.round();
        let mut r = self.r.round();
        let s = self.s.round();

        let dq = (q - self.q).abs();
        let dr = (r - self.r).abs();
        let ds = (s - self.s).abs();

        if dq > dr && dq > ds {
            q = -r - s;
        } else if dr > ds {
            r = -q - s;
        }
        Cube::new(q as i32, r as i32)
    }
}

impl From<Cube> for FractionalCube {
    fn from(cube: Cube) -> Self {
        Self::new(cube.q as f64, cube.r as f64, cube.s() as f64)
    }
}

#[derive(Clone, Debug)]
pub struct HexGrid {
    config: GridConfig,
    /// Flat-top hexes arranged in columns, as opposed to pointy-top hexes
    /// arranged in rows
    columns: bool,
    /// Even parity: the *even* rows/columns are the shoved ones
    even: bool,
}

impl HexGrid {
    pub(crate) fn new(config: GridConfig) -> Self {
        let columns = config.grid_type.columns();
        let even = config.grid_type.even();
        Self {
            config,
            columns,
            even,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The grid size is the distance between the centers of two adjacent
    /// cells, i.e. twice the inradius. The circumradius (center to vertex)
    /// is that over sqrt(3).
    fn circumradius(&self) -> f64 {
        self.config.size / SQRT_3
    }

    fn cell_width(&self) -> f64 {
        if self.columns {
            2.0 * self.circumradius()
        } else {
            self.config.size
        }
    }

    fn cell_height(&self) -> f64 {
        if self.columns {
            self.config.size
        } else {
            2.0 * self.circumradius()
        }
    }

    /// Parity sign: even layouts shove in the opposite direction from odd
    /// ones
    fn parity(&self) -> i32 {
        if self.even {
            1
        } else {
            -1
        }
    }

    /// Offset-to-cube bijection for this layout. `x & 1` is 1 for every
    /// odd integer, negative ones included, which keeps the halved
    /// numerator even.
    pub fn offset_to_cube(&self, offset: GridOffset) -> Cube {
        let parity = self.parity();
        if self.columns {
            let q = offset.j;
            let r = offset.i - (offset.j + parity * (offset.j & 1)) / 2;
            Cube::new(q, r)
        } else {
            let q = offset.j - (offset.i + parity * (offset.i & 1)) / 2;
            let r = offset.i;
            Cube::new(q, r)
        }
    }

    pub fn cube_to_offset(&self, cube: Cube) -> GridOffset {
        let parity = self.parity();
        if self.columns {
            let j = cube.q;
            let i = cube.r + (cube.q + parity * (cube.q & 1)) / 2;
            GridOffset::new(i, j)
        } else {
            let i = cube.r;
            let j = cube.q + (cube.r + parity * (cube.r & 1)) / 2;
            GridOffset::new(i, j)
        }
    }

    /// Center of a cube cell relative to the center of the cell at cube
    /// origin
    fn cube_to_pixel(&self, q: f64, r: f64) -> Point {
        let radius = self.circumradius();
        if self.columns {
            Point::new(
                1.5 * radius * q,
                self.config.size * (r + q / 2.0),
            )
        } else {
            Point::new(
                self.config.size * (q + r / 2.0),
                1.5 * radius * r,
            )
        }
    }

    /// Inverse of [Self::cube_to_pixel], producing a fractional position
    fn pixel_to_cube(&self, point: Point) -> FractionalCube {
        let radius = self.circumradius();
        let (q, r) = if self.columns {
            let q = (2.0 / 3.0) * point.x / radius;
            let r = (-point.x / 3.0 + SQRT_3 / 3.0 * point.y) / radius;
            (q, r)
        } else {
            let q = (SQRT_3 / 3.0 * point.x - point.y / 3.0) / radius;
            let r = (2.0 / 3.0) * point.y / radius;
            (q, r)
        };
        FractionalCube::new(q, r, -q - r)
    }

    /// Center of the cell at offset origin. Cell (0, 0) occupies the
    /// top-left corner of pixel space, so its center is half a cell in.
    fn origin_center(&self) -> Point {
        Point::new(self.cell_width() / 2.0, self.cell_height() / 2.0)
    }

    pub fn get_cube(&self, coords: GridCoordinates) -> Cube {
        match coords {
            GridCoordinates::Offset(offset) => self.offset_to_cube(offset),
            GridCoordinates::Point(point) => self
                .pixel_to_cube(point - self.origin_center())
                .round(),
        }
    }

    pub fn get_offset(&self, coords: GridCoordinates) -> GridOffset {
        match coords {
            GridCoordinates::Offset(offset) => offset,
            GridCoordinates::Point(_) => {
                self.cube_to_offset(self.get_cube(coords))
            }
        }
    }

    fn cube_center_point(&self, cube: Cube) -> Point {
        self.cube_to_pixel(cube.q as f64, cube.r as f64)
            + self.origin_center()
    }

    pub fn get_center_point(&self, coords: GridCoordinates) -> Point {
        self.cube_center_point(self.get_cube(coords))
    }

    /// Top-left corner of the cell's bounding box
    pub fn get_top_left_point(&self, coords: GridCoordinates) -> Point {
        self.get_center_point(coords)
            - Point::new(self.cell_width() / 2.0, self.cell_height() / 2.0)
    }

    /// Cell polygon about its own center, clockwise. Row layouts start at
    /// the top vertex, column layouts at the left vertex.
    pub fn get_shape(&self) -> Vec<Point> {
        let radius = self.circumradius();
        let half = self.config.size / 2.0;
        if self.columns {
            vec![
                Point::new(-radius, 0.0),
                Point::new(-radius / 2.0, -half),
                Point::new(radius / 2.0, -half),
                Point::new(radius, 0.0),
                Point::new(radius / 2.0, half),
                Point::new(-radius / 2.0, half),
            ]
        } else {
            vec![
                Point::new(0.0, -radius),
                Point::new(half, -radius / 2.0),
                Point::new(half, radius / 2.0),
                Point::new(0.0, radius),
                Point::new(-half, radius / 2.0),
                Point::new(-half, -radius / 2.0),
            ]
        }
    }

    pub fn get_vertices(&self, coords: GridCoordinates) -> Vec<Point> {
        let center = self.get_center_point(coords);
        self.get_shape()
            .into_iter()
            .map(|vertex| center + vertex)
            .collect()
    }

    pub fn get_adjacent_offsets(
        &self,
        coords: GridCoordinates,
    ) -> Vec<GridOffset> {
        self.get_cube(coords)
            .neighbors()
            .iter()
            .map(|&neighbor| self.cube_to_offset(neighbor))
            .collect()
    }

    /// Cube step for a compass direction, or `None` for the two directions
    /// perpendicular to this layout's rows/columns (no hex neighbor lies
    /// that way)
    fn direction_step(
        &self,
        direction: MovementDirection,
    ) -> Option<(i32, i32)> {
        use MovementDirection::*;
        if self.columns {
            match direction {
                N => Some((0, -1)),
                NE => Some((1, -1)),
                SE => Some((1, 0)),
                S => Some((0, 1)),
                SW => Some((-1, 1)),
                NW => Some((-1, 0)),
                E | W => None,
            }
        } else {
            match direction {
                E => Some((1, 0)),
                SE => Some((0, 1)),
                SW => Some((-1, 1)),
                W => Some((-1, 0)),
                NW => Some((0, -1)),
                NE => Some((1, -1)),
                N | S => None,
            }
        }
    }

    pub fn get_shifted_offset(
        &self,
        coords: GridCoordinates,
        direction: MovementDirection,
    ) -> GridOffset {
        let cube = self.get_cube(coords);
        match self.direction_step(direction) {
            Some((dq, dr)) => self
                .cube_to_offset(Cube::new(cube.q + dq, cube.r + dr)),
            None => self.get_offset(coords),
        }
    }

    pub fn get_shifted_point(
        &self,
        point: Point,
        direction: MovementDirection,
    ) -> Point {
        match self.direction_step(direction) {
            Some((dq, dr)) => {
                // Translate by the center-to-center delta so the point
                // keeps its position within the cell
                point + self.cube_to_pixel(dq as f64, dr as f64)
            }
            None => point,
        }
    }

    /// Cells on the straight line between two cells: linear interpolation
    /// in cube space, rounded at each step. Endpoints are nudged off
    /// exact edge midpoints so ties break consistently.
    pub fn get_direct_path(
        &self,
        from: GridCoordinates,
        to: GridCoordinates,
    ) -> Vec<GridOffset> {
        let a = self.get_cube(from);
        let b = self.get_cube(to);
        let steps = a.distance_to(b);
        if steps == 0 {
            return vec![self.cube_to_offset(a)];
        }

        let nudge = |cube: Cube| {
            FractionalCube::new(
                cube.q as f64 + 1e-6,
                cube.r as f64 + 2e-6,
                cube.s() as f64 - 3e-6,
            )
        };
        let a = nudge(a);
        let b = nudge(b);

        let mut path = Vec::with_capacity(steps as usize + 1);
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let cell = FractionalCube::new(
                a.q + (b.q - a.q) * t,
                a.r + (b.r - a.r) * t,
                a.s + (b.s - a.s) * t,
            )
            .round();
            let offset = self.cube_to_offset(cell);
            if path.last() != Some(&offset) {
                path.push(offset);
            }
        }
        path
    }

    pub fn get_offset_range(&self, bounds: Rectangle) -> OffsetRange {
        // Offsets are not monotonic in pixel space across parities, so
        // take the bounding box of the corner cells and pad by one
        let corners = [
            bounds.top_left(),
            Point::new(bounds.right(), bounds.y),
            Point::new(bounds.x, bounds.bottom()),
            Point::new(bounds.right(), bounds.bottom()),
        ];
        let offsets: Vec<GridOffset> = corners
            .iter()
            .map(|&corner| self.get_offset(corner.into()))
            .collect();
        let i0 = offsets.iter().map(|o| o.i).min().unwrap_or(0) - 1;
        let j0 = offsets.iter().map(|o| o.j).min().unwrap_or(0) - 1;
        let i1 = offsets.iter().map(|o| o.i).max().unwrap_or(0) + 1;
        let j1 = offsets.iter().map(|o| o.j).max().unwrap_or(0) + 1;
        (i0, j0, i1, j1)
    }

    /// A grid of the same layout with cells shrunk by `resolution`, used
    /// as the snapping lattice
    fn subdivided(&self, resolution: u32) -> HexGrid {
        HexGrid::new(GridConfig {
            size: self.config.size / resolution as f64,
            ..self.config.clone()
        })
    }

    /// Snap to the nearest enabled anchor of the subdivided grid. Hex
    /// anchors do not sit on a single rectangular lattice, so candidates
    /// are gathered from the containing sub-cell and its six neighbors
    /// and compared by distance. The subdivided grid is built per call;
    /// there is no shared scratch state.
    pub fn get_snapped_point(
        &self,
        point: Point,
        behavior: &SnappingBehavior,
    ) -> Point {
        let sub = self.subdivided(behavior.resolution);
        let mode = behavior.mode;

        let home = sub.get_offset(point.into());
        let mut cells = vec![home];
        cells.extend(sub.get_adjacent_offsets(home.into()));

        let mut candidates: Vec<Point> = Vec::new();
        if mode.center {
            candidates.extend(
                cells.iter().map(|&cell| sub.get_center_point(cell.into())),
            );
        }
        if mode.vertex {
            for &cell in &cells {
                candidates.extend(sub.get_vertices(cell.into()));
            }
        }
        if mode.edge_midpoint {
            for &cell in &cells {
                let vertices = sub.get_vertices(cell.into());
                for k in 0..vertices.len() {
                    let next = vertices[(k + 1) % vertices.len()];
                    candidates.push(Point::new(
                        (vertices[k].x + next.x) / 2.0,
                        (vertices[k].y + next.y) / 2.0,
                    ));
                }
            }
        }

        // Candidates were pushed in mode declaration order, and strict
        // comparison keeps the earlier one on a tie
        let mut best = candidates[0];
        for candidate in candidates.into_iter().skip(1) {
            if point.distance_to(candidate) < point.distance_to(best) {
                best = candidate;
            }
        }
        best
    }

    /// Cube cells within `steps` of `center`
    fn cells_in_steps(&self, center: Cube, steps: i32) -> Vec<Cube> {
        let mut cells = Vec::new();
        for dq in -steps..=steps {
            let lo = (-steps).max(-dq - steps);
            let hi = steps.min(-dq + steps);
            for dr in lo..=hi {
                cells.push(Cube::new(center.q + dq, center.r + dr));
            }
        }
        cells
    }

    fn outline_of(&self, cells: &[Cube]) -> Vec<Point> {
        let polygons: Vec<Vec<Point>> = cells
            .iter()
            .map(|&cell| {
                self.get_vertices(self.cube_to_offset(cell).into())
            })
            .collect();
        shape::stitch_outline(&polygons)
    }

    /// Scalloped outline of the hex disk whose step count best matches the
    /// requested radius
    pub fn get_circle(&self, center: Point, radius: f64) -> Vec<Point> {
        if radius < 0.0 {
            return Vec::new();
        }
        let origin = self.get_cube(center.into());
        let steps = (radius / self.config.distance).round() as i32;
        self.outline_of(&self.cells_in_steps(origin, steps))
    }

    pub fn get_cone(
        &self,
        origin: Point,
        radius: f64,
        direction: f64,
        angle: f64,
    ) -> Vec<Point> {
        if radius < 0.0 || angle <= 0.0 {
            return Vec::new();
        }
        if angle >= 360.0 {
            return self.get_circle(origin, radius);
        }
        let origin_cell = self.get_cube(origin.into());
        let steps = (radius / self.config.distance).round() as i32;
        let half_angle = angle / 2.0;
        let cells: Vec<Cube> = self
            .cells_in_steps(origin_cell, steps)
            .into_iter()
            .filter(|&cell| {
                if cell == origin_cell {
                    return true;
                }
                let to_cell =
                    origin.angle_to(self.cube_center_point(cell));
                let delta = (to_cell - direction + 180.0).rem_euclid(360.0)
                    - 180.0;
                delta.abs() <= half_angle + 1e-6
            })
            .collect();
        self.outline_of(&cells)
    }
}
