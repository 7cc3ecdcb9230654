//! Square grid topology. Conversions are simple division/multiplication by
//! the cell size; the interesting parts are the diagonal rule (which
//! changes adjacency, path shape, and distance pricing) and the direct
//! path, which is an integer line walk that stays cell-adjacent at every
//! step.

use crate::{
    config::GridConfig,
    direction::MovementDirection,
    geom::{Point, Rectangle},
    grid::{GridCoordinates, GridOffset, OffsetRange, SnappingBehavior},
    shape,
};
use strum::IntoEnumIterator;

#[derive(Clone, Debug)]
pub struct SquareGrid {
    config: GridConfig,
}

impl SquareGrid {
    pub(crate) fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    fn size(&self) -> f64 {
        self.config.size
    }

    pub fn get_offset(&self, coords: GridCoordinates) -> GridOffset {
        match coords {
            GridCoordinates::Offset(offset) => offset,
            GridCoordinates::Point(point) => GridOffset::new(
                (point.y / self.size()).floor() as i32,
                (point.x / self.size()).floor() as i32,
            ),
        }
    }

    pub fn get_top_left_point(&self, coords: GridCoordinates) -> Point {
        let offset = self.get_offset(coords);
        Point::new(
            offset.j as f64 * self.size(),
            offset.i as f64 * self.size(),
        )
    }

    pub fn get_center_point(&self, coords: GridCoordinates) -> Point {
        let half = self.size() / 2.0;
        self.get_top_left_point(coords) + Point::new(half, half)
    }

    /// Cell polygon about its own center, clockwise from the top-left
    /// corner
    pub fn get_shape(&self) -> Vec<Point> {
        let half = self.size() / 2.0;
        vec![
            Point::new(-half, -half),
            Point::new(half, -half),
            Point::new(half, half),
            Point::new(-half, half),
        ]
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
        let offset = self.get_offset(coords);
        let diagonals = self.config.diagonals.allows_diagonals();
        MovementDirection::iter()
            .filter(|direction| diagonals || !direction.is_diagonal())
            .map(|direction| {
                let (di, dj) = direction.offset_step();
                GridOffset::new(offset.i + di, offset.j + dj)
            })
            .collect()
    }

    /// Move one cell in a compass direction. Under
    /// [DiagonalRule::Illegal](crate::DiagonalRule::Illegal) a diagonal
    /// request is a no-op.
    pub fn get_shifted_offset(
        &self,
        coords: GridCoordinates,
        direction: MovementDirection,
    ) -> GridOffset {
        let offset = self.get_offset(coords);
        if direction.is_diagonal() && !self.config.diagonals.allows_diagonals()
        {
            return offset;
        }
        let (di, dj) = direction.offset_step();
        GridOffset::new(offset.i + di, offset.j + dj)
    }

    pub fn get_shifted_point(
        &self,
        point: Point,
        direction: MovementDirection,
    ) -> Point {
        if direction.is_diagonal() && !self.config.diagonals.allows_diagonals()
        {
            return point;
        }
        let (di, dj) = direction.offset_step();
        point + Point::new(dj as f64 * self.size(), di as f64 * self.size())
    }

    /// Bresenham-style walk from `from` to `to`. With diagonals allowed
    /// this takes `max(|di|, |dj|)` steps, some of them diagonal; under
    /// `Illegal` every diagonal is decomposed into a column step followed
    /// by a row step, so consecutive cells always share an edge.
    pub fn get_direct_path(
        &self,
        from: GridCoordinates,
        to: GridCoordinates,
    ) -> Vec<GridOffset> {
        let a = self.get_offset(from);
        let b = self.get_offset(to);
        let diagonals = self.config.diagonals.allows_diagonals();

        let sj = (b.j - a.j).signum();
        let si = (b.i - a.i).signum();
        let dj = (b.j - a.j).abs();
        let di = -(b.i - a.i).abs();

        let mut path = vec![a];
        let (mut i, mut j) = (a.i, a.j);
        let mut err = dj + di;
        while i != b.i || j != b.j {
            let e2 = 2 * err;
            let step_j = e2 >= di;
            let step_i = e2 <= dj;
            if step_j {
                err += di;
                j += sj;
            }
            if step_i {
                if step_j && !diagonals {
                    // Split the diagonal: land on the intermediate cell so
                    // the path stays edge-adjacent
                    path.push(GridOffset::new(i, j));
                }
                err += dj;
                i += si;
            }
            path.push(GridOffset::new(i, j));
        }
        path
    }

    pub fn get_offset_range(&self, bounds: Rectangle) -> OffsetRange {
        let size = self.size();
        let i0 = (bounds.y / size).floor() as i32;
        let j0 = (bounds.x / size).floor() as i32;
        let i1 = ((bounds.bottom() / size).ceil() as i32 - 1).max(i0);
        let j1 = ((bounds.right() / size).ceil() as i32 - 1).max(j0);
        (i0, j0, i1, j1)
    }

    /// Snap to the nearest enabled anchor of the subdivided grid. All
    /// anchors of a square grid live on regular lattices, so the nearest
    /// candidate of each class can be computed directly by rounding; no
    /// neighbor search is needed. Everything here is per-call local state.
    pub fn get_snapped_point(
        &self,
        point: Point,
        behavior: &SnappingBehavior,
    ) -> Point {
        let sub = self.size() / behavior.resolution as f64;
        let mode = behavior.mode;

        // Nearest point of the lattice `(n + offset) * sub` to `value`
        let nearest = |value: f64, offset: f64| {
            ((value / sub - offset).round() + offset) * sub
        };

        let mut candidates: Vec<Point> = Vec::with_capacity(4);
        if mode.center {
            candidates.push(Point::new(
                nearest(point.x, 0.5),
                nearest(point.y, 0.5),
            ));
        }
        if mode.vertex {
            candidates.push(Point::new(
                nearest(point.x, 0.0),
                nearest(point.y, 0.0),
            ));
        }
        if mode.edge_midpoint {
            // Midpoints come in two lattices: horizontal-edge midpoints
            // (x on the half lattice) and vertical-edge midpoints (y on
            // the half lattice)
            candidates.push(Point::new(
                nearest(point.x, 0.5),
                nearest(point.y, 0.0),
            ));
            candidates.push(Point::new(
                nearest(point.x, 0.0),
                nearest(point.y, 0.5),
            ));
        }

        // First-listed class wins ties, so iterating in declaration order
        // keeps the policy deterministic
        let mut best = candidates[0];
        for candidate in candidates.into_iter().skip(1) {
            if point.distance_to(candidate) < point.distance_to(best) {
                best = candidate;
            }
        }
        best
    }

    /// Distance in grid units from the origin cell to a cell `(di, dj)`
    /// away, priced by the diagonal rule
    fn cell_distance(&self, di: i32, dj: i32) -> f64 {
        let rule = self.config.diagonals;
        let long = di.abs().max(dj.abs());
        let short = di.abs().min(dj.abs());
        let spaces = if rule.allows_diagonals() {
            let diagonal: f64 = (1..=short as u32)
                .map(|k| rule.diagonal_spaces(k))
                .sum();
            (long - short) as f64 + diagonal
        } else {
            (long + short) as f64
        };
        spaces * self.config.distance
    }

    /// Cells within `radius` distance units of the cell containing
    /// `center`, under the configured diagonal rule
    fn cells_in_radius(
        &self,
        center: Point,
        radius: f64,
    ) -> Vec<GridOffset> {
        let origin = self.get_offset(center.into());
        // Each step costs at least one space, so the Chebyshev bound caps
        // the search box
        let reach = (radius / self.config.distance + 1e-6).floor() as i32;
        let mut cells = Vec::new();
        for di in -reach..=reach {
            for dj in -reach..=reach {
                if self.cell_distance(di, dj) <= radius + 1e-6 {
                    cells.push(GridOffset::new(
                        origin.i + di,
                        origin.j + dj,
                    ));
                }
            }
        }
        cells
    }

    fn outline_of(&self, cells: &[GridOffset]) -> Vec<Point> {
        let polygons: Vec<Vec<Point>> = cells
            .iter()
            .map(|&cell| self.get_vertices(cell.into()))
            .collect();
        shape::stitch_outline(&polygons)
    }

    /// Stepped outline of the diagonal rule's distance ball: a square under
    /// `Equidistant`, a diamond under `Rectilinear`/`Illegal`, cut-corner
    /// outlines in between
    pub fn get_circle(&self, center: Point, radius: f64) -> Vec<Point> {
        if radius < 0.0 {
            return Vec::new();
        }
        self.outline_of(&self.cells_in_radius(center, radius))
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
        let origin_cell = self.get_offset(origin.into());
        let half_angle = angle / 2.0;
        let cells: Vec<GridOffset> = self
            .cells_in_radius(origin, radius)
            .into_iter()
            .filter(|&cell| {
                if cell == origin_cell {
                    // The wedge apex sits in this cell; always include it
                    return true;
                }
                let to_cell =
                    origin.angle_to(self.get_center_point(cell.into()));
                let delta = (to_cell - direction + 180.0).rem_euclid(360.0)
                    - 180.0;
                delta.abs() <= half_angle + 1e-6
            })
            .collect();
        self.outline_of(&cells)
    }
}
