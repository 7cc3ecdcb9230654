//! Gridless topology. There are no cells, so every discrete query
//! degenerates: offsets are rounded pixel positions, adjacency is empty,
//! snapping is the identity, and shapes are smooth polygons instead of
//! stepped cell outlines.

use crate::{
    config::GridConfig,
    direction::MovementDirection,
    geom::{Point, Rectangle},
    grid::{GridCoordinates, GridOffset, OffsetRange},
    shape,
};

#[derive(Clone, Debug)]
pub struct GridlessGrid {
    config: GridConfig,
}

impl GridlessGrid {
    pub(crate) fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Grid units to pixels
    fn pixels(&self, distance: f64) -> f64 {
        distance / self.config.distance * self.config.size
    }

    /// Pseudo-offset: the pixel position rounded to integers. There is no
    /// cell structure to quantize to.
    pub fn get_offset(&self, coords: GridCoordinates) -> GridOffset {
        match coords {
            GridCoordinates::Offset(offset) => offset,
            GridCoordinates::Point(point) => GridOffset::new(
                point.y.round() as i32,
                point.x.round() as i32,
            ),
        }
    }

    fn to_point(&self, coords: GridCoordinates) -> Point {
        match coords {
            GridCoordinates::Offset(offset) => {
                Point::new(offset.j as f64, offset.i as f64)
            }
            GridCoordinates::Point(point) => point,
        }
    }

    pub fn get_top_left_point(&self, coords: GridCoordinates) -> Point {
        self.to_point(coords)
    }

    pub fn get_center_point(&self, coords: GridCoordinates) -> Point {
        self.to_point(coords)
    }

    pub fn get_shape(&self) -> Vec<Point> {
        Vec::new()
    }

    pub fn get_vertices(&self, _coords: GridCoordinates) -> Vec<Point> {
        Vec::new()
    }

    pub fn get_adjacent_offsets(
        &self,
        _coords: GridCoordinates,
    ) -> Vec<GridOffset> {
        Vec::new()
    }

    /// Shift by one grid size per axis component of the direction
    pub fn get_shifted_offset(
        &self,
        coords: GridCoordinates,
        direction: MovementDirection,
    ) -> GridOffset {
        let point =
            self.get_shifted_point(self.to_point(coords), direction);
        self.get_offset(point.into())
    }

    pub fn get_shifted_point(
        &self,
        point: Point,
        direction: MovementDirection,
    ) -> Point {
        let (di, dj) = direction.offset_step();
        point
            + Point::new(
                dj as f64 * self.config.size,
                di as f64 * self.config.size,
            )
    }

    /// No intermediate cells to pass through, so the path is just the two
    /// endpoints
    pub fn get_direct_path(
        &self,
        from: GridCoordinates,
        to: GridCoordinates,
    ) -> Vec<GridOffset> {
        vec![self.get_offset(from), self.get_offset(to)]
    }

    pub fn get_offset_range(&self, bounds: Rectangle) -> OffsetRange {
        (
            bounds.y.floor() as i32,
            bounds.x.floor() as i32,
            bounds.bottom().ceil() as i32,
            bounds.right().ceil() as i32,
        )
    }

    /// Nothing to snap to; the point comes back unchanged
    pub fn get_snapped_point(&self, point: Point) -> Point {
        point
    }

    /// Smooth circle: an inscribed polygon with enough vertices to stay
    /// within the rendering tolerance of the true circle
    pub fn get_circle(&self, center: Point, radius: f64) -> Vec<Point> {
        if radius <= 0.0 {
            return Vec::new();
        }
        let radius = self.pixels(radius);
        shape::circle_points(center, radius, 0.0)
    }

    /// Smooth wedge: the apex plus an arc spanning `angle` degrees around
    /// `direction`
    pub fn get_cone(
        &self,
        origin: Point,
        radius: f64,
        direction: f64,
        angle: f64,
    ) -> Vec<Point> {
        if radius <= 0.0 || angle <= 0.0 {
            return Vec::new();
        }
        if angle >= 360.0 {
            return self.get_circle(origin, radius);
        }
        let radius = self.pixels(radius);
        let mut points = vec![origin];
        points.extend(shape::arc_points(
            origin,
            radius,
            direction - angle / 2.0,
            angle,
        ));
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridType;
    use assert_approx_eq::assert_approx_eq;

    fn grid() -> GridlessGrid {
        GridlessGrid::new(GridConfig {
            grid_type: GridType::Gridless,
            ..GridConfig::default()
        })
    }

    #[test]
    fn test_pseudo_offsets_round_pixels() {
        let grid = grid();
        assert_eq!(
            grid.get_offset(Point::new(12.4, -3.6).into()),
            GridOffset::new(-4, 12)
        );
        // Offsets convert back to pixel points directly
        assert_eq!(
            grid.get_center_point(GridOffset::new(-4, 12).into()),
            Point::new(12.0, -4.0)
        );
    }

    #[test]
    fn test_no_cell_structure() {
        let grid = grid();
        let at = GridOffset::new(5, 5);
        assert!(grid.get_adjacent_offsets(at.into()).is_empty());
        assert!(grid.get_vertices(at.into()).is_empty());
        assert!(grid.get_shape().is_empty());
    }

    #[test]
    fn test_shift_moves_a_full_grid_size() {
        let grid = grid();
        let point = Point::new(10.0, 20.0);
        assert_eq!(
            grid.get_shifted_point(point, MovementDirection::SE),
            Point::new(110.0, 120.0)
        );
        assert_eq!(
            grid.get_shifted_point(point, MovementDirection::N),
            Point::new(10.0, -80.0)
        );
    }

    #[test]
    fn test_direct_path_is_endpoints_only() {
        let grid = grid();
        let path = grid.get_direct_path(
            Point::new(0.0, 0.0).into(),
            Point::new(300.0, 400.0).into(),
        );
        assert_eq!(
            path,
            vec![GridOffset::new(0, 0), GridOffset::new(400, 300)]
        );
    }

    #[test]
    fn test_snapping_is_identity() {
        let grid = grid();
        let point = Point::new(123.456, -78.9);
        assert_eq!(grid.get_snapped_point(point), point);
    }

    #[test]
    fn test_circle_is_smooth() {
        let grid = grid();
        // 5 units = 100px on the default config
        let outline = grid.get_circle(Point::new(0.0, 0.0), 5.0);
        assert!(outline.len() >= 4);
        for point in outline {
            assert_approx_eq!(
                Point::ORIGIN.distance_to(point),
                100.0,
                1e-9
            );
        }
    }

    #[test]
    fn test_cone_has_apex_and_arc() {
        let grid = grid();
        let apex = Point::new(50.0, 50.0);
        let outline = grid.get_cone(apex, 5.0, 0.0, 90.0);
        assert_eq!(outline[0], apex);
        // Arc points all sit on the circle, within the wedge
        for point in &outline[1..] {
            assert_approx_eq!(apex.distance_to(*point), 100.0, 1e-9);
            let angle = apex.angle_to(*point);
            let delta = (angle + 180.0).rem_euclid(360.0) - 180.0;
            assert!(delta.abs() <= 45.0 + 1e-9);
        }
    }

    #[test]
    fn test_degenerate_shapes_are_empty() {
        let grid = grid();
        assert!(grid.get_circle(Point::ORIGIN, 0.0).is_empty());
        assert!(grid
            .get_cone(Point::ORIGIN, 5.0, 0.0, 0.0)
            .is_empty());
    }
}
