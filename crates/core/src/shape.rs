//! Polygon helpers shared by the grid variants' shape generators: smooth
//! circle/arc tessellation for gridless grids, and boundary stitching that
//! turns a set of discrete cells into the stepped outline polygon the
//! renderer draws for circles and cones.

use crate::geom::Point;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Maximum deviation (in pixels) of a tessellated circle from the true
/// circle
const CIRCLE_TOLERANCE: f64 = 0.25;

/// Vertex key quantization: 1/256th of a pixel. Coarse enough to absorb
/// float noise between a vertex computed from two different cell centers,
/// fine enough to never collapse distinct cell vertices.
const KEY_SCALE: f64 = 256.0;

/// How many vertices an inscribed regular polygon needs so that its edge
/// midpoints sag less than [CIRCLE_TOLERANCE] below a circle of the given
/// pixel radius. The sagitta of one edge is `r * (1 - cos(pi / n))`.
pub fn circle_vertex_count(radius: f64) -> usize {
    let cos_half_step = 1.0 - CIRCLE_TOLERANCE / radius;
    if cos_half_step <= -1.0 {
        // Radius is tiny enough that any polygon is within tolerance
        return 4;
    }
    let n = (PI / cos_half_step.acos()).ceil() as usize;
    n.max(4)
}

/// Tessellate a full circle into a closed polygon (first vertex not
/// repeated), starting at `start_degrees` and sweeping clockwise. All
/// vertices lie exactly on the circle.
pub fn circle_points(center: Point, radius: f64, start_degrees: f64) -> Vec<Point> {
    let n = circle_vertex_count(radius);
    (0..n)
        .map(|k| {
            let angle =
                (start_degrees + 360.0 * k as f64 / n as f64).to_radians();
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Tessellate a clockwise arc from `start_degrees` through
/// `sweep_degrees`, endpoints included. Vertex density follows
/// [circle_vertex_count] so the arc stays within tolerance of the true
/// circle.
pub fn arc_points(
    center: Point,
    radius: f64,
    start_degrees: f64,
    sweep_degrees: f64,
) -> Vec<Point> {
    let full = circle_vertex_count(radius) as f64;
    let n = ((full * sweep_degrees / 360.0).ceil() as usize).max(1);
    (0..=n)
        .map(|k| {
            let angle = (start_degrees
                + sweep_degrees * k as f64 / n as f64)
                .to_radians();
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

fn key_of(point: Point) -> (i64, i64) {
    (
        (point.x * KEY_SCALE).round() as i64,
        (point.y * KEY_SCALE).round() as i64,
    )
}

/// Stitch the outer boundary of a set of cells into a single polygon.
///
/// `cells` is one polygon per cell, all wound the same way (clockwise in
/// screen space, as produced by `get_vertices`). Interior edges are shared
/// by two cells and traversed in opposite directions, so they cancel;
/// whatever remains is the boundary, which this walks into vertex order.
/// Runs of collinear boundary vertices are merged.
///
/// Returns an empty vec for an empty cell set. If the set is disconnected
/// only the loop containing the topmost boundary vertex is returned; the
/// circle/cone selectors only ever produce connected sets.
pub fn stitch_outline(cells: &[Vec<Point>]) -> Vec<Point> {
    // Directed edges, keyed by quantized endpoints
    let mut edges: HashMap<((i64, i64), (i64, i64)), (Point, Point)> =
        HashMap::new();
    for cell in cells {
        for (index, &start) in cell.iter().enumerate() {
            let end = cell[(index + 1) % cell.len()];
            edges.insert((key_of(start), key_of(end)), (start, end));
        }
    }

    // An edge is on the boundary iff no neighbor traverses it backwards
    let boundary: HashMap<(i64, i64), (Point, (i64, i64))> = edges
        .iter()
        .filter(|((from, to), _)| !edges.contains_key(&(*to, *from)))
        .map(|((from, to), (start, _))| (*from, (*start, *to)))
        .collect();
    if boundary.is_empty() {
        return Vec::new();
    }

    // Walk the loop, starting from the topmost (then leftmost) vertex so
    // output is deterministic
    let start_key = *boundary
        .keys()
        .min_by_key(|(x, y)| (*y, *x))
        .unwrap();
    let mut outline: Vec<Point> = Vec::with_capacity(boundary.len());
    let mut key = start_key;
    loop {
        // Every boundary vertex of a connected cell set has exactly one
        // outgoing boundary edge, so the walk cannot dead-end before
        // closing the loop
        let (point, next) = boundary[&key];
        outline.push(point);
        key = next;
        if key == start_key {
            break;
        }
        if outline.len() > boundary.len() {
            // Defect in the input winding; bail out with what we have
            // rather than looping forever
            break;
        }
    }

    merge_collinear(outline)
}

/// Drop vertices that sit on the straight line between their neighbors
fn merge_collinear(points: Vec<Point>) -> Vec<Point> {
    if points.len() < 3 {
        return points;
    }
    let n = points.len();
    (0..n)
        .filter(|&index| {
            let prev = points[(index + n - 1) % n];
            let here = points[index];
            let next = points[(index + 1) % n];
            let cross = (here.x - prev.x) * (next.y - prev.y)
                - (here.y - prev.y) * (next.x - prev.x);
            cross.abs() > 1e-6
        })
        .map(|index| points[index])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_circle_vertex_count_grows_with_radius() {
        assert!(circle_vertex_count(10.0) < circle_vertex_count(100.0));
        assert!(circle_vertex_count(100.0) < circle_vertex_count(1000.0));
        // Tiny circles still produce a polygon
        assert!(circle_vertex_count(0.01) >= 4);
    }

    #[test]
    fn test_circle_points_on_circle() {
        let center = Point::new(10.0, -5.0);
        let points = circle_points(center, 300.0, 270.0);
        assert!(points.len() >= 4);
        for point in &points {
            assert_approx_eq!(center.distance_to(*point), 300.0, 1e-9);
        }
        // Starts at the requested angle: 270° is due north
        assert_approx_eq!(points[0].x, 10.0, 1e-9);
        assert_approx_eq!(points[0].y, -305.0, 1e-9);
    }

    #[test]
    fn test_arc_endpoints() {
        let points = arc_points(Point::ORIGIN, 100.0, 0.0, 90.0);
        let first = points.first().unwrap();
        let last = points.last().unwrap();
        assert_approx_eq!(first.x, 100.0, 1e-9);
        assert_approx_eq!(first.y, 0.0, 1e-9);
        assert_approx_eq!(last.x, 0.0, 1e-9);
        assert_approx_eq!(last.y, 100.0, 1e-9);
    }

    /// Two unit squares side by side stitch into a 2x1 rectangle
    #[test]
    fn test_stitch_two_squares() {
        let square = |x0: f64, y0: f64| {
            vec![
                Point::new(x0, y0),
                Point::new(x0 + 1.0, y0),
                Point::new(x0 + 1.0, y0 + 1.0),
                Point::new(x0, y0 + 1.0),
            ]
        };
        let outline =
            stitch_outline(&[square(0.0, 0.0), square(1.0, 0.0)]);
        // The shared edge cancels and collinear midpoints merge away
        assert_eq!(
            outline,
            vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(2.0, 1.0),
                Point::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_stitch_single_cell_is_identity() {
        let cell = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        assert_eq!(stitch_outline(&[cell.clone()]), cell);
    }

    #[test]
    fn test_stitch_empty() {
        assert!(stitch_outline(&[]).is_empty());
    }

    /// An L of three squares keeps its concave corner
    #[test]
    fn test_stitch_l_shape() {
        let square = |x0: f64, y0: f64| {
            vec![
                Point::new(x0, y0),
                Point::new(x0 + 1.0, y0),
                Point::new(x0 + 1.0, y0 + 1.0),
                Point::new(x0, y0 + 1.0),
            ]
        };
        let outline = stitch_outline(&[
            square(0.0, 0.0),
            square(0.0, 1.0),
            square(1.0, 1.0),
        ]);
        assert_eq!(outline.len(), 6);
        assert!(outline.contains(&Point::new(1.0, 1.0)));
    }
}
