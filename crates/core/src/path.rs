//! Path measurement over an ordered sequence of waypoints. Each
//! consecutive pair is resolved to a direct path on the grid, then priced
//! into real-world distance, discrete spaces, and an optional
//! caller-supplied cost.

use crate::{
    geom::Point,
    grid::{Grid, GridCoordinates, GridOffset},
};
use anyhow::Result;
use log::trace;
use serde::Serialize;
use std::ops::{Add, AddAssign};

/// Per-step pricing callback: `(from, to, step_distance)`. Any error
/// aborts the whole measurement.
pub type CostFn<'a> =
    dyn FnMut(GridOffset, GridOffset, f64) -> Result<f64> + 'a;

/// Input waypoint. A teleport waypoint contributes a zero-valued segment
/// no matter how far it is from its predecessor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeasurePathWaypoint {
    pub coords: GridCoordinates,
    pub teleport: bool,
}

impl MeasurePathWaypoint {
    pub fn new(coords: impl Into<GridCoordinates>) -> Self {
        Self {
            coords: coords.into(),
            teleport: false,
        }
    }

    pub fn teleport(coords: impl Into<GridCoordinates>) -> Self {
        Self {
            coords: coords.into(),
            teleport: true,
        }
    }
}

impl From<GridOffset> for MeasurePathWaypoint {
    fn from(offset: GridOffset) -> Self {
        Self::new(offset)
    }
}

impl From<Point> for MeasurePathWaypoint {
    fn from(point: Point) -> Self {
        Self::new(point)
    }
}

/// One bundle of measurement totals. Used both per-segment and as a
/// running sum.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct PathMeasurement {
    /// Real-world distance, in the grid's configured units
    pub distance: f64,
    /// Number of adjacency steps along the direct path
    pub spaces: u32,
    /// Cost-function total; equals `distance` when no cost function is
    /// supplied
    pub cost: f64,
    /// Diagonal steps taken; only ever nonzero on square grids
    pub diagonals: u32,
}

impl Add for PathMeasurement {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            distance: self.distance + other.distance,
            spaces: self.spaces + other.spaces,
            cost: self.cost + other.cost,
            diagonals: self.diagonals + other.diagonals,
        }
    }
}

impl AddAssign for PathMeasurement {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// An input waypoint paired with the running totals up to and including
/// the segment that arrives at it
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct MeasuredWaypoint {
    pub coords: GridCoordinates,
    pub teleport: bool,
    pub cumulative: PathMeasurement,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeasurePathResult {
    pub waypoints: Vec<MeasuredWaypoint>,
    pub segments: Vec<PathMeasurement>,
    pub totals: PathMeasurement,
}

#[cfg(feature = "json")]
impl MeasurePathResult {
    /// Serialize the result as JSON, for consumers outside Rust
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            // Panics only if the result format isn't serializable (a bug)
            .expect("error serializing measurement result")
    }
}

impl Grid {
    /// Measure a multi-waypoint path. Totals are strict running sums of
    /// the segment values, and each returned waypoint carries the
    /// cumulative totals at that point of the path.
    ///
    /// The alternating diagonal counter spans the entire measurement, so
    /// a diagonal's price depends on how many diagonals came before it
    /// across *all* segments, not just its own.
    pub fn measure_path(
        &self,
        waypoints: &[MeasurePathWaypoint],
        mut cost_fn: Option<&mut CostFn<'_>>,
    ) -> Result<MeasurePathResult> {
        let mut result = MeasurePathResult::default();
        let mut diagonals_so_far = 0;

        let Some((first, rest)) = waypoints.split_first() else {
            return Ok(result);
        };
        result.waypoints.push(MeasuredWaypoint {
            coords: first.coords,
            teleport: first.teleport,
            cumulative: PathMeasurement::default(),
        });

        let mut previous = first.coords;
        for waypoint in rest {
            let segment = if waypoint.teleport {
                // Teleports contribute nothing and never touch the cost
                // function
                PathMeasurement::default()
            } else {
                self.measure_segment(
                    previous,
                    waypoint.coords,
                    &mut cost_fn,
                    &mut diagonals_so_far,
                )?
            };
            trace!(
                "Segment to {:?}: distance={} spaces={} cost={}",
                waypoint.coords,
                segment.distance,
                segment.spaces,
                segment.cost
            );
            result.totals += segment;
            result.segments.push(segment);
            result.waypoints.push(MeasuredWaypoint {
                coords: waypoint.coords,
                teleport: waypoint.teleport,
                cumulative: result.totals,
            });
            previous = waypoint.coords;
        }
        Ok(result)
    }

    fn measure_segment(
        &self,
        from: GridCoordinates,
        to: GridCoordinates,
        cost_fn: &mut Option<&mut CostFn<'_>>,
        diagonals_so_far: &mut u32,
    ) -> Result<PathMeasurement> {
        let config = self.config();
        match self {
            Grid::Gridless(_) => {
                // Continuous measurement: pixel distance scaled to
                // real-world units, no discrete steps
                let a = self.get_center_point(from);
                let b = self.get_center_point(to);
                let distance =
                    a.distance_to(b) / config.size * config.distance;
                let cost = match cost_fn {
                    Some(cost_fn) => cost_fn(
                        self.get_offset(from),
                        self.get_offset(to),
                        distance,
                    )?,
                    None => distance,
                };
                Ok(PathMeasurement {
                    distance,
                    spaces: 0,
                    cost,
                    diagonals: 0,
                })
            }
            Grid::Square(grid) => {
                let rule = config.diagonals;
                let path = grid.get_direct_path(from, to);
                let mut segment = PathMeasurement::default();
                for pair in path.windows(2) {
                    let diagonal =
                        pair[0].i != pair[1].i && pair[0].j != pair[1].j;
                    let step_spaces = if diagonal {
                        *diagonals_so_far += 1;
                        segment.diagonals += 1;
                        rule.diagonal_spaces(*diagonals_so_far)
                    } else {
                        1.0
                    };
                    let step_distance = step_spaces * config.distance;
                    segment.distance += step_distance;
                    segment.spaces += 1;
                    segment.cost += match cost_fn {
                        Some(cost_fn) => {
                            cost_fn(pair[0], pair[1], step_distance)?
                        }
                        None => step_distance,
                    };
                }
                Ok(segment)
            }
            Grid::Hexagonal(grid) => {
                let path = grid.get_direct_path(from, to);
                let mut segment = PathMeasurement::default();
                for pair in path.windows(2) {
                    let step_distance = config.distance;
                    segment.distance += step_distance;
                    segment.spaces += 1;
                    segment.cost += match cost_fn {
                        Some(cost_fn) => {
                            cost_fn(pair[0], pair[1], step_distance)?
                        }
                        None => step_distance,
                    };
                }
                Ok(segment)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiagonalRule, GridConfig, GridType};
    use assert_approx_eq::assert_approx_eq;

    fn grid(grid_type: GridType, diagonals: DiagonalRule) -> Grid {
        Grid::new(GridConfig {
            grid_type,
            diagonals,
            ..GridConfig::default()
        })
        .unwrap()
    }

    fn waypoints(offsets: &[(i32, i32)]) -> Vec<MeasurePathWaypoint> {
        offsets
            .iter()
            .map(|&(i, j)| {
                MeasurePathWaypoint::new(GridOffset::new(i, j))
            })
            .collect()
    }

    #[test]
    fn test_straight_line_square() {
        let grid = grid(GridType::Square, DiagonalRule::Illegal);
        let result = grid
            .measure_path(&waypoints(&[(0, 0), (3, 0)]), None)
            .unwrap();
        assert_eq!(result.totals.spaces, 3);
        assert_eq!(result.totals.diagonals, 0);
        assert_approx_eq!(result.totals.distance, 15.0);
        assert_approx_eq!(result.totals.cost, 15.0);
    }

    #[test]
    fn test_mixed_path_square() {
        let grid = grid(GridType::Square, DiagonalRule::Equidistant);
        let result = grid
            .measure_path(&waypoints(&[(0, 0), (3, 4)]), None)
            .unwrap();
        // Minimal path: 4 steps, 3 of them diagonal, all priced at one
        // space under the equidistant rule
        assert_eq!(result.totals.spaces, 4);
        assert_eq!(result.totals.diagonals, 3);
        assert_approx_eq!(result.totals.distance, 20.0);
    }

    #[test]
    fn test_alternating_counter_spans_segments() {
        let grid = grid(GridType::Square, DiagonalRule::Alternating1);
        // Two one-diagonal segments: the second diagonal is the second of
        // the measurement, so it costs 2 spaces
        let result = grid
            .measure_path(&waypoints(&[(0, 0), (1, 1), (2, 2)]), None)
            .unwrap();
        assert_approx_eq!(result.segments[0].distance, 5.0);
        assert_approx_eq!(result.segments[1].distance, 10.0);
        assert_approx_eq!(result.totals.distance, 15.0);
    }

    #[test]
    fn test_teleport_segment_is_free() {
        let grid = grid(GridType::Square, DiagonalRule::Equidistant);
        let mut invocations = 0;
        let mut cost_fn = |_: GridOffset, _: GridOffset, distance: f64| {
            invocations += 1;
            Ok(distance)
        };
        let path = vec![
            MeasurePathWaypoint::new(GridOffset::new(0, 0)),
            MeasurePathWaypoint::teleport(GridOffset::new(7, 9)),
        ];
        let result =
            grid.measure_path(&path, Some(&mut cost_fn)).unwrap();
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0], PathMeasurement::default());
        assert_eq!(result.totals, PathMeasurement::default());
        assert_eq!(invocations, 0);
    }

    #[test]
    fn test_cost_function_per_step() {
        let grid = grid(GridType::Square, DiagonalRule::Equidistant);
        // Double-price every step
        let mut cost_fn = |_: GridOffset, _: GridOffset, distance: f64| {
            Ok(distance * 2.0)
        };
        let result = grid
            .measure_path(
                &waypoints(&[(0, 0), (0, 3)]),
                Some(&mut cost_fn),
            )
            .unwrap();
        assert_approx_eq!(result.totals.distance, 15.0);
        assert_approx_eq!(result.totals.cost, 30.0);
    }

    #[test]
    fn test_cost_function_error_aborts() {
        let grid = grid(GridType::Square, DiagonalRule::Equidistant);
        let mut cost_fn = |_: GridOffset, to: GridOffset, _: f64| {
            if to.j >= 2 {
                anyhow::bail!("impassable at {}", to);
            }
            Ok(1.0)
        };
        let result = grid
            .measure_path(&waypoints(&[(0, 0), (0, 3)]), Some(&mut cost_fn));
        assert!(result.is_err());
    }

    #[test]
    fn test_additivity() {
        let grid = grid(GridType::Square, DiagonalRule::Approximate);
        let result = grid
            .measure_path(
                &waypoints(&[(0, 0), (2, 3), (5, 3), (6, 7)]),
                None,
            )
            .unwrap();
        let summed = result
            .segments
            .iter()
            .fold(PathMeasurement::default(), |sum, &segment| {
                sum + segment
            });
        assert_approx_eq!(result.totals.distance, summed.distance);
        assert_eq!(result.totals.spaces, summed.spaces);
        assert_approx_eq!(result.totals.cost, summed.cost);
        assert_eq!(result.totals.diagonals, summed.diagonals);
        // Waypoints carry the running sums
        assert_eq!(
            result.waypoints.last().unwrap().cumulative,
            result.totals
        );
        assert_eq!(
            result.waypoints[0].cumulative,
            PathMeasurement::default()
        );
    }

    #[test]
    fn test_hexagonal_path() {
        let grid = grid(GridType::HexOddR, DiagonalRule::Equidistant);
        let result = grid
            .measure_path(&waypoints(&[(0, 0), (0, 3)]), None)
            .unwrap();
        assert_eq!(result.totals.spaces, 3);
        assert_eq!(result.totals.diagonals, 0);
        assert_approx_eq!(result.totals.distance, 15.0);
    }

    #[test]
    fn test_gridless_path() {
        let grid = grid(GridType::Gridless, DiagonalRule::Equidistant);
        let path = vec![
            MeasurePathWaypoint::new(Point::new(0.0, 0.0)),
            MeasurePathWaypoint::new(Point::new(300.0, 400.0)),
        ];
        let result = grid.measure_path(&path, None).unwrap();
        // 500px on a 100px/5ft grid
        assert_approx_eq!(result.totals.distance, 25.0);
        assert_eq!(result.totals.spaces, 0);
    }

    #[test]
    fn test_empty_and_single_waypoint() {
        let grid = grid(GridType::Square, DiagonalRule::Equidistant);
        let result = grid.measure_path(&[], None).unwrap();
        assert!(result.waypoints.is_empty());
        assert!(result.segments.is_empty());

        let result = grid
            .measure_path(&waypoints(&[(4, 4)]), None)
            .unwrap();
        assert_eq!(result.waypoints.len(), 1);
        assert!(result.segments.is_empty());
        assert_eq!(result.totals, PathMeasurement::default());
    }
}
