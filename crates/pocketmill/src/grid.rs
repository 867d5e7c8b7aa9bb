use kurbo::{Point, Rect};
use tracing::debug;

use crate::geometry::Boundary;
use crate::intersect::horizontal_crossings;

/// One lattice point's classification record.
#[derive(Debug, Clone, Copy)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub millable: bool,
}

/// A maximal contiguous span of millable points on one row. Columns are
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub row: usize,
    pub first_col: usize,
    pub last_col: usize,
}

/// Regular lattice over a boundary's bounding box.
///
/// Points live in one row-major arena; rows count downward from the top edge
/// and the first row/column sits one full spacing inside the box, so lattice
/// points never land on the box edges. `millable` only ever transitions from
/// true to false.
#[derive(Debug, Clone)]
pub struct SamplingGrid {
    points: Vec<SamplePoint>,
    rows: usize,
    cols: usize,
    x_start: f64,
    x_end: f64,
    y_start: f64,
    y_end: f64,
    step: f64,
}

impl SamplingGrid {
    pub fn new(bbox: Rect, step: f64) -> Self {
        assert!(step > 0.0, "grid step must be positive, got {step}");
        let x_start = bbox.min_x();
        let x_end = bbox.max_x();
        let y_start = bbox.max_y();
        let y_end = bbox.min_y();

        let mut cols = 0usize;
        let mut x = x_start + step;
        while x < x_end {
            cols += 1;
            x += step;
        }
        let mut rows = 0usize;
        let mut y = y_start - step;
        while y > y_end {
            rows += 1;
            y -= step;
        }

        let mut points = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            let y = y_start - (r as f64 + 1.0) * step;
            for c in 0..cols {
                let x = x_start + (c as f64 + 1.0) * step;
                points.push(SamplePoint {
                    x,
                    y,
                    millable: true,
                });
            }
        }
        debug!(rows, cols, step, "built sampling grid");
        Self {
            points,
            rows,
            cols,
            x_start,
            x_end,
            y_start,
            y_end,
            step,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// The box the lattice was built over.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x_start, self.y_end, self.x_end, self.y_start)
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn point(&self, row: usize, col: usize) -> &SamplePoint {
        &self.points[self.idx(row, col)]
    }

    pub fn x_of_col(&self, col: usize) -> f64 {
        self.x_start + (col as f64 + 1.0) * self.step
    }

    pub fn y_of_row(&self, row: usize) -> f64 {
        self.y_start - (row as f64 + 1.0) * self.step
    }

    /// Column whose lattice x matches `x`, if any.
    pub fn col_at_x(&self, x: f64) -> Option<usize> {
        let k = ((x - self.x_start) / self.step).round();
        if k < 1.0 {
            return None;
        }
        let col = k as usize - 1;
        if col < self.cols && (self.x_of_col(col) - x).abs() < self.step / 2.0 {
            Some(col)
        } else {
            None
        }
    }

    pub fn any_millable(&self) -> bool {
        self.points.iter().any(|p| p.millable)
    }

    pub fn millable_count(&self) -> usize {
        self.points.iter().filter(|p| p.millable).count()
    }

    fn row_occupied(&self, row: usize) -> bool {
        (0..self.cols).any(|c| self.point(row, c).millable)
    }

    /// Topmost and bottommost rows that still hold a millable point.
    pub fn occupied_row_bounds(&self) -> Option<(usize, usize)> {
        let top = (0..self.rows).find(|&r| self.row_occupied(r))?;
        let bottom = (0..self.rows).rev().find(|&r| self.row_occupied(r))?;
        Some((top, bottom))
    }

    /// Remove every point closer than `clearance` to any boundary segment.
    pub fn prune_near_boundary(&mut self, boundary: &Boundary, clearance: f64) {
        let mut removed = 0usize;
        for p in &mut self.points {
            if !p.millable {
                continue;
            }
            let pt = Point::new(p.x, p.y);
            if boundary
                .segments
                .iter()
                .any(|seg| seg.distance_to(pt) < clearance)
            {
                p.millable = false;
                removed += 1;
            }
        }
        debug!(removed, clearance, "pruned points near boundary");
    }

    /// Remove every point outside the boundary by the parity rule: count the
    /// scan-line crossings strictly to the point's right; even means outside.
    pub fn prune_outside(&mut self, boundary: &Boundary) {
        let span = (self.x_start, self.x_end);
        let mut removed = 0usize;
        for row in 0..self.rows {
            let y = self.y_of_row(row);
            let crossings = horizontal_crossings(&boundary.segments, y, span);
            for col in 0..self.cols {
                let i = self.idx(row, col);
                let p = &mut self.points[i];
                if !p.millable {
                    continue;
                }
                let right = crossings.iter().filter(|&&x| x > p.x).count();
                if right % 2 == 0 {
                    p.millable = false;
                    removed += 1;
                }
            }
        }
        debug!(removed, "pruned points outside boundary");
    }

    /// The maximal millable run through (row, col). A reference point whose
    /// own cell was just consumed still finds the run via its immediate
    /// left/right neighbor.
    pub fn run_containing(&self, row: usize, col: usize) -> Option<Run> {
        let col = if self.point(row, col).millable {
            col
        } else if col > 0 && self.point(row, col - 1).millable {
            col - 1
        } else if col + 1 < self.cols && self.point(row, col + 1).millable {
            col + 1
        } else {
            return None;
        };
        let mut first_col = col;
        while first_col > 0 && self.point(row, first_col - 1).millable {
            first_col -= 1;
        }
        let mut last_col = col;
        while last_col + 1 < self.cols && self.point(row, last_col + 1).millable {
            last_col += 1;
        }
        Some(Run {
            row,
            first_col,
            last_col,
        })
    }

    /// Mark every point of the run as consumed.
    pub fn consume(&mut self, run: &Run) {
        for col in run.first_col..=run.last_col {
            let i = self.idx(run.row, col);
            self.points[i].millable = false;
        }
    }

    /// The millable point, among the left/right ends of the topmost and
    /// bottommost occupied rows, nearest to `from`. Candidate order is fixed
    /// (top-left, top-right, bottom-left, bottom-right) so distance ties
    /// resolve deterministically.
    pub fn nearest_millable_extreme(&self, from: Point) -> Option<(usize, usize)> {
        let (top, bottom) = self.occupied_row_bounds()?;
        let mut best: Option<(f64, usize, usize)> = None;
        for row in [top, bottom] {
            let first = (0..self.cols).find(|&c| self.point(row, c).millable)?;
            let last = (0..self.cols).rev().find(|&c| self.point(row, c).millable)?;
            for col in [first, last] {
                let p = self.point(row, col);
                let dist = from.distance(Point::new(p.x, p.y));
                if best.map(|(d, _, _)| dist < d).unwrap_or(true) {
                    best = Some((dist, row, col));
                }
            }
        }
        best.map(|(_, row, col)| (row, col))
    }

    /// The run the raster should move to after finishing `current`.
    ///
    /// Looks at the nearest occupied row above and the nearest below. The
    /// preferred side (`prefer_top`) wins whenever that row has a millable
    /// point within the current run's column span; otherwise the other side
    /// is tried; otherwise there is no adjacent run and the pass ends. Within
    /// the chosen row the in-span end nearer (in |x|) to `leading_x` is
    /// selected, a tie picking the leftmost, and the returned run is the
    /// maximal run through that point. The bool is true when the chosen row
    /// lies above the current one.
    pub fn adjacent_run(
        &self,
        current: &Run,
        prefer_top: bool,
        leading_x: f64,
    ) -> Option<(Run, bool)> {
        let above = (0..current.row).rev().find(|&r| self.row_occupied(r));
        let below = (current.row + 1..self.rows).find(|&r| self.row_occupied(r));

        let candidates = if prefer_top {
            [(above, true), (below, false)]
        } else {
            [(below, false), (above, true)]
        };

        for (row, from_top) in candidates {
            let Some(row) = row else { continue };
            let span = current.first_col..=current.last_col;
            let Some(first) = span.clone().find(|&c| self.point(row, c).millable) else {
                continue;
            };
            let last = span
                .rev()
                .find(|&c| self.point(row, c).millable)
                .unwrap_or(first);
            let first_dist = (self.x_of_col(first) - leading_x).abs();
            let last_dist = (self.x_of_col(last) - leading_x).abs();
            let col = if first_dist <= last_dist { first } else { last };
            return self.run_containing(row, col).map(|run| (run, from_top));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Boundary;

    // 10x10 box with 1.4 spacing: 7x7 lattice at x,y in {1.4, 2.8, .., 9.8}
    fn grid_10x10() -> SamplingGrid {
        SamplingGrid::new(Rect::new(0.0, 0.0, 10.0, 10.0), 1.4)
    }

    #[test]
    fn test_build_counts() {
        let grid = grid_10x10();
        assert_eq!(grid.rows(), 7);
        assert_eq!(grid.cols(), 7);
        assert_eq!(grid.millable_count(), 49);
        assert_eq!(grid.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!((grid.step() - 1.4).abs() < 1e-12);
        assert!((grid.x_of_col(0) - 1.4).abs() < 1e-9);
        assert!((grid.y_of_row(0) - 8.6).abs() < 1e-9);
        assert!((grid.y_of_row(6) - 0.2).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "grid step must be positive")]
    fn test_build_rejects_non_positive_step() {
        SamplingGrid::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn test_build_degenerate_box() {
        let grid = SamplingGrid::new(Rect::new(0.0, 0.0, 1.0, 1.0), 1.4);
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.cols(), 0);
        assert!(!grid.any_millable());
    }

    #[test]
    fn test_col_at_x_roundtrip() {
        let grid = grid_10x10();
        for col in 0..grid.cols() {
            assert_eq!(grid.col_at_x(grid.x_of_col(col)), Some(col));
        }
        assert_eq!(grid.col_at_x(-3.0), None);
        assert_eq!(grid.col_at_x(25.0), None);
    }

    #[test]
    fn test_prune_outside_keeps_interior() {
        let boundary = Boundary::rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), false);
        let mut grid = grid_10x10();
        grid.prune_outside(&boundary);
        assert_eq!(grid.millable_count(), 49);
    }

    #[test]
    fn test_prune_near_boundary_clearance() {
        let boundary = Boundary::rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), false);
        let mut grid = grid_10x10();
        grid.prune_near_boundary(&boundary, 2.0);
        // survivors need x and y in [2, 8]: lattice values 2.8, 4.2, 5.6, 7.0
        assert_eq!(grid.millable_count(), 16);
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let p = grid.point(row, col);
                let margin = p.x.min(10.0 - p.x).min(p.y).min(10.0 - p.y);
                assert_eq!(p.millable, margin >= 2.0);
            }
        }
    }

    #[test]
    fn test_run_containing_and_split() {
        let mut grid = grid_10x10();
        let full = grid.run_containing(3, 3).unwrap();
        assert_eq!(
            full,
            Run {
                row: 3,
                first_col: 0,
                last_col: 6
            }
        );

        // punch a hole in the middle of row 3
        grid.consume(&Run {
            row: 3,
            first_col: 3,
            last_col: 3,
        });
        let left = grid.run_containing(3, 1).unwrap();
        assert_eq!(left.first_col, 0);
        assert_eq!(left.last_col, 2);
        let right = grid.run_containing(3, 5).unwrap();
        assert_eq!(right.first_col, 4);
        assert_eq!(right.last_col, 6);
    }

    #[test]
    fn test_run_containing_tolerates_consumed_neighbor() {
        let mut grid = grid_10x10();
        grid.consume(&Run {
            row: 2,
            first_col: 0,
            last_col: 2,
        });
        // col 2 itself is consumed but col 3 still millable
        let run = grid.run_containing(2, 2).unwrap();
        assert_eq!(run.first_col, 3);
        assert_eq!(run.last_col, 6);
    }

    #[test]
    fn test_consume_is_monotonic() {
        let mut grid = grid_10x10();
        let run = grid.run_containing(0, 0).unwrap();
        grid.consume(&run);
        assert_eq!(grid.millable_count(), 42);
        assert!(grid.run_containing(0, 0).is_none());
    }

    #[test]
    fn test_nearest_millable_extreme_picks_bottom_left() {
        let grid = grid_10x10();
        let (row, col) = grid.nearest_millable_extreme(Point::new(0.0, 0.0)).unwrap();
        assert_eq!((row, col), (6, 0));

        let (row, col) = grid
            .nearest_millable_extreme(Point::new(10.0, 10.0))
            .unwrap();
        assert_eq!((row, col), (0, 6));
    }

    #[test]
    fn test_nearest_millable_extreme_empty() {
        let mut grid = grid_10x10();
        for row in 0..7 {
            grid.consume(&Run {
                row,
                first_col: 0,
                last_col: 6,
            });
        }
        assert!(grid.nearest_millable_extreme(Point::ORIGIN).is_none());
    }

    #[test]
    fn test_adjacent_run_prefers_requested_side() {
        let grid = grid_10x10();
        let current = grid.run_containing(6, 0).unwrap();
        // leading edge at the right end of the bottom row
        let (run, from_top) = grid
            .adjacent_run(&current, true, grid.x_of_col(6))
            .unwrap();
        assert!(from_top);
        assert_eq!(run.row, 5);
        assert_eq!((run.first_col, run.last_col), (0, 6));
    }

    #[test]
    fn test_adjacent_run_falls_back_to_other_side() {
        let mut grid = grid_10x10();
        // clear everything above row 3
        for row in 0..3 {
            grid.consume(&Run {
                row,
                first_col: 0,
                last_col: 6,
            });
        }
        let current = grid.run_containing(3, 0).unwrap();
        let (run, from_top) = grid
            .adjacent_run(&current, true, grid.x_of_col(0))
            .unwrap();
        assert!(!from_top);
        assert_eq!(run.row, 4);
    }

    #[test]
    fn test_adjacent_run_requires_in_span_candidate() {
        let mut grid = grid_10x10();
        // row 2 keeps only cols 5..6; current run spans cols 0..2 of row 3
        grid.consume(&Run {
            row: 2,
            first_col: 0,
            last_col: 4,
        });
        grid.consume(&Run {
            row: 3,
            first_col: 3,
            last_col: 6,
        });
        let current = grid.run_containing(3, 0).unwrap();
        assert_eq!((current.first_col, current.last_col), (0, 2));
        // above has no millable point within cols 0..2, so below wins
        let (run, from_top) = grid
            .adjacent_run(&current, true, grid.x_of_col(0))
            .unwrap();
        assert!(!from_top);
        assert_eq!(run.row, 4);
    }

    #[test]
    fn test_adjacent_run_none_when_isolated() {
        let mut grid = grid_10x10();
        for row in 0..7 {
            if row == 3 {
                continue;
            }
            grid.consume(&Run {
                row,
                first_col: 0,
                last_col: 6,
            });
        }
        let current = grid.run_containing(3, 0).unwrap();
        assert!(grid
            .adjacent_run(&current, true, grid.x_of_col(0))
            .is_none());
    }

    #[test]
    fn test_adjacent_run_skips_emptied_row() {
        let mut grid = grid_10x10();
        // row 5 fully consumed; nearest occupied row above row 6 is row 4
        grid.consume(&Run {
            row: 5,
            first_col: 0,
            last_col: 6,
        });
        let current = grid.run_containing(6, 0).unwrap();
        let (run, from_top) = grid
            .adjacent_run(&current, true, grid.x_of_col(0))
            .unwrap();
        assert!(from_top);
        assert_eq!(run.row, 4);
    }

    #[test]
    fn test_adjacent_run_picks_end_near_leading_edge() {
        let mut grid = grid_10x10();
        // above row keeps two separated stubs inside the span
        grid.consume(&Run {
            row: 2,
            first_col: 2,
            last_col: 4,
        });
        let current = grid.run_containing(3, 0).unwrap();
        // leading edge on the right: rightmost in-span point (col 6) wins
        let (run, _) = grid
            .adjacent_run(&current, true, grid.x_of_col(6))
            .unwrap();
        assert_eq!((run.first_col, run.last_col), (5, 6));
        // leading edge on the left: leftmost in-span point (col 0) wins
        let (run, _) = grid
            .adjacent_run(&current, true, grid.x_of_col(0))
            .unwrap();
        assert_eq!((run.first_col, run.last_col), (0, 1));
    }
}
