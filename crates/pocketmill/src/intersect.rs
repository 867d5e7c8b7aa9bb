use kurbo::Point;

use crate::geometry::{Segment, EPS};

/// X-coordinates where the boundary crosses the horizontal line at `y`.
///
/// Crossing rules, chosen so the parity test downstream stays consistent:
/// - vertical lines cross only when `y` is strictly between the endpoints,
///   so a scan grazing an endpoint yields nothing;
/// - horizontal lines never yield a crossing;
/// - sloped lines cross when the solved x lies within the segment's x-range;
/// - arcs with a non-positive discriminant (scan misses or is tangent) yield
///   nothing; each quadratic root is accepted against `x_span` (the sampling
///   grid's x-range, widened by epsilon) and the arc's angular span.
pub fn horizontal_crossings(segments: &[Segment], y: f64, x_span: (f64, f64)) -> Vec<f64> {
    let mut crossings = Vec::new();
    for seg in segments {
        match seg {
            Segment::Line(line) => {
                let (ps, pe) = (line.p0, line.p1);
                if ps.x == pe.x {
                    if y > ps.y.min(pe.y) && y < ps.y.max(pe.y) {
                        crossings.push(ps.x);
                    }
                    continue;
                }
                let slope = (ps.y - pe.y) / (ps.x - pe.x);
                if slope == 0.0 {
                    continue;
                }
                let intercept = ps.y - slope * ps.x;
                let x = (y - intercept) / slope;
                if x >= ps.x.min(pe.x) && x <= ps.x.max(pe.x) {
                    crossings.push(x);
                }
            }
            Segment::Arc(arc) => {
                let dy = y - arc.center.y;
                let disc = arc.radius * arc.radius - dy * dy;
                if disc <= 0.0 {
                    continue;
                }
                let root = disc.sqrt();
                for x in [arc.center.x - root, arc.center.x + root] {
                    if x < x_span.0 - EPS || x > x_span.1 + EPS {
                        continue;
                    }
                    if arc.spans_angle(arc.angle_from_start(Point::new(x, y))) {
                        crossings.push(x);
                    }
                }
            }
        }
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Boundary;
    use kurbo::Rect;

    #[test]
    fn test_rectangle_interior_scan_crosses_twice() {
        let boundary = Boundary::rectangle(Rect::new(0.0, 0.0, 10.0, 6.0), false);
        let xs = horizontal_crossings(&boundary.segments, 3.0, (0.0, 10.0));
        assert_eq!(xs.len(), 2);
        let (lo, hi) = (xs[0].min(xs[1]), xs[0].max(xs[1]));
        assert!((lo - 0.0).abs() < 1e-9);
        assert!((hi - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_scan_through_horizontal_edge_yields_nothing() {
        let boundary = Boundary::rectangle(Rect::new(0.0, 0.0, 10.0, 6.0), false);
        // top edge endpoints are not "strictly between" for the vertical sides
        let xs = horizontal_crossings(&boundary.segments, 6.0, (0.0, 10.0));
        assert!(xs.is_empty());
    }

    #[test]
    fn test_scan_outside_rectangle_yields_nothing() {
        let boundary = Boundary::rectangle(Rect::new(0.0, 0.0, 10.0, 6.0), false);
        assert!(horizontal_crossings(&boundary.segments, 7.0, (0.0, 10.0)).is_empty());
    }

    #[test]
    fn test_sloped_line_crossing() {
        let segments = [Segment::line(Point::new(0.0, 0.0), Point::new(10.0, 10.0))];
        let xs = horizontal_crossings(&segments, 4.0, (0.0, 10.0));
        assert_eq!(xs.len(), 1);
        assert!((xs[0] - 4.0).abs() < 1e-9);
        // beyond the segment's x-range
        assert!(horizontal_crossings(&segments, 11.0, (0.0, 20.0)).is_empty());
    }

    #[test]
    fn test_circle_interior_scan_crosses_twice() {
        let boundary = Boundary::circle(Point::new(0.0, 0.0), 5.0, false);
        let xs = horizontal_crossings(&boundary.segments, 1.0, (-5.0, 5.0));
        assert_eq!(xs.len(), 2);
        let expected = (25.0f64 - 1.0).sqrt();
        let (lo, hi) = (xs[0].min(xs[1]), xs[0].max(xs[1]));
        assert!((lo + expected).abs() < 1e-9);
        assert!((hi - expected).abs() < 1e-9);
    }

    #[test]
    fn test_tangent_scan_yields_nothing() {
        let boundary = Boundary::circle(Point::new(0.0, 0.0), 5.0, false);
        assert!(horizontal_crossings(&boundary.segments, 5.0, (-5.0, 5.0)).is_empty());
        assert!(horizontal_crossings(&boundary.segments, 6.0, (-5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_arc_candidate_outside_grid_span_is_dropped() {
        let boundary = Boundary::circle(Point::new(0.0, 0.0), 5.0, false);
        // span covers only the right half; the left crossing is rejected
        let xs = horizontal_crossings(&boundary.segments, 1.0, (0.0, 5.0));
        assert_eq!(xs.len(), 1);
        assert!(xs[0] > 0.0);
    }
}
