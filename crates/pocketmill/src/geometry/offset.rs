use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use kurbo::Point;
use tracing::debug;

use super::Boundary;

const FLATTEN_TOLERANCE: f64 = 0.05;

/// Offset the closed boundary by `delta`: positive grows the contour
/// outward, negative shrinks it inward. Returns the largest resulting loop
/// as a closed point chain, or `None` when the offset collapses.
pub fn offset_boundary(boundary: &Boundary, delta: f64) -> Option<Vec<Point>> {
    let mut points = Vec::new();
    for seg in &boundary.segments {
        let flat = seg.flatten(FLATTEN_TOLERANCE);
        // drop each segment's end point; the next segment starts there
        points.extend(flat.iter().take(flat.len().saturating_sub(1)).copied());
    }

    let mut pline = create_polyline(&points, true);
    if pline.vertex_count() < 3 {
        return None;
    }
    // Normalize to CCW so the offset sign is winding-independent. For a CCW
    // polyline a positive parallel offset moves inward.
    if pline.area() < 0.0 {
        pline.invert_direction_mut();
    }

    let offsets = pline.parallel_offset(-delta);
    let best = offsets
        .into_iter()
        .filter(|p| p.vertex_count() >= 3)
        .max_by(|a, b| {
            a.area()
                .abs()
                .partial_cmp(&b.area().abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let result = extract_points(&best);
    debug!(
        input_vertices = pline.vertex_count(),
        output_vertices = result.len(),
        delta,
        "offset boundary"
    );
    if result.len() < 3 {
        None
    } else {
        Some(result)
    }
}

fn create_polyline(points: &[Point], closed: bool) -> Polyline {
    let mut pline = Polyline::new();

    if points.is_empty() {
        return pline;
    }

    let mut effective_points = points.to_vec();

    // If closed and the last point repeats the first, drop it
    if closed && effective_points.len() > 1 {
        let first = effective_points[0];
        let last = effective_points[effective_points.len() - 1];
        if first.distance(last) < 1e-9 {
            effective_points.pop();
        }
    }

    // Filter out duplicate consecutive points (zero length segments)
    let mut clean_points: Vec<Point> = Vec::new();
    for p in effective_points {
        if clean_points
            .last()
            .map(|prev| prev.distance(p) > 1e-9)
            .unwrap_or(true)
        {
            clean_points.push(p);
        }
    }

    for p in clean_points {
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }

    if closed {
        pline.set_is_closed(true);
    }
    pline
}

fn extract_points(pline: &Polyline) -> Vec<Point> {
    let has_arcs = pline.iter_vertexes().any(|v| v.bulge.abs() > 1e-6);

    if !has_arcs {
        return pline.iter_vertexes().map(|v| Point::new(v.x, v.y)).collect();
    }

    let mut points = Vec::new();
    let vertex_count = pline.vertex_count();
    for i in 0..vertex_count {
        let v = pline.at(i);
        points.push(Point::new(v.x, v.y));

        if !pline.is_closed() && i == vertex_count - 1 {
            break;
        }

        if v.bulge.abs() > 1e-6 {
            let v_next = pline.at((i + 1) % vertex_count);
            points.extend(tessellate_arc(
                Point::new(v.x, v.y),
                Point::new(v_next.x, v_next.y),
                v.bulge,
            ));
        }
    }
    points
}

// Single midpoint per bulge segment; enough fidelity for contour following.
fn tessellate_arc(p1: Point, p2: Point, bulge: f64) -> Vec<Point> {
    let chord = p2 - p1;
    let chord_len = chord.hypot();
    if chord_len < 1e-6 {
        return vec![];
    }

    let mid = p1.midpoint(p2);
    let sagitta = bulge * (chord_len / 2.0);
    let normal = kurbo::Vec2::new(-chord.y, chord.x) / chord_len;

    vec![mid + normal * sagitta]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Segment;
    use kurbo::Rect;

    fn square() -> Boundary {
        Boundary::rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), false)
    }

    #[test]
    fn test_outward_offset_grows() {
        let loop_points = offset_boundary(&square(), 1.0).unwrap();
        // every point sits on or outside the original square
        for p in &loop_points {
            let inside = p.x > 0.0 && p.x < 10.0 && p.y > 0.0 && p.y < 10.0;
            assert!(!inside, "offset point {p:?} fell inside the square");
        }
    }

    #[test]
    fn test_inward_offset_shrinks() {
        let loop_points = offset_boundary(&square(), -1.0).unwrap();
        for p in &loop_points {
            assert!(p.x > 0.9 && p.x < 9.1, "x out of range: {p:?}");
            assert!(p.y > 0.9 && p.y < 9.1, "y out of range: {p:?}");
        }
    }

    #[test]
    fn test_collapsing_offset_returns_none() {
        assert!(offset_boundary(&square(), -6.0).is_none());
    }

    #[test]
    fn test_degenerate_boundary_returns_none() {
        let boundary = Boundary::new(
            vec![
                Segment::line(Point::new(0.0, 0.0), Point::new(5.0, 0.0)),
                Segment::line(Point::new(5.0, 0.0), Point::new(0.0, 0.0)),
            ],
            false,
        );
        assert!(offset_boundary(&boundary, 1.0).is_none());
    }
}
