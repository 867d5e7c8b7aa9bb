use kurbo::{Point, Rect};
use tracing::debug;

use crate::error::{PlanResult, PocketError};
use crate::geometry::{Boundary, Segment, EPS};
use crate::grid::SamplingGrid;
use crate::types::{CutterCompensation, ToolMove, Toolpath};

/// Lattice spacing as a fraction of the tool diameter.
const GRID_SPACING_FACTOR: f64 = 0.7;
/// Radial step between circular spiral rings, as a fraction of the tool
/// radius.
const CIRCLE_RING_FACTOR: f64 = 0.9;
/// Inset between rectangular rings, as a fraction of the tool radius.
const RECT_RING_FACTOR: f64 = 0.7;

/// Parameters for one pocket-clearing invocation.
#[derive(Debug, Clone, Copy)]
pub struct PocketParams {
    pub tool_radius: f64,
    pub stepover: f64,
    pub compensation: CutterCompensation,
}

/// Plan the moves that clear the pocket enclosed by `boundary`.
///
/// Circles and axis-aligned rectangles take a closed-form spiral; everything
/// else goes through the sampling-grid raster. A pocket too small for the
/// tool yields an empty toolpath, not an error.
pub fn plan_pocket(boundary: &Boundary, params: &PocketParams) -> PlanResult<Toolpath> {
    if params.tool_radius <= 0.0 {
        return Err(PocketError::InvalidToolParameter {
            name: "tool_radius",
            value: params.tool_radius,
        });
    }
    if params.stepover <= 0.0 {
        return Err(PocketError::InvalidToolParameter {
            name: "stepover",
            value: params.stepover,
        });
    }
    if boundary.segments.len() < 2 {
        return Err(PocketError::DegenerateBoundary(
            "fewer than 2 segments".to_string(),
        ));
    }
    let bbox = boundary.bounding_box();
    if bbox.width() <= EPS || bbox.height() <= EPS {
        return Err(PocketError::DegenerateBoundary(
            "bounding box has zero area".to_string(),
        ));
    }

    if let Some((center, radius)) = detect_circle(boundary) {
        debug!(?center, radius, "circular pocket fast path");
        return Ok(circle_spiral(
            center,
            radius,
            params.tool_radius,
            boundary.clockwise,
        ));
    }
    if let Some(rect) = detect_rect(boundary) {
        debug!(?rect, "rectangular pocket fast path");
        return Ok(rect_spiral(rect, params.tool_radius, boundary.clockwise));
    }

    let spacing = 2.0 * params.tool_radius * GRID_SPACING_FACTOR;
    let mut grid = SamplingGrid::new(bbox, spacing);
    if params.compensation == CutterCompensation::Inside {
        grid.prune_near_boundary(boundary, params.tool_radius + params.stepover);
    }
    grid.prune_outside(boundary);
    debug!(millable = grid.millable_count(), "grid ready for raster");

    Ok(Toolpath::new(raster_path(&mut grid, boundary.entry_point())))
}

/// Two arcs with a common center and radius, joined end to start.
fn detect_circle(boundary: &Boundary) -> Option<(Point, f64)> {
    if boundary.segments.len() != 2 {
        return None;
    }
    let (a, b) = match (&boundary.segments[0], &boundary.segments[1]) {
        (Segment::Arc(a), Segment::Arc(b)) => (a, b),
        _ => return None,
    };
    if (a.radius - b.radius).abs() > EPS {
        return None;
    }
    if a.center.distance(b.center) > EPS {
        return None;
    }
    if a.end.distance(b.start) > EPS || b.end.distance(a.start) > EPS {
        return None;
    }
    Some((a.center, a.radius))
}

/// Four lines, two horizontal and two vertical.
fn detect_rect(boundary: &Boundary) -> Option<Rect> {
    if boundary.segments.len() != 4 {
        return None;
    }
    let mut horizontal = 0;
    let mut vertical = 0;
    for seg in &boundary.segments {
        let line = match seg {
            Segment::Line(line) => line,
            Segment::Arc(_) => return None,
        };
        let dx = (line.p0.x - line.p1.x).abs();
        let dy = (line.p0.y - line.p1.y).abs();
        if dy <= EPS && dx > EPS {
            horizontal += 1;
        } else if dx <= EPS && dy > EPS {
            vertical += 1;
        } else {
            return None;
        }
    }
    if horizontal == 2 && vertical == 2 {
        Some(boundary.bounding_box())
    } else {
        None
    }
}

/// Concentric full-circle rings from the tool radius out to the compensated
/// boundary, joined by radial connectors on the +x axis.
fn circle_spiral(center: Point, shape_radius: f64, tool_radius: f64, clockwise: bool) -> Toolpath {
    let max_radius = shape_radius - tool_radius;
    if max_radius <= EPS {
        return Toolpath::default();
    }

    let step = CIRCLE_RING_FACTOR * tool_radius;
    let mut radii = Vec::new();
    let mut r = tool_radius;
    loop {
        if r >= max_radius - EPS {
            radii.push(max_radius);
            break;
        }
        radii.push(r);
        r += step;
    }

    let mut moves = Vec::new();
    for (i, &radius) in radii.iter().enumerate() {
        let anchor = Point::new(center.x + radius, center.y);
        moves.push(ToolMove::Arc {
            from: anchor,
            to: anchor,
            center,
            radius,
            clockwise,
        });
        if let Some(&next) = radii.get(i + 1) {
            moves.push(ToolMove::Line {
                from: anchor,
                to: Point::new(center.x + next, center.y),
            });
        }
    }
    debug!(rings = radii.len(), "emitted circular spiral");
    Toolpath::new(moves)
}

/// Concentric rectangular rings growing by a fixed inset, clamped to the
/// compensated boundary, joined corner to corner.
fn rect_spiral(rect: Rect, tool_radius: f64, clockwise: bool) -> Toolpath {
    let center = rect.center();
    let half_short = rect.width().min(rect.height()) / 2.0;
    let max_inset = half_short - tool_radius;
    if max_inset <= EPS {
        return Toolpath::default();
    }

    let step = RECT_RING_FACTOR * tool_radius;
    // an extra clamped ring when the leftover spacing passes the half step
    let ratio = max_inset / step;
    let mut rings = ratio.floor() as usize;
    if ratio > rings as f64 + 0.5 {
        rings += 1;
    }

    // each ring keeps the boundary's aspect: the long axis carries the
    // rectangle's excess over the short one
    let ring_rect = |h: f64| -> Rect {
        let ex = if rect.width() >= rect.height() {
            h + (rect.width() - rect.height()) / 2.0
        } else {
            h
        };
        let ey = if rect.height() > rect.width() {
            h + (rect.height() - rect.width()) / 2.0
        } else {
            h
        };
        Rect::new(center.x - ex, center.y - ey, center.x + ex, center.y + ey)
    };

    let top_right = |r: &Rect| Point::new(r.max_x(), r.max_y());
    let mut moves = Vec::new();
    for i in 0..rings {
        let h = (tool_radius + i as f64 * step).min(max_inset);
        let ring = ring_rect(h);
        let tr = top_right(&ring);
        let tl = Point::new(ring.min_x(), ring.max_y());
        let bl = Point::new(ring.min_x(), ring.min_y());
        let br = Point::new(ring.max_x(), ring.min_y());
        let corners = if clockwise {
            [tr, br, bl, tl, tr]
        } else {
            [tr, tl, bl, br, tr]
        };
        for pair in corners.windows(2) {
            moves.push(ToolMove::Line {
                from: pair[0],
                to: pair[1],
            });
        }
        if i + 1 < rings {
            let next_h = (tool_radius + (i + 1) as f64 * step).min(max_inset);
            moves.push(ToolMove::Line {
                from: tr,
                to: top_right(&ring_rect(next_h)),
            });
        }
    }
    debug!(rings, "emitted rectangular spiral");
    Toolpath::new(moves)
}

/// Zig-zag over the remaining millable points until the grid is exhausted.
///
/// Each pass starts at the extreme point nearest the current position and
/// sweeps away from that extreme row, following adjacent runs until none
/// remain; disconnected regions start fresh passes.
pub(crate) fn raster_path(grid: &mut SamplingGrid, entry: Point) -> Vec<ToolMove> {
    let mut moves = Vec::new();
    let mut current = entry;

    while grid.any_millable() {
        let Some((row, col)) = grid.nearest_millable_extreme(current) else {
            break;
        };
        let Some((_, bottom)) = grid.occupied_row_bounds() else {
            break;
        };
        let mut prefer_top = row == bottom;
        let Some(mut run) = grid.run_containing(row, col) else {
            break;
        };
        debug!(row, col, prefer_top, "raster pass start");

        loop {
            let y = grid.y_of_row(run.row);
            let first_x = grid.x_of_col(run.first_col);
            let last_x = grid.x_of_col(run.last_col);
            // enter the run at the end nearer the current position
            let (start_x, end_x) = if (current.x - first_x).abs() <= (current.x - last_x).abs() {
                (first_x, last_x)
            } else {
                (last_x, first_x)
            };
            let start = Point::new(start_x, y);
            let end = Point::new(end_x, y);
            if current.distance(start) > EPS {
                moves.push(ToolMove::Line {
                    from: current,
                    to: start,
                });
            }
            if start.distance(end) > EPS {
                moves.push(ToolMove::Line {
                    from: start,
                    to: end,
                });
            }
            grid.consume(&run);
            current = end;

            let Some((next, from_top)) = grid.adjacent_run(&run, prefer_top, current.x) else {
                break;
            };
            prefer_top = from_top;

            // slide along the finished row until the next run is overhead
            let next_first = grid.x_of_col(next.first_col);
            let next_last = grid.x_of_col(next.last_col);
            if current.x < next_first - EPS || current.x > next_last + EPS {
                let target_x = if current.x < next_first {
                    next_first
                } else {
                    next_last
                };
                moves.push(ToolMove::Line {
                    from: current,
                    to: Point::new(target_x, current.y),
                });
                current.x = target_x;
            }

            let next_y = grid.y_of_row(next.row);
            moves.push(ToolMove::Line {
                from: current,
                to: Point::new(current.x, next_y),
            });
            current.y = next_y;

            let Some(col) = grid.col_at_x(current.x) else {
                break;
            };
            match grid.run_containing(next.row, col) {
                Some(r) => run = r,
                None => break,
            }
        }
    }
    moves
}
