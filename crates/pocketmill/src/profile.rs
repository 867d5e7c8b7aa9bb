use tracing::debug;

use crate::error::{PlanResult, PocketError};
use crate::geometry::offset::offset_boundary;
use crate::geometry::{Boundary, EPS};
use crate::types::{CutterCompensation, ToolMove, Toolpath};

const FLATTEN_TOLERANCE: f64 = 0.05;

/// Follow the boundary contour once, with the cutter center held off the
/// contour by the tool radius on the compensated side.
///
/// `Outside` offsets outward, `Inside` inward, `None` traces the contour
/// itself. An inward offset that collapses the contour yields an empty
/// toolpath.
pub fn generate_profile_toolpath(
    boundary: &Boundary,
    tool_radius: f64,
    compensation: CutterCompensation,
) -> PlanResult<Toolpath> {
    if tool_radius <= 0.0 {
        return Err(PocketError::InvalidToolParameter {
            name: "tool_radius",
            value: tool_radius,
        });
    }
    if boundary.segments.len() < 2 {
        return Err(PocketError::DegenerateBoundary(
            "fewer than 2 segments".to_string(),
        ));
    }

    let points = match compensation {
        CutterCompensation::None => {
            let mut points = Vec::new();
            for seg in &boundary.segments {
                let flat = seg.flatten(FLATTEN_TOLERANCE);
                points.extend(flat.iter().take(flat.len().saturating_sub(1)).copied());
            }
            points
        }
        CutterCompensation::Outside => match offset_boundary(boundary, tool_radius) {
            Some(points) => points,
            None => return Ok(Toolpath::default()),
        },
        CutterCompensation::Inside => match offset_boundary(boundary, -tool_radius) {
            Some(points) => points,
            None => {
                debug!("inward profile offset collapsed");
                return Ok(Toolpath::default());
            }
        },
    };

    if points.len() < 3 {
        return Ok(Toolpath::default());
    }

    let mut moves = Vec::new();
    for i in 0..points.len() {
        let from = points[i];
        let to = points[(i + 1) % points.len()];
        if from.distance(to) > EPS {
            moves.push(ToolMove::Line { from, to });
        }
    }
    debug!(moves = moves.len(), "profile contour");
    Ok(Toolpath::new(moves))
}
