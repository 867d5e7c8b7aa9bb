pub mod offset;
pub mod segment;

pub use segment::{Arc, Segment};

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Tolerance for coordinate comparisons and crossing acceptance.
pub(crate) const EPS: f64 = 1e-8;

/// A closed contour made of ordered line and arc segments.
///
/// Segments are assumed contiguous (each starts where the previous one ends)
/// and the last segment closes back to the first. `clockwise` records the
/// winding sense, which drives spiral direction for the closed-form pockets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub segments: Vec<Segment>,
    pub clockwise: bool,
}

impl Boundary {
    pub fn new(segments: Vec<Segment>, clockwise: bool) -> Self {
        Self {
            segments,
            clockwise,
        }
    }

    /// Axis-aligned rectangle wound counter-clockwise (or clockwise).
    pub fn rectangle(rect: Rect, clockwise: bool) -> Self {
        let bl = Point::new(rect.min_x(), rect.min_y());
        let br = Point::new(rect.max_x(), rect.min_y());
        let tr = Point::new(rect.max_x(), rect.max_y());
        let tl = Point::new(rect.min_x(), rect.max_y());
        let corners = if clockwise {
            [bl, tl, tr, br, bl]
        } else {
            [bl, br, tr, tl, bl]
        };
        let segments = corners
            .windows(2)
            .map(|w| Segment::line(w[0], w[1]))
            .collect();
        Self {
            segments,
            clockwise,
        }
    }

    /// Full circle as two half arcs joined at the horizontal diameter.
    pub fn circle(center: Point, radius: f64, clockwise: bool) -> Self {
        let east = Point::new(center.x + radius, center.y);
        let west = Point::new(center.x - radius, center.y);
        let segments = vec![
            Segment::Arc(Arc::from_endpoints(east, west, center, clockwise)),
            Segment::Arc(Arc::from_endpoints(west, east, center, clockwise)),
        ];
        Self {
            segments,
            clockwise,
        }
    }

    pub fn bounding_box(&self) -> Rect {
        let mut iter = self.segments.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(first.bounding_box(), |bb, seg| bb.union(seg.bounding_box()))
    }

    /// Where the machine enters the pocket: the first segment's start point.
    pub fn entry_point(&self) -> Point {
        self.segments
            .first()
            .map(|s| s.start())
            .unwrap_or(Point::ORIGIN)
    }
}
