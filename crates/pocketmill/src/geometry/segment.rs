use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{Line, ParamCurveNearest, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

use super::EPS;

/// A circular arc with an explicit rotation sense.
///
/// `extent` is the signed sweep in radians: positive counter-clockwise,
/// negative clockwise. A closed arc (start == end) sweeps ±2π.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub radius: f64,
    pub extent: f64,
}

impl Arc {
    /// Build an arc from its endpoints; the sweep is the one that travels in
    /// the given rotation sense from start to end.
    pub fn from_endpoints(start: Point, end: Point, center: Point, clockwise: bool) -> Self {
        let radius = (start - center).hypot();
        let a0 = (start - center).atan2();
        let a1 = (end - center).atan2();
        let mut extent = a1 - a0;
        if clockwise {
            while extent > -EPS {
                extent -= TAU;
            }
        } else {
            while extent < EPS {
                extent += TAU;
            }
        }
        Self {
            start,
            end,
            center,
            radius,
            extent,
        }
    }

    pub fn clockwise(&self) -> bool {
        self.extent < 0.0
    }

    /// Angular offset of `p` from the arc's start, measured in the arc's own
    /// rotation sense: [0, 2π) for CCW arcs, (-2π, 0] for CW. An offset just
    /// short of a full turn wraps to near zero so that endpoint-grazing
    /// candidates survive the epsilon test.
    pub fn angle_from_start(&self, p: Point) -> f64 {
        let a0 = (self.start - self.center).atan2();
        let ap = (p - self.center).atan2();
        let mut d = ap - a0;
        if self.extent >= 0.0 {
            while d < 0.0 {
                d += TAU;
            }
            while d >= TAU {
                d -= TAU;
            }
            if d >= TAU - EPS {
                d -= TAU;
            }
        } else {
            while d > 0.0 {
                d -= TAU;
            }
            while d <= -TAU {
                d += TAU;
            }
            if d <= -(TAU - EPS) {
                d += TAU;
            }
        }
        d
    }

    /// Whether an angular offset (as produced by `angle_from_start`) lies
    /// within the swept span, with epsilon slack at both ends.
    pub fn spans_angle(&self, d: f64) -> bool {
        if self.extent >= 0.0 {
            d >= -EPS && d <= self.extent + EPS
        } else {
            d <= EPS && d >= self.extent - EPS
        }
    }

    /// Distance from `p` to the arc: radial distance when the point projects
    /// onto the swept span, nearest endpoint distance otherwise.
    pub fn distance_to(&self, p: Point) -> f64 {
        let d = self.angle_from_start(p);
        if self.spans_angle(d) {
            ((p - self.center).hypot() - self.radius).abs()
        } else {
            (p - self.start)
                .hypot()
                .min((p - self.end).hypot())
        }
    }

    pub fn bounding_box(&self) -> Rect {
        let mut bb = Rect::from_points(self.start, self.end);
        for angle in [0.0, FRAC_PI_2, PI, PI + FRAC_PI_2] {
            let probe = self.center + self.radius * Vec2::new(angle.cos(), angle.sin());
            if self.spans_angle(self.angle_from_start(probe)) {
                bb = bb.union_pt(probe);
            }
        }
        bb
    }

    /// Approximate the arc by a point chain with sagitta error at most
    /// `tolerance`. Endpoints are exact.
    pub fn flatten(&self, tolerance: f64) -> Vec<Point> {
        let sweep = self.extent.abs();
        if self.radius <= tolerance {
            return vec![self.start, self.end];
        }
        // sagitta of a chord subtending angle θ is r(1 - cos(θ/2))
        let max_step = 2.0 * (1.0 - tolerance / self.radius).acos();
        let steps = (sweep / max_step).ceil().max(1.0) as usize;
        let a0 = (self.start - self.center).atan2();
        let mut points = Vec::with_capacity(steps + 1);
        points.push(self.start);
        for i in 1..steps {
            let a = a0 + self.extent * i as f64 / steps as f64;
            points.push(self.center + self.radius * Vec2::new(a.cos(), a.sin()));
        }
        points.push(self.end);
        points
    }
}

/// One boundary element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Line(Line),
    Arc(Arc),
}

impl Segment {
    pub fn line(p0: Point, p1: Point) -> Self {
        Segment::Line(Line::new(p0, p1))
    }

    pub fn start(&self) -> Point {
        match self {
            Segment::Line(line) => line.p0,
            Segment::Arc(arc) => arc.start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(line) => line.p1,
            Segment::Arc(arc) => arc.end,
        }
    }

    pub fn distance_to(&self, p: Point) -> f64 {
        match self {
            Segment::Line(line) => line.nearest(p, EPS).distance_sq.sqrt(),
            Segment::Arc(arc) => arc.distance_to(p),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match self {
            Segment::Line(line) => KurboShape::bounding_box(line),
            Segment::Arc(arc) => arc.bounding_box(),
        }
    }

    pub fn flatten(&self, tolerance: f64) -> Vec<Point> {
        match self {
            Segment::Line(line) => vec![line.p0, line.p1],
            Segment::Arc(arc) => arc.flatten(tolerance),
        }
    }
}
