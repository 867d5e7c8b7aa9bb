use std::f64::consts::TAU;

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A cutting tool. Stepover is a fraction of the diameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub name: String,
    pub diameter: f64,
    pub stepover: f64,
}

impl Tool {
    pub fn new(name: impl Into<String>, diameter: f64, stepover: f64) -> Self {
        Self {
            name: name.into(),
            diameter,
            stepover,
        }
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Stepover as an absolute distance.
    pub fn stepover_distance(&self) -> f64 {
        self.diameter * self.stepover
    }
}

/// Which side of the boundary the cutter center is held on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutterCompensation {
    None,
    Inside,
    Outside,
}

/// One planned tool movement at cutting depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ToolMove {
    Line {
        from: Point,
        to: Point,
    },
    Arc {
        from: Point,
        to: Point,
        center: Point,
        radius: f64,
        clockwise: bool,
    },
}

impl ToolMove {
    pub fn start(&self) -> Point {
        match self {
            ToolMove::Line { from, .. } => *from,
            ToolMove::Arc { from, .. } => *from,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            ToolMove::Line { to, .. } => *to,
            ToolMove::Arc { to, .. } => *to,
        }
    }

    /// Path length of the move. An arc with coincident endpoints is a full
    /// circle.
    pub fn length(&self) -> f64 {
        match self {
            ToolMove::Line { from, to } => from.distance(*to),
            ToolMove::Arc {
                from,
                to,
                center,
                radius,
                clockwise,
            } => {
                let a0 = (*from - *center).atan2();
                let a1 = (*to - *center).atan2();
                let mut sweep = if *clockwise { a0 - a1 } else { a1 - a0 };
                while sweep <= 1e-9 {
                    sweep += TAU;
                }
                sweep * radius
            }
        }
    }
}

/// An ordered sequence of moves at a single depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Toolpath {
    pub moves: Vec<ToolMove>,
}

impl Toolpath {
    pub fn new(moves: Vec<ToolMove>) -> Self {
        Self { moves }
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn total_length(&self) -> f64 {
        self.moves.iter().map(|m| m.length()).sum()
    }
}

/// Post-processed machine program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GCode {
    pub lines: Vec<String>,
}

impl std::fmt::Display for GCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
