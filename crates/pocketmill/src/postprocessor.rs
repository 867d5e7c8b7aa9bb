use serde::{Deserialize, Serialize};

use crate::types::{GCode, ToolMove, Toolpath};

/// Machine-level emission settings, passed explicitly per invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PostConfig {
    pub safe_height: f64,
    pub feed_rate: f64,
    pub plunge_feed_rate: f64,
    pub cut_depth: f64,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            safe_height: 10.0,
            feed_rate: 400.0,
            plunge_feed_rate: 100.0,
            cut_depth: 5.0,
        }
    }
}

/// Convert a planned toolpath to Grbl-compatible G-code.
pub fn post_process_grbl(toolpath: &Toolpath, config: &PostConfig) -> GCode {
    let mut lines = Vec::new();

    // Header
    lines.push("G90".to_string()); // Absolute positioning
    lines.push("G21".to_string()); // Millimeters
    lines.push("G17".to_string()); // XY plane
    lines.push(format!("G0 Z{:.4}", config.safe_height));

    if let Some(first) = toolpath.moves.first() {
        let start = first.start();
        lines.push(format!("G0 X{:.4} Y{:.4}", start.x, start.y));
        lines.push(format!(
            "G1 Z{:.4} F{:.0}",
            -config.cut_depth, config.plunge_feed_rate
        ));
        lines.push(format!("F{:.0}", config.feed_rate));
    }

    for mv in &toolpath.moves {
        match mv {
            ToolMove::Line { to, .. } => {
                lines.push(format!("G1 X{:.4} Y{:.4}", to.x, to.y));
            }
            ToolMove::Arc {
                from,
                to,
                center,
                clockwise,
                ..
            } => {
                let word = if *clockwise { "G2" } else { "G3" };
                lines.push(format!(
                    "{} X{:.4} Y{:.4} I{:.4} J{:.4}",
                    word,
                    to.x,
                    to.y,
                    center.x - from.x,
                    center.y - from.y
                ));
            }
        }
    }

    lines.push(format!("G0 Z{:.4}", config.safe_height));

    GCode { lines }
}
