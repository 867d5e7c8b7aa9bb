use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::pocket::PocketParams;
use crate::types::{CutterCompensation, Tool};

/// Named tools persisted as JSON. The planner side of the surface is the
/// lookup: a tool name resolves to a radius or a full parameter set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolLibrary {
    tools: Vec<Tool>,
}

impl ToolLibrary {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Library seeded with a few common endmills.
    pub fn with_defaults() -> Self {
        Self {
            tools: vec![
                Tool::new("3mm endmill", 3.0, 0.4),
                Tool::new("6mm endmill", 6.0, 0.4),
                Tool::new("10mm endmill", 10.0, 0.45),
            ],
        }
    }

    /// Read a library from `path`; a missing file is an empty library.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("read tool library {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parse tool library {}", path.display()))
    }

    /// Write the library to `path` as pretty JSON, creating parent
    /// directories as needed.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create tool library directory {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self).context("serialize tool library")?;
        fs::write(path, text).with_context(|| format!("write tool library {}", path.display()))
    }

    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn tool_named(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Radius of the named tool.
    pub fn radius_of(&self, name: &str) -> Result<f64> {
        self.tool_named(name)
            .map(Tool::radius)
            .ok_or_else(|| anyhow!("no tool named {name:?} in library"))
    }

    /// Planner parameters derived from the named tool.
    pub fn params_for(&self, name: &str, compensation: CutterCompensation) -> Result<PocketParams> {
        let tool = self
            .tool_named(name)
            .ok_or_else(|| anyhow!("no tool named {name:?} in library"))?;
        Ok(PocketParams {
            tool_radius: tool.radius(),
            stepover: tool.stepover_distance(),
            compensation,
        })
    }

    /// Default on-disk location (`~/.pocketmill/tools.json`).
    pub fn default_library_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
        Ok(home.join(".pocketmill").join("tools.json"))
    }
}
