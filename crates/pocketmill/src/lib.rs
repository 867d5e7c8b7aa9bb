mod error;
mod geometry;
mod grid;
mod intersect;
mod pocket;
mod postprocessor;
mod profile;
mod tool_library;
mod types;

pub use error::{PlanResult, PocketError};
pub use geometry::*;
pub use grid::{Run, SamplePoint, SamplingGrid};
pub use intersect::horizontal_crossings;
pub use pocket::{plan_pocket, PocketParams};
pub use postprocessor::{post_process_grbl, PostConfig};
pub use profile::generate_profile_toolpath;
pub use tool_library::*;
pub use types::*;
