use thiserror::Error;

/// Errors rejected before any grid work begins.
///
/// An undersized pocket is deliberately not an error: pruning away every
/// lattice point yields an empty toolpath and the caller decides what that
/// means.
#[derive(Error, Debug)]
pub enum PocketError {
    /// A tool parameter (radius, stepover) is zero or negative.
    #[error("invalid tool parameter: {name} = {value}")]
    InvalidToolParameter { name: &'static str, value: f64 },

    /// The boundary cannot enclose an area worth planning.
    #[error("degenerate boundary: {0}")]
    DegenerateBoundary(String),
}

/// Result type alias for planning operations.
pub type PlanResult<T> = Result<T, PocketError>;
