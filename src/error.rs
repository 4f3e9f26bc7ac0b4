use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

/// Everything that can make a simulation request fail. All fatal conditions
/// are detected before integration starts; a run either returns a complete
/// trajectory or one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Requested model variant is not one of the supported ones.
    #[error("unknown model variant `{0}` (expected SIRD or SLIRD)")]
    InvalidVariant(String),

    /// A parameter required by the chosen variant was not supplied.
    #[error("missing required parameter `{name}`")]
    MissingParameter { name: &'static str },

    /// A parameter was supplied that the chosen variant does not recognize.
    #[error("unrecognized parameter `{name}`")]
    UnknownParameter { name: String },

    /// A parameter value is NaN or infinite. Rejected up front so non-finite
    /// values never reach the solver.
    #[error("parameter `{name}` is not finite (got {value})")]
    NonFiniteParameter { name: &'static str, value: f64 },

    /// Time grid has fewer than two points or is not strictly increasing.
    #[error("degenerate time grid: {reason}")]
    DegenerateGrid { reason: &'static str },

    /// Initial state length does not match the variant's compartment count.
    #[error("initial state has {got} compartments, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Cooperative cancellation flag was set between integration steps.
    #[error("simulation cancelled")]
    Cancelled,
}
