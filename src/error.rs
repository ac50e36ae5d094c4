use thiserror::Error;

/// Errors raised before or around a trajectory run.
///
/// Numerical degeneracies inside the integrator (zero speed, zero density)
/// never surface here; they produce a zero force term instead. A step that
/// leaves the state non-finite is reported as `NumericalDivergence`.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("integration diverged at t = {time} s; reduce the time step")]
    NumericalDivergence { time: f64 },

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),

    #[error("scenario must name exactly one of `preset` or `manual`")]
    AmbiguousScenario,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
