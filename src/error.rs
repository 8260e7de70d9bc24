use thiserror::Error;

/// Failures of a single integration run. None of them are recoverable
/// within the run that produced them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("dimension mismatch: field has {field} components, state has {state}")]
    DimensionMismatch { field: usize, state: usize },

    #[error("component {component} out of range for a {dimension}-dimensional field")]
    ComponentOutOfRange { component: usize, dimension: usize },

    #[error("invalid step size: {0} (must be positive and finite)")]
    InvalidStepSize(f64),

    #[error("invalid time span: [{t0}, {t_end}] (bounds must be finite)")]
    InvalidTimeSpan { t0: f64, t_end: f64 },

    #[error("division by zero evaluating component {component}")]
    DivisionByZero { component: usize },

    #[error("non-finite value {value} in component {component}")]
    NonFinite { component: usize, value: f64 },
}

impl IntegrationError {
    /// True for errors raised by the arithmetic itself rather than by bad input.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::DivisionByZero { .. } | Self::NonFinite { .. })
    }
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;
