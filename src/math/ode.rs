use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, IntegrationResult};
use crate::model::field::VectorField;

/// How the four RK4 stages are evaluated.
///
/// `Literal` evaluates every stage at the unperturbed state and adds the scaled
/// previous slope to the field value:
///
/// ```text
/// a = f(y)
/// b = f(y) + h/2 * a
/// c = f(y) + h/2 * b
/// d = f(y) + h * c
/// y' = y + h/6 * (a + 2b + 2c + d)
/// ```
///
/// `Classical` is textbook RK4, evaluating each stage at `y + h/2 * k1`,
/// `y + h/2 * k2` and `y + h * k3`. The two give different trajectories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepScheme {
    #[default]
    Literal,
    Classical,
}

impl StepScheme {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Classical => "classical",
        }
    }
}

impl fmt::Display for StepScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StepScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "classical" => Ok(Self::Classical),
            other => Err(format!("unknown scheme '{other}' (expected literal or classical)")),
        }
    }
}

/// One fixed RK4 step of size `h` using the literal scheme.
/// Returns a new state; `state` is left untouched.
pub fn step<F>(state: &[f64], h: f64, field: &F) -> IntegrationResult<Vec<f64>>
where
    F: VectorField + ?Sized,
{
    step_with(StepScheme::Literal, state, h, field)
}

/// One fixed RK4 step of size `h` using `scheme`.
///
/// `h` may be zero or negative but must be finite. Any NaN or infinity
/// produced along the way is reported as [`IntegrationError::NonFinite`].
pub fn step_with<F>(scheme: StepScheme, state: &[f64], h: f64, field: &F) -> IntegrationResult<Vec<f64>>
where
    F: VectorField + ?Sized,
{
    check_dimension(field, state)?;
    if !h.is_finite() {
        return Err(IntegrationError::InvalidStepSize(h));
    }

    let next = match scheme {
        StepScheme::Literal => literal_step(state, h, field)?,
        StepScheme::Classical => classical_step(state, h, field)?,
    };

    for (i, v) in next.iter().enumerate() {
        finite(i, *v)?;
    }
    Ok(next)
}

pub(crate) fn check_dimension<F>(field: &F, state: &[f64]) -> IntegrationResult<()>
where
    F: VectorField + ?Sized,
{
    if field.dimension() != state.len() {
        return Err(IntegrationError::DimensionMismatch {
            field: field.dimension(),
            state: state.len(),
        });
    }
    Ok(())
}

fn finite(component: usize, value: f64) -> IntegrationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IntegrationError::NonFinite { component, value })
    }
}

fn literal_step<F>(state: &[f64], h: f64, field: &F) -> IntegrationResult<Vec<f64>>
where
    F: VectorField + ?Sized,
{
    let n = state.len();
    let mut next = Vec::with_capacity(n);

    // The field is pure, so one evaluation serves all four stages.
    for i in 0..n {
        let f = finite(i, field.evaluate(i, state)?)?;
        let a = f;
        let b = finite(i, f + (h / 2.0) * a)?;
        let c = finite(i, f + (h / 2.0) * b)?;
        let d = finite(i, f + h * c)?;
        next.push(state[i] + (h / 6.0) * (a + 2.0 * b + 2.0 * c + d));
    }
    Ok(next)
}

fn derivative<F>(field: &F, y: &[f64], dy: &mut [f64]) -> IntegrationResult<()>
where
    F: VectorField + ?Sized,
{
    for i in 0..y.len() {
        dy[i] = finite(i, field.evaluate(i, y)?)?;
    }
    Ok(())
}

fn classical_step<F>(state: &[f64], h: f64, field: &F) -> IntegrationResult<Vec<f64>>
where
    F: VectorField + ?Sized,
{
    let n = state.len();
    let mut k1 = vec![0.0; n];
    let mut k2 = vec![0.0; n];
    let mut k3 = vec![0.0; n];
    let mut k4 = vec![0.0; n];
    let mut ytmp = vec![0.0; n];

    derivative(field, state, &mut k1)?;

    for i in 0..n {
        ytmp[i] = state[i] + 0.5 * h * k1[i];
    }
    derivative(field, &ytmp, &mut k2)?;

    for i in 0..n {
        ytmp[i] = state[i] + 0.5 * h * k2[i];
    }
    derivative(field, &ytmp, &mut k3)?;

    for i in 0..n {
        ytmp[i] = state[i] + h * k3[i];
    }
    derivative(field, &ytmp, &mut k4)?;

    let mut next = state.to_vec();
    for i in 0..n {
        next[i] += (h / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    Ok(next)
}
