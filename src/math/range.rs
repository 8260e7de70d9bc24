use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, IntegrationResult};
use crate::math::ode::{check_dimension, step_with, StepScheme};
use crate::model::field::VectorField;

/// Rounding slack on the final-time comparison, in units of machine epsilon
/// relative to the largest time bound. A horizon that is a multiple of `dt`
/// does not pick up an extra sample from `t0 + k * dt` landing an ulp short.
const TIME_ULPS: f64 = 8.0;

/// Time window and step of an integration run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationParams {
    pub t0: f64,
    pub t_end: f64,
    pub dt: f64,
}

impl IntegrationParams {
    pub fn new(t0: f64, t_end: f64, dt: f64) -> Self {
        Self { t0, t_end, dt }
    }

    pub fn check(&self) -> IntegrationResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(IntegrationError::InvalidStepSize(self.dt));
        }
        if !(self.t0.is_finite() && self.t_end.is_finite()) {
            return Err(IntegrationError::InvalidTimeSpan { t0: self.t0, t_end: self.t_end });
        }
        Ok(())
    }

    /// Time of the `k`-th sample.
    pub fn time_at(&self, k: u64) -> f64 {
        self.t0 + (k as f64) * self.dt
    }

    /// Whether a sample at time `t` lies before `t_end`.
    pub fn in_range(&self, t: f64) -> bool {
        let slack = TIME_ULPS * f64::EPSILON * self.t0.abs().max(self.t_end.abs());
        t < self.t_end - slack
    }

    /// Number of samples a successful run yields, or `None` when that does
    /// not fit in a `u64`.
    pub fn sample_count(&self) -> Option<u64> {
        let span = ((self.t_end - self.t0) / self.dt).ceil();
        if span >= u64::MAX as f64 {
            return None;
        }
        let mut k = if span > 0.0 { span as u64 } else { 0 };
        while k > 0 && !self.in_range(self.time_at(k - 1)) {
            k -= 1;
        }
        while self.in_range(self.time_at(k)) {
            k = k.checked_add(1)?;
        }
        Some(k)
    }
}

/// A state together with the time it holds at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub t: f64,
    pub state: Vec<f64>,
}

/// Lazy sequence of samples from `t0` up to, but excluding, `t_end`.
///
/// Each call to `next` yields the current state and then advances it one step.
/// The first error ends the sequence.
#[derive(Debug)]
pub struct Trajectory<F> {
    field: F,
    scheme: StepScheme,
    params: IntegrationParams,
    k: u64,
    state: Option<Vec<f64>>,
    pending: Option<IntegrationError>,
}

impl<F: VectorField> Trajectory<F> {
    pub fn params(&self) -> &IntegrationParams {
        &self.params
    }

    pub fn scheme(&self) -> StepScheme {
        self.scheme
    }

    /// Drain the sequence, stopping at the first error.
    pub fn collect_states(self) -> IntegrationResult<Vec<Sample>> {
        self.collect()
    }
}

impl<F: VectorField> Iterator for Trajectory<F> {
    type Item = IntegrationResult<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.pending.take() {
            return Some(Err(e));
        }
        let current = self.state.take()?;
        let t = self.params.time_at(self.k);
        if !self.params.in_range(t) {
            return None;
        }

        // Advance right after emitting, so a failing step surfaces on the
        // following call even when `current` is the last sample in range.
        match step_with(self.scheme, &current, self.params.dt, &self.field) {
            Ok(next) => {
                tracing::trace!(k = self.k, t, "rk4 step");
                self.state = Some(next);
            }
            Err(e) => {
                tracing::warn!(k = self.k, t, error = %e, "integration aborted");
                self.pending = Some(e);
            }
        }
        match self.k.checked_add(1) {
            Some(k) => self.k = k,
            None => self.state = None,
        }
        Some(Ok(Sample { t, state: current }))
    }
}

impl<F: VectorField> FusedIterator for Trajectory<F> {}

/// Start a literal-scheme run of `field` from `initial_state`.
pub fn integrate<F: VectorField>(
    params: IntegrationParams,
    initial_state: Vec<f64>,
    field: F,
) -> IntegrationResult<Trajectory<F>> {
    integrate_with(StepScheme::Literal, params, initial_state, field)
}

/// Start a run using `scheme`. Parameters and dimensions are validated here,
/// before anything is yielded.
pub fn integrate_with<F: VectorField>(
    scheme: StepScheme,
    params: IntegrationParams,
    initial_state: Vec<f64>,
    field: F,
) -> IntegrationResult<Trajectory<F>> {
    params.check()?;
    check_dimension(&field, &initial_state)?;
    tracing::debug!(
        t0 = params.t0,
        t_end = params.t_end,
        dt = params.dt,
        scheme = scheme.label(),
        dim = initial_state.len(),
        "starting integration"
    );
    Ok(Trajectory {
        field,
        scheme,
        params,
        k: 0,
        state: Some(initial_state),
        pending: None,
    })
}
