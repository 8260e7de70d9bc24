use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, IntegrationResult};
use crate::math::ode::StepScheme;
use crate::math::range::{integrate_with, IntegrationParams, Trajectory};
use crate::model::field::{Field, VectorField};
use crate::model::lorenz::LorenzField;

/// Everything needed to reproduce one integration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub field: Field,
    pub scheme: StepScheme,
    pub t0: f64,
    pub t_end: f64,
    pub dt: f64,
    pub initial_state: Vec<f64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            field: Field::Lorenz(LorenzField::default()),
            scheme: StepScheme::Literal,
            t0: 0.0,
            t_end: 1.0,
            dt: 0.01,
            initial_state: vec![1.0, 1.0, 1.0],
        }
    }
}

impl RunConfig {
    pub fn params(&self) -> IntegrationParams {
        IntegrationParams::new(self.t0, self.t_end, self.dt)
    }

    pub fn check(&self) -> IntegrationResult<()> {
        self.params().check()?;
        if self.field.dimension() != self.initial_state.len() {
            return Err(IntegrationError::DimensionMismatch {
                field: self.field.dimension(),
                state: self.initial_state.len(),
            });
        }
        Ok(())
    }

    /// Validate and start the run.
    pub fn start(&self) -> IntegrationResult<Trajectory<Field>> {
        self.check()?;
        integrate_with(self.scheme, self.params(), self.initial_state.clone(), self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::simple::SimpleField;

    #[test]
    fn default_run_is_valid() {
        let cfg = RunConfig::default();
        assert!(cfg.check().is_ok());
        assert_eq!(cfg.params().sample_count(), Some(100));
    }

    #[test]
    fn check_catches_bad_input() {
        let cfg = RunConfig { dt: -1.0, ..RunConfig::default() };
        assert_eq!(cfg.check(), Err(IntegrationError::InvalidStepSize(-1.0)));

        let cfg = RunConfig { initial_state: vec![1.0, 1.0], ..RunConfig::default() };
        assert_eq!(cfg.check(), Err(IntegrationError::DimensionMismatch { field: 3, state: 2 }));
    }

    #[test]
    fn serializes_as_json() {
        let cfg = RunConfig {
            field: Field::Simple(SimpleField),
            t_end: 0.05,
            ..RunConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(
            json,
            r#"{"field":{"simple":null},"scheme":"literal","t0":0.0,"t_end":0.05,"dt":0.01,"initial_state":[1.0,1.0,1.0]}"#
        );
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
