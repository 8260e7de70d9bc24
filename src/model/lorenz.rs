use serde::{Deserialize, Serialize};

use crate::error::IntegrationResult;
use crate::model::field::{check_component, VectorField};

/// Lorenz system parameters.
///
/// `Default` keeps the constants the original integrator was run with, where
/// `rho` and `beta` hold each other's textbook values. Use
/// [`LorenzField::canonical`] for sigma = 10, rho = 28, beta = 8/3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzField {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl LorenzField {
    pub const fn new(sigma: f64, rho: f64, beta: f64) -> Self {
        Self { sigma, rho, beta }
    }

    pub fn canonical() -> Self {
        Self::new(10.0, 28.0, 8.0 / 3.0)
    }
}

impl Default for LorenzField {
    fn default() -> Self {
        Self::new(10.0, 8.0 / 3.0, 28.0)
    }
}

impl VectorField for LorenzField {
    fn dimension(&self) -> usize {
        3
    }

    fn evaluate(&self, component: usize, state: &[f64]) -> IntegrationResult<f64> {
        check_component(3, component, state)?;
        let (x, y, z) = (state[0], state[1], state[2]);
        Ok(match component {
            0 => self.sigma * (y - x),
            1 => x * (self.rho - z) - y,
            2 => x * y - self.beta * z,
            _ => unreachable!("component checked above"),
        })
    }
}
