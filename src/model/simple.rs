use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, IntegrationResult};
use crate::model::field::{check_component, VectorField};

/// Decoupled sanity-check field: each component evolves as `2 / x_i`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleField;

impl VectorField for SimpleField {
    fn dimension(&self) -> usize {
        3
    }

    fn evaluate(&self, component: usize, state: &[f64]) -> IntegrationResult<f64> {
        check_component(3, component, state)?;
        let v = state[component];
        if v == 0.0 {
            return Err(IntegrationError::DivisionByZero { component });
        }
        Ok(2.0 / v)
    }
}
