use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, IntegrationResult};
use crate::model::lorenz::LorenzField;
use crate::model::simple::SimpleField;

/// An autonomous vector field: one scalar derivative per state component.
pub trait VectorField {
    /// Number of components the field expects in a state vector.
    fn dimension(&self) -> usize;

    /// Rate of change of `component` at `state`.
    ///
    /// A `component` past the dimension is `ComponentOutOfRange`; a `state` of
    /// the wrong length is `DimensionMismatch`.
    fn evaluate(&self, component: usize, state: &[f64]) -> IntegrationResult<f64>;
}

impl<F: VectorField + ?Sized> VectorField for &F {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn evaluate(&self, component: usize, state: &[f64]) -> IntegrationResult<f64> {
        (**self).evaluate(component, state)
    }
}

/// Shared argument check for fixed-dimension fields.
pub(crate) fn check_component(dimension: usize, component: usize, state: &[f64]) -> IntegrationResult<()> {
    if state.len() != dimension {
        return Err(IntegrationError::DimensionMismatch { field: dimension, state: state.len() });
    }
    if component >= dimension {
        return Err(IntegrationError::ComponentOutOfRange { component, dimension });
    }
    Ok(())
}

/// The closed set of fields the binary can integrate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Lorenz(LorenzField),
    Simple(SimpleField),
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lorenz(l) if *l == LorenzField::default() => "lorenz",
            Self::Lorenz(l) if *l == LorenzField::canonical() => "lorenz-canonical",
            Self::Lorenz(_) => "lorenz-custom",
            Self::Simple(_) => "simple",
        }
    }
}

impl VectorField for Field {
    fn dimension(&self) -> usize {
        match self {
            Self::Lorenz(f) => f.dimension(),
            Self::Simple(f) => f.dimension(),
        }
    }

    fn evaluate(&self, component: usize, state: &[f64]) -> IntegrationResult<f64> {
        match self {
            Self::Lorenz(f) => f.evaluate(component, state),
            Self::Simple(f) => f.evaluate(component, state),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lorenz" => Ok(Self::Lorenz(LorenzField::default())),
            "lorenz-canonical" => Ok(Self::Lorenz(LorenzField::canonical())),
            "simple" => Ok(Self::Simple(SimpleField)),
            other => Err(format!(
                "unknown field '{other}' (expected lorenz, lorenz-canonical or simple)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("lorenz".parse::<Field>().unwrap(), Field::Lorenz(LorenzField::default()));
        assert_eq!(
            "Lorenz-Canonical".parse::<Field>().unwrap(),
            Field::Lorenz(LorenzField::canonical())
        );
        assert_eq!("simple".parse::<Field>().unwrap(), Field::Simple(SimpleField));
        assert!("rossler".parse::<Field>().is_err());
    }

    #[test]
    fn label_round_trips_through_from_str() {
        for name in ["lorenz", "lorenz-canonical", "simple"] {
            let field: Field = name.parse().unwrap();
            assert_eq!(field.label(), name);
        }
    }

    #[test]
    fn dispatch_matches_inner_field() {
        let state = [1.0, 2.0, 4.0];
        let lorenz = LorenzField::default();
        let field = Field::Lorenz(lorenz);
        assert_eq!(field.dimension(), 3);
        for i in 0..3 {
            assert_eq!(field.evaluate(i, &state).unwrap(), lorenz.evaluate(i, &state).unwrap());
        }
    }

    #[test]
    fn custom_lorenz_gets_its_own_label() {
        let field = Field::Lorenz(LorenzField::new(10.0, 20.0, 3.0));
        assert_eq!(field.label(), "lorenz-custom");
        assert_eq!(field.to_string(), "lorenz-custom");
        assert!("lorenz-custom".parse::<Field>().is_err());
        assert_ne!(Field::Lorenz(LorenzField::default()).label(), field.label());
    }
}
