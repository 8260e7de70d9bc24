pub mod config;
pub mod error;
pub mod io;
pub mod math;
pub mod model;

pub use config::RunConfig;
pub use error::{IntegrationError, IntegrationResult};
pub use math::ode::{step, step_with, StepScheme};
pub use math::range::{integrate, integrate_with, IntegrationParams, Sample, Trajectory};
pub use model::field::{Field, VectorField};
pub use model::lorenz::LorenzField;
pub use model::simple::SimpleField;
