pub mod ode;
pub mod range;
