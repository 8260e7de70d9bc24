pub mod field;
pub mod lorenz;
pub mod simple;
