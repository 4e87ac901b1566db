//! Observation data: loading and describing the raw production series

pub mod loader;
pub mod series;

pub use loader::*;
pub use series::*;
