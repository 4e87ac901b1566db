pub mod metrics;
pub mod rolling;

pub use metrics::*;
pub use rolling::*;
