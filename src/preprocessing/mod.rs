//! Data preparation ahead of windowing
//!
//! - Outlier removal (z-score or IQR)
//! - Min-max scaling with an invertible, fitted state

pub mod cleaning;
pub mod scaling;

pub use cleaning::{quantile, remove_outliers, CleaningReport, OutlierFilter, OutlierPolicy};
pub use scaling::{MinMaxScaler, ScalerState};
