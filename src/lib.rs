//! Daily power production forecasting
//!
//! Cleans a daily production series, scales it, turns it into sliding
//! window examples, trains a window regressor and rolls it forward over a
//! multi-step horizon.

pub mod artifacts;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod ml;
pub mod pipeline;
pub mod preprocessing;
pub mod telemetry;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::data::{load_column, ObservationSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::forecast::{forecast, forecast_recursive, ForecastMetrics, HistoryStrategy};
    pub use crate::ml::{make_windows, split, Dataset, Example, ModelType, Trainer, WindowModel};
    pub use crate::pipeline::{Pipeline, PipelineReport};
    pub use crate::preprocessing::{remove_outliers, MinMaxScaler, OutlierFilter, ScalerState};
}
