use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::data::DEFAULT_COLUMN;
use crate::error::{ForecastError, Result};
use crate::forecast::HistoryStrategy;
use crate::ml::{SplitConfig, TrainingConfig};
use crate::preprocessing::{OutlierFilter, OutlierPolicy};
use crate::telemetry::LogFormat;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "PF__";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    #[validate(nested)]
    pub data: DataConfig,
    #[validate(nested)]
    pub window: WindowConfig,
    #[validate(nested)]
    pub split: SplitConfig,
    #[validate(nested)]
    pub training: TrainingConfig,
    #[validate(nested)]
    pub forecast: ForecastConfig,
    #[validate(nested)]
    pub output: OutputConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DataConfig {
    pub input: PathBuf,
    #[validate(length(min = 1))]
    pub column: String,
    pub remove_outliers: bool,
    pub outlier_policy: OutlierPolicy,
    /// Overrides the policy's conventional threshold
    #[validate(range(exclusive_min = 0.0))]
    pub outlier_threshold: Option<f64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/production.csv"),
            column: DEFAULT_COLUMN.to_string(),
            remove_outliers: true,
            outlier_policy: OutlierPolicy::ZScore,
            outlier_threshold: None,
        }
    }
}

impl DataConfig {
    pub fn outlier_filter(&self) -> OutlierFilter {
        let mut filter = OutlierFilter::with_default_threshold(self.outlier_policy);
        if let Some(threshold) = self.outlier_threshold {
            filter.threshold = threshold;
        }
        filter
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WindowConfig {
    #[validate(range(min = 1))]
    pub timestep: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { timestep: 4 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForecastConfig {
    pub horizon: usize,
    pub history_extension: HistoryStrategy,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 365,
            history_extension: HistoryStrategy::Duplicate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub write_artifacts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            write_artifacts: true,
        }
    }
}

impl PipelineConfig {
    /// Defaults, then the TOML file, then `PF__` environment overrides.
    ///
    /// Without an explicit path a missing `config/default.toml` is skipped;
    /// an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) if !p.exists() => {
                return Err(ForecastError::Config(format!(
                    "config file {} not found",
                    p.display()
                )))
            }
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_PATH),
        };

        let figment = Figment::from(Serialized::defaults(PipelineConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: PipelineConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
