use anyhow::{Context, Result};
use clap::Parser;
use production_forecaster::config::PipelineConfig;
use production_forecaster::ml::ModelType;
use production_forecaster::pipeline::Pipeline;
use production_forecaster::telemetry::{init_tracing, LogFormat};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "production-forecaster", version, about = "Train and roll a daily power production forecaster")]
struct Cli {
    /// TOML configuration file (defaults to config/default.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV input file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Column holding the daily production values
    #[arg(long)]
    column: Option<String>,

    /// Model to train: window_mean, linear_regression, random_forest
    #[arg(short, long)]
    model: Option<ModelType>,

    /// Number of days to forecast
    #[arg(long)]
    horizon: Option<usize>,

    /// Log format: json or pretty
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(input) = self.input {
            config.data.input = input;
        }
        if let Some(column) = self.column {
            config.data.column = column;
        }
        if let Some(model) = self.model {
            config.training.model_type = model;
        }
        if let Some(horizon) = self.horizon {
            config.forecast.horizon = horizon;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = PipelineConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut cfg);

    init_tracing(cfg.log_format);
    info!(input = %cfg.data.input.display(), model = %cfg.training.model_type, "starting production forecaster");

    let report = Pipeline::new(cfg)?
        .run()
        .context("pipeline run failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
