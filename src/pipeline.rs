//! End-to-end run: load, clean, scale, window, split, train, evaluate,
//! forecast and write artifacts.

use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

use crate::artifacts::{ArtifactSink, CsvArtifactSink};
use crate::config::PipelineConfig;
use crate::data::{load_column, ObservationSeries, SeriesSummary};
use crate::error::Result;
use crate::forecast::{forecast, ForecastMetrics, ForecastQuality};
use crate::ml::{
    make_windows, Dataset, EpochMetrics, LinearTrainer, MeanTrainer, ModelMetadata, ModelType,
    TrainedModel, Trainer, WindowModel,
};
use crate::preprocessing::{remove_outliers, MinMaxScaler, ScalerState};

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub input: Option<SeriesSummary>,
    pub removed_outliers: usize,
    pub scaler: ScalerState,
    pub train_examples: usize,
    pub validation_examples: usize,
    pub model: ModelMetadata,
    pub final_epoch: Option<EpochMetrics>,
    /// `None` when evaluation failed; the forecast is still produced
    pub metrics: Option<ForecastMetrics>,
    pub quality: Option<ForecastQuality>,
    pub evaluation_error: Option<String>,
    pub forecast: Vec<f64>,
}

pub struct Pipeline {
    config: PipelineConfig,
    sink: Option<Box<dyn ArtifactSink>>,
}

impl Pipeline {
    /// Validate `config`; artifacts go to a CSV sink in the output
    /// directory unless disabled there.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let sink: Option<Box<dyn ArtifactSink>> = if config.output.write_artifacts {
            Some(Box::new(CsvArtifactSink::new(&config.output.directory)))
        } else {
            None
        };
        Ok(Self { config, sink })
    }

    pub fn with_sink(mut self, sink: Box<dyn ArtifactSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn without_artifacts(mut self) -> Self {
        self.sink = None;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run on the CSV input named in the config
    pub fn run(&self) -> Result<PipelineReport> {
        let data = &self.config.data;
        let series = load_column(&data.input, &data.column)?;
        self.run_series(&series)
    }

    /// Run on an already loaded series
    pub fn run_series(&self, raw: &ObservationSeries) -> Result<PipelineReport> {
        let cfg = &self.config;
        let input = raw.summary();
        if let Some(summary) = &input {
            info!(%summary, "Input series");
        }

        let (cleaned, removed_outliers) = if cfg.data.remove_outliers {
            let report = remove_outliers(raw.values(), &cfg.data.outlier_filter())?;
            let removed = report.removed_count();
            (report.values, removed)
        } else {
            (raw.values().to_vec(), 0)
        };
        info!(
            kept = cleaned.len(),
            removed = removed_outliers,
            "Cleaning complete"
        );

        // Fit on the cleaned series only
        let scaler = MinMaxScaler::default().fit(&cleaned)?;
        let scaled = scaler.transform(&cleaned);
        info!(
            data_min = scaler.data_min,
            data_max = scaler.data_max,
            "Scaler fitted"
        );

        let dataset = make_windows(&scaled, cfg.window.timestep)?;
        let (train, validation) = cfg.split.apply(&dataset)?;
        info!(
            examples = dataset.len(),
            train = train.len(),
            validation = validation.len(),
            seed = cfg.split.seed,
            "Dataset split"
        );

        let trained = self.train(&train, &validation)?;
        if let Some(sink) = &self.sink {
            sink.write_training_log(trained.metadata.model_type, &trained.history)?;
        }

        let scaled_predictions = trained.model.predict_dataset(&validation)?;
        let predictions = scaler.inverse_transform(&scaled_predictions);
        let truth = scaler.inverse_transform(&validation.targets());
        if let Some(sink) = &self.sink {
            sink.write_validation_predictions(trained.metadata.model_type, &predictions)?;
        }

        let (metrics, evaluation_error) = match ForecastMetrics::calculate(&truth, &predictions) {
            Ok(metrics) => {
                info!(%metrics, "Validation evaluated");
                if matches!(
                    metrics.quality(),
                    ForecastQuality::Poor | ForecastQuality::VeryPoor
                ) {
                    warn!(mape = metrics.mape, quality = ?metrics.quality(), "Low validation accuracy");
                }
                (Some(metrics), None)
            }
            Err(err) => {
                warn!(error = %err, "Validation metrics unavailable");
                (None, Some(err.to_string()))
            }
        };
        let quality = metrics.as_ref().map(ForecastMetrics::quality);

        let forecast = forecast(
            trained.model.as_ref(),
            &predictions,
            &scaler,
            cfg.window.timestep,
            cfg.forecast.horizon,
            &cfg.forecast.history_extension,
        )?;
        if let Some(sink) = &self.sink {
            sink.write_predictions(trained.metadata.model_type, &forecast)?;
        }

        Ok(PipelineReport {
            input,
            removed_outliers,
            scaler,
            train_examples: train.len(),
            validation_examples: validation.len(),
            final_epoch: trained.history.last().copied(),
            model: trained.metadata,
            metrics,
            quality,
            evaluation_error,
            forecast,
        })
    }

    fn train(&self, train: &Dataset, validation: &Dataset) -> Result<TrainedModel<Box<dyn WindowModel>>> {
        let config = &self.config.training;
        let trained = match config.model_type {
            ModelType::WindowMean => MeanTrainer.fit(train, validation, config)?.boxed(),
            ModelType::LinearRegression => LinearTrainer.fit(train, validation, config)?.boxed(),
            #[cfg(feature = "ml")]
            ModelType::RandomForest => crate::ml::smartcore::RandomForestTrainer {
                seed: self.config.split.seed,
            }
            .fit(train, validation, config)?
            .boxed(),
            #[cfg(not(feature = "ml"))]
            ModelType::RandomForest => {
                return Err(crate::error::ForecastError::InvalidParameter(
                    "random_forest requires the `ml` feature".to_string(),
                ))
            }
        };

        info!(
            model_id = %trained.metadata.model_id,
            epochs = trained.history.len(),
            "Model trained"
        );
        Ok(trained)
    }
}
