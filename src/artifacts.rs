//! Training log and prediction outputs
//!
//! Artifacts are write-only: nothing in the pipeline reads them back.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::ml::{ModelType, TrainingHistory};

/// Destination for pipeline outputs
pub trait ArtifactSink {
    fn write_training_log(&self, model: ModelType, history: &TrainingHistory) -> Result<()>;

    /// Inverse-transformed predictions on the validation set, in split order
    fn write_validation_predictions(&self, model: ModelType, predictions: &[f64]) -> Result<()>;

    fn write_predictions(&self, model: ModelType, predictions: &[f64]) -> Result<()>;
}

/// Writes one CSV file per artifact into a directory
#[derive(Debug, Clone)]
pub struct CsvArtifactSink {
    directory: PathBuf,
}

#[derive(Serialize)]
struct PredictionRow {
    step: usize,
    prediction: f64,
}

impl PredictionRow {
    fn numbered(predictions: &[f64]) -> impl Iterator<Item = PredictionRow> + '_ {
        predictions
            .iter()
            .enumerate()
            .map(|(step, &prediction)| PredictionRow { step, prediction })
    }
}

impl CsvArtifactSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn training_log_path(&self, model: ModelType) -> PathBuf {
        self.directory.join(format!("{}_training_log.csv", model))
    }

    pub fn validation_predictions_path(&self, model: ModelType) -> PathBuf {
        self.directory
            .join(format!("{}_validation_predictions.csv", model))
    }

    pub fn predictions_path(&self, model: ModelType) -> PathBuf {
        self.directory.join(format!("{}_predictions.csv", model))
    }

    fn write_rows<T: Serialize>(&self, path: &Path, rows: impl IntoIterator<Item = T>) -> Result<usize> {
        fs::create_dir_all(&self.directory)?;
        let mut writer = csv::Writer::from_path(path)?;
        let mut count = 0;
        for row in rows {
            writer.serialize(row)?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }
}

impl ArtifactSink for CsvArtifactSink {
    fn write_training_log(&self, model: ModelType, history: &TrainingHistory) -> Result<()> {
        let path = self.training_log_path(model);
        let rows = self.write_rows(&path, history.epochs.iter())?;
        info!(path = %path.display(), rows, "Wrote training log");
        Ok(())
    }

    fn write_validation_predictions(&self, model: ModelType, predictions: &[f64]) -> Result<()> {
        let path = self.validation_predictions_path(model);
        let rows = self.write_rows(&path, PredictionRow::numbered(predictions))?;
        info!(path = %path.display(), rows, "Wrote validation predictions");
        Ok(())
    }

    fn write_predictions(&self, model: ModelType, predictions: &[f64]) -> Result<()> {
        let path = self.predictions_path(model);
        let rows = self.write_rows(&path, PredictionRow::numbered(predictions))?;
        info!(path = %path.display(), rows, "Wrote predictions");
        Ok(())
    }
}
