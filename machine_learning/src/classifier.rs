use std::{path::Path, time::Instant};

use log::info;
use ndarray::{Array2, arr2};

use crate::{
    Dataset, LabelEncoding, MlErr, Result,
    dataset::FEATURES,
    pipeline::{Pipeline, PipelineBuilder},
    specs::PipelineSpec,
};

/// The four measurements of one penguin, in training feature order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub bill_length_mm: f64,
    pub bill_depth_mm: f64,
    pub flipper_length_mm: f64,
    pub body_mass_g: f64,
}

impl Measurements {
    /// Parses raw measurements, trimming surrounding whitespace.
    ///
    /// # Returns
    /// The measurements or `MlErr::InvalidMeasurement` naming the first value that is not a
    /// number.
    pub fn parse(
        bill_length_mm: &str,
        bill_depth_mm: &str,
        flipper_length_mm: &str,
        body_mass_g: &str,
    ) -> Result<Self> {
        let raw = [bill_length_mm, bill_depth_mm, flipper_length_mm, body_mass_g];
        let mut values = [0.0; FEATURES.len()];

        for ((value, raw), field) in values.iter_mut().zip(raw).zip(FEATURES) {
            *value = raw
                .trim()
                .parse()
                .map_err(|_| MlErr::InvalidMeasurement {
                    field,
                    value: raw.to_string(),
                })?;
        }

        let [bill_length_mm, bill_depth_mm, flipper_length_mm, body_mass_g] = values;
        Ok(Self {
            bill_length_mm,
            bill_depth_mm,
            flipper_length_mm,
            body_mass_g,
        })
    }

    fn to_row(self) -> Array2<f64> {
        arr2(&[[
            self.bill_length_mm,
            self.bill_depth_mm,
            self.flipper_length_mm,
            self.body_mass_g,
        ]])
    }
}

/// A fitted pipeline together with the label encoding it was trained with. Immutable once
/// built, so it can be shared between request handlers without locking.
#[derive(Debug, Clone)]
pub struct Classifier {
    pipeline: Pipeline,
    labels: LabelEncoding,
}

impl Classifier {
    /// Loads the dataset at `path` and fits a pipeline built from `spec` on every row.
    pub fn train<P: AsRef<Path>>(path: P, spec: &PipelineSpec) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::from_path(path)?;
        info!(
            "loaded {} rows from {} ({} incomplete rows dropped)",
            dataset.len(),
            path.display(),
            dataset.dropped()
        );

        Self::fit(&dataset, spec)
    }

    /// Fits a pipeline built from `spec` on an already loaded dataset.
    pub fn fit(dataset: &Dataset, spec: &PipelineSpec) -> Result<Self> {
        let start = Instant::now();
        let mut pipeline = PipelineBuilder::new().build(spec)?;
        pipeline.fit(dataset.x(), dataset.y())?;

        let classifier = Self {
            pipeline,
            labels: dataset.labels().clone(),
        };

        let accuracy = classifier.accuracy(dataset)?;
        let counts: Vec<String> = dataset
            .labels()
            .names()
            .iter()
            .zip(dataset.class_counts())
            .map(|(name, count)| format!("{name}={count}"))
            .collect();

        info!(
            "fitted pipeline in {:.2?}: classes [{}], {} support vectors, training accuracy {:.3}",
            start.elapsed(),
            counts.join(", "),
            classifier.pipeline.estimator().n_support(),
            accuracy
        );

        Ok(classifier)
    }

    /// Classifies one penguin from raw measurement strings.
    ///
    /// # Returns
    /// The species name or an error if a measurement is not a number.
    pub fn classify(
        &self,
        bill_length_mm: &str,
        bill_depth_mm: &str,
        flipper_length_mm: &str,
        body_mass_g: &str,
    ) -> Result<&str> {
        let measurements =
            Measurements::parse(bill_length_mm, bill_depth_mm, flipper_length_mm, body_mass_g)?;
        self.predict(measurements)
    }

    /// Classifies one penguin.
    pub fn predict(&self, measurements: Measurements) -> Result<&str> {
        let codes = self.pipeline.predict(measurements.to_row().view())?;
        let code = codes.first().copied().ok_or(MlErr::SizeMismatch {
            what: "predictions",
            got: 0,
            expected: 1,
        })?;

        self.labels.decode(code)
    }

    /// Fraction of the rows of `dataset` predicted correctly.
    pub fn accuracy(&self, dataset: &Dataset) -> Result<f64> {
        let predicted = self.pipeline.predict(dataset.x())?;
        let hits = predicted
            .iter()
            .zip(dataset.y())
            .filter(|(p, y)| p == y)
            .count();

        Ok(hits as f64 / dataset.len().max(1) as f64)
    }

    pub fn labels(&self) -> &LabelEncoding {
        &self.labels
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}
