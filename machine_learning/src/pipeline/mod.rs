mod builder;

pub use builder::PipelineBuilder;

use ndarray::{Array2, ArrayView2};

use crate::{
    MlErr, Result,
    preprocessing::{Stage, Transformer},
    svm::Svc,
};

/// Preprocessing stages applied in order, followed by the classifier.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
    estimator: Svc,
}

impl Pipeline {
    /// Creates a new, unfitted `Pipeline`.
    ///
    /// # Arguments
    /// * `stages` - The preprocessing stages, in application order.
    /// * `estimator` - The final classifier.
    pub fn new<I>(stages: I, estimator: Svc) -> Self
    where
        I: IntoIterator<Item = Stage>,
    {
        Self {
            stages: stages.into_iter().collect(),
            estimator,
        }
    }

    /// Fits every stage on the output of the previous one and the estimator on the output of the
    /// last stage.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: &[usize]) -> Result<()> {
        if x.nrows() == 0 {
            return Err(MlErr::EmptyDataset);
        }

        let mut current = x.to_owned();
        for stage in &mut self.stages {
            current = stage.fit_transform(current.view())?;
            log::debug!(
                "fitted {}, {} columns out",
                stage.name(),
                current.ncols()
            );
        }

        self.estimator.fit(current.view(), y)
    }

    /// Runs `x` through the fitted stages.
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let mut current = x.to_owned();
        for stage in &self.stages {
            current = stage.transform(current.view())?;
        }

        Ok(current)
    }

    /// Predicts the class code of each row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<usize>> {
        let features = self.transform(x)?;
        self.estimator.predict(features.view())
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn estimator(&self) -> &Svc {
        &self.estimator
    }
}
