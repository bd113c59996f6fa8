use super::Pipeline;
use crate::{
    Result,
    preprocessing::{KnnImputer, OneHotEncoder, Stage, StandardScaler},
    specs::{EstimatorSpec, PipelineSpec, StageSpec},
    svm::Svc,
};

/// Builds unfitted `Pipeline`s given a specification.
#[derive(Default)]
pub struct PipelineBuilder;

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Pipeline` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the pipeline.
    ///
    /// # Returns
    /// The unfitted pipeline or an error if a hyperparameter is out of range.
    pub fn build(&self, spec: &PipelineSpec) -> Result<Pipeline> {
        let stages = spec
            .stages
            .iter()
            .map(|&stage| self.resolve_stage(stage))
            .collect::<Result<Vec<_>>>()?;

        let estimator = self.resolve_estimator(spec.estimator)?;
        Ok(Pipeline::new(stages, estimator))
    }

    fn resolve_stage(&self, spec: StageSpec) -> Result<Stage> {
        let stage = match spec {
            StageSpec::OneHot { handle_unknown } => {
                Stage::OneHot(OneHotEncoder::new(handle_unknown))
            }
            StageSpec::KnnImputer {
                n_neighbors,
                weights,
            } => Stage::Imputer(KnnImputer::new(n_neighbors, weights)?),
            StageSpec::Scaler {
                with_mean,
                with_std,
            } => Stage::Scaler(StandardScaler::new(with_mean, with_std)),
        };

        Ok(stage)
    }

    fn resolve_estimator(&self, spec: EstimatorSpec) -> Result<Svc> {
        match spec {
            EstimatorSpec::Svc {
                c,
                kernel,
                tol,
                max_iter,
            } => Svc::new(c, kernel, tol, max_iter),
        }
    }
}
