use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    MlErr, Result,
    preprocessing::{HandleUnknown, Weights},
    svm::{Gamma, KernelSpec},
};

/// The specification for a preprocessing `Stage`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageSpec {
    OneHot {
        handle_unknown: HandleUnknown,
    },
    KnnImputer {
        n_neighbors: usize,
        weights: Weights,
    },
    Scaler {
        with_mean: bool,
        with_std: bool,
    },
}

/// The specification for the final estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorSpec {
    Svc {
        c: f64,
        kernel: KernelSpec,
        tol: f64,
        max_iter: Option<usize>,
    },
}

/// The specification for a `Pipeline`.
///
/// The default is the penguin classifier: one-hot encoding ignoring unknown values, KNN
/// imputation with two uniform neighbors, unit variance scaling without centering and an RBF
/// support vector classifier with `C = 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub stages: Vec<StageSpec>,
    pub estimator: EstimatorSpec,
}

impl Default for PipelineSpec {
    fn default() -> Self {
        Self {
            stages: vec![
                StageSpec::OneHot {
                    handle_unknown: HandleUnknown::Ignore,
                },
                StageSpec::KnnImputer {
                    n_neighbors: 2,
                    weights: Weights::Uniform,
                },
                StageSpec::Scaler {
                    with_mean: false,
                    with_std: true,
                },
            ],
            estimator: EstimatorSpec::Svc {
                c: 1.0,
                kernel: KernelSpec::Rbf {
                    gamma: Gamma::Scale,
                },
                tol: 1e-3,
                max_iter: None,
            },
        }
    }
}

impl PipelineSpec {
    /// Reads a spec from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| MlErr::InvalidSpec(e.to_string()))
    }
}
