use ndarray::{Array2, ArrayView2};

use super::{KnnImputer, OneHotEncoder, StandardScaler, Transformer};
use crate::Result;

#[derive(Debug, Clone)]
pub enum Stage {
    OneHot(OneHotEncoder),
    Imputer(KnnImputer),
    Scaler(StandardScaler),
}
use Stage::*;

impl Stage {
    /// Human readable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            OneHot(_) => "one-hot encoder",
            Imputer(_) => "knn imputer",
            Scaler(_) => "standard scaler",
        }
    }
}

impl Transformer for Stage {
    fn fit(&mut self, x: ArrayView2<f64>) -> Result<()> {
        match self {
            OneHot(s) => s.fit(x),
            Imputer(s) => s.fit(x),
            Scaler(s) => s.fit(x),
        }
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        match self {
            OneHot(s) => s.transform(x),
            Imputer(s) => s.transform(x),
            Scaler(s) => s.transform(x),
        }
    }
}
