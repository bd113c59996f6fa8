mod knn_imputer;
mod one_hot;
mod scaler;
mod stage;

pub use knn_imputer::{KnnImputer, Weights};
pub use one_hot::{HandleUnknown, OneHotEncoder};
pub use scaler::StandardScaler;
pub use stage::Stage;

use ndarray::{Array2, ArrayView2};

use crate::{MlErr, Result};

/// Rejects infinite values. `NaN` marks a missing value and is let through.
fn ensure_finite(x: ArrayView2<f64>) -> Result<()> {
    match x.indexed_iter().find(|(_, value)| value.is_infinite()) {
        Some(((_, column), &value)) => Err(MlErr::NonFinite { column, value }),
        None => Ok(()),
    }
}

/// A preprocessing step: learns its state from the training table and then maps tables with the
/// same columns into new tables.
pub trait Transformer {
    /// Learns the stage's state from `x`.
    fn fit(&mut self, x: ArrayView2<f64>) -> Result<()>;

    /// Maps `x` using the fitted state.
    ///
    /// # Returns
    /// The transformed table or an error if the stage is not fitted or `x` has the wrong shape.
    fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>>;

    fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}
