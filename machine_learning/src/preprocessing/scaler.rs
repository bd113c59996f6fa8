use ndarray::{Array1, Array2, ArrayView2, Axis};

use super::{Transformer, ensure_finite};
use crate::{MlErr, Result};

/// Standardizes columns: optional centering on the mean and scaling to unit variance.
///
/// Variance is the population variance over the non-`NaN` values. Constant columns keep a
/// scale of one.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    with_mean: bool,
    with_std: bool,
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new(with_mean: bool, with_std: bool) -> Self {
        Self {
            with_mean,
            with_std,
            mean: None,
            scale: None,
        }
    }

    /// The per column scale, if fitted.
    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }
}

impl Transformer for StandardScaler {
    fn fit(&mut self, x: ArrayView2<f64>) -> Result<()> {
        ensure_finite(x)?;

        let stats = x.map_axis(Axis(0), |column| {
            let values: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
            if values.is_empty() {
                return (0.0, 0.0);
            }

            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            (mean, var)
        });

        self.mean = Some(stats.mapv(|(mean, _)| mean));
        self.scale = Some(stats.mapv(|(_, var)| {
            let std = var.sqrt();
            if std < 10.0 * f64::EPSILON { 1.0 } else { std }
        }));
        Ok(())
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (Some(mean), Some(scale)) = (&self.mean, &self.scale) else {
            return Err(MlErr::NotFitted {
                stage: "standard scaler",
            });
        };

        if x.ncols() != scale.len() {
            return Err(MlErr::SizeMismatch {
                what: "scaler input columns",
                got: x.ncols(),
                expected: scale.len(),
            });
        }

        ensure_finite(x)?;

        let mut out = x.to_owned();
        if self.with_mean {
            out -= mean;
        }
        if self.with_std {
            out /= scale;
        }

        Ok(out)
    }
}
