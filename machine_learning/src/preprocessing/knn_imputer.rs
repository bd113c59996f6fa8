use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::{Transformer, ensure_finite};
use crate::{MlErr, Result};

/// How the donors of an imputed value are weighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weights {
    #[default]
    Uniform,
    /// Inverse of the distance to the donor.
    Distance,
}

/// Fills missing (`NaN`) values with the mean of that column among the `n_neighbors` closest
/// training rows that have it.
///
/// Distances are nan-euclidean: only coordinates present in both rows count, and the sum is
/// rescaled by `total / present` coordinates.
#[derive(Debug, Clone)]
pub struct KnnImputer {
    n_neighbors: usize,
    weights: Weights,
    fit_x: Option<Array2<f64>>,
    fallback: Array1<f64>,
}

impl KnnImputer {
    /// Creates a new `KnnImputer`.
    ///
    /// # Arguments
    /// * `n_neighbors` - Amount of donors per imputed value, must be positive.
    /// * `weights` - How donors are weighted.
    pub fn new(n_neighbors: usize, weights: Weights) -> Result<Self> {
        if n_neighbors == 0 {
            return Err(MlErr::InvalidSpec(
                "the imputer needs at least one neighbor".into(),
            ));
        }

        Ok(Self {
            n_neighbors,
            weights,
            fit_x: None,
            fallback: Array1::zeros(0),
        })
    }

    fn impute_row(&self, fit_x: ArrayView2<f64>, mut row: ndarray::ArrayViewMut1<f64>) {
        let distances: Vec<f64> = fit_x
            .rows()
            .into_iter()
            .map(|donor| nan_euclidean(row.view(), donor))
            .collect();

        let missing: Vec<usize> = (0..row.len()).filter(|&c| row[c].is_nan()).collect();

        for col in missing {
            let mut donors: Vec<(f64, f64)> = fit_x
                .column(col)
                .iter()
                .zip(&distances)
                .filter(|(value, dist)| !value.is_nan() && !dist.is_nan())
                .map(|(&value, &dist)| (dist, value))
                .collect();

            donors.sort_by(|a, b| a.0.total_cmp(&b.0));
            donors.truncate(self.n_neighbors);

            row[col] = match self.weigh(&donors) {
                Some(value) => value,
                None => self.fallback[col],
            };
        }
    }

    fn weigh(&self, donors: &[(f64, f64)]) -> Option<f64> {
        if donors.is_empty() {
            return None;
        }

        match self.weights {
            Weights::Uniform => {
                Some(donors.iter().map(|(_, value)| value).sum::<f64>() / donors.len() as f64)
            }
            Weights::Distance => {
                let exact: Vec<f64> = donors
                    .iter()
                    .filter(|(dist, _)| *dist == 0.0)
                    .map(|&(_, value)| value)
                    .collect();

                if !exact.is_empty() {
                    return Some(exact.iter().sum::<f64>() / exact.len() as f64);
                }

                let total: f64 = donors.iter().map(|(dist, _)| 1.0 / dist).sum();
                let weighted: f64 = donors.iter().map(|(dist, value)| value / dist).sum();
                Some(weighted / total)
            }
        }
    }
}

/// Euclidean distance over the coordinates present in both rows, `NaN` if there are none.
pub fn nan_euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    let mut present = 0;
    let mut sum = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        if x.is_nan() || y.is_nan() {
            continue;
        }
        present += 1;
        sum += (x - y).powi(2);
    }

    if present == 0 {
        return f64::NAN;
    }

    (sum * a.len() as f64 / present as f64).sqrt()
}

impl Transformer for KnnImputer {
    fn fit(&mut self, x: ArrayView2<f64>) -> Result<()> {
        ensure_finite(x)?;

        self.fallback = x.map_axis(Axis(0), |column| {
            let (sum, count) = column
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

            if count == 0 { 0.0 } else { sum / count as f64 }
        });
        self.fit_x = Some(x.to_owned());
        Ok(())
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let fit_x = self
            .fit_x
            .as_ref()
            .ok_or(MlErr::NotFitted { stage: "knn imputer" })?;

        if x.ncols() != fit_x.ncols() {
            return Err(MlErr::SizeMismatch {
                what: "knn imputer input columns",
                got: x.ncols(),
                expected: fit_x.ncols(),
            });
        }

        ensure_finite(x)?;

        let mut out = x.to_owned();
        for row in out.rows_mut() {
            if row.iter().any(|v| v.is_nan()) {
                self.impute_row(fit_x.view(), row);
            }
        }

        Ok(out)
    }
}
