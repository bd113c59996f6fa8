use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{Transformer, ensure_finite};
use crate::{MlErr, Result};

/// What to do with a value that was not seen while fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Encode it as an all-zero block.
    #[default]
    Ignore,
    Error,
}

/// Treats every column as categorical and replaces it with one indicator column per distinct
/// value seen while fitting.
#[derive(Debug, Clone, Default)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
    categories: Option<Vec<Vec<f64>>>,
}

impl OneHotEncoder {
    pub fn new(handle_unknown: HandleUnknown) -> Self {
        Self {
            handle_unknown,
            categories: None,
        }
    }

    /// The sorted categories of each input column, if fitted.
    pub fn categories(&self) -> Option<&[Vec<f64>]> {
        self.categories.as_deref()
    }

    /// Amount of output columns, if fitted.
    pub fn width(&self) -> Option<usize> {
        self.categories
            .as_ref()
            .map(|cats| cats.iter().map(Vec::len).sum())
    }
}

impl Transformer for OneHotEncoder {
    fn fit(&mut self, x: ArrayView2<f64>) -> Result<()> {
        ensure_finite(x)?;

        let categories = x
            .columns()
            .into_iter()
            .map(|column| {
                let mut values = column.to_vec();
                values.sort_by(f64::total_cmp);
                values.dedup_by(|a, b| a.total_cmp(b).is_eq());
                values
            })
            .collect();

        self.categories = Some(categories);
        Ok(())
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let categories = self
            .categories
            .as_ref()
            .ok_or(MlErr::NotFitted { stage: "one-hot encoder" })?;

        if x.ncols() != categories.len() {
            return Err(MlErr::SizeMismatch {
                what: "one-hot encoder input columns",
                got: x.ncols(),
                expected: categories.len(),
            });
        }

        ensure_finite(x)?;

        let width = categories.iter().map(Vec::len).sum();
        let mut out = Array2::zeros((x.nrows(), width));

        for (mut out_row, row) in out.rows_mut().into_iter().zip(x.rows()) {
            let mut offset = 0;

            for (col, (&value, cats)) in row.iter().zip(categories).enumerate() {
                match cats.binary_search_by(|cat| cat.total_cmp(&value)) {
                    Ok(pos) => out_row[offset + pos] = 1.0,
                    Err(_) if self.handle_unknown == HandleUnknown::Error => {
                        return Err(MlErr::UnknownCategory { column: col, value });
                    }
                    Err(_) => {}
                }

                offset += cats.len();
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn each_distinct_value_is_a_category() {
        let x = array![[1.0, 10.0], [2.0, 10.0], [1.0, 20.0]];
        let mut encoder = OneHotEncoder::new(HandleUnknown::Ignore);

        let out = encoder.fit_transform(x.view()).unwrap();

        assert_eq!(encoder.width(), Some(4));
        assert_eq!(
            out,
            array![
                [1.0, 0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0, 0.0],
                [1.0, 0.0, 0.0, 1.0]
            ]
        );
    }

    #[test]
    fn unseen_values_are_ignored() {
        let mut encoder = OneHotEncoder::new(HandleUnknown::Ignore);
        encoder.fit(array![[1.0, 10.0], [2.0, 20.0]].view()).unwrap();

        let out = encoder.transform(array![[3.0, 20.0]].view()).unwrap();

        assert_eq!(out, array![[0.0, 0.0, 0.0, 1.0]]);
    }

    #[test]
    fn unseen_values_can_be_rejected() {
        let mut encoder = OneHotEncoder::new(HandleUnknown::Error);
        encoder.fit(array![[1.0], [2.0]].view()).unwrap();

        let err = encoder.transform(array![[1.5]].view()).unwrap_err();

        assert!(matches!(err, MlErr::UnknownCategory { column: 0, .. }));
    }

    #[test]
    fn infinite_values_are_rejected() {
        let mut encoder = OneHotEncoder::new(HandleUnknown::Ignore);
        encoder.fit(array![[1.0, 10.0], [2.0, 20.0]].view()).unwrap();

        for value in [f64::INFINITY, f64::NEG_INFINITY] {
            let err = encoder.transform(array![[1.0, value]].view()).unwrap_err();
            assert!(matches!(err, MlErr::NonFinite { column: 1, .. }));
        }

        let err = OneHotEncoder::default()
            .fit(array![[f64::INFINITY]].view())
            .unwrap_err();
        assert!(matches!(err, MlErr::NonFinite { column: 0, .. }));
    }

    #[test]
    fn nan_is_an_unknown_category() {
        let mut encoder = OneHotEncoder::new(HandleUnknown::Ignore);
        encoder.fit(array![[1.0, 10.0], [2.0, 20.0]].view()).unwrap();

        let out = encoder.transform(array![[f64::NAN, 20.0]].view()).unwrap();

        assert_eq!(out, array![[0.0, 0.0, 0.0, 1.0]]);
    }

    #[test]
    fn transform_before_fit_fails() {
        let encoder = OneHotEncoder::default();

        let err = encoder.transform(array![[1.0]].view()).unwrap_err();

        assert!(matches!(err, MlErr::NotFitted { .. }));
    }
}
