use std::{io, path::Path};

use ndarray::{Array2, ArrayView2};

use crate::{LabelEncoding, MlErr, Result};

/// The measurement columns, in the order the estimator sees them.
pub const FEATURES: [&str; 4] = [
    "bill_length_mm",
    "bill_depth_mm",
    "flipper_length_mm",
    "body_mass_g",
];

/// The class column.
pub const TARGET: &str = "species";

/// Columns that must be present but are never used as features.
pub const DROPPED: [&str; 3] = ["year", "island", "sex"];

const MISSING: [&str; 13] = [
    "", "NA", "N/A", "n/a", "#N/A", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>",
];

fn is_missing(cell: &str) -> bool {
    MISSING.contains(&cell.trim())
}

/// The cleaned training table: one row per complete record, features in `FEATURES` order and
/// integer coded labels.
#[derive(Debug, Clone)]
pub struct Dataset {
    x: Array2<f64>,
    y: Vec<usize>,
    labels: LabelEncoding,
    dropped: usize,
}

impl Dataset {
    /// Creates a new `Dataset` from an already clean feature table.
    ///
    /// # Arguments
    /// * `x` - The feature table, one row per sample.
    /// * `labels` - The label of each row.
    ///
    /// # Returns
    /// A new `Dataset` or an error if the sizes disagree or there are no rows.
    pub fn new(x: Array2<f64>, labels: &[&str]) -> Result<Self> {
        if x.nrows() != labels.len() {
            return Err(MlErr::SizeMismatch {
                what: "labels",
                got: labels.len(),
                expected: x.nrows(),
            });
        }

        if x.nrows() == 0 {
            return Err(MlErr::EmptyDataset);
        }

        let encoding = LabelEncoding::from_labels(labels.iter().copied());
        let y = labels
            .iter()
            .map(|label| encoding.encode(label))
            .collect::<Result<_>>()?;

        Ok(Self {
            x,
            y,
            labels: encoding,
            dropped: 0,
        })
    }

    /// Loads and cleans the CSV file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_reader(reader)
    }

    /// Loads and cleans a CSV table.
    ///
    /// Rows holding a missing value in any column are dropped before the unused columns are,
    /// so a record without `sex` never reaches the estimator.
    ///
    /// # Arguments
    /// * `reader` - A reader positioned before the header row.
    ///
    /// # Returns
    /// The cleaned dataset or an error if a required column is absent, a measurement is not a
    /// number or no complete rows remain.
    pub fn from_reader<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or(MlErr::MissingColumn { name })
        };

        for name in DROPPED {
            column(name)?;
        }

        let target = column(TARGET)?;
        let features = FEATURES.map(column);
        let mut feature_idx = [0; FEATURES.len()];
        for (idx, found) in feature_idx.iter_mut().zip(features) {
            *idx = found?;
        }

        let mut data = Vec::new();
        let mut labels = Vec::new();
        let mut dropped = 0;

        for record in reader.records() {
            let record = record?;

            if record.iter().any(is_missing) {
                dropped += 1;
                continue;
            }

            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            for (&idx, name) in feature_idx.iter().zip(FEATURES) {
                let cell = record[idx].trim();
                let value = cell.parse::<f64>().map_err(|_| MlErr::InvalidRecord {
                    line,
                    column: name,
                    value: cell.to_string(),
                })?;
                data.push(value);
            }

            labels.push(record[target].trim().to_string());
        }

        let x = Array2::from_shape_vec((labels.len(), FEATURES.len()), data).map_err(|_| {
            MlErr::SizeMismatch {
                what: "feature table",
                got: labels.len(),
                expected: FEATURES.len(),
            }
        })?;

        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        let mut dataset = Self::new(x, &labels)?;
        dataset.dropped = dropped;
        Ok(dataset)
    }

    /// The feature table.
    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    /// The integer coded labels.
    pub fn y(&self) -> &[usize] {
        &self.y
    }

    pub fn labels(&self) -> &LabelEncoding {
        &self.labels
    }

    /// Amount of rows kept.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Amount of rows dropped because they were incomplete.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Amount of rows per class, indexed by code.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.labels.len()];
        for &code in &self.y {
            counts[code] += 1;
        }
        counts
    }
}
