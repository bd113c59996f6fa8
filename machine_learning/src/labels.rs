use crate::{MlErr, Result};

/// Bidirectional mapping between class names and the integer codes the estimator works with.
///
/// Codes are assigned in order of first appearance, so the Palmer Penguins file yields
/// `Adelie = 0`, `Gentoo = 1` and `Chinstrap = 2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelEncoding {
    names: Vec<String>,
}

impl LabelEncoding {
    /// Derives the encoding from the labels of a dataset.
    ///
    /// # Arguments
    /// * `labels` - Every label of the dataset, in row order.
    ///
    /// # Returns
    /// An encoding holding each distinct label once.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names: Vec<String> = Vec::new();

        for label in labels {
            if !names.iter().any(|name| name == label) {
                names.push(label.to_string());
            }
        }

        Self { names }
    }

    /// Returns the code of `label`.
    pub fn encode(&self, label: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|name| name == label)
            .ok_or_else(|| MlErr::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// Returns the label encoded as `code`.
    pub fn decode(&self, code: usize) -> Result<&str> {
        self.names
            .get(code)
            .map(String::as_str)
            .ok_or(MlErr::UnknownCode { code })
    }

    /// The amount of distinct labels.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The labels ordered by code.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
