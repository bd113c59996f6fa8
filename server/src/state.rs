use machine_learning::Classifier;

use crate::templates::Templates;

/// Everything a request handler needs. Built once before the listener starts and shared
/// read-only between handlers.
#[derive(Debug)]
pub struct AppState {
    pub classifier: Classifier,
    pub templates: Templates,
}

impl AppState {
    pub fn new(classifier: Classifier) -> Result<Self, minijinja::Error> {
        Ok(Self {
            classifier,
            templates: Templates::new()?,
        })
    }
}
