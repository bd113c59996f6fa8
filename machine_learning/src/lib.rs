pub mod classifier;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod pipeline;
pub mod preprocessing;
pub mod specs;
pub mod svm;

pub use classifier::{Classifier, Measurements};
pub use dataset::Dataset;
pub use error::{MlErr, Result};
pub use labels::LabelEncoding;
pub use specs::PipelineSpec;
