use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use machine_learning::PipelineSpec;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATASET: &str = "data/PalmerPenguins.csv";

/// Process configuration, read from the environment.
///
/// * `HOST`, `PORT` - listen address, `127.0.0.1:5000` by default.
/// * `DATASET_PATH` - training CSV, `data/PalmerPenguins.csv` by default.
/// * `PIPELINE_SPEC` - optional JSON file overriding the default pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: String,
    pub dataset: PathBuf,
    pub pipeline_spec: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key-value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("PORT={port:?} is not a port number"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            addr: format!("{host}:{port}"),
            dataset: lookup("DATASET_PATH")
                .unwrap_or_else(|| DEFAULT_DATASET.to_string())
                .into(),
            pipeline_spec: lookup("PIPELINE_SPEC").map(PathBuf::from),
        })
    }

    /// The pipeline to train, the default one unless `PIPELINE_SPEC` names a file.
    pub fn pipeline_spec(&self) -> Result<PipelineSpec> {
        let Some(path) = &self.pipeline_spec else {
            return Ok(PipelineSpec::default());
        };

        PipelineSpec::from_json_file(path)
            .with_context(|| format!("failed to read pipeline spec {}", path.display()))
    }
}
