use std::{error::Error, fmt};

use machine_learning::MlErr;

/// Why a classification request failed. Clients only ever see a generic error body, the reason
/// goes to the logs.
#[derive(Debug)]
pub enum ClassifyErr {
    MissingParam(&'static str),
    BadQuery(String),
    Ml(MlErr),
    Render(minijinja::Error),
}

impl fmt::Display for ClassifyErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParam(name) => write!(f, "missing query parameter {name:?}"),
            Self::BadQuery(msg) => write!(f, "malformed query string: {msg}"),
            Self::Ml(e) => write!(f, "{e}"),
            Self::Render(e) => write!(f, "render error: {e}"),
        }
    }
}

impl Error for ClassifyErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ml(e) => Some(e),
            Self::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for ClassifyErr {
    fn from(e: MlErr) -> Self {
        Self::Ml(e)
    }
}

impl From<minijinja::Error> for ClassifyErr {
    fn from(e: minijinja::Error) -> Self {
        Self::Render(e)
    }
}
