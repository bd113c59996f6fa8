use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    Io(io::Error),
    Csv(csv::Error),
    MissingColumn {
        name: &'static str,
    },
    InvalidRecord {
        line: u64,
        column: &'static str,
        value: String,
    },
    InvalidMeasurement {
        field: &'static str,
        value: String,
    },
    EmptyDataset,
    TooFewClasses {
        got: usize,
    },
    UnknownLabel {
        label: String,
    },
    UnknownCode {
        code: usize,
    },
    UnknownCategory {
        column: usize,
        value: f64,
    },
    NonFinite {
        column: usize,
        value: f64,
    },
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    NotFitted {
        stage: &'static str,
    },
    InvalidSpec(String),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::Io(e) => write!(f, "io error: {e}"),
            MlErr::Csv(e) => write!(f, "csv error: {e}"),
            MlErr::MissingColumn { name } => {
                write!(f, "the dataset has no column named {name:?}")
            }
            MlErr::InvalidRecord {
                line,
                column,
                value,
            } => write!(
                f,
                "line {line}: column {column:?} holds {value:?}, which is not a number"
            ),
            MlErr::InvalidMeasurement { field, value } => {
                write!(f, "measurement {field} = {value:?} is not a number")
            }
            MlErr::EmptyDataset => write!(f, "no complete rows left to fit on"),
            MlErr::TooFewClasses { got } => {
                write!(f, "a classifier needs at least two classes, got {got}")
            }
            MlErr::UnknownLabel { label } => write!(f, "unknown label {label:?}"),
            MlErr::UnknownCode { code } => write!(f, "no label is encoded as {code}"),
            MlErr::UnknownCategory { column, value } => {
                write!(f, "value {value} of column {column} was not seen while fitting")
            }
            MlErr::NonFinite { column, value } => {
                write!(f, "column {column} holds {value}, only finite values or NaN are accepted")
            }
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::NotFitted { stage } => write!(f, "{stage} was used before being fitted"),
            MlErr::InvalidSpec(msg) => write!(f, "invalid pipeline spec: {msg}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            MlErr::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for MlErr {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}
