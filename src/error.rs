use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Missing required field {field:?}")]
    MissingField { field: &'static str },

    #[error("Unparsable timestamp {value:?} in field {field:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("Invalid coordinate {value:?} in field {field:?}")]
    InvalidCoordinate { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not open {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed trip CSV")]
    Csv(#[from] csv::Error),

    #[error("Malformed station feed")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Time filter {0:?} is neither \"any\", a minute of the day, nor HH:MM")]
    Unrecognized(String),

    #[error("Time filter {0:?} is outside of the day")]
    OutOfDay(String),
}
