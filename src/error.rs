use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access record {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode record {record}: {source}")]
    Json {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record {0} is not writable")]
    ReadOnly(&'static str),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown mode: {0}")]
pub struct UnknownMode(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown character: {0}")]
pub struct UnknownCharacter(pub String);
