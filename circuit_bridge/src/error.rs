// circuit_bridge/src/error.rs
use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use bellman::SynthesisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed circuit description: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("circuit has no gates")]
    EmptyCircuit,
    #[error("circuit has {count} gates, limit is {limit}")]
    TooManyGates { count: usize, limit: usize },
    #[error("circuit description exceeds {limit} bytes")]
    DescriptionTooLarge { limit: u64 },
    #[error("wire names must not be empty")]
    EmptyWireName,
    #[error("input wire `{0}` is never used")]
    UnusedWire(String),
    #[error("undefined wire `{0}`")]
    UndefinedWire(String),
    #[error("wire `{0}` is defined more than once")]
    DuplicateWire(String),
    #[error("invalid field element `{0}`")]
    FieldElement(String),
    #[error("constraint `{0}` is not satisfied")]
    Unsatisfied(String),
    #[error("synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("proof did not verify")]
    Verification,
    #[error("null path pointer with length {0}")]
    NullPath(usize),
    #[error("path is not valid utf-8: {0}")]
    PathEncoding(#[from] Utf8Error),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
