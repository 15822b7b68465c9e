use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("index {index} out of bounds for set of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("cursor is exhausted")]
    Exhausted,
    #[error("invalid skip set config: {0}")]
    InvalidConfig(String),
}
