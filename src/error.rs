use thiserror::Error;

use crate::amount::AmountError;

/// SDK Error type
#[derive(Error, Debug)]
pub enum Error {
    /// RPC/provider error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Amount parsing error
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),

    /// Requested action is not permitted in the current state
    #[error("Ineligible action: {0}")]
    Ineligible(String),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Tx(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
