use ethers::types::H256;
use thiserror::Error;

/// Result alias used across the client library
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("{contract} has not been deployed to network {network}")]
    NotDeployed { contract: String, network: String },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("Transaction {tx_hash:?} reverted")]
    Reverted { tx_hash: H256 },

    #[error("Transaction {tx_hash:?} dropped before it was mined")]
    Dropped { tx_hash: H256 },

    #[error("Unit conversion error: {0}")]
    Conversion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Call task failed: {0}")]
    Task(String),
}

impl From<ethers::utils::ConversionError> for ClientError {
    fn from(err: ethers::utils::ConversionError) -> Self {
        ClientError::Conversion(err.to_string())
    }
}

impl From<ethers::providers::ProviderError> for ClientError {
    fn from(err: ethers::providers::ProviderError) -> Self {
        ClientError::Provider(err.to_string())
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ClientError {
    fn from(err: tokio::task::JoinError) -> Self {
        ClientError::Task(err.to_string())
    }
}
