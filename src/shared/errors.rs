//! Error handling for the application

use thiserror::Error;

/// Errors returned by the swap contract collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Contract reverted: {0}")]
    Reverted(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Token not supported by contract: {0}")]
    UnsupportedToken(String),

    #[error("Identical tokens: {0}")]
    IdenticalTokens(String),

    #[error("Transaction deadline expired")]
    DeadlineExpired,

    #[error("Insufficient output amount: expected {expected}, minimum {minimum}")]
    InsufficientOutput { expected: u128, minimum: u128 },

    #[error("Arithmetic overflow")]
    Overflow,
}

/// Wallet session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Connection rejected: {0}")]
    Rejected(String),
}

/// Swap form and submission errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Amount {amount} has more than {decimals} decimal places")]
    AmountPrecision { amount: String, decimals: u8 },

    #[error("Wallet not connected")]
    WalletDisconnected,

    #[error("Swap has not been simulated")]
    NotSimulated,

    #[error("A swap submission is already in flight")]
    SubmissionInFlight,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Swap error: {0}")]
    Swap(#[from] SwapError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
