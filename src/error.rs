// src/error.rs
use alloy::primitives::Address;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the environment or local files, raised before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("{var} is not a valid address: '{value}'")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var} is not a valid {expected}: '{value}'")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("contract schema not found at {}", .path.display())]
    SchemaMissing { path: PathBuf },

    #[error("failed to read contract schema {}: {source}", .path.display())]
    SchemaRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("contract schema {} is not valid ABI JSON: {source}", .path.display())]
    SchemaInvalid {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("contract schema does not declare {method}()")]
    SchemaIncomplete { method: &'static str },
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("RPC node unreachable: {0}")]
    Unreachable(#[source] LedgerError),

    #[error("RPC node is on chain {actual}, expected {expected}")]
    WrongChain { expected: u64, actual: u64 },
}

/// Raw failure from the ledger client.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Transport(#[from] alloy::transports::TransportError),

    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),
}

#[derive(Debug, Error)]
pub enum CallError {
    #[error("{method}() on token {token} failed: {source}")]
    Failed {
        token: Address,
        method: &'static str,
        source: LedgerError,
    },

    #[error("{method}() on token {token} returned {found}, expected {expected}")]
    UnexpectedOutput {
        token: Address,
        method: &'static str,
        expected: &'static str,
        found: String,
    },
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request for {token} failed: {source}")]
    Http {
        token: Address,
        source: reqwest::Error,
    },

    #[error("quote API returned HTTP {status} for {token}: {message}")]
    Status {
        token: Address,
        status: StatusCode,
        message: String,
    },

    #[error("quote response for {token} is not valid JSON: {source}")]
    Decode {
        token: Address,
        source: serde_json::Error,
    },

    #[error("quote response for {token} has no {field} field")]
    MissingField { token: Address, field: &'static str },

    #[error("quote response for {token} has non-decimal amount '{value}'")]
    InvalidAmount { token: Address, value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
