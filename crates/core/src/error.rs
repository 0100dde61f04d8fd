use crate::records::FormKind;
use medchain_types::AddressError;
use std::time::Duration;

/// Local failure while reading a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("field `{0}` is required")]
    MissingField(&'static str),
    #[error("field `{field}` must be {expected}, got {value:?}")]
    InvalidNumber {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("field `{field}` must be one of M, F or other, got {value:?}")]
    InvalidGender { field: &'static str, value: String },
    #[error("field `{field}` must be a date in YYYY-MM-DD form, got {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

/// Failure reported by a [`crate::client::ChainClient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("{0}")]
    Rejected(String),
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },
    #[error("invalid response from node: {0}")]
    InvalidResponse(String),
}

pub type ChainResult<T> = std::result::Result<T, ChainError>;

/// Every way a submission can fail, one variant per user-visible category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid form input: {0}")]
    Intake(#[from] IntakeError),
    #[error("no authorised account: {0}")]
    Unauthenticated(String),
    #[error("remote call rejected: {0}")]
    Rejected(String),
    #[error("remote call failed: {0}")]
    Transport(String),
    #[error("remote call did not settle within {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("a {0} submission is already in progress")]
    InFlight(FormKind),
}

impl From<ChainError> for GatewayError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Rejected(reason) => GatewayError::Rejected(reason),
            ChainError::Reverted { tx_hash } => {
                GatewayError::Rejected(format!("transaction {tx_hash} reverted"))
            }
            ChainError::Transport(msg) => GatewayError::Transport(msg),
            ChainError::InvalidResponse(msg) => {
                GatewayError::Transport(format!("invalid response from node: {msg}"))
            }
        }
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Startup configuration failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not set")]
    Missing { key: &'static str },
    #[error("{key} cannot be empty")]
    Empty { key: &'static str },
    #[error("{key} is not a valid address: {source}")]
    InvalidAddress {
        key: &'static str,
        #[source]
        source: AddressError,
    },
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
