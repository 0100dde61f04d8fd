//! # MedChain Core
//!
//! The write-path submission gateway.
//!
//! A submitted form flows through four stages:
//! - [`intake`] reads the raw field values into a typed record
//! - [`account`] resolves the account that authorizes the write
//! - [`dispatcher`] issues exactly one remote operation per submission, one submission per
//!   form at a time, bounded by a timeout
//! - [`reporter`] turns the settled result into a single user-visible [`Notice`]
//!
//! **No transport concerns**: the chain is reached through the [`ChainClient`] trait. The
//! JSON-RPC implementation lives in `medchain-rpc`; HTTP and CLI surfaces live in
//! `api-rest` and `medchain-cli`.

pub mod account;
pub mod client;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod intake;
pub mod records;
pub mod reporter;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{CallArg, ChainClient, ContractKind, Receipt, RemoteCall, RemoteOperation};
pub use config::{ContractAddresses, GatewayConfig};
pub use dispatcher::SubmissionGateway;
pub use error::{
    ChainError, ChainResult, ConfigError, ConfigResult, GatewayError, GatewayResult, IntakeError,
};
pub use intake::FormFields;
pub use records::{
    FormKind, Gender, HospitalRecord, MedicalRecordRequest, PatientRecord, SubmissionRecord,
};
pub use reporter::{report, FailureCategory, Notice, Outcome};

pub use medchain_types::{Address, NonEmptyText};
