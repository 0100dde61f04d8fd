//! The seam between the gateway and the chain.
//!
//! The gateway never talks to a node directly. It builds a [`RemoteCall`] and hands it to
//! whatever [`ChainClient`] it was constructed with: the JSON-RPC client in production,
//! an in-memory recorder in tests.

use crate::error::ChainResult;
use crate::records::FormKind;
use async_trait::async_trait;
use chrono::NaiveDate;
use medchain_types::{Address, NonEmptyText};
use serde::{Deserialize, Serialize};

/// Which deployed contract an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Hospital,
    Patient,
    Records,
}

/// The three state-mutating operations exposed by the deployed contracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    StoreHospitalDetails,
    StorePatientDetails,
    CreateMedicalRecord,
}

impl RemoteOperation {
    /// Contract method name.
    pub fn name(self) -> &'static str {
        match self {
            RemoteOperation::StoreHospitalDetails => "storeHospitalDetails",
            RemoteOperation::StorePatientDetails => "storePatientDetails",
            RemoteOperation::CreateMedicalRecord => "createMedicalRecord",
        }
    }

    pub fn contract(self) -> ContractKind {
        match self {
            RemoteOperation::StoreHospitalDetails => ContractKind::Hospital,
            RemoteOperation::StorePatientDetails => ContractKind::Patient,
            RemoteOperation::CreateMedicalRecord => ContractKind::Records,
        }
    }

    pub fn form(self) -> FormKind {
        match self {
            RemoteOperation::StoreHospitalDetails => FormKind::Hospital,
            RemoteOperation::StorePatientDetails => FormKind::Patient,
            RemoteOperation::CreateMedicalRecord => FormKind::MedicalRecord,
        }
    }

    /// Solidity parameter types, in positional order.
    pub fn param_types(self) -> &'static [&'static str] {
        match self {
            RemoteOperation::StoreHospitalDetails => &["string", "string", "string", "string"],
            RemoteOperation::StorePatientDetails => &[
                "string", "string", "uint256", "string", "string", "string", "string", "string",
                "string", "string",
            ],
            RemoteOperation::CreateMedicalRecord => &["string"],
        }
    }

    /// Canonical signature used to derive the function selector,
    /// e.g. `createMedicalRecord(string)`.
    pub fn signature(self) -> String {
        format!("{}({})", self.name(), self.param_types().join(","))
    }
}

impl std::fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One positional argument of a remote call.
#[derive(Clone, Debug, PartialEq)]
pub enum CallArg {
    Text(String),
    Uint(u64),
    /// Sent as its decimal text; the contracts have no floating point type.
    Decimal(f64),
    /// Sent as ISO `YYYY-MM-DD` text.
    Date(NaiveDate),
}

impl CallArg {
    pub fn text(value: &NonEmptyText) -> Self {
        CallArg::Text(value.as_str().to_owned())
    }

    pub fn abi_type(&self) -> &'static str {
        match self {
            CallArg::Uint(_) => "uint256",
            CallArg::Text(_) | CallArg::Decimal(_) | CallArg::Date(_) => "string",
        }
    }
}

impl std::fmt::Display for CallArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallArg::Text(s) => f.write_str(s),
            CallArg::Uint(n) => write!(f, "{n}"),
            CallArg::Decimal(x) => write!(f, "{x}"),
            CallArg::Date(d) => write!(f, "{}", d.format(crate::constants::ADMISSION_DATE_FORMAT)),
        }
    }
}

/// A fully resolved remote write, ready for a [`ChainClient`].
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteCall {
    pub operation: RemoteOperation,
    pub contract: Address,
    /// Authorizing principal.
    pub from: Address,
    pub args: Vec<CallArg>,
}

/// Proof that a remote write settled successfully.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: String,
    pub block_number: Option<u64>,
}

/// Access to the accounts and write path of a chain node.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Accounts the node will sign for, in the node's preferred order.
    async fn accounts(&self) -> ChainResult<Vec<Address>>;

    /// Submit `call` and wait until it settles.
    async fn send_transaction(&self, call: &RemoteCall) -> ChainResult<Receipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_list_parameter_types() {
        assert_eq!(
            RemoteOperation::StoreHospitalDetails.signature(),
            "storeHospitalDetails(string,string,string,string)"
        );
        assert_eq!(
            RemoteOperation::CreateMedicalRecord.signature(),
            "createMedicalRecord(string)"
        );
        assert_eq!(RemoteOperation::StorePatientDetails.param_types().len(), 10);
    }

    #[test]
    fn operations_target_their_own_contract() {
        assert_eq!(RemoteOperation::StoreHospitalDetails.contract(), ContractKind::Hospital);
        assert_eq!(RemoteOperation::StorePatientDetails.contract(), ContractKind::Patient);
        assert_eq!(RemoteOperation::CreateMedicalRecord.contract(), ContractKind::Records);
        for form in FormKind::ALL {
            assert_eq!(form.operation().form(), form);
        }
    }

    #[test]
    fn decimals_and_dates_render_as_text() {
        assert_eq!(CallArg::Decimal(61.0).to_string(), "61");
        assert_eq!(CallArg::Decimal(170.5).to_string(), "170.5");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        assert_eq!(CallArg::Date(date).to_string(), "2024-03-01");
        assert_eq!(CallArg::Date(date).abi_type(), "string");
        assert_eq!(CallArg::Uint(3).abi_type(), "uint256");
    }
}
