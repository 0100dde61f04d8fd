//! Turns a settled submission into the single notice shown to the user.

use crate::client::Receipt;
use crate::error::{GatewayError, GatewayResult};
use crate::records::FormKind;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

/// User-visible failure categories, one per [`GatewayError`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    InvalidInput,
    Unauthenticated,
    Rejected,
    Transport,
    Timeout,
    InFlight,
}

impl From<&GatewayError> for FailureCategory {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::Intake(_) => FailureCategory::InvalidInput,
            GatewayError::Unauthenticated(_) => FailureCategory::Unauthenticated,
            GatewayError::Rejected(_) => FailureCategory::Rejected,
            GatewayError::Transport(_) => FailureCategory::Transport,
            GatewayError::Timeout(_) => FailureCategory::Timeout,
            GatewayError::InFlight(_) => FailureCategory::InFlight,
        }
    }
}

/// The outcome of one submission as presented to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub outcome: Outcome,
    pub form: FormKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FailureCategory>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

impl Notice {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

fn success_message(form: FormKind) -> &'static str {
    match form {
        FormKind::Hospital => "Hospital added successfully!",
        FormKind::Patient => "Patient added successfully!",
        FormKind::MedicalRecord => "Medical record created successfully!",
    }
}

fn failure_message(form: FormKind, err: &GatewayError) -> String {
    match err {
        GatewayError::Intake(e) => format!("Could not read the {form} form: {e}."),
        GatewayError::Unauthenticated(reason) => {
            format!("No authorised account is available ({reason}). Unlock an account and try again.")
        }
        GatewayError::Rejected(reason) => {
            format!("The {form} submission was rejected: {reason}")
        }
        GatewayError::Transport(reason) => {
            format!("The {form} submission could not reach the network: {reason}")
        }
        GatewayError::Timeout(after) => format!(
            "The {form} submission was not confirmed within {}s. Check the network before retrying.",
            after.as_secs()
        ),
        GatewayError::InFlight(_) => {
            format!("A {form} submission is already in progress. Wait for it to finish.")
        }
    }
}

/// Build the notice for a settled submission of `form`.
pub fn report(form: FormKind, result: &GatewayResult<Receipt>) -> Notice {
    match result {
        Ok(receipt) => Notice {
            outcome: Outcome::Success,
            form,
            category: None,
            message: success_message(form).to_string(),
            transaction_hash: Some(receipt.transaction_hash.clone()),
        },
        Err(err) => Notice {
            outcome: Outcome::Failure,
            form,
            category: Some(err.into()),
            message: failure_message(form, err),
            transaction_hash: None,
        },
    }
}
