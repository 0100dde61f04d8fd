//! Constants used throughout the MedChain core crate.
//!
//! Form field names match the `name` attributes of the three submission forms, and the
//! environment keys are the ones read by [`crate::config::GatewayConfig::from_lookup`].

/// Default JSON-RPC endpoint when none is configured (a local development node).
pub const DEFAULT_RPC_URL: &str = "http://localhost:7545";

/// Default bound on a single remote interaction, in seconds.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 60;

/// Default interval between transaction receipt polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

pub const ENV_RPC_URL: &str = "MEDCHAIN_RPC_URL";
pub const ENV_HOSPITAL_CONTRACT: &str = "HOSPITAL_CONTRACT_ADDRESS";
pub const ENV_PATIENT_CONTRACT: &str = "PATIENT_CONTRACT_ADDRESS";
pub const ENV_RECORDS_CONTRACT: &str = "RECORDS_CONTRACT_ADDRESS";
pub const ENV_CALL_TIMEOUT_SECS: &str = "MEDCHAIN_CALL_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_MS: &str = "MEDCHAIN_POLL_INTERVAL_MS";
pub const ENV_FROM_ACCOUNT: &str = "MEDCHAIN_FROM_ACCOUNT";

// Hospital form.
pub const HOSPITAL_ID_FIELD: &str = "hospital-id";
pub const HOSPITAL_NAME_FIELD: &str = "hospital-name";
pub const HOSPITAL_ADDRESS_FIELD: &str = "hospital-address";
pub const HOSPITAL_SPEC_FIELD: &str = "hospital-spec";

// Patient form.
pub const PATIENT_ID_FIELD: &str = "patient-id";
pub const PATIENT_NAME_FIELD: &str = "patient-name";
pub const PATIENT_AGE_FIELD: &str = "patient-age";
pub const PATIENT_GENDER_FIELD: &str = "patient-gender";
pub const PATIENT_HEIGHT_FIELD: &str = "patient-height";
pub const PATIENT_WEIGHT_FIELD: &str = "patient-weight";
pub const PATIENT_ADDRESS_FIELD: &str = "patient-address";
pub const PATIENT_PHONE_FIELD: &str = "patient-phone";
pub const PATIENT_EMAIL_FIELD: &str = "patient-email";
pub const PATIENT_DATE_FIELD: &str = "patient-date";

// Medical record form.
pub const RECORD_ID_FIELD: &str = "record-id";

/// Format of the admission date, as produced by an HTML date input.
pub const ADMISSION_DATE_FORMAT: &str = "%Y-%m-%d";
