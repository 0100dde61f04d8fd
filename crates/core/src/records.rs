//! The three record shapes the gateway submits.
//!
//! Records are built once from form input, handed to the gateway and dropped after
//! submission. Identifiers are caller-supplied; the remote contracts alone decide whether
//! they are unique or refer to anything, so nothing here cross-checks one record against
//! another.

use crate::client::{CallArg, RemoteOperation};
use chrono::NaiveDate;
use medchain_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifies one of the three independent submission forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Hospital,
    Patient,
    MedicalRecord,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [FormKind::Hospital, FormKind::Patient, FormKind::MedicalRecord];

    /// The single remote operation a submission of this form dispatches.
    pub fn operation(self) -> RemoteOperation {
        match self {
            FormKind::Hospital => RemoteOperation::StoreHospitalDetails,
            FormKind::Patient => RemoteOperation::StorePatientDetails,
            FormKind::MedicalRecord => RemoteOperation::CreateMedicalRecord,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            FormKind::Hospital => 0,
            FormKind::Patient => 1,
            FormKind::MedicalRecord => 2,
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FormKind::Hospital => "hospital",
            FormKind::Patient => "patient",
            FormKind::MedicalRecord => "medical record",
        };
        f.write_str(label)
    }
}

/// Patient gender as accepted by the patient contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "other")]
    Other,
}

impl Gender {
    /// Value passed to the contract.
    pub fn as_wire(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "other",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("unknown gender {s:?}")),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HospitalRecord {
    pub id: NonEmptyText,
    pub name: NonEmptyText,
    pub address: NonEmptyText,
    pub specialization: NonEmptyText,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatientRecord {
    pub id: NonEmptyText,
    pub name: NonEmptyText,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub address: NonEmptyText,
    pub phone: NonEmptyText,
    pub email: NonEmptyText,
    pub admission_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MedicalRecordRequest {
    pub patient_id: NonEmptyText,
}

/// A record ready for dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionRecord {
    Hospital(HospitalRecord),
    Patient(PatientRecord),
    MedicalRecord(MedicalRecordRequest),
}

impl SubmissionRecord {
    pub fn form(&self) -> FormKind {
        match self {
            SubmissionRecord::Hospital(_) => FormKind::Hospital,
            SubmissionRecord::Patient(_) => FormKind::Patient,
            SubmissionRecord::MedicalRecord(_) => FormKind::MedicalRecord,
        }
    }

    pub fn operation(&self) -> RemoteOperation {
        self.form().operation()
    }

    /// Positional arguments for the remote operation, in contract order.
    pub fn arguments(&self) -> Vec<CallArg> {
        match self {
            SubmissionRecord::Hospital(h) => vec![
                CallArg::text(&h.id),
                CallArg::text(&h.name),
                CallArg::text(&h.address),
                CallArg::text(&h.specialization),
            ],
            SubmissionRecord::Patient(p) => vec![
                CallArg::text(&p.id),
                CallArg::text(&p.name),
                CallArg::Uint(u64::from(p.age)),
                CallArg::Text(p.gender.as_wire().to_owned()),
                CallArg::Decimal(p.height),
                CallArg::Decimal(p.weight),
                CallArg::text(&p.address),
                CallArg::text(&p.phone),
                CallArg::text(&p.email),
                CallArg::Date(p.admission_date),
            ],
            SubmissionRecord::MedicalRecord(r) => vec![CallArg::text(&r.patient_id)],
        }
    }
}

impl From<HospitalRecord> for SubmissionRecord {
    fn from(record: HospitalRecord) -> Self {
        SubmissionRecord::Hospital(record)
    }
}

impl From<PatientRecord> for SubmissionRecord {
    fn from(record: PatientRecord) -> Self {
        SubmissionRecord::Patient(record)
    }
}

impl From<MedicalRecordRequest> for SubmissionRecord {
    fn from(record: MedicalRecordRequest) -> Self {
        SubmissionRecord::MedicalRecord(record)
    }
}
