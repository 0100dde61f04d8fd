//! Form intake.
//!
//! Turns the raw name/value pairs of a submitted form into a typed record. Text fields are
//! only checked for presence; `age`, `height`, `weight`, `gender` and the admission date are
//! coerced to their types. Anything else about the values (uniqueness, formats, whether a
//! patient exists) is left to the contracts.

use crate::constants::*;
use crate::error::IntakeError;
use crate::records::{
    FormKind, Gender, HospitalRecord, MedicalRecordRequest, PatientRecord, SubmissionRecord,
};
use chrono::NaiveDate;
use medchain_types::NonEmptyText;
use serde::Deserialize;
use std::collections::HashMap;

/// Raw field values of one submitted form, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    fn required(&self, field: &'static str) -> Result<NonEmptyText, IntakeError> {
        self.get(field)
            .and_then(|value| NonEmptyText::new(value).ok())
            .ok_or(IntakeError::MissingField(field))
    }

    fn age(&self, field: &'static str) -> Result<u32, IntakeError> {
        let raw = self.required(field)?;
        raw.as_str()
            .parse::<u32>()
            .map_err(|_| IntakeError::InvalidNumber {
                field,
                expected: "a whole number",
                value: raw.into_inner(),
            })
    }

    fn measurement(&self, field: &'static str) -> Result<f64, IntakeError> {
        let raw = self.required(field)?;
        match raw.as_str().parse::<f64>() {
            Ok(value) => check_measurement(field, value),
            Err(_) => Err(invalid_measurement(field, raw.into_inner())),
        }
    }

    fn gender(&self, field: &'static str) -> Result<Gender, IntakeError> {
        let raw = self.required(field)?;
        raw.as_str()
            .parse::<Gender>()
            .map_err(|_| IntakeError::InvalidGender {
                field,
                value: raw.into_inner(),
            })
    }

    fn date(&self, field: &'static str) -> Result<NaiveDate, IntakeError> {
        let raw = self.required(field)?;
        NaiveDate::parse_from_str(raw.as_str(), ADMISSION_DATE_FORMAT).map_err(|_| {
            IntakeError::InvalidDate {
                field,
                value: raw.into_inner(),
            }
        })
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Check a height or weight already parsed as a number: it must be finite and not
/// negative.
pub fn check_measurement(field: &'static str, value: f64) -> Result<f64, IntakeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid_measurement(field, value.to_string()))
    }
}

fn invalid_measurement(field: &'static str, value: String) -> IntakeError {
    IntakeError::InvalidNumber {
        field,
        expected: "a non-negative number",
        value,
    }
}

pub fn read_hospital(fields: &FormFields) -> Result<HospitalRecord, IntakeError> {
    Ok(HospitalRecord {
        id: fields.required(HOSPITAL_ID_FIELD)?,
        name: fields.required(HOSPITAL_NAME_FIELD)?,
        address: fields.required(HOSPITAL_ADDRESS_FIELD)?,
        specialization: fields.required(HOSPITAL_SPEC_FIELD)?,
    })
}

pub fn read_patient(fields: &FormFields) -> Result<PatientRecord, IntakeError> {
    Ok(PatientRecord {
        id: fields.required(PATIENT_ID_FIELD)?,
        name: fields.required(PATIENT_NAME_FIELD)?,
        age: fields.age(PATIENT_AGE_FIELD)?,
        gender: fields.gender(PATIENT_GENDER_FIELD)?,
        height: fields.measurement(PATIENT_HEIGHT_FIELD)?,
        weight: fields.measurement(PATIENT_WEIGHT_FIELD)?,
        address: fields.required(PATIENT_ADDRESS_FIELD)?,
        phone: fields.required(PATIENT_PHONE_FIELD)?,
        email: fields.required(PATIENT_EMAIL_FIELD)?,
        admission_date: fields.date(PATIENT_DATE_FIELD)?,
    })
}

pub fn read_medical_record(fields: &FormFields) -> Result<MedicalRecordRequest, IntakeError> {
    Ok(MedicalRecordRequest {
        patient_id: fields.required(RECORD_ID_FIELD)?,
    })
}

/// Read whichever record `form` describes.
pub fn read_form(form: FormKind, fields: &FormFields) -> Result<SubmissionRecord, IntakeError> {
    Ok(match form {
        FormKind::Hospital => read_hospital(fields)?.into(),
        FormKind::Patient => read_patient(fields)?.into(),
        FormKind::MedicalRecord => read_medical_record(fields)?.into(),
    })
}
