//! Patient registration, editing and summaries.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, info_span};

use super::{Clinic, ClinicError, ClinicResult, PatientSummary};
use crate::intake::{
    add_tests, build_order, next_folio, reassign_lab, remove_tests, resolve_age, TestSelection,
};
use crate::models::{Patient, Sex, TIMESTAMP_FORMAT};

/// Data captured when registering a patient.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub name: String,
    /// YYYY-MM-DD; takes precedence over `manual_age`
    pub birth_date: Option<String>,
    pub manual_age: Option<String>,
    pub sex: Sex,
    pub diagnosis: String,
    pub physician: String,
    pub tests: Vec<TestSelection>,
}

/// Changes to an existing patient. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientEdit {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub manual_age: Option<String>,
    pub sex: Option<Sex>,
    pub diagnosis: Option<String>,
    pub physician: Option<String>,
    /// Tests to add; keys already on the order are skipped
    pub add_tests: Vec<TestSelection>,
    /// Keys to remove from the order
    pub remove_tests: Vec<String>,
    /// Ordered tests to route to another lab
    pub reassign: Vec<TestSelection>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Clinic<'_> {
    pub fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        Ok(self.store.list_patients()?)
    }

    /// Get a patient or fail with `PatientNotFound`.
    pub fn patient(&self, folio: &str) -> ClinicResult<Patient> {
        self.store
            .get_patient(folio)?
            .ok_or_else(|| ClinicError::PatientNotFound(folio.to_string()))
    }

    /// Register a patient with a freshly generated folio.
    pub fn register_patient(&self, new: NewPatient, now: NaiveDateTime) -> ClinicResult<Patient> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(ClinicError::InvalidInput("patient name is empty".to_string()));
        }
        let birth_date = non_empty(new.birth_date);
        let age = resolve_age(birth_date.as_deref(), new.manual_age.as_deref(), now.date())?;

        let tests = self.store.list_tests()?;
        let prices = self.store.price_catalog()?;
        let order = build_order(&tests, &prices, &new.tests)?;

        let folios = self.store.list_folios()?;
        let folio = next_folio(folios.iter().map(String::as_str), now.date());
        let _span = info_span!("register", %folio).entered();

        let patient = Patient {
            folio,
            name,
            birth_date,
            age,
            sex: new.sex,
            diagnosis: new.diagnosis.trim().to_string(),
            physician: new.physician.trim().to_string(),
            registered_at: now.format(TIMESTAMP_FORMAT).to_string(),
            tests: order,
        };
        self.store.insert_patient(&patient)?;
        info!(tests = patient.tests.len(), "registration complete");
        Ok(patient)
    }

    /// Apply an edit to a patient and its order.
    pub fn edit_patient(
        &self,
        folio: &str,
        edit: PatientEdit,
        today: NaiveDate,
    ) -> ClinicResult<Patient> {
        let mut patient = self.patient(folio)?;

        if let Some(name) = non_empty(edit.name) {
            patient.name = name;
        }
        if let Some(sex) = edit.sex {
            patient.sex = sex;
        }
        if let Some(diagnosis) = edit.diagnosis {
            patient.diagnosis = diagnosis.trim().to_string();
        }
        if let Some(physician) = edit.physician {
            patient.physician = physician.trim().to_string();
        }
        if let Some(birth_date) = non_empty(edit.birth_date) {
            patient.age = resolve_age(Some(&birth_date), None, today)?;
            patient.birth_date = Some(birth_date);
        } else if let Some(manual_age) = edit.manual_age {
            patient.birth_date = None;
            patient.age = resolve_age(None, Some(&manual_age), today)?;
        }

        let removed = remove_tests(&mut patient.tests, &edit.remove_tests);
        let tests = self.store.list_tests()?;
        let prices = self.store.price_catalog()?;
        let added = add_tests(&mut patient.tests, &tests, &prices, &edit.add_tests)?;
        for selection in &edit.reassign {
            if !reassign_lab(&mut patient.tests, &prices, &selection.key, selection.lab) {
                return Err(ClinicError::TestNotFound(selection.key.clone()));
            }
        }

        self.store.update_patient(&patient)?;
        info!(folio, added, removed, "patient edited");
        Ok(patient)
    }

    /// Delete a patient together with its results.
    pub fn delete_patient(&self, folio: &str) -> ClinicResult<()> {
        if self.store.delete_patient(folio)? {
            Ok(())
        } else {
            Err(ClinicError::PatientNotFound(folio.to_string()))
        }
    }

    /// Financial summary of a patient's order, priced with the live catalog.
    pub fn summary(&self, folio: &str) -> ClinicResult<PatientSummary> {
        let patient = self.patient(folio)?;
        let prices = self.store.price_catalog()?;
        Ok(PatientSummary::build(&patient, &prices, self.config.cost_policy))
    }
}
