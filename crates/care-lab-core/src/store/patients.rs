//! Patient collection operations.

use tracing::info;

use super::{Collection, Store, StoreError, StoreResult};
use crate::models::{Patient, TestResult};

impl Store {
    /// List all patients in registration order.
    pub fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        self.load(Collection::Patients)
    }

    /// Get a patient by folio.
    pub fn get_patient(&self, folio: &str) -> StoreResult<Option<Patient>> {
        Ok(self
            .list_patients()?
            .into_iter()
            .find(|p| p.folio == folio))
    }

    /// Insert a new patient. Fails if the folio is already taken.
    pub fn insert_patient(&self, patient: &Patient) -> StoreResult<()> {
        let mut patients: Vec<Patient> = self.load_for_update(Collection::Patients)?;
        if patients.iter().any(|p| p.folio == patient.folio) {
            return Err(StoreError::Constraint(format!(
                "folio {} already exists",
                patient.folio
            )));
        }
        patients.push(patient.clone());
        self.save(Collection::Patients, &patients)?;
        info!(folio = %patient.folio, "patient registered");
        Ok(())
    }

    /// Replace an existing patient in place.
    pub fn update_patient(&self, patient: &Patient) -> StoreResult<bool> {
        let mut patients: Vec<Patient> = self.load_for_update(Collection::Patients)?;
        let Some(slot) = patients.iter_mut().find(|p| p.folio == patient.folio) else {
            return Ok(false);
        };
        *slot = patient.clone();
        self.save(Collection::Patients, &patients)?;
        info!(folio = %patient.folio, "patient updated");
        Ok(true)
    }

    /// Delete a patient and every result recorded under its folio.
    ///
    /// Both collections are checked before either is written. The two
    /// rewrites are still independent; there is no atomicity between them.
    pub fn delete_patient(&self, folio: &str) -> StoreResult<bool> {
        let mut patients: Vec<Patient> = self.load_for_update(Collection::Patients)?;
        let before = patients.len();
        patients.retain(|p| p.folio != folio);
        if patients.len() == before {
            return Ok(false);
        }
        self.load_for_update::<TestResult>(Collection::Results)?;
        self.save(Collection::Patients, &patients)?;
        let removed_results = self.delete_results_for(folio)?;
        info!(folio, removed_results, "patient deleted");
        Ok(true)
    }

    /// Folios currently stored.
    pub fn list_folios(&self) -> StoreResult<Vec<String>> {
        Ok(self.list_patients()?.into_iter().map(|p| p.folio).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lab, OrderedTest, Sex, TestResult};

    fn setup_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    fn patient(folio: &str, name: &str) -> Patient {
        Patient {
            folio: folio.into(),
            name: name.into(),
            birth_date: Some("1985-03-10".into()),
            age: 40,
            sex: Sex::Male,
            diagnosis: "Control".into(),
            physician: "Dra. Méndez".into(),
            registered_at: "2025-06-01 08:00:00".into(),
            tests: vec![OrderedTest {
                key: "GLU".into(),
                name: "Glucosa".into(),
                price: 120.0,
                processed_at: Lab::Matriz,
            }],
        }
    }

    fn result(folio: &str, key: &str) -> TestResult {
        TestResult {
            folio: folio.into(),
            key: key.into(),
            name: key.into(),
            value: "90".into(),
            unit: "mg/dL".into(),
            normal_range: "70-110".into(),
            recorded_at: "2025-06-01 12:00:00".into(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let (_dir, store) = setup_store();
        store.insert_patient(&patient("250601001", "Luis Pérez")).unwrap();

        let retrieved = store.get_patient("250601001").unwrap().unwrap();
        assert_eq!(retrieved.name, "Luis Pérez");
        assert_eq!(retrieved.tests.len(), 1);
        assert!(store.get_patient("250601002").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_folio_rejected() {
        let (_dir, store) = setup_store();
        store.insert_patient(&patient("250601001", "Luis")).unwrap();
        let err = store.insert_patient(&patient("250601001", "Otro")).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[test]
    fn test_update_patient() {
        let (_dir, store) = setup_store();
        let mut p = patient("250601001", "Luis");
        store.insert_patient(&p).unwrap();

        p.diagnosis = "Diabetes tipo 2".into();
        assert!(store.update_patient(&p).unwrap());
        assert!(!store.update_patient(&patient("250601009", "Nadie")).unwrap());

        let retrieved = store.get_patient("250601001").unwrap().unwrap();
        assert_eq!(retrieved.diagnosis, "Diabetes tipo 2");
    }

    #[test]
    fn test_delete_cascades_to_results() {
        let (_dir, store) = setup_store();
        store.insert_patient(&patient("250601001", "Luis")).unwrap();
        store.insert_patient(&patient("250601002", "Ana")).unwrap();
        store.upsert_result(&result("250601001", "GLU")).unwrap();
        store.upsert_result(&result("250601001", "CRE")).unwrap();
        store.upsert_result(&result("250601002", "GLU")).unwrap();

        assert!(store.delete_patient("250601001").unwrap());

        assert!(store.get_patient("250601001").unwrap().is_none());
        assert!(store.results_for("250601001").unwrap().is_empty());
        assert_eq!(store.results_for("250601002").unwrap().len(), 1);
        assert!(!store.delete_patient("250601001").unwrap());
    }

    #[test]
    fn test_hand_edited_record_survives_insert() {
        let (_dir, store) = setup_store();
        std::fs::write(
            store.path_of(Collection::Patients),
            r#"[{"folio": "250531001", "nombre": "Legado", "edad": "35", "sexo": "F",
                "fecha_registro": "2025-05-31 09:00:00"}]"#,
        )
        .unwrap();

        store.insert_patient(&patient("250601001", "Luis")).unwrap();

        let legacy = store.get_patient("250531001").unwrap().unwrap();
        assert_eq!(legacy.age, 35);
        assert_eq!(store.list_folios().unwrap(), vec!["250531001", "250601001"]);
    }

    #[test]
    fn test_unreadable_record_blocks_writes() {
        let (_dir, store) = setup_store();
        let path = store.path_of(Collection::Patients);
        let original = r#"[{"folio": "250531001", "nombre": "Sin sexo", "fecha_registro": ""}]"#;
        std::fs::write(&path, original).unwrap();

        let err = store.insert_patient(&patient("250601001", "Luis")).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { collection: Collection::Patients, .. }));
        assert!(store.delete_patient("250531001").is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_delete_checks_results_before_writing() {
        let (_dir, store) = setup_store();
        store.insert_patient(&patient("250601001", "Luis")).unwrap();
        std::fs::write(store.path_of(Collection::Results), r#"[{"folio": 7}]"#).unwrap();

        let err = store.delete_patient("250601001").unwrap_err();
        assert!(matches!(err, StoreError::Malformed { collection: Collection::Results, .. }));
        assert!(store.get_patient("250601001").unwrap().is_some());
    }
}
