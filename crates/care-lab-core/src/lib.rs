//! CARE Lab Core Library
//!
//! Clinical laboratory order management: patient registration, test
//! assignment to one of two processing labs, result entry, and the cost and
//! pricing summary of each order.
//!
//! # Architecture
//!
//! ```text
//!   Host app (FFI)          care-lab CLI / console menu
//!          │                          │
//!          └────────────┬─────────────┘
//!                       ▼
//!                 ┌───────────┐
//!                 │  Clinic   │  register / edit / delete / results / report
//!                 └─────┬─────┘
//!          ┌────────────┼──────────────┬──────────────┐
//!          ▼            ▼              ▼              ▼
//!       Intake       Costing        Export         Search
//!   folio, age,    summary of     billing,       fuzzy test
//!   assignment     prices/costs   report         lookup
//!          └────────────┬──────────────┘
//!                       ▼
//!                 JSON file Store
//!   pacientes · resultados · pruebas · contenedores · precios
//! ```
//!
//! # Modules
//!
//! - [`store`]: whole-file JSON collections
//! - [`models`]: domain types (LabTest, PriceEntry, Patient, TestResult, ...)
//! - [`intake`]: folio numbering, age resolution, test assignment
//! - [`costing`]: cost and pricing aggregation
//! - [`clinic`]: operations used by the front-ends
//! - [`admin`]: catalog batch validation
//! - [`export`]: billing export and results report
//! - [`search`]: fuzzy catalog search
//! - [`config`]: laboratory configuration

pub mod admin;
pub mod clinic;
pub mod config;
pub mod costing;
pub mod export;
pub mod intake;
pub mod models;
pub mod search;
pub mod store;

// Re-export commonly used types
pub use clinic::{Clinic, ClinicError, NewPatient, PatientEdit, PatientSummary};
pub use config::LabConfig;
pub use costing::{summarize, CostPolicy, CostSummary};
pub use models::{Lab, LabTest, OrderedTest, Patient, PriceCatalog, PriceEntry, Sex, TestResult};
pub use store::{Collection, Store};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use admin::{LabPriceDraft, PriceDraft, TestDraft};
use intake::TestSelection;
use models::{TestKind, TestParameter};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CareLabError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<store::StoreError> for CareLabError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::NotFound(what) => CareLabError::NotFound(what),
            store::StoreError::Json(e) => CareLabError::SerializationError(e.to_string()),
            other => CareLabError::StorageError(other.to_string()),
        }
    }
}

impl From<ClinicError> for CareLabError {
    fn from(e: ClinicError) -> Self {
        if e.is_not_found() {
            return CareLabError::NotFound(e.to_string());
        }
        match e {
            ClinicError::Store(e) => e.into(),
            ClinicError::Intake(e) => CareLabError::InvalidInput(e.to_string()),
            other => CareLabError::InvalidInput(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CareLabError {
    fn from(e: serde_json::Error) -> Self {
        CareLabError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CareLabError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CareLabError::StorageError(format!("Lock poisoned: {}", e))
    }
}

fn parse_lab(value: Option<&str>) -> Result<Lab, CareLabError> {
    Lab::parse_or_default(value).map_err(|e| CareLabError::InvalidInput(e.to_string()))
}

fn parse_sex(value: &str) -> Result<Sex, CareLabError> {
    value.parse().map_err(CareLabError::InvalidInput)
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open the laboratory data directory, loading `configuracion.json` from it.
#[uniffi::export]
pub fn open_lab(data_dir: String) -> Result<Arc<CareLab>, CareLabError> {
    let store = Store::open(&data_dir)?;
    let config = LabConfig::load_from_dir(&data_dir)?;
    Ok(Arc::new(CareLab {
        store: Arc::new(Mutex::new(store)),
        config,
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Laboratory handle for host apps. Calls are serialized so that
/// whole-file rewrites from one process never interleave.
#[derive(uniffi::Object)]
pub struct CareLab {
    store: Arc<Mutex<Store>>,
    config: LabConfig,
}

#[uniffi::export]
impl CareLab {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// List all patients.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, CareLabError> {
        let store = self.store.lock()?;
        let patients = Clinic::new(&store, &self.config).list_patients()?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Get a patient by folio.
    pub fn get_patient(&self, folio: String) -> Result<Option<FfiPatient>, CareLabError> {
        let store = self.store.lock()?;
        Ok(store.get_patient(&folio)?.map(|p| p.into()))
    }

    /// Register a patient and its test order.
    pub fn register_patient(&self, patient: FfiNewPatient) -> Result<FfiPatient, CareLabError> {
        let new = patient.try_into()?;
        let store = self.store.lock()?;
        let registered = Clinic::new(&store, &self.config).register_patient(new, now())?;
        Ok(registered.into())
    }

    /// Edit personal data and the test order of a patient.
    pub fn edit_patient(
        &self,
        folio: String,
        edit: FfiPatientEdit,
    ) -> Result<FfiPatient, CareLabError> {
        let edit = edit.try_into()?;
        let store = self.store.lock()?;
        let patient =
            Clinic::new(&store, &self.config).edit_patient(&folio, edit, now().date())?;
        Ok(patient.into())
    }

    /// Delete a patient and its results.
    pub fn delete_patient(&self, folio: String) -> Result<(), CareLabError> {
        let store = self.store.lock()?;
        Clinic::new(&store, &self.config).delete_patient(&folio)?;
        Ok(())
    }

    /// Financial summary of a patient's order.
    pub fn patient_summary(&self, folio: String) -> Result<FfiPatientSummary, CareLabError> {
        let store = self.store.lock()?;
        let summary = Clinic::new(&store, &self.config).summary(&folio)?;
        Ok(summary.into())
    }

    // =========================================================================
    // Result Operations
    // =========================================================================

    /// Results recorded for a folio.
    pub fn list_results(&self, folio: String) -> Result<Vec<FfiTestResult>, CareLabError> {
        let store = self.store.lock()?;
        let results = Clinic::new(&store, &self.config).results(&folio)?;
        Ok(results.into_iter().map(|r| r.into()).collect())
    }

    /// Record (or overwrite) a result.
    pub fn record_result(
        &self,
        folio: String,
        key: String,
        value: String,
    ) -> Result<FfiTestResult, CareLabError> {
        let store = self.store.lock()?;
        let result = Clinic::new(&store, &self.config).record_result(&folio, &key, &value, now())?;
        Ok(result.into())
    }

    /// Change a result that was already recorded.
    pub fn edit_result(
        &self,
        folio: String,
        key: String,
        value: String,
    ) -> Result<FfiTestResult, CareLabError> {
        let store = self.store.lock()?;
        let result = Clinic::new(&store, &self.config).edit_result(&folio, &key, &value, now())?;
        Ok(result.into())
    }

    /// Plain-text results report.
    pub fn results_report(&self, folio: String) -> Result<String, CareLabError> {
        let store = self.store.lock()?;
        let report = Clinic::new(&store, &self.config).report(&folio, now().date())?;
        Ok(report.to_text())
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// List the test catalog.
    pub fn list_tests(&self) -> Result<Vec<FfiLabTest>, CareLabError> {
        let store = self.store.lock()?;
        let tests = store.list_tests()?;
        Ok(tests.into_iter().map(|t| t.into()).collect())
    }

    /// Fuzzy search of tests by key or name.
    pub fn search_tests(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiTestMatch>, CareLabError> {
        let store = self.store.lock()?;
        let matches = Clinic::new(&store, &self.config).search_tests(&query, limit as usize)?;
        Ok(matches
            .into_iter()
            .map(|m| FfiTestMatch {
                key: m.key,
                name: m.name,
                score: m.score,
            })
            .collect())
    }

    /// Replace the test catalog from form rows; invalid rows are skipped.
    pub fn save_test_batch(
        &self,
        drafts: Vec<FfiTestDraft>,
    ) -> Result<FfiBatchOutcome, CareLabError> {
        let drafts: Vec<TestDraft> = drafts.into_iter().map(|d| d.into()).collect();
        let store = self.store.lock()?;
        let outcome = Clinic::new(&store, &self.config).save_test_batch(&drafts)?;
        Ok(outcome.into())
    }

    /// Insert or replace one catalog test, quantitative or multi-parameter.
    pub fn upsert_test(&self, test: FfiLabTest) -> Result<(), CareLabError> {
        let test = LabTest::from(test);
        let store = self.store.lock()?;
        Clinic::new(&store, &self.config).upsert_test(&test)?;
        Ok(())
    }

    /// List the price catalog.
    pub fn list_prices(&self) -> Result<Vec<FfiPriceEntry>, CareLabError> {
        let store = self.store.lock()?;
        let prices = store.list_prices()?;
        Ok(prices.into_iter().map(|p| p.into()).collect())
    }

    /// Replace the price catalog from form rows; invalid rows are skipped.
    pub fn save_price_batch(
        &self,
        drafts: Vec<FfiPriceDraft>,
    ) -> Result<FfiBatchOutcome, CareLabError> {
        let drafts: Vec<PriceDraft> = drafts.into_iter().map(|d| d.into()).collect();
        let store = self.store.lock()?;
        let outcome = Clinic::new(&store, &self.config).save_price_batch(&drafts)?;
        Ok(outcome.into())
    }

    /// Insert or replace the prices of one test. Suggested prices are
    /// recomputed; the values passed in are ignored.
    pub fn upsert_price(&self, entry: FfiPriceEntry) -> Result<(), CareLabError> {
        let entry = PriceEntry::try_from(entry)?;
        let store = self.store.lock()?;
        Clinic::new(&store, &self.config).upsert_price(&entry)?;
        Ok(())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export billing data as JSON.
    pub fn export_billing_json(&self) -> Result<String, CareLabError> {
        let store = self.store.lock()?;
        let batch = export::BillingExporter::new(&store, &self.config).export_all()?;
        Ok(batch.to_json()?)
    }

    /// Export billing data as CSV.
    pub fn export_billing_csv(&self) -> Result<String, CareLabError> {
        let store = self.store.lock()?;
        let batch = export::BillingExporter::new(&store, &self.config).export_all()?;
        Ok(batch.to_csv())
    }

    /// Raw contents of a collection file (e.g. "patients", "precios.json").
    pub fn raw_collection(&self, name: String) -> Result<String, CareLabError> {
        let collection: Collection = name.parse()?;
        let store = self.store.lock()?;
        Ok(store.raw(collection)?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe ordered test.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrderedTest {
    pub key: String,
    pub name: String,
    pub price: f64,
    pub lab: String,
}

impl From<OrderedTest> for FfiOrderedTest {
    fn from(test: OrderedTest) -> Self {
        Self {
            key: test.key,
            name: test.name,
            price: test.price,
            lab: test.processed_at.to_string(),
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub folio: String,
    pub name: String,
    pub birth_date: Option<String>,
    pub age: u32,
    pub sex: String,
    pub diagnosis: String,
    pub physician: String,
    pub registered_at: String,
    pub tests: Vec<FfiOrderedTest>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            folio: patient.folio,
            name: patient.name,
            birth_date: patient.birth_date,
            age: patient.age,
            sex: patient.sex.to_string(),
            diagnosis: patient.diagnosis,
            physician: patient.physician,
            registered_at: patient.registered_at,
            tests: patient.tests.into_iter().map(|t| t.into()).collect(),
        }
    }
}

/// FFI-safe test selection (`lab` defaults to matriz).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTestSelection {
    pub key: String,
    pub lab: Option<String>,
}

impl TryFrom<FfiTestSelection> for TestSelection {
    type Error = CareLabError;

    fn try_from(selection: FfiTestSelection) -> Result<Self, Self::Error> {
        Ok(TestSelection::new(
            selection.key.trim(),
            parse_lab(selection.lab.as_deref())?,
        ))
    }
}

fn selections(items: Vec<FfiTestSelection>) -> Result<Vec<TestSelection>, CareLabError> {
    items.into_iter().map(TestSelection::try_from).collect()
}

/// FFI-safe registration form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub name: String,
    pub birth_date: Option<String>,
    pub manual_age: Option<String>,
    pub sex: String,
    pub diagnosis: String,
    pub physician: String,
    pub tests: Vec<FfiTestSelection>,
}

impl TryFrom<FfiNewPatient> for NewPatient {
    type Error = CareLabError;

    fn try_from(patient: FfiNewPatient) -> Result<Self, Self::Error> {
        Ok(NewPatient {
            name: patient.name,
            birth_date: patient.birth_date,
            manual_age: patient.manual_age,
            sex: parse_sex(&patient.sex)?,
            diagnosis: patient.diagnosis,
            physician: patient.physician,
            tests: selections(patient.tests)?,
        })
    }
}

/// FFI-safe patient edit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientEdit {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub manual_age: Option<String>,
    pub sex: Option<String>,
    pub diagnosis: Option<String>,
    pub physician: Option<String>,
    pub add_tests: Vec<FfiTestSelection>,
    pub remove_tests: Vec<String>,
    pub reassign: Vec<FfiTestSelection>,
}

impl TryFrom<FfiPatientEdit> for PatientEdit {
    type Error = CareLabError;

    fn try_from(edit: FfiPatientEdit) -> Result<Self, Self::Error> {
        Ok(PatientEdit {
            name: edit.name,
            birth_date: edit.birth_date,
            manual_age: edit.manual_age,
            sex: edit.sex.as_deref().map(parse_sex).transpose()?,
            diagnosis: edit.diagnosis,
            physician: edit.physician,
            add_tests: selections(edit.add_tests)?,
            remove_tests: edit.remove_tests,
            reassign: selections(edit.reassign)?,
        })
    }
}

/// FFI-safe cost summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCostSummary {
    pub subtotal: f64,
    pub manufacturing_matriz: f64,
    pub manufacturing_sigma: f64,
    pub total_manufacturing: f64,
    pub materials: f64,
    pub shipping: f64,
    pub margin: f64,
    pub tax: f64,
    pub total: f64,
}

impl From<CostSummary> for FfiCostSummary {
    fn from(costs: CostSummary) -> Self {
        Self {
            subtotal: costs.subtotal,
            manufacturing_matriz: costs.manufacturing_matriz,
            manufacturing_sigma: costs.manufacturing_sigma,
            total_manufacturing: costs.total_manufacturing,
            materials: costs.materials,
            shipping: costs.shipping,
            margin: costs.margin,
            tax: costs.tax,
            total: costs.total,
        }
    }
}

/// FFI-safe summary line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSummaryLine {
    pub key: String,
    pub name: String,
    pub lab: String,
    pub charged_price: f64,
    pub list_price: Option<f64>,
}

/// FFI-safe patient summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientSummary {
    pub folio: String,
    pub name: String,
    pub age: u32,
    pub sex: String,
    pub physician: String,
    pub diagnosis: String,
    pub lines: Vec<FfiSummaryLine>,
    pub cost_policy: String,
    pub costs: FfiCostSummary,
}

impl From<PatientSummary> for FfiPatientSummary {
    fn from(summary: PatientSummary) -> Self {
        Self {
            folio: summary.folio,
            name: summary.name,
            age: summary.age,
            sex: summary.sex,
            physician: summary.physician,
            diagnosis: summary.diagnosis,
            lines: summary
                .lines
                .into_iter()
                .map(|line| FfiSummaryLine {
                    key: line.key,
                    name: line.name,
                    lab: line.lab.to_string(),
                    charged_price: line.charged_price,
                    list_price: line.list_price,
                })
                .collect(),
            cost_policy: summary.policy.to_string(),
            costs: summary.costs.into(),
        }
    }
}

/// FFI-safe test result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTestResult {
    pub folio: String,
    pub key: String,
    pub name: String,
    pub value: String,
    pub unit: String,
    pub normal_range: String,
    pub recorded_at: String,
    pub flag: String,
}

impl From<TestResult> for FfiTestResult {
    fn from(result: TestResult) -> Self {
        let flag = result.range_flag().label().to_string();
        Self {
            folio: result.folio,
            key: result.key,
            name: result.name,
            value: result.value,
            unit: result.unit,
            normal_range: result.normal_range,
            recorded_at: result.recorded_at,
            flag,
        }
    }
}

/// FFI-safe test parameter.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTestParameter {
    pub key: String,
    pub name: String,
    pub unit: String,
    pub normal_range: String,
}

/// FFI-safe catalog test.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLabTest {
    pub key: String,
    pub name: String,
    pub sample_type: String,
    pub container_id: Option<i64>,
    pub multi_parameter: bool,
    pub unit: String,
    pub normal_range: String,
    pub parameters: Vec<FfiTestParameter>,
}

impl From<LabTest> for FfiLabTest {
    fn from(test: LabTest) -> Self {
        let (multi_parameter, unit, normal_range, parameters) = match test.kind {
            TestKind::Quantitative { unit, normal_range } => (false, unit, normal_range, Vec::new()),
            TestKind::MultiParameter { parameters } => (
                true,
                String::new(),
                String::new(),
                parameters
                    .into_iter()
                    .map(|p| FfiTestParameter {
                        key: p.key,
                        name: p.name,
                        unit: p.unit,
                        normal_range: p.normal_range,
                    })
                    .collect(),
            ),
        };
        Self {
            key: test.key,
            name: test.name,
            sample_type: test.sample_type,
            container_id: test.container_id,
            multi_parameter,
            unit,
            normal_range,
            parameters,
        }
    }
}

impl From<FfiLabTest> for LabTest {
    fn from(test: FfiLabTest) -> Self {
        let kind = if test.multi_parameter {
            TestKind::MultiParameter {
                parameters: test
                    .parameters
                    .into_iter()
                    .map(|p| TestParameter {
                        key: p.key,
                        name: p.name,
                        unit: p.unit,
                        normal_range: p.normal_range,
                    })
                    .collect(),
            }
        } else {
            TestKind::Quantitative {
                unit: test.unit,
                normal_range: test.normal_range,
            }
        };
        LabTest {
            key: test.key,
            name: test.name,
            sample_type: test.sample_type,
            container_id: test.container_id,
            kind,
        }
    }
}

/// FFI-safe search match.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTestMatch {
    pub key: String,
    pub name: String,
    pub score: f64,
}

/// FFI-safe test form row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTestDraft {
    pub key: String,
    pub name: String,
    pub sample_type: String,
    pub container_id: String,
    pub unit: String,
    pub normal_range: String,
}

impl From<FfiTestDraft> for TestDraft {
    fn from(draft: FfiTestDraft) -> Self {
        TestDraft {
            key: draft.key,
            name: draft.name,
            sample_type: draft.sample_type,
            container_id: draft.container_id,
            unit: draft.unit,
            normal_range: draft.normal_range,
        }
    }
}

/// FFI-safe per-lab price form columns.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLabPriceDraft {
    pub manufacturing: String,
    pub materials: String,
    pub shipping: String,
    pub profit_pct: String,
    pub public_price: String,
    pub validated: bool,
}

impl From<FfiLabPriceDraft> for LabPriceDraft {
    fn from(draft: FfiLabPriceDraft) -> Self {
        LabPriceDraft {
            manufacturing: draft.manufacturing,
            materials: draft.materials,
            shipping: draft.shipping,
            profit_pct: draft.profit_pct,
            public_price: draft.public_price,
            validated: draft.validated.to_string(),
        }
    }
}

/// FFI-safe price form row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPriceDraft {
    pub id: String,
    pub matriz: FfiLabPriceDraft,
    pub sigma: FfiLabPriceDraft,
}

impl From<FfiPriceDraft> for PriceDraft {
    fn from(draft: FfiPriceDraft) -> Self {
        PriceDraft {
            id: draft.id,
            matriz: draft.matriz.into(),
            sigma: draft.sigma.into(),
        }
    }
}

/// FFI-safe pricing of one lab.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLabPricing {
    pub lab: String,
    pub manufacturing: f64,
    pub materials: f64,
    pub shipping: f64,
    pub profit_pct: f64,
    pub suggested_price: f64,
    pub public_price: f64,
    pub validated: bool,
}

/// FFI-safe price entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPriceEntry {
    pub key: String,
    pub test_key: String,
    pub labs: Vec<FfiLabPricing>,
}

impl From<PriceEntry> for FfiPriceEntry {
    fn from(entry: PriceEntry) -> Self {
        let labs = Lab::ALL
            .into_iter()
            .map(|lab| {
                let cost = entry.cost(lab);
                FfiLabPricing {
                    lab: lab.to_string(),
                    manufacturing: cost.manufacturing,
                    materials: cost.materials,
                    shipping: cost.shipping,
                    profit_pct: entry.profit_pct(lab),
                    suggested_price: entry.suggested_price(lab),
                    public_price: entry.public_price(lab),
                    validated: entry.is_validated(lab),
                }
            })
            .collect();
        Self {
            key: entry.key(),
            test_key: entry.id,
            labs,
        }
    }
}

impl TryFrom<FfiPriceEntry> for PriceEntry {
    type Error = CareLabError;

    fn try_from(entry: FfiPriceEntry) -> Result<Self, Self::Error> {
        let mut price = PriceEntry::for_test(&entry.test_key);
        for pricing in entry.labs {
            let lab = parse_lab(Some(pricing.lab.as_str()))?;
            *price.costs.for_lab_mut(lab) = models::CostBreakdown {
                manufacturing: pricing.manufacturing,
                materials: pricing.materials,
                shipping: pricing.shipping,
            };
            price.set_profit_pct(lab, pricing.profit_pct);
            price.set_public_price(lab, pricing.public_price);
            price.set_validated(lab, pricing.validated);
        }
        Ok(price)
    }
}

/// FFI-safe skipped draft.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSkippedDraft {
    pub index: u32,
    pub key: String,
    pub reason: String,
}

/// FFI-safe batch outcome.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBatchOutcome {
    pub saved: u32,
    pub skipped: Vec<FfiSkippedDraft>,
}

impl From<admin::BatchOutcome> for FfiBatchOutcome {
    fn from(outcome: admin::BatchOutcome) -> Self {
        Self {
            saved: outcome.saved as u32,
            skipped: outcome
                .skipped
                .into_iter()
                .map(|s| FfiSkippedDraft {
                    index: s.index as u32,
                    key: s.key,
                    reason: s.reason,
                })
                .collect(),
        }
    }
}
