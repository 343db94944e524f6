//! Clinic operations.
//!
//! [`Clinic`] is the single entry point the front-ends use. Every operation
//! reloads the collections it touches from the store, so catalog edits are
//! visible to the very next call.

mod patients;
mod results;
mod views;

pub use patients::*;
pub use views::*;

use thiserror::Error;

use crate::admin::{parse_price_drafts, parse_test_drafts, BatchOutcome, PriceDraft, TestDraft};
use crate::config::LabConfig;
use crate::intake::IntakeError;
use crate::models::{Container, LabTest, PriceEntry};
use crate::search::{rank_tests, TestMatch};
use crate::store::{Store, StoreError};

/// Clinic errors.
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Test not found: {0}")]
    TestNotFound(String),

    #[error("No result for test {key} on folio {folio}")]
    ResultNotFound { folio: String, key: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClinicError {
    /// Whether the error means a patient, test or result does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClinicError::PatientNotFound(_)
                | ClinicError::TestNotFound(_)
                | ClinicError::ResultNotFound { .. }
                | ClinicError::Store(StoreError::NotFound(_))
                | ClinicError::Intake(IntakeError::UnknownTest(_))
        )
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;

/// Laboratory operations over a store.
pub struct Clinic<'a> {
    store: &'a Store,
    config: &'a LabConfig,
}

impl<'a> Clinic<'a> {
    pub fn new(store: &'a Store, config: &'a LabConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LabConfig {
        self.config
    }

    // =========================================================================
    // Catalog administration
    // =========================================================================

    pub fn list_tests(&self) -> ClinicResult<Vec<LabTest>> {
        Ok(self.store.list_tests()?)
    }

    pub fn list_containers(&self) -> ClinicResult<Vec<Container>> {
        Ok(self.store.list_containers()?)
    }

    pub fn list_prices(&self) -> ClinicResult<Vec<PriceEntry>> {
        Ok(self.store.list_prices()?)
    }

    /// Replace the test catalog with the valid drafts of a batch.
    pub fn save_test_batch(&self, drafts: &[TestDraft]) -> ClinicResult<BatchOutcome> {
        let (tests, skipped) = parse_test_drafts(drafts);
        self.store.replace_tests(&tests)?;
        Ok(BatchOutcome {
            saved: tests.len(),
            skipped,
        })
    }

    /// Replace the price catalog with the valid drafts of a batch.
    pub fn save_price_batch(&self, drafts: &[PriceDraft]) -> ClinicResult<BatchOutcome> {
        let (prices, skipped) = parse_price_drafts(drafts);
        self.store.replace_prices(&prices)?;
        Ok(BatchOutcome {
            saved: prices.len(),
            skipped,
        })
    }

    /// Replace the container list. Ids must be unique.
    pub fn save_containers(&self, containers: &[Container]) -> ClinicResult<()> {
        for (index, container) in containers.iter().enumerate() {
            if containers[..index].iter().any(|c| c.id == container.id) {
                return Err(ClinicError::InvalidInput(format!(
                    "duplicate container id {}",
                    container.id
                )));
            }
        }
        Ok(self.store.replace_containers(containers)?)
    }

    /// Insert or replace a single test. Multi-parameter tests can only be
    /// created this way.
    pub fn upsert_test(&self, test: &LabTest) -> ClinicResult<()> {
        if test.key.trim().is_empty() {
            return Err(ClinicError::InvalidInput("test key is empty".to_string()));
        }
        Ok(self.store.upsert_test(test)?)
    }

    /// Save a price entry; the test it prices must exist.
    pub fn upsert_price(&self, entry: &PriceEntry) -> ClinicResult<()> {
        if self.store.get_test(&entry.id)?.is_none() {
            return Err(ClinicError::TestNotFound(entry.id.clone()));
        }
        Ok(self.store.upsert_price(entry)?)
    }

    /// Fuzzy search of the test catalog by key or name.
    pub fn search_tests(&self, query: &str, limit: usize) -> ClinicResult<Vec<TestMatch>> {
        let tests = self.store.list_tests()?;
        Ok(rank_tests(&tests, query, limit))
    }
}
