//! Result entry.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use super::{Clinic, ClinicError, ClinicResult};
use crate::export::ResultsReport;
use crate::models::{find_reference, TestResult, TIMESTAMP_FORMAT};

impl Clinic<'_> {
    /// Results recorded for a patient.
    pub fn results(&self, folio: &str) -> ClinicResult<Vec<TestResult>> {
        self.patient(folio)?;
        Ok(self.store.results_for(folio)?)
    }

    /// Record a result, overwriting any previous value for the same test.
    ///
    /// `key` may be a test key or a parameter key of a multi-parameter test;
    /// its name, unit and normal range are copied from the catalog.
    pub fn record_result(
        &self,
        folio: &str,
        key: &str,
        value: &str,
        now: NaiveDateTime,
    ) -> ClinicResult<TestResult> {
        self.patient(folio)?;
        let value = value.trim();
        if value.is_empty() {
            return Err(ClinicError::InvalidInput("result value is empty".to_string()));
        }
        let tests = self.store.list_tests()?;
        let reference =
            find_reference(&tests, key).ok_or_else(|| ClinicError::TestNotFound(key.to_string()))?;

        let result = TestResult {
            folio: folio.to_string(),
            key: key.to_string(),
            name: reference.name,
            value: value.to_string(),
            unit: reference.unit,
            normal_range: reference.normal_range,
            recorded_at: now.format(TIMESTAMP_FORMAT).to_string(),
        };
        let replaced = self.store.upsert_result(&result)?;
        info!(folio, key, replaced, "result recorded");
        Ok(result)
    }

    /// Change the value of a result that was already recorded.
    pub fn edit_result(
        &self,
        folio: &str,
        key: &str,
        value: &str,
        now: NaiveDateTime,
    ) -> ClinicResult<TestResult> {
        if self.store.get_result(folio, key)?.is_none() {
            return Err(ClinicError::ResultNotFound {
                folio: folio.to_string(),
                key: key.to_string(),
            });
        }
        self.record_result(folio, key, value, now)
    }

    /// Printable results report for a patient.
    pub fn report(&self, folio: &str, today: NaiveDate) -> ClinicResult<ResultsReport> {
        let patient = self.patient(folio)?;
        let results = self.store.results_for(folio)?;
        let catalog = self.store.list_tests()?;
        Ok(ResultsReport::build(self.config, &patient, &catalog, &results, today))
    }
}
