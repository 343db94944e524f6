//! Result collection operations.

use tracing::info;

use super::{Collection, Store, StoreResult};
use crate::models::TestResult;

impl Store {
    /// List every stored result.
    pub fn list_results(&self) -> StoreResult<Vec<TestResult>> {
        self.load(Collection::Results)
    }

    /// Results recorded under a folio, in entry order.
    pub fn results_for(&self, folio: &str) -> StoreResult<Vec<TestResult>> {
        Ok(self
            .list_results()?
            .into_iter()
            .filter(|r| r.folio == folio)
            .collect())
    }

    /// Get the current result for (folio, key).
    pub fn get_result(&self, folio: &str, key: &str) -> StoreResult<Option<TestResult>> {
        Ok(self
            .list_results()?
            .into_iter()
            .find(|r| r.matches(folio, key)))
    }

    /// Insert a result or overwrite the existing one for the same
    /// (folio, key). Returns true when an existing result was replaced.
    pub fn upsert_result(&self, result: &TestResult) -> StoreResult<bool> {
        let mut results: Vec<TestResult> = self.load_for_update(Collection::Results)?;
        let replaced = match results
            .iter_mut()
            .find(|r| r.matches(&result.folio, &result.key))
        {
            Some(slot) => {
                *slot = result.clone();
                true
            }
            None => {
                results.push(result.clone());
                false
            }
        };
        self.save(Collection::Results, &results)?;
        info!(folio = %result.folio, key = %result.key, replaced, "result saved");
        Ok(replaced)
    }

    /// Remove all results of a folio, returning how many were removed.
    pub fn delete_results_for(&self, folio: &str) -> StoreResult<usize> {
        let mut results: Vec<TestResult> = self.load_for_update(Collection::Results)?;
        let before = results.len();
        results.retain(|r| r.folio != folio);
        let removed = before - results.len();
        if removed > 0 {
            self.save(Collection::Results, &results)?;
        }
        Ok(removed)
    }
}
