//! Catalog collection operations (tests, containers, prices).

use tracing::info;

use super::{Collection, Store, StoreResult};
use crate::models::{Container, LabTest, PriceCatalog, PriceEntry};

impl Store {
    /// List all catalog tests.
    pub fn list_tests(&self) -> StoreResult<Vec<LabTest>> {
        self.load(Collection::Tests)
    }

    /// Get a catalog test by key.
    pub fn get_test(&self, key: &str) -> StoreResult<Option<LabTest>> {
        Ok(self.list_tests()?.into_iter().find(|t| t.key == key))
    }

    /// Replace the whole test catalog.
    pub fn replace_tests(&self, tests: &[LabTest]) -> StoreResult<()> {
        self.save(Collection::Tests, tests)?;
        info!(count = tests.len(), "test catalog replaced");
        Ok(())
    }

    /// Insert or update a single test.
    pub fn upsert_test(&self, test: &LabTest) -> StoreResult<()> {
        let mut tests: Vec<LabTest> = self.load_for_update(Collection::Tests)?;
        match tests.iter_mut().find(|t| t.key == test.key) {
            Some(slot) => *slot = test.clone(),
            None => tests.push(test.clone()),
        }
        self.save(Collection::Tests, &tests)?;
        info!(key = %test.key, "test saved");
        Ok(())
    }

    /// List all containers.
    pub fn list_containers(&self) -> StoreResult<Vec<Container>> {
        self.load(Collection::Containers)
    }

    /// Replace the container list.
    pub fn replace_containers(&self, containers: &[Container]) -> StoreResult<()> {
        self.save(Collection::Containers, containers)?;
        info!(count = containers.len(), "containers replaced");
        Ok(())
    }

    /// List all price entries.
    pub fn list_prices(&self) -> StoreResult<Vec<PriceEntry>> {
        self.load(Collection::Prices)
    }

    /// Load prices indexed by key. Always read fresh from disk.
    pub fn price_catalog(&self) -> StoreResult<PriceCatalog> {
        Ok(PriceCatalog::from_entries(self.list_prices()?))
    }

    /// Replace the whole price catalog, recomputing suggested prices.
    pub fn replace_prices(&self, prices: &[PriceEntry]) -> StoreResult<()> {
        let prices: Vec<PriceEntry> = prices
            .iter()
            .cloned()
            .map(|mut p| {
                p.recompute_suggested();
                p
            })
            .collect();
        self.save(Collection::Prices, &prices)?;
        info!(count = prices.len(), "price catalog replaced");
        Ok(())
    }

    /// Insert or update a single price entry, recomputing suggested prices.
    pub fn upsert_price(&self, entry: &PriceEntry) -> StoreResult<()> {
        let mut entry = entry.clone();
        entry.recompute_suggested();

        let mut prices: Vec<PriceEntry> = self.load_for_update(Collection::Prices)?;
        let key = entry.key();
        match prices.iter_mut().find(|p| p.key() == key) {
            Some(slot) => *slot = entry,
            None => prices.push(entry),
        }
        self.save(Collection::Prices, &prices)?;
        info!(%key, "price entry saved");
        Ok(())
    }
}
