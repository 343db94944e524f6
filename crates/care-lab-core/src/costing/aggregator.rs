use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{round2, Lab, OrderedTest, PriceCatalog};

/// Value-added tax rate applied to the subtotal.
pub const IVA_RATE: f64 = 0.16;

/// How lab costs are attributed to an order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CostPolicy {
    #[default]
    BothLabs,
    AssignedLab,
}

impl fmt::Display for CostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostPolicy::BothLabs => f.write_str("both_labs"),
            CostPolicy::AssignedLab => f.write_str("assigned_lab"),
        }
    }
}

impl FromStr for CostPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "both_labs" => Ok(CostPolicy::BothLabs),
            "assigned_lab" => Ok(CostPolicy::AssignedLab),
            other => Err(format!("unknown cost policy: {}", other)),
        }
    }
}

/// Financial summary of an order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CostSummary {
    /// Sum of public prices charged
    pub subtotal: f64,
    pub manufacturing_matriz: f64,
    pub manufacturing_sigma: f64,
    pub total_manufacturing: f64,
    pub materials: f64,
    pub shipping: f64,
    /// subtotal - (manufacturing + materials + shipping)
    pub margin: f64,
    pub tax: f64,
    pub total: f64,
}

impl CostSummary {
    /// Copy with every amount rounded to 2 decimals for display.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round2(self.subtotal),
            manufacturing_matriz: round2(self.manufacturing_matriz),
            manufacturing_sigma: round2(self.manufacturing_sigma),
            total_manufacturing: round2(self.total_manufacturing),
            materials: round2(self.materials),
            shipping: round2(self.shipping),
            margin: round2(self.margin),
            tax: round2(self.tax),
            total: round2(self.total),
        }
    }

    /// Total cost of the order.
    pub fn total_cost(&self) -> f64 {
        self.total_manufacturing + self.materials + self.shipping
    }

    fn add_manufacturing(&mut self, lab: Lab, amount: f64) {
        match lab {
            Lab::Matriz => self.manufacturing_matriz += amount,
            Lab::Sigma => self.manufacturing_sigma += amount,
        }
    }

    fn finish(mut self) -> Self {
        self.total_manufacturing = self.manufacturing_matriz + self.manufacturing_sigma;
        self.margin = self.subtotal - self.total_cost();
        self.tax = round2(self.subtotal * IVA_RATE);
        self.total = self.subtotal + self.tax;
        self
    }
}

/// Compute the financial summary of an order.
///
/// Tests without a price entry contribute nothing.
pub fn summarize(tests: &[OrderedTest], prices: &PriceCatalog, policy: CostPolicy) -> CostSummary {
    let mut summary = CostSummary::default();
    // Shared materials/shipping per lab for the assigned-lab policy.
    let mut shared: BTreeMap<Lab, (f64, f64)> = BTreeMap::new();

    for test in tests {
        let Some(entry) = prices.for_test(&test.key) else {
            continue;
        };
        summary.subtotal += entry.public_price(test.processed_at);

        match policy {
            CostPolicy::BothLabs => {
                for lab in Lab::ALL {
                    let cost = entry.cost(lab);
                    summary.add_manufacturing(lab, cost.manufacturing);
                    summary.materials += cost.materials;
                    summary.shipping += cost.shipping;
                }
            }
            CostPolicy::AssignedLab => {
                let cost = entry.cost(test.processed_at);
                summary.add_manufacturing(test.processed_at, cost.manufacturing);
                let slot = shared.entry(test.processed_at).or_insert((0.0, 0.0));
                slot.0 = slot.0.max(cost.materials);
                slot.1 = slot.1.max(cost.shipping);
            }
        }
    }

    for (materials, shipping) in shared.into_values() {
        summary.materials += materials;
        summary.shipping += shipping;
    }

    summary.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostBreakdown, PriceEntry};

    fn ordered(key: &str, price: f64, lab: Lab) -> OrderedTest {
        OrderedTest {
            key: key.into(),
            name: key.into(),
            price,
            processed_at: lab,
        }
    }

    fn entry(key: &str, matriz_price: f64, sigma_price: f64) -> PriceEntry {
        let mut entry = PriceEntry::for_test(key);
        entry.costs.matriz = CostBreakdown {
            manufacturing: 10.0,
            materials: 5.0,
            shipping: 2.0,
        };
        entry.costs.sigma = CostBreakdown {
            manufacturing: 8.0,
            materials: 3.0,
            shipping: 1.0,
        };
        entry.public_price_matriz = matriz_price;
        entry.public_price_sigma = sigma_price;
        entry
    }

    fn catalog() -> PriceCatalog {
        PriceCatalog::from_entries(vec![entry("T1", 100.0, 150.0), entry("T2", 180.0, 200.0)])
    }

    #[test]
    fn test_both_labs_counts_every_cost() {
        let tests = vec![ordered("T1", 100.0, Lab::Matriz), ordered("T2", 200.0, Lab::Sigma)];
        let summary = summarize(&tests, &catalog(), CostPolicy::BothLabs);

        assert_eq!(summary.subtotal, 300.0);
        assert_eq!(summary.manufacturing_matriz, 20.0);
        assert_eq!(summary.manufacturing_sigma, 16.0);
        assert_eq!(summary.materials, 16.0);
        assert_eq!(summary.shipping, 6.0);
        assert_eq!(summary.total_manufacturing, 36.0);
        assert_eq!(summary.margin, 242.0);
        assert_eq!(summary.tax, 48.0);
        assert_eq!(summary.total, 348.0);
    }

    #[test]
    fn test_subtotal_uses_live_price_of_assigned_lab() {
        // The snapshot price on the order is ignored; the catalog price wins.
        let tests = vec![ordered("T1", 1.0, Lab::Sigma)];
        let summary = summarize(&tests, &catalog(), CostPolicy::BothLabs);
        assert_eq!(summary.subtotal, 150.0);
    }

    #[test]
    fn test_missing_price_contributes_nothing() {
        let tests = vec![ordered("T1", 100.0, Lab::Matriz), ordered("XX", 500.0, Lab::Matriz)];
        let summary = summarize(&tests, &catalog(), CostPolicy::BothLabs);
        assert_eq!(summary.subtotal, 100.0);
        assert_eq!(summary.materials, 8.0);
        assert_eq!(summary.total, 116.0);
    }

    #[test]
    fn test_empty_order() {
        let summary = summarize(&[], &catalog(), CostPolicy::BothLabs);
        assert_eq!(summary, CostSummary::default());
    }

    #[test]
    fn test_assigned_lab_shares_materials_and_shipping() {
        let tests = vec![
            ordered("T1", 100.0, Lab::Matriz),
            ordered("T2", 180.0, Lab::Matriz),
            ordered("T1", 150.0, Lab::Sigma),
        ];
        let summary = summarize(&tests, &catalog(), CostPolicy::AssignedLab);

        assert_eq!(summary.subtotal, 430.0);
        assert_eq!(summary.manufacturing_matriz, 20.0);
        assert_eq!(summary.manufacturing_sigma, 8.0);
        assert_eq!(summary.materials, 8.0);
        assert_eq!(summary.shipping, 3.0);
        assert_eq!(summary.margin, 430.0 - 39.0);
        assert_eq!(summary.tax, 68.8);
    }

    #[test]
    fn test_tax_rounding() {
        let mut e = entry("T1", 99.99, 0.0);
        e.costs = Default::default();
        let prices = PriceCatalog::from_entries(vec![e]);
        let summary = summarize(&[ordered("T1", 99.99, Lab::Matriz)], &prices, CostPolicy::BothLabs);
        assert_eq!(summary.tax, 16.0);
        assert_eq!(summary.rounded().total, 115.99);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("assigned-lab".parse::<CostPolicy>(), Ok(CostPolicy::AssignedLab));
        assert_eq!(CostPolicy::default().to_string(), "both_labs");
        assert!("cheapest".parse::<CostPolicy>().is_err());
    }
}
