//! Price catalog models.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Entity kind used for test price entries.
pub const PRICE_KIND_TEST: &str = "prueba";

/// Processing laboratory a test can be routed to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Lab {
    #[default]
    Matriz,
    Sigma,
}

impl Lab {
    pub const ALL: [Lab; 2] = [Lab::Matriz, Lab::Sigma];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lab::Matriz => "matriz",
            Lab::Sigma => "sigma",
        }
    }

    /// Parse an optional lab tag, falling back to matriz when absent or blank.
    pub fn parse_or_default(value: Option<&str>) -> Result<Self, UnknownLab> {
        match value.map(str::trim) {
            None | Some("") => Ok(Lab::default()),
            Some(tag) => tag.parse(),
        }
    }
}

impl fmt::Display for Lab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized lab tag.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown lab: {0}")]
pub struct UnknownLab(pub String);

impl FromStr for Lab {
    type Err = UnknownLab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "matriz" => Ok(Lab::Matriz),
            "sigma" => Ok(Lab::Sigma),
            _ => Err(UnknownLab(s.to_string())),
        }
    }
}

/// Cost breakdown of processing a test at one lab.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CostBreakdown {
    /// Manufacturing/processing cost
    #[serde(rename = "maquila", default)]
    pub manufacturing: f64,
    #[serde(rename = "materiales", default)]
    pub materials: f64,
    #[serde(rename = "envio", default)]
    pub shipping: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.manufacturing + self.materials + self.shipping
    }
}

/// Cost breakdowns for both labs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LabCosts {
    #[serde(default)]
    pub matriz: CostBreakdown,
    #[serde(default)]
    pub sigma: CostBreakdown,
}

impl LabCosts {
    pub fn for_lab(&self, lab: Lab) -> &CostBreakdown {
        match lab {
            Lab::Matriz => &self.matriz,
            Lab::Sigma => &self.sigma,
        }
    }

    pub fn for_lab_mut(&mut self, lab: Lab) -> &mut CostBreakdown {
        match lab {
            Lab::Matriz => &mut self.matriz,
            Lab::Sigma => &mut self.sigma,
        }
    }
}

/// Pricing record for a catalog entity, keyed by (kind, id).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceEntry {
    /// Entity kind, presently always "prueba"
    #[serde(rename = "tipo", default = "default_kind")]
    pub kind: String,
    /// Entity id (the test key)
    pub id: String,
    #[serde(rename = "costo", default)]
    pub costs: LabCosts,
    /// Target profit percentage at matriz
    #[serde(rename = "ganancia_matriz", default)]
    pub profit_pct_matriz: f64,
    #[serde(rename = "ganancia_sigma", default)]
    pub profit_pct_sigma: f64,
    /// Derived, never user-entered
    #[serde(rename = "precio_sugerido_matriz", default)]
    pub suggested_price_matriz: f64,
    #[serde(rename = "precio_sugerido_sigma", default)]
    pub suggested_price_sigma: f64,
    #[serde(rename = "precio_publico_matriz", default)]
    pub public_price_matriz: f64,
    #[serde(rename = "precio_publico_sigma", default)]
    pub public_price_sigma: f64,
    #[serde(rename = "validado_matriz", default)]
    pub validated_matriz: bool,
    #[serde(rename = "validado_sigma", default)]
    pub validated_sigma: bool,
}

fn default_kind() -> String {
    PRICE_KIND_TEST.to_string()
}

/// Lookup key for a (kind, id) pair.
pub fn price_key(kind: &str, id: &str) -> String {
    format!("{}_{}", kind, id)
}

/// Round a monetary amount to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl PriceEntry {
    /// Create an empty price entry for a test.
    pub fn for_test(test_key: &str) -> Self {
        Self {
            kind: default_kind(),
            id: test_key.to_string(),
            costs: LabCosts::default(),
            profit_pct_matriz: 0.0,
            profit_pct_sigma: 0.0,
            suggested_price_matriz: 0.0,
            suggested_price_sigma: 0.0,
            public_price_matriz: 0.0,
            public_price_sigma: 0.0,
            validated_matriz: false,
            validated_sigma: false,
        }
    }

    pub fn key(&self) -> String {
        price_key(&self.kind, &self.id)
    }

    pub fn cost(&self, lab: Lab) -> &CostBreakdown {
        self.costs.for_lab(lab)
    }

    pub fn profit_pct(&self, lab: Lab) -> f64 {
        match lab {
            Lab::Matriz => self.profit_pct_matriz,
            Lab::Sigma => self.profit_pct_sigma,
        }
    }

    pub fn public_price(&self, lab: Lab) -> f64 {
        match lab {
            Lab::Matriz => self.public_price_matriz,
            Lab::Sigma => self.public_price_sigma,
        }
    }

    pub fn suggested_price(&self, lab: Lab) -> f64 {
        match lab {
            Lab::Matriz => self.suggested_price_matriz,
            Lab::Sigma => self.suggested_price_sigma,
        }
    }

    pub fn is_validated(&self, lab: Lab) -> bool {
        match lab {
            Lab::Matriz => self.validated_matriz,
            Lab::Sigma => self.validated_sigma,
        }
    }

    pub fn set_profit_pct(&mut self, lab: Lab, pct: f64) {
        match lab {
            Lab::Matriz => self.profit_pct_matriz = pct,
            Lab::Sigma => self.profit_pct_sigma = pct,
        }
    }

    pub fn set_public_price(&mut self, lab: Lab, price: f64) {
        match lab {
            Lab::Matriz => self.public_price_matriz = price,
            Lab::Sigma => self.public_price_sigma = price,
        }
    }

    pub fn set_validated(&mut self, lab: Lab, validated: bool) {
        match lab {
            Lab::Matriz => self.validated_matriz = validated,
            Lab::Sigma => self.validated_sigma = validated,
        }
    }

    /// Suggested price derived from total cost and profit percentage.
    pub fn compute_suggested(&self, lab: Lab) -> f64 {
        round2(self.cost(lab).total() * (1.0 + self.profit_pct(lab) / 100.0))
    }

    /// Recompute both suggested prices from current costs and profit.
    pub fn recompute_suggested(&mut self) {
        self.suggested_price_matriz = self.compute_suggested(Lab::Matriz);
        self.suggested_price_sigma = self.compute_suggested(Lab::Sigma);
    }
}

/// Price entries indexed by their `kind_id` key.
#[derive(Debug, Clone, Default)]
pub struct PriceCatalog {
    entries: HashMap<String, PriceEntry>,
}

impl PriceCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = PriceEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.key(), e)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PriceEntry> {
        self.entries.get(key)
    }

    /// Price entry for a test key (`prueba_<key>`).
    pub fn for_test(&self, test_key: &str) -> Option<&PriceEntry> {
        self.get(&price_key(PRICE_KIND_TEST, test_key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
