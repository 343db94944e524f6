use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::models::{CostBreakdown, Lab, LabTest, PriceEntry, TestKind};

use super::SkippedDraft;

/// One row of the test catalog form.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TestDraft {
    #[serde(rename = "clave", default, deserialize_with = "lenient_string")]
    pub key: String,
    #[serde(rename = "nombre", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "tipo_muestra", default, deserialize_with = "lenient_string")]
    pub sample_type: String,
    /// Must parse as an integer
    #[serde(rename = "id_contenedor", default, deserialize_with = "lenient_string")]
    pub container_id: String,
    #[serde(rename = "unidad", default, deserialize_with = "lenient_string")]
    pub unit: String,
    #[serde(rename = "valores_normales", default, deserialize_with = "lenient_string")]
    pub normal_range: String,
}

/// Per-lab columns of the price form.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LabPriceDraft {
    #[serde(rename = "maquila", default, deserialize_with = "lenient_string")]
    pub manufacturing: String,
    #[serde(rename = "materiales", default, deserialize_with = "lenient_string")]
    pub materials: String,
    #[serde(rename = "envio", default, deserialize_with = "lenient_string")]
    pub shipping: String,
    #[serde(rename = "ganancia", default, deserialize_with = "lenient_string")]
    pub profit_pct: String,
    #[serde(rename = "precio_publico", default, deserialize_with = "lenient_string")]
    pub public_price: String,
    #[serde(rename = "validado", default, deserialize_with = "lenient_string")]
    pub validated: String,
}

/// One row of the price catalog form.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PriceDraft {
    /// Test key the prices belong to
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub matriz: LabPriceDraft,
    #[serde(default)]
    pub sigma: LabPriceDraft,
}

/// Accept strings, numbers, booleans and null as form text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

fn parse_amount(field: &str, value: &str) -> Result<f64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    match value.replace(',', ".").parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(format!("{} is not a number: '{}'", field, value)),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "on" | "true" | "1" | "si" | "sí" | "yes"
    )
}

impl TestDraft {
    /// Validate into a quantitative catalog test.
    pub fn parse(&self) -> Result<LabTest, String> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err("missing clave".to_string());
        }
        let container_id = self
            .container_id
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("id_contenedor is not an integer: '{}'", self.container_id))?;

        Ok(LabTest {
            key: key.to_string(),
            name: self.name.trim().to_string(),
            sample_type: self.sample_type.trim().to_string(),
            container_id: Some(container_id),
            kind: TestKind::Quantitative {
                unit: self.unit.trim().to_string(),
                normal_range: self.normal_range.trim().to_string(),
            },
        })
    }
}

impl PriceDraft {
    /// Validate into a price entry with suggested prices computed.
    pub fn parse(&self) -> Result<PriceEntry, String> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err("missing id".to_string());
        }
        let mut entry = PriceEntry::for_test(id);
        for lab in Lab::ALL {
            let draft = match lab {
                Lab::Matriz => &self.matriz,
                Lab::Sigma => &self.sigma,
            };
            *entry.costs.for_lab_mut(lab) = CostBreakdown {
                manufacturing: parse_amount("maquila", &draft.manufacturing)?,
                materials: parse_amount("materiales", &draft.materials)?,
                shipping: parse_amount("envio", &draft.shipping)?,
            };
            entry.set_profit_pct(lab, parse_amount("ganancia", &draft.profit_pct)?);
            entry.set_public_price(lab, parse_amount("precio_publico", &draft.public_price)?);
            entry.set_validated(lab, parse_flag(&draft.validated));
        }
        entry.recompute_suggested();
        Ok(entry)
    }
}

/// Validate a batch, separating accepted records from skipped drafts.
fn parse_batch<D, T>(
    drafts: &[D],
    key_of: impl Fn(&D) -> &str,
    parse: impl Fn(&D) -> Result<T, String>,
) -> (Vec<T>, Vec<SkippedDraft>) {
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();
    for (index, draft) in drafts.iter().enumerate() {
        match parse(draft) {
            Ok(record) => accepted.push(record),
            Err(reason) => {
                let key = key_of(draft).trim().to_string();
                warn!(index, %key, %reason, "skipping catalog draft");
                skipped.push(SkippedDraft { index, key, reason });
            }
        }
    }
    (accepted, skipped)
}

/// Validate test drafts.
pub fn parse_test_drafts(drafts: &[TestDraft]) -> (Vec<LabTest>, Vec<SkippedDraft>) {
    parse_batch(drafts, |d| d.key.as_str(), TestDraft::parse)
}

/// Validate price drafts.
pub fn parse_price_drafts(drafts: &[PriceDraft]) -> (Vec<PriceEntry>, Vec<SkippedDraft>) {
    parse_batch(drafts, |d| d.id.as_str(), PriceDraft::parse)
}
