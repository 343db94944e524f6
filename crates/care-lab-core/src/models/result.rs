//! Test result models.

use serde::{Deserialize, Serialize};

/// A recorded result, unique per (folio, test key).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResult {
    pub folio: String,
    /// Test or parameter key
    #[serde(rename = "clave")]
    pub key: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    /// Entered value, kept as typed
    #[serde(rename = "resultado")]
    pub value: String,
    #[serde(rename = "unidad", default)]
    pub unit: String,
    #[serde(rename = "valores_normales", default)]
    pub normal_range: String,
    #[serde(rename = "fecha")]
    pub recorded_at: String,
}

/// Position of a value relative to its normal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFlag {
    Low,
    Normal,
    High,
    /// Range or value is not numeric
    Unknown,
}

impl RangeFlag {
    pub fn label(&self) -> &'static str {
        match self {
            RangeFlag::Low => "BAJO",
            RangeFlag::Normal => "",
            RangeFlag::High => "ALTO",
            RangeFlag::Unknown => "",
        }
    }
}

impl TestResult {
    pub fn matches(&self, folio: &str, key: &str) -> bool {
        self.folio == folio && self.key == key
    }

    /// Flag the value against a `low-high` normal range.
    pub fn range_flag(&self) -> RangeFlag {
        let Some((low, high)) = parse_range(&self.normal_range) else {
            return RangeFlag::Unknown;
        };
        let Ok(value) = self.value.trim().replace(',', ".").parse::<f64>() else {
            return RangeFlag::Unknown;
        };
        if value < low {
            RangeFlag::Low
        } else if value > high {
            RangeFlag::High
        } else {
            RangeFlag::Normal
        }
    }
}

fn parse_range(range: &str) -> Option<(f64, f64)> {
    let (low, high) = range.split_once('-')?;
    let low = low.trim().replace(',', ".").parse::<f64>().ok()?;
    let high = high.trim().replace(',', ".").parse::<f64>().ok()?;
    (low <= high).then_some((low, high))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(value: &str, range: &str) -> TestResult {
        TestResult {
            folio: "250601001".into(),
            key: "GLU".into(),
            name: "Glucosa".into(),
            value: value.into(),
            unit: "mg/dL".into(),
            normal_range: range.into(),
            recorded_at: "2025-06-01 10:00:00".into(),
        }
    }

    #[test]
    fn test_range_flags() {
        assert_eq!(result("65", "70-110").range_flag(), RangeFlag::Low);
        assert_eq!(result("70", "70-110").range_flag(), RangeFlag::Normal);
        assert_eq!(result("130.5", "70-110").range_flag(), RangeFlag::High);
        assert_eq!(result("1,1", "0.7-1.3").range_flag(), RangeFlag::Normal);
    }

    #[test]
    fn test_non_numeric_is_unknown() {
        assert_eq!(result("Negativo", "Negativo").range_flag(), RangeFlag::Unknown);
        assert_eq!(result("abc", "70-110").range_flag(), RangeFlag::Unknown);
        assert_eq!(result("5", "110-70").range_flag(), RangeFlag::Unknown);
    }
}
