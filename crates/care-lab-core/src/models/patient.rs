//! Patient models.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::pricing::Lab;

/// Timestamp format used for registration and result dates.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Patient sex as captured at registration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Other => "O",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            "O" => Ok(Sex::Other),
            other => Err(format!("invalid sex '{}', expected M, F or O", other)),
        }
    }
}

/// A test ordered for a patient.
///
/// Name and price are snapshots taken when the order was placed and do not
/// follow later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderedTest {
    #[serde(rename = "clave")]
    pub key: String,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Public price charged at order time
    #[serde(rename = "precio", default, deserialize_with = "lenient_price")]
    pub price: f64,
    /// Lab assigned to process the test
    #[serde(rename = "procesado_en", default)]
    pub processed_at: Lab,
}

/// A registered patient and their test order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Date-prefixed order identifier
    pub folio: String,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Birth date (YYYY-MM-DD), absent when age was entered by hand
    #[serde(rename = "fecha_nacimiento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Stored as a number, but hand-edited files may hold a string
    #[serde(rename = "edad", default, deserialize_with = "lenient_age")]
    pub age: u32,
    #[serde(rename = "sexo")]
    pub sex: Sex,
    #[serde(rename = "diagnostico", default)]
    pub diagnosis: String,
    /// Ordering physician
    #[serde(rename = "medico", default)]
    pub physician: String,
    #[serde(rename = "fecha_registro")]
    pub registered_at: String,
    #[serde(rename = "pruebas", default)]
    pub tests: Vec<OrderedTest>,
}

impl Patient {
    /// Check whether a test key is already on this patient's order.
    pub fn has_test(&self, key: &str) -> bool {
        self.tests.iter().any(|t| t.key == key)
    }

    /// Sum of the snapshot prices on the order.
    pub fn order_total(&self) -> f64 {
        self.tests.iter().map(|t| t.price).sum()
    }
}

/// Accept an age as a number, a numeric string, blank or null.
fn lenient_age<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|age| u32::try_from(age).ok())
            .or_else(|| n.as_f64().filter(|age| (0.0..=u32::MAX as f64).contains(age)).map(|age| age as u32))
            .ok_or_else(|| D::Error::custom(format!("invalid age {}", n))),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(0);
            }
            s.parse::<u32>()
                .map_err(|_| D::Error::custom(format!("invalid age '{}'", s)))
        }
        other => Err(D::Error::custom(format!("invalid age {}", other))),
    }
}

/// Accept a price as a number, a numeric string (decimal comma allowed),
/// blank or null.
fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(0.0),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("invalid price {}", n))),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(0.0);
            }
            s.replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|price| price.is_finite())
                .ok_or_else(|| D::Error::custom(format!("invalid price '{}'", s)))
        }
        other => Err(D::Error::custom(format!("invalid price {}", other))),
    }
}
