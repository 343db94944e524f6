//! Test catalog models.

use serde::{Deserialize, Serialize};

/// A diagnostic test ("prueba") offered by the laboratory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabTest {
    /// Unique test code (e.g., "GLU")
    #[serde(rename = "clave")]
    pub key: String,
    /// Display name
    #[serde(rename = "nombre")]
    pub name: String,
    /// Sample type label (e.g., "Sangre", "Orina")
    #[serde(rename = "tipo_muestra", default)]
    pub sample_type: String,
    /// Reference container id
    #[serde(rename = "id_contenedor", default)]
    pub container_id: Option<i64>,
    /// Quantitative or multi-parameter payload
    #[serde(flatten)]
    pub kind: TestKind,
}

/// Kind of test, tagged by `tipo` in storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "tipo")]
pub enum TestKind {
    /// Single numeric or textual value with one unit and range.
    #[serde(rename = "cuantitativa")]
    Quantitative {
        #[serde(rename = "unidad", default)]
        unit: String,
        #[serde(rename = "valores_normales", default)]
        normal_range: String,
    },
    /// Panel made of several parameters, each reported on its own.
    #[serde(rename = "multiparametro")]
    MultiParameter {
        #[serde(rename = "parametros", default)]
        parameters: Vec<TestParameter>,
    },
}

/// One parameter of a multi-parameter test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestParameter {
    #[serde(rename = "clave")]
    pub key: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "unidad", default)]
    pub unit: String,
    #[serde(rename = "valores_normales", default)]
    pub normal_range: String,
}

/// Sample container referenced by tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Container {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Unit and normal range resolved for a result key.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceValues {
    pub name: String,
    pub unit: String,
    pub normal_range: String,
}

impl LabTest {
    /// Create a quantitative test.
    pub fn quantitative(key: String, name: String, unit: String, normal_range: String) -> Self {
        Self {
            key,
            name,
            sample_type: String::new(),
            container_id: None,
            kind: TestKind::Quantitative { unit, normal_range },
        }
    }

    /// Create a multi-parameter test.
    pub fn multi_parameter(key: String, name: String, parameters: Vec<TestParameter>) -> Self {
        Self {
            key,
            name,
            sample_type: String::new(),
            container_id: None,
            kind: TestKind::MultiParameter { parameters },
        }
    }

    /// Parameters of a multi-parameter test (empty for quantitative tests).
    pub fn parameters(&self) -> &[TestParameter] {
        match &self.kind {
            TestKind::MultiParameter { parameters } => parameters,
            TestKind::Quantitative { .. } => &[],
        }
    }

    /// Whether a result recorded under `key` belongs to this test.
    pub fn answers(&self, key: &str) -> bool {
        self.key == key || self.parameters().iter().any(|p| p.key == key)
    }

    /// Reference values for a result recorded under `key`.
    ///
    /// The key may be the test's own key or, for multi-parameter tests,
    /// one of its parameter keys. A multi-parameter test has no unit of
    /// its own, so its own key resolves to an empty unit and range.
    pub fn reference_for(&self, key: &str) -> Option<ReferenceValues> {
        if self.key == key {
            let (unit, normal_range) = match &self.kind {
                TestKind::Quantitative { unit, normal_range } => {
                    (unit.clone(), normal_range.clone())
                }
                TestKind::MultiParameter { .. } => (String::new(), String::new()),
            };
            return Some(ReferenceValues {
                name: self.name.clone(),
                unit,
                normal_range,
            });
        }
        self.parameters()
            .iter()
            .find(|p| p.key == key)
            .map(|p| ReferenceValues {
                name: p.name.clone(),
                unit: p.unit.clone(),
                normal_range: p.normal_range.clone(),
            })
    }
}

/// Find reference values for a test or parameter key across the catalog.
pub fn find_reference(tests: &[LabTest], key: &str) -> Option<ReferenceValues> {
    tests
        .iter()
        .find(|t| t.key == key)
        .or_else(|| tests.iter().find(|t| t.parameters().iter().any(|p| p.key == key)))
        .and_then(|t| t.reference_for(key))
}
