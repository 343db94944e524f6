//! Laboratory configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::costing::CostPolicy;
use crate::store::StoreResult;

/// Default file name of the configuration inside the data directory.
pub const CONFIG_FILE_NAME: &str = "configuracion.json";

/// Laboratory identity printed on reports, plus pricing behavior.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabConfig {
    #[serde(rename = "nombre_laboratorio")]
    pub lab_name: String,
    #[serde(rename = "sucursal")]
    pub branch: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "politica_costos")]
    pub cost_policy: CostPolicy,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            lab_name: "CARE Laboratorio Clínico".to_string(),
            branch: "Matriz".to_string(),
            address: String::new(),
            phone: String::new(),
            cost_policy: CostPolicy::default(),
        }
    }
}

impl LabConfig {
    /// Load configuration from a JSON file; a missing file yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load `configuracion.json` from a data directory.
    pub fn load_from_dir<P: AsRef<Path>>(data_dir: P) -> StoreResult<Self> {
        Self::load(data_dir.as_ref().join(CONFIG_FILE_NAME))
    }
}
