//! Billing export of patient summaries.

use serde::{Deserialize, Serialize};

use crate::clinic::{ClinicError, ClinicResult, PatientSummary};
use crate::config::LabConfig;
use crate::costing::{CostPolicy, CostSummary};
use crate::models::{round2, Lab, Patient, PriceCatalog};
use crate::store::Store;

/// Billing export for a single patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingExport {
    /// Export metadata
    pub metadata: BillingMetadata,
    /// Ordered tests
    pub line_items: Vec<BillingLineItem>,
    /// Cost summary, rounded to 2 decimals
    pub costs: CostSummary,
}

/// Billing export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingMetadata {
    pub folio: String,
    pub patient_name: String,
    /// Ordering physician
    pub physician: String,
    /// Registration timestamp
    pub registered_at: String,
    /// Export timestamp
    pub exported_at: String,
    /// Cost attribution in effect
    pub cost_policy: CostPolicy,
}

/// Single line item for billing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingLineItem {
    /// Test key
    pub key: String,
    /// Test name frozen on the order
    pub description: String,
    /// Processing lab
    pub lab: Lab,
    /// Price frozen on the order
    pub charged_price: f64,
    /// Current catalog price, if any
    pub list_price: Option<f64>,
}

impl BillingExport {
    /// Create a billing export from a patient and the current prices.
    pub fn from_patient(patient: &Patient, prices: &PriceCatalog, policy: CostPolicy) -> Self {
        let summary = PatientSummary::build(patient, prices, policy);
        let line_items = summary
            .lines
            .into_iter()
            .map(|line| BillingLineItem {
                key: line.key,
                description: line.name,
                lab: line.lab,
                charged_price: line.charged_price,
                list_price: line.list_price,
            })
            .collect();

        Self {
            metadata: BillingMetadata {
                folio: patient.folio.clone(),
                patient_name: patient.name.clone(),
                physician: patient.physician.clone(),
                registered_at: patient.registered_at.clone(),
                exported_at: chrono::Local::now().to_rfc3339(),
                cost_policy: policy,
            },
            line_items,
            costs: summary.costs,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        push_csv_lines(&mut csv, self);
        csv
    }
}

/// Batch billing export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchBillingExport {
    /// Export timestamp
    pub exported_at: String,
    /// Individual patient exports
    pub patients: Vec<BillingExport>,
    /// Total line item count
    pub total_items: usize,
    /// Sum of every patient's total (with tax)
    pub grand_total: f64,
}

impl BatchBillingExport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        for export in &self.patients {
            push_csv_lines(&mut csv, export);
        }
        csv
    }
}

const CSV_HEADER: &str =
    "folio,patient,physician,key,description,lab,charged_price,list_price,subtotal,tax,total\n";

fn push_csv_lines(csv: &mut String, export: &BillingExport) {
    for item in &export.line_items {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{:.2},{},{:.2},{:.2},{:.2}\n",
            escape_csv(&export.metadata.folio),
            escape_csv(&export.metadata.patient_name),
            escape_csv(&export.metadata.physician),
            escape_csv(&item.key),
            escape_csv(&item.description),
            item.lab,
            item.charged_price,
            item.list_price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
            export.costs.subtotal,
            export.costs.tax,
            export.costs.total,
        ));
    }
}

/// Billing exporter.
pub struct BillingExporter<'a> {
    store: &'a Store,
    config: &'a LabConfig,
}

impl<'a> BillingExporter<'a> {
    /// Create a new billing exporter.
    pub fn new(store: &'a Store, config: &'a LabConfig) -> Self {
        Self { store, config }
    }

    /// Export billing for one folio.
    pub fn export_folio(&self, folio: &str) -> ClinicResult<BillingExport> {
        let patient = self
            .store
            .get_patient(folio)?
            .ok_or_else(|| ClinicError::PatientNotFound(folio.to_string()))?;
        let prices = self.store.price_catalog()?;
        Ok(BillingExport::from_patient(&patient, &prices, self.config.cost_policy))
    }

    /// Export billing for every patient.
    pub fn export_all(&self) -> ClinicResult<BatchBillingExport> {
        let prices = self.store.price_catalog()?;
        let patients: Vec<BillingExport> = self
            .store
            .list_patients()?
            .iter()
            .map(|p| BillingExport::from_patient(p, &prices, self.config.cost_policy))
            .collect();
        let total_items = patients.iter().map(|p| p.line_items.len()).sum();
        let grand_total = round2(patients.iter().map(|p| p.costs.total).sum());

        Ok(BatchBillingExport {
            exported_at: chrono::Local::now().to_rfc3339(),
            patients,
            total_items,
            grand_total,
        })
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
