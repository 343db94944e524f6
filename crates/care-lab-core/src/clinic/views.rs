//! View models handed to the presentation layer.

use serde::Serialize;

use crate::costing::{summarize, CostPolicy, CostSummary};
use crate::models::{round2, Lab, Patient, PriceCatalog};

/// One ordered test as shown in a summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub key: String,
    pub name: String,
    pub lab: Lab,
    /// Price frozen on the order
    pub charged_price: f64,
    /// Current catalog price for the assigned lab, if priced
    pub list_price: Option<f64>,
}

/// Financial summary ("resumen") of a patient's order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientSummary {
    pub folio: String,
    pub name: String,
    pub age: u32,
    pub sex: String,
    pub physician: String,
    pub diagnosis: String,
    pub lines: Vec<SummaryLine>,
    pub policy: CostPolicy,
    /// Amounts rounded to 2 decimals
    pub costs: CostSummary,
}

impl PatientSummary {
    pub fn build(patient: &Patient, prices: &PriceCatalog, policy: CostPolicy) -> Self {
        let lines = patient
            .tests
            .iter()
            .map(|test| SummaryLine {
                key: test.key.clone(),
                name: test.name.clone(),
                lab: test.processed_at,
                charged_price: round2(test.price),
                list_price: prices
                    .for_test(&test.key)
                    .map(|entry| round2(entry.public_price(test.processed_at))),
            })
            .collect();

        Self {
            folio: patient.folio.clone(),
            name: patient.name.clone(),
            age: patient.age,
            sex: patient.sex.to_string(),
            physician: patient.physician.clone(),
            diagnosis: patient.diagnosis.clone(),
            lines,
            policy,
            costs: summarize(&patient.tests, prices, policy).rounded(),
        }
    }
}
