//! Printable results report.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::LabConfig;
use crate::models::{LabTest, Patient, RangeFlag, TestResult};

/// Laboratory identity block of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabHeader {
    pub name: String,
    pub branch: String,
    pub address: String,
    pub phone: String,
}

impl From<&LabConfig> for LabHeader {
    fn from(config: &LabConfig) -> Self {
        Self {
            name: config.lab_name.clone(),
            branch: config.branch.clone(),
            address: config.address.clone(),
            phone: config.phone.clone(),
        }
    }
}

/// One result row of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub key: String,
    pub name: String,
    pub value: String,
    pub unit: String,
    pub normal_range: String,
    /// "ALTO", "BAJO" or empty
    pub flag: String,
}

impl From<&TestResult> for ReportRow {
    fn from(result: &TestResult) -> Self {
        Self {
            key: result.key.clone(),
            name: result.name.clone(),
            value: result.value.clone(),
            unit: result.unit.clone(),
            normal_range: result.normal_range.clone(),
            flag: result.range_flag().label().to_string(),
        }
    }
}

/// Results report for one patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsReport {
    pub header: LabHeader,
    pub folio: String,
    pub patient_name: String,
    pub age: u32,
    pub sex: String,
    pub physician: String,
    /// DD/MM/YYYY
    pub printed_on: String,
    pub rows: Vec<ReportRow>,
    /// Ordered tests that have no result yet
    pub pending: Vec<String>,
}

const RULE_WIDTH: usize = 60;

impl ResultsReport {
    /// An ordered test is pending until a result exists under its key or,
    /// for a multi-parameter test in `catalog`, under any parameter key.
    pub fn build(
        config: &LabConfig,
        patient: &Patient,
        catalog: &[LabTest],
        results: &[TestResult],
        today: NaiveDate,
    ) -> Self {
        let pending = patient
            .tests
            .iter()
            .filter(|ordered| {
                let test = catalog.iter().find(|t| t.key == ordered.key);
                !results.iter().any(|r| match test {
                    Some(test) => test.answers(&r.key),
                    None => r.key == ordered.key,
                })
            })
            .map(|ordered| ordered.name.clone())
            .collect();

        Self {
            header: LabHeader::from(config),
            folio: patient.folio.clone(),
            patient_name: patient.name.clone(),
            age: patient.age,
            sex: patient.sex.to_string(),
            physician: patient.physician.clone(),
            printed_on: today.format("%d/%m/%Y").to_string(),
            rows: results.iter().map(ReportRow::from).collect(),
            pending,
        }
    }

    /// Number of rows outside their normal range.
    pub fn out_of_range_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.flag.is_empty()).count()
    }

    /// Plain-text rendering for consoles and printers.
    pub fn to_text(&self) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);
        let mut out = String::new();

        out.push_str(&format!("{}\n", heavy));
        out.push_str(&format!("{:^width$}\n", "REPORTE DE RESULTADOS", width = RULE_WIDTH));
        out.push_str(&format!("{}\n", heavy));
        out.push_str(&format!("Laboratorio: {}\n", self.header.name));
        out.push_str(&format!("Sucursal: {}\n", self.header.branch));
        if !self.header.address.is_empty() {
            out.push_str(&format!("Dirección: {}\n", self.header.address));
        }
        if !self.header.phone.is_empty() {
            out.push_str(&format!("Teléfono: {}\n", self.header.phone));
        }
        out.push_str(&format!("{}\n", light));
        out.push_str(&format!("Paciente: {}\n", self.patient_name));
        out.push_str(&format!(
            "Folio: {} | Edad: {} | Sexo: {}\n",
            self.folio, self.age, self.sex
        ));
        out.push_str(&format!(
            "Médico: {} | Fecha: {}\n",
            self.physician, self.printed_on
        ));
        out.push_str(&format!("{}\n", light));

        if self.rows.is_empty() {
            out.push_str("No hay resultados registrados.\n");
        } else {
            out.push_str(&format!(
                "{:<20} {:<15} {:<10} {}\n",
                "Prueba", "Resultado", "Unidad", "Normales"
            ));
            out.push_str(&format!("{}\n", light));
            for row in &self.rows {
                let value = match row.flag.as_str() {
                    "" => row.value.clone(),
                    flag => format!("{} {}", row.value, flag),
                };
                out.push_str(&format!(
                    "{:<20} {:<15} {:<10} {}\n",
                    row.name, value, row.unit, row.normal_range
                ));
            }
        }
        if !self.pending.is_empty() {
            out.push_str(&format!("Pendientes: {}\n", self.pending.join(", ")));
        }

        out.push_str("\nNota: Los valores fuera de rango deben ser revisados por el médico.\n");
        out.push_str("Firma del químico: _________________________\n");
        out.push_str(&format!("{}\n", heavy));
        out
    }
}
