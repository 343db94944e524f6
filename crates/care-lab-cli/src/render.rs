//! Table rendering for terminal output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use care_lab_core::admin::BatchOutcome;
use care_lab_core::models::{Container, TestKind, TestResult};
use care_lab_core::search::TestMatch;
use care_lab_core::{Lab, LabTest, Patient, PatientSummary, PriceEntry};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(headers.iter().map(|h| header_cell(h)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    table
}

pub fn patients_table(patients: &[Patient]) -> Table {
    let mut table = styled_table(&["Folio", "Name", "Age", "Sex", "Physician", "Tests", "Registered"]);
    for patient in patients {
        table.add_row(vec![
            Cell::new(&patient.folio),
            Cell::new(&patient.name),
            Cell::new(patient.age),
            Cell::new(patient.sex),
            Cell::new(&patient.physician),
            Cell::new(patient.tests.len()),
            Cell::new(&patient.registered_at),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    table
}

/// Ordered tests of one patient.
pub fn order_table(patient: &Patient) -> Table {
    let mut table = styled_table(&["Key", "Test", "Lab", "Price"]);
    for test in &patient.tests {
        table.add_row(vec![
            Cell::new(&test.key),
            Cell::new(&test.name),
            Cell::new(test.processed_at),
            Cell::new(money(test.price)),
        ]);
    }
    if !patient.tests.is_empty() {
        table.add_row(vec![
            Cell::new(""),
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(money(patient.order_total())).add_attribute(Attribute::Bold),
        ]);
    }
    align_column(&mut table, 3, CellAlignment::Right);
    table
}

pub fn summary_text(summary: &PatientSummary) -> String {
    let mut lines = styled_table(&["Key", "Test", "Lab", "Charged", "List"]);
    for line in &summary.lines {
        let list = line.list_price.map(money).unwrap_or_else(|| "-".to_string());
        lines.add_row(vec![
            Cell::new(&line.key),
            Cell::new(&line.name),
            Cell::new(line.lab),
            Cell::new(money(line.charged_price)),
            Cell::new(list),
        ]);
    }
    align_column(&mut lines, 3, CellAlignment::Right);
    align_column(&mut lines, 4, CellAlignment::Right);

    let costs = &summary.costs;
    let mut totals = styled_table(&["Concept", "Amount"]);
    let rows = [
        ("Subtotal", costs.subtotal),
        ("Manufacturing (matriz)", costs.manufacturing_matriz),
        ("Manufacturing (sigma)", costs.manufacturing_sigma),
        ("Manufacturing total", costs.total_manufacturing),
        ("Materials", costs.materials),
        ("Shipping", costs.shipping),
        ("Margin", costs.margin),
        ("IVA", costs.tax),
    ];
    for (label, amount) in rows {
        let amount_cell = if amount < 0.0 {
            Cell::new(money(amount)).fg(Color::Red)
        } else {
            Cell::new(money(amount))
        };
        totals.add_row(vec![Cell::new(label), amount_cell]);
    }
    totals.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(money(costs.total)).add_attribute(Attribute::Bold),
    ]);
    align_column(&mut totals, 1, CellAlignment::Right);

    format!(
        "Folio: {}  Patient: {}  Age: {}  Sex: {}\nPhysician: {}  Diagnosis: {}\nCost policy: {}\n{}\n{}",
        summary.folio,
        summary.name,
        summary.age,
        summary.sex,
        summary.physician,
        summary.diagnosis,
        summary.policy,
        lines,
        totals
    )
}

pub fn results_table(results: &[TestResult]) -> Table {
    let mut table = styled_table(&["Key", "Test", "Result", "Unit", "Normal", "Flag", "Recorded"]);
    for result in results {
        let flag = result.range_flag().label();
        let flag_cell = if flag.is_empty() {
            Cell::new("")
        } else {
            Cell::new(flag).fg(Color::Red).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(&result.key),
            Cell::new(&result.name),
            Cell::new(&result.value),
            Cell::new(&result.unit),
            Cell::new(&result.normal_range),
            flag_cell,
            Cell::new(&result.recorded_at),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    table
}

pub fn tests_table(tests: &[LabTest]) -> Table {
    let mut table = styled_table(&["Key", "Name", "Sample", "Container", "Unit", "Normal"]);
    for test in tests {
        let container = test.container_id.map(|id| id.to_string()).unwrap_or_default();
        match &test.kind {
            TestKind::Quantitative { unit, normal_range } => {
                table.add_row(vec![
                    Cell::new(&test.key),
                    Cell::new(&test.name),
                    Cell::new(&test.sample_type),
                    Cell::new(container),
                    Cell::new(unit),
                    Cell::new(normal_range),
                ]);
            }
            TestKind::MultiParameter { parameters } => {
                table.add_row(vec![
                    Cell::new(&test.key),
                    Cell::new(&test.name),
                    Cell::new(&test.sample_type),
                    Cell::new(container),
                    Cell::new(format!("{} parameters", parameters.len())),
                    Cell::new(""),
                ]);
                for parameter in parameters {
                    table.add_row(vec![
                        Cell::new(format!("  {}", parameter.key)),
                        Cell::new(&parameter.name),
                        Cell::new(""),
                        Cell::new(""),
                        Cell::new(&parameter.unit),
                        Cell::new(&parameter.normal_range),
                    ]);
                }
            }
        }
    }
    table
}

pub fn containers_table(containers: &[Container]) -> Table {
    let mut table = styled_table(&["Id", "Name"]);
    for container in containers {
        table.add_row(vec![Cell::new(container.id), Cell::new(&container.name)]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    table
}

pub fn prices_table(prices: &[PriceEntry]) -> Table {
    let mut table = styled_table(&[
        "Test", "Lab", "Maquila", "Materials", "Shipping", "Profit %", "Suggested", "Public", "Valid",
    ]);
    for entry in prices {
        for lab in Lab::ALL {
            let cost = entry.cost(lab);
            table.add_row(vec![
                Cell::new(&entry.id),
                Cell::new(lab),
                Cell::new(money(cost.manufacturing)),
                Cell::new(money(cost.materials)),
                Cell::new(money(cost.shipping)),
                Cell::new(money(entry.profit_pct(lab))),
                Cell::new(money(entry.suggested_price(lab))),
                Cell::new(money(entry.public_price(lab))),
                Cell::new(if entry.is_validated(lab) { "yes" } else { "no" }),
            ]);
        }
    }
    for index in 2..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 8, CellAlignment::Center);
    table
}

pub fn matches_table(matches: &[TestMatch]) -> Table {
    let mut table = styled_table(&["Key", "Name", "Score"]);
    for m in matches {
        table.add_row(vec![
            Cell::new(&m.key),
            Cell::new(&m.name),
            Cell::new(format!("{:.2}", m.score)),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    table
}

pub fn batch_text(outcome: &BatchOutcome) -> String {
    let mut out = format!("Saved {} entries", outcome.saved);
    if outcome.is_clean() {
        return out;
    }
    let mut table = styled_table(&["Row", "Key", "Reason"]);
    for skipped in &outcome.skipped {
        table.add_row(vec![
            Cell::new(skipped.index + 1),
            Cell::new(&skipped.key),
            Cell::new(&skipped.reason).fg(Color::Yellow),
        ]);
    }
    out.push_str(&format!(", skipped {}:\n{}", outcome.skipped.len(), table));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use care_lab_core::admin::SkippedDraft;

    #[test]
    fn test_batch_text_lists_skipped_rows() {
        let outcome = BatchOutcome {
            saved: 2,
            skipped: vec![SkippedDraft {
                index: 1,
                key: "CRE".to_string(),
                reason: "container id is not an integer: 'x'".to_string(),
            }],
        };
        let text = batch_text(&outcome);
        assert!(text.starts_with("Saved 2 entries, skipped 1"));
        assert!(text.contains("CRE"));
    }

    #[test]
    fn test_order_table_totals_snapshot_prices() {
        let ordered = |key: &str, price: f64| care_lab_core::OrderedTest {
            key: key.to_string(),
            name: key.to_string(),
            price,
            processed_at: Lab::Matriz,
        };
        let patient = Patient {
            folio: "250601001".to_string(),
            name: "Ana".to_string(),
            birth_date: None,
            age: 30,
            sex: care_lab_core::Sex::Female,
            diagnosis: String::new(),
            physician: String::new(),
            registered_at: "2025-06-01 09:00:00".to_string(),
            tests: vec![ordered("GLU", 120.0), ordered("CRE", 150.5)],
        };
        let text = order_table(&patient).to_string();
        assert!(text.contains("Total"));
        assert!(text.contains("270.50"));
    }

    #[test]
    fn test_clean_batch_text() {
        let outcome = BatchOutcome {
            saved: 3,
            skipped: Vec::new(),
        };
        assert_eq!(batch_text(&outcome), "Saved 3 entries");
    }
}
