//! Subcommand handlers.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::de::DeserializeOwned;
use tracing::{info, info_span};

use care_lab_core::admin::{PriceDraft, TestDraft};
use care_lab_core::export::BillingExporter;
use care_lab_core::models::Container;
use care_lab_core::{
    Clinic, Collection, LabConfig, LabTest, NewPatient, PatientEdit, PriceEntry, Store,
};

use crate::cli::{
    CatalogCommand, Command, EditArgs, ExportCommand, ExportFormatArg, PatientsCommand,
    RegisterArgs, ResultsCommand, SummaryArgs,
};
use crate::render;

/// Store and configuration a command runs against.
pub struct Workspace {
    store: Store,
    config: LabConfig,
}

impl Workspace {
    /// Open the data directory and load its configuration.
    ///
    /// `config_path` overrides `<data_dir>/configuracion.json`.
    pub fn open(data_dir: &Path, config_path: Option<&Path>) -> Result<Self> {
        let store = Store::open(data_dir)
            .with_context(|| format!("open data directory {}", data_dir.display()))?;
        let config = match config_path {
            Some(path) => LabConfig::load(path)
                .with_context(|| format!("load configuration {}", path.display()))?,
            None => LabConfig::load_from_dir(data_dir).context("load configuration")?,
        };
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn clinic(&self) -> Clinic<'_> {
        Clinic::new(&self.store, &self.config)
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Run a non-interactive command, writing its output to `out`.
pub fn run_command(command: Command, workspace: &Workspace, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Patients(cmd) => run_patients(cmd, workspace, out),
        Command::Summary(args) => run_summary(&args, workspace, out),
        Command::Results(cmd) => run_results(cmd, workspace, out),
        Command::Report { folio } => {
            let report = workspace.clinic().report(&folio, now().date())?;
            write!(out, "{}", report.to_text())?;
            Ok(())
        }
        Command::Catalog(cmd) => run_catalog(cmd, workspace, out),
        Command::Export(cmd) => run_export(cmd, workspace, out),
        Command::Menu => anyhow::bail!("the menu is interactive; run it from main"),
    }
}

// =========================================================================
// Patients
// =========================================================================

pub fn run_patients(cmd: PatientsCommand, workspace: &Workspace, out: &mut impl Write) -> Result<()> {
    let clinic = workspace.clinic();
    match cmd {
        PatientsCommand::List => {
            let patients = clinic.list_patients()?;
            writeln!(out, "{}", render::patients_table(&patients))?;
        }
        PatientsCommand::Show { folio } => {
            let patient = clinic.patient(&folio)?;
            writeln!(
                out,
                "{} | {} | age {} | {} | {}",
                patient.folio, patient.name, patient.age, patient.sex, patient.physician
            )?;
            writeln!(out, "{}", render::order_table(&patient))?;
        }
        PatientsCommand::Register(args) => {
            let patient = clinic.register_patient(new_patient(args), now())?;
            writeln!(out, "Registered {} ({})", patient.folio, patient.name)?;
            writeln!(out, "{}", render::order_table(&patient))?;
        }
        PatientsCommand::Edit(args) => {
            let folio = args.folio.clone();
            let patient = clinic.edit_patient(&folio, patient_edit(args), now().date())?;
            writeln!(out, "Updated {}", patient.folio)?;
            writeln!(out, "{}", render::order_table(&patient))?;
        }
        PatientsCommand::Delete { folio } => {
            clinic.delete_patient(&folio)?;
            writeln!(out, "Deleted {}", folio)?;
        }
    }
    Ok(())
}

fn new_patient(args: RegisterArgs) -> NewPatient {
    NewPatient {
        name: args.name,
        birth_date: args.birth_date,
        manual_age: args.age,
        sex: args.sex,
        diagnosis: args.diagnosis,
        physician: args.physician,
        tests: args.tests,
    }
}

fn patient_edit(args: EditArgs) -> PatientEdit {
    PatientEdit {
        name: args.name,
        birth_date: args.birth_date,
        manual_age: args.age,
        sex: args.sex,
        diagnosis: args.diagnosis,
        physician: args.physician,
        add_tests: args.add,
        remove_tests: args.remove,
        reassign: args.reassign,
    }
}

pub fn run_summary(args: &SummaryArgs, workspace: &Workspace, out: &mut impl Write) -> Result<()> {
    let mut config = workspace.config().clone();
    if let Some(policy) = args.policy {
        config.cost_policy = policy;
    }
    let summary = Clinic::new(workspace.store(), &config).summary(&args.folio)?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(out, "{}", render::summary_text(&summary))?;
    }
    Ok(())
}

// =========================================================================
// Results
// =========================================================================

pub fn run_results(cmd: ResultsCommand, workspace: &Workspace, out: &mut impl Write) -> Result<()> {
    let clinic = workspace.clinic();
    match cmd {
        ResultsCommand::List { folio } => {
            let results = clinic.results(&folio)?;
            writeln!(out, "{}", render::results_table(&results))?;
        }
        ResultsCommand::Record {
            folio,
            key,
            value,
            edit,
        } => {
            let result = if edit {
                clinic.edit_result(&folio, &key, &value, now())?
            } else {
                clinic.record_result(&folio, &key, &value, now())?
            };
            writeln!(
                out,
                "{} {}: {} {}",
                result.folio, result.name, result.value, result.unit
            )?;
        }
    }
    Ok(())
}

// =========================================================================
// Catalog
// =========================================================================

pub fn run_catalog(cmd: CatalogCommand, workspace: &Workspace, out: &mut impl Write) -> Result<()> {
    let clinic = workspace.clinic();
    match cmd {
        CatalogCommand::Tests => {
            writeln!(out, "{}", render::tests_table(&clinic.list_tests()?))?;
        }
        CatalogCommand::Containers => {
            writeln!(out, "{}", render::containers_table(&clinic.list_containers()?))?;
        }
        CatalogCommand::Prices => {
            writeln!(out, "{}", render::prices_table(&clinic.list_prices()?))?;
        }
        CatalogCommand::ImportTests { file } => {
            let _span = info_span!("import_tests", file = %file.display()).entered();
            let drafts: Vec<TestDraft> = read_json(&file)?;
            let outcome = clinic.save_test_batch(&drafts)?;
            info!(saved = outcome.saved, skipped = outcome.skipped.len(), "test catalog imported");
            writeln!(out, "{}", render::batch_text(&outcome))?;
        }
        CatalogCommand::ImportPrices { file } => {
            let _span = info_span!("import_prices", file = %file.display()).entered();
            let drafts: Vec<PriceDraft> = read_json(&file)?;
            let outcome = clinic.save_price_batch(&drafts)?;
            info!(saved = outcome.saved, skipped = outcome.skipped.len(), "price catalog imported");
            writeln!(out, "{}", render::batch_text(&outcome))?;
        }
        CatalogCommand::ImportContainers { file } => {
            let containers: Vec<Container> = read_json(&file)?;
            clinic.save_containers(&containers)?;
            writeln!(out, "Saved {} containers", containers.len())?;
        }
        CatalogCommand::UpsertTest { file } => {
            let test: LabTest = read_json(&file)?;
            clinic.upsert_test(&test)?;
            let parameters = test.parameters().len();
            if parameters > 0 {
                writeln!(out, "Saved test {} with {} parameters", test.key, parameters)?;
            } else {
                writeln!(out, "Saved test {}", test.key)?;
            }
        }
        CatalogCommand::UpsertPrice { file } => {
            let entry: PriceEntry = read_json(&file)?;
            clinic.upsert_price(&entry)?;
            writeln!(out, "Saved prices for {}", entry.id)?;
        }
        CatalogCommand::Search { query, limit } => {
            let matches = clinic.search_tests(&query, limit)?;
            writeln!(out, "{}", render::matches_table(&matches))?;
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

// =========================================================================
// Export
// =========================================================================

pub fn run_export(cmd: ExportCommand, workspace: &Workspace, out: &mut impl Write) -> Result<()> {
    match cmd {
        ExportCommand::Billing {
            folio,
            format,
            output,
        } => {
            let exporter = BillingExporter::new(workspace.store(), workspace.config());
            let text = match folio {
                Some(folio) => {
                    let export = exporter.export_folio(&folio)?;
                    match format {
                        ExportFormatArg::Json => export.to_json()?,
                        ExportFormatArg::Csv => export.to_csv(),
                    }
                }
                None => {
                    let batch = exporter.export_all()?;
                    match format {
                        ExportFormatArg::Json => batch.to_json()?,
                        ExportFormatArg::Csv => batch.to_csv(),
                    }
                }
            };
            emit(&text, output.as_deref(), out)
        }
        ExportCommand::Collection { name, output } => {
            let collection: Collection = name.parse()?;
            let text = workspace.store().raw(collection)?;
            emit(&text, output.as_deref(), out)
        }
    }
}

fn emit(text: &str, path: Option<&Path>, out: &mut impl Write) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), bytes = text.len(), "export written");
        }
        None => writeln!(out, "{}", text.trim_end())?,
    }
    Ok(())
}
