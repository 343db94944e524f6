//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use care_lab_core::intake::TestSelection;
use care_lab_core::{CostPolicy, Sex};

#[derive(Parser)]
#[command(
    name = "care-lab",
    version,
    about = "CARE Lab - clinical laboratory orders, results and cost summaries",
    long_about = "Register patients and their test orders, record results, print\n\
                  reports and compute the cost summary of each order.\n\n\
                  Data lives in JSON files under the data directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the collection files.
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        env = "CARE_DATA_DIR",
        default_value = "datos",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Configuration file (default: <DATA_DIR>/configuracion.json).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register, list, edit and delete patients.
    #[command(subcommand)]
    Patients(PatientsCommand),

    /// Show the cost summary of a patient's order.
    Summary(SummaryArgs),

    /// List and record test results.
    #[command(subcommand)]
    Results(ResultsCommand),

    /// Print the results report of a patient.
    Report {
        #[arg(value_name = "FOLIO")]
        folio: String,
    },

    /// Inspect and administer the test and price catalogs.
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Export billing data or raw collection files.
    #[command(subcommand)]
    Export(ExportCommand),

    /// Interactive console menu.
    Menu,
}

#[derive(Subcommand)]
pub enum PatientsCommand {
    /// List registered patients.
    List,

    /// Show one patient and its order.
    Show {
        #[arg(value_name = "FOLIO")]
        folio: String,
    },

    /// Register a patient.
    Register(RegisterArgs),

    /// Edit a patient's data or test order.
    Edit(EditArgs),

    /// Delete a patient and its results.
    Delete {
        #[arg(value_name = "FOLIO")]
        folio: String,
    },
}

#[derive(Args)]
pub struct RegisterArgs {
    /// Full name.
    #[arg(long)]
    pub name: String,

    /// Birth date (YYYY-MM-DD); the age is derived from it.
    #[arg(long = "birth-date", value_name = "DATE")]
    pub birth_date: Option<String>,

    /// Age in years, used when no birth date is given.
    #[arg(long)]
    pub age: Option<String>,

    /// Sex (M, F or O).
    #[arg(long)]
    pub sex: Sex,

    #[arg(long, default_value = "")]
    pub diagnosis: String,

    /// Ordering physician.
    #[arg(long, default_value = "")]
    pub physician: String,

    /// Test to order, as KEY or KEY:LAB (matriz, sigma). Repeatable.
    #[arg(long = "test", value_name = "KEY[:LAB]")]
    pub tests: Vec<TestSelection>,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(value_name = "FOLIO")]
    pub folio: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "birth-date", value_name = "DATE")]
    pub birth_date: Option<String>,

    #[arg(long)]
    pub age: Option<String>,

    #[arg(long)]
    pub sex: Option<Sex>,

    #[arg(long)]
    pub diagnosis: Option<String>,

    #[arg(long)]
    pub physician: Option<String>,

    /// Test to add, as KEY or KEY:LAB. Repeatable.
    #[arg(long = "add", value_name = "KEY[:LAB]")]
    pub add: Vec<TestSelection>,

    /// Test key to remove. Repeatable.
    #[arg(long = "remove", value_name = "KEY")]
    pub remove: Vec<String>,

    /// Move an ordered test to another lab, as KEY:LAB. Repeatable.
    #[arg(long = "reassign", value_name = "KEY:LAB")]
    pub reassign: Vec<TestSelection>,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[arg(value_name = "FOLIO")]
    pub folio: String,

    /// Override the configured cost policy (both-labs, assigned-lab).
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<CostPolicy>,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ResultsCommand {
    /// List the results recorded for a folio.
    List {
        #[arg(value_name = "FOLIO")]
        folio: String,
    },

    /// Record a result, overwriting a previous value.
    Record {
        #[arg(value_name = "FOLIO")]
        folio: String,

        /// Test or parameter key.
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "VALUE")]
        value: String,

        /// Fail unless a result already exists for this key.
        #[arg(long)]
        edit: bool,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List the test catalog.
    Tests,

    /// List sample containers.
    Containers,

    /// List the price catalog.
    Prices,

    /// Replace the test catalog from a JSON array of rows.
    ImportTests {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Replace the price catalog from a JSON array of rows.
    ImportPrices {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Replace the container list from a JSON array of {id, nombre}.
    ImportContainers {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Insert or replace one test from a JSON object in catalog format.
    /// Multi-parameter tests are added this way.
    UpsertTest {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Insert or replace the prices of one test from a JSON object.
    UpsertPrice {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Fuzzy search of tests by key or name.
    Search {
        #[arg(value_name = "QUERY")]
        query: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum ExportCommand {
    /// Billing export of one or every patient.
    Billing {
        /// Export a single folio.
        #[arg(long)]
        folio: Option<String>,

        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormatArg,

        /// Write to a file instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Raw contents of a collection file.
    Collection {
        /// patients, results, tests, containers, prices (or the file name).
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Json,
    Csv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
