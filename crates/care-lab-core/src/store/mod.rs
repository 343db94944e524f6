//! JSON file store for CARE Lab collections.
//!
//! Every collection lives in its own pretty-printed JSON array under one
//! data directory. Reads load the whole file; writes rewrite it.

mod catalog;
mod patients;
mod results;

#[allow(unused_imports)]
pub use catalog::*;
#[allow(unused_imports)]
pub use patients::*;
#[allow(unused_imports)]
pub use results::*;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A write was refused because rewriting the file would drop content
    /// the loader could not read.
    #[error("{collection} has unreadable content, fix the file before writing: {detail}")]
    Malformed {
        collection: Collection,
        detail: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Patients,
    Results,
    Tests,
    Containers,
    Prices,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Patients,
        Collection::Results,
        Collection::Tests,
        Collection::Containers,
        Collection::Prices,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Patients => "pacientes.json",
            Collection::Results => "resultados.json",
            Collection::Tests => "pruebas.json",
            Collection::Containers => "contenedores.json",
            Collection::Prices => "precios.json",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Patients => "patients",
            Collection::Results => "results",
            Collection::Tests => "tests",
            Collection::Containers => "containers",
            Collection::Prices => "prices",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == wanted || c.file_name() == wanted)
            .ok_or_else(|| StoreError::NotFound(format!("collection {}", s)))
    }
}

/// Handle on a data directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open the store at `root`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    /// Load a whole collection.
    ///
    /// A missing, empty or unparseable file yields an empty collection.
    /// Elements that do not match the record shape are skipped.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
        let decoded = self.decode(collection)?;
        for problem in &decoded.rejected {
            warn!(collection = %collection, %problem, "skipping unreadable content");
        }
        Ok(decoded.records)
    }

    /// Load a collection that is about to be rewritten.
    ///
    /// Unlike [`Store::load`], anything the lenient read would skip is an
    /// error, so a rewrite never drops records it could not read.
    pub fn load_for_update<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
        let decoded = self.decode(collection)?;
        if let Some(first) = decoded.rejected.first() {
            let detail = match decoded.rejected.len() {
                1 => first.clone(),
                n => format!("{} (and {} more)", first, n - 1),
            };
            warn!(collection = %collection, %detail, "refusing to rewrite collection");
            return Err(StoreError::Malformed { collection, detail });
        }
        Ok(decoded.records)
    }

    fn decode<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Decoded<T>> {
        let path = self.path_of(collection);
        if !path.exists() {
            return Ok(Decoded::empty());
        }
        let text = fs::read_to_string(&path)?;
        if text.trim().is_empty() {
            return Ok(Decoded::empty());
        }

        let elements = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Array(elements)) => elements,
            Ok(_) => return Ok(Decoded::unreadable("file is not a JSON array".to_string())),
            Err(error) => return Ok(Decoded::unreadable(format!("malformed file: {}", error))),
        };

        let total = elements.len();
        let mut decoded = Decoded::empty();
        for (index, element) in elements.into_iter().enumerate() {
            match serde_json::from_value(element) {
                Ok(record) => decoded.records.push(record),
                Err(error) => decoded.rejected.push(format!("record {}: {}", index, error)),
            }
        }
        debug!(collection = %collection, loaded = decoded.records.len(), total, "loaded collection");
        Ok(decoded)
    }

    /// Rewrite a whole collection.
    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> StoreResult<()> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        records.serialize(&mut serializer)?;

        let path = self.path_of(collection);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, &buffer)?;
        fs::rename(&staging, &path)?;
        debug!(collection = %collection, records = records.len(), "saved collection");
        Ok(())
    }

    /// Raw file contents of a collection, `[]` when it was never written.
    pub fn raw(&self, collection: Collection) -> StoreResult<String> {
        let path = self.path_of(collection);
        if !path.exists() {
            return Ok("[]".to_string());
        }
        Ok(fs::read_to_string(path)?)
    }
}

/// Records read from a collection file and what could not be read.
struct Decoded<T> {
    records: Vec<T>,
    rejected: Vec<String>,
}

impl<T> Decoded<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }

    fn unreadable(problem: String) -> Self {
        Self {
            records: Vec::new(),
            rejected: vec![problem],
        }
    }
}
