//! Patient intake: folio numbering, age resolution and test assignment.

mod age;
mod assignment;
mod folio;

pub use age::*;
pub use assignment::*;
pub use folio::*;

use thiserror::Error;

/// Intake errors.
#[derive(Error, Debug, PartialEq)]
pub enum IntakeError {
    #[error("Test not found in catalog: {0}")]
    UnknownTest(String),

    #[error("Invalid birth date '{0}', expected YYYY-MM-DD")]
    InvalidBirthDate(String),
}

pub type IntakeResult<T> = Result<T, IntakeError>;
