//! Domain models for the laboratory.

mod catalog;
mod patient;
mod pricing;
mod result;

pub use catalog::*;
pub use patient::*;
pub use pricing::*;
pub use result::*;
