//! Billing export and printable reports.

mod billing;
mod report;

pub use billing::*;
pub use report::*;
