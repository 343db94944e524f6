//! Cost and pricing aggregation for a patient's order.
//!
//! Given the ordered tests and the price catalog, [`summarize`] derives the
//! subtotal charged, the cost buckets (manufacturing per lab, materials,
//! shipping), the margin, tax (IVA) and grand total.
//!
//! Two cost policies exist:
//!
//! - [`CostPolicy::BothLabs`] (default): every ordered test adds the full cost
//!   breakdown of *both* labs, regardless of where it is processed. This is
//!   the behavior of the production system and is kept as the default even
//!   though it almost certainly double counts; product owners have to confirm
//!   before it changes.
//! - [`CostPolicy::AssignedLab`]: manufacturing comes only from the lab each
//!   test is processed at, and materials/shipping are charged once per lab
//!   that receives at least one test.

mod aggregator;

pub use aggregator::*;
