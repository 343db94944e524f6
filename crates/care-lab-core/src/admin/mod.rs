//! Catalog administration.
//!
//! Catalog edits arrive as batches of loosely typed drafts (one per form
//! row). Each draft is validated on its own: a row whose numeric fields do
//! not parse is skipped and reported, and the rest of the batch is kept.

mod drafts;

pub use drafts::*;

use serde::Serialize;

/// A draft that was left out of a batch save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedDraft {
    /// Position of the draft in the submitted batch
    pub index: usize,
    /// Key of the draft, if it had one
    pub key: String,
    pub reason: String,
}

/// Outcome of a batch catalog save.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub saved: usize,
    pub skipped: Vec<SkippedDraft>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}
