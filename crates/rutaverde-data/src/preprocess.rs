//! Idempotent enrichment of raw features into canonical zone and site
//! records.
//!
//! Both entry points are traits implemented for [`RawCollection`] and for the
//! canonical collection they produce. Calling them on canonical input is a
//! no-op, so idempotence holds at the type level; a raw document whose first
//! feature already carries the processed marker is read back as canonical
//! without recomputation.

mod sites;
mod zones;

use std::collections::BTreeSet;

pub use sites::{preprocess_site, PreprocessSites};
pub use zones::{preprocess_zone, PreprocessZones};

/// State scoped to one preprocessing call
#[derive(Debug, Default)]
pub struct PreprocessContext {
    unresolved: BTreeSet<String>,
    failed: Vec<usize>,
}

impl PreprocessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a locality without an operator. Returns `true` the first time
    /// a normalized name is seen, which is when the warning is logged.
    pub fn note_unresolved_locality(&mut self, normalized: &str) -> bool {
        if self.unresolved.contains(normalized) {
            return false;
        }
        tracing::warn!(locality = normalized, "No operator for locality");
        self.unresolved.insert(normalized.to_string())
    }

    /// Normalized locality names warned about during this call
    pub fn unresolved_localities(&self) -> Vec<&str> {
        self.unresolved.iter().map(String::as_str).collect()
    }

    pub(crate) fn note_failure(&mut self, index: usize) {
        self.failed.push(index);
    }

    /// Features whose preprocessing failed
    pub fn failed_features(&self) -> &[usize] {
        &self.failed
    }
}
