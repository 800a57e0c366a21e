//! # Diagnostics
//!
//! Side-channel report of recoverable failures.
//!
//! Every skipped participant, unclassifiable node, or abandoned record
//! produces exactly one `Diagnostic`. Reporting never interrupts iteration:
//! the engine favors maximal partial output over strict validation.
//!
//! Each report is also emitted as a `tracing` warning so the binary's
//! subscriber sees it in context.

use crate::PssError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category of a recoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A name or label set that resolves to nothing. The single item is skipped.
    UnresolvedReference,
    /// A record missing something the active rule requires. The record is abandoned.
    MalformedRecord,
    /// Not tied to one record (I/O, pass sequencing). Never produced by the passes.
    Fatal,
}

impl DiagnosticKind {
    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnresolvedReference => "unresolved_reference",
            Self::MalformedRecord => "malformed_record",
            Self::Fatal => "fatal",
        }
    }
}

/// One reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl From<&PssError> for Diagnostic {
    fn from(error: &PssError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Ordered collection of diagnostics for one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recoverable error.
    pub fn report(&mut self, error: &PssError) {
        let diagnostic = Diagnostic::from(error);
        tracing::warn!(kind = diagnostic.kind.as_str(), "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// All diagnostics in report order.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of diagnostics recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count diagnostics per kind.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.kind).or_insert(0usize) += 1;
        }
        counts
    }

    /// Consume the collector.
    #[must_use]
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

// =============================================================================
// TESTS
// =============================================================================
