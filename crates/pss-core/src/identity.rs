//! # Identity Resolver
//!
//! Maps a participant's natural name to its stable external identifier.
//!
//! - Populated only as a side effect of node classification
//! - Keyed by natural name, never by output identifier
//! - Write-once per key: the first identity registered for a name is kept
//!   for the rest of the run
//! - No removal operation

use crate::{Identity, PssError};
use std::collections::BTreeMap;

/// Run-scoped natural name -> identity table.
#[derive(Debug, Clone, Default)]
pub struct IdentityTable {
    entries: BTreeMap<String, Identity>,
}

impl IdentityTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the identity of a classified node.
    ///
    /// Registering the same identity again is a no-op. A different identity
    /// for an already registered name is refused with
    /// `PssError::IdentityConflict`; the original mapping stays in place.
    pub fn register(&mut self, name: &str, identity: Identity) -> Result<(), PssError> {
        match self.entries.get(name) {
            Some(existing) if *existing == identity => Ok(()),
            Some(existing) => Err(PssError::IdentityConflict {
                name: name.to_string(),
                existing: existing.clone(),
                attempted: identity,
            }),
            None => {
                self.entries.insert(name.to_string(), identity);
                Ok(())
            }
        }
    }

    /// Resolve a natural name.
    pub fn resolve(&self, name: &str) -> Result<&Identity, PssError> {
        self.entries
            .get(name)
            .ok_or_else(|| PssError::UnresolvedIdentity(name.to_string()))
    }

    /// Check whether a name has been registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Identity)> for IdentityTable {
    /// Build a table from pairs; on duplicate names the first pair wins.
    fn from_iter<T: IntoIterator<Item = (S, Identity)>>(iter: T) -> Self {
        let mut entries = BTreeMap::new();
        for (name, identity) in iter {
            entries.entry(name.into()).or_insert(identity);
        }
        Self { entries }
    }
}

// =============================================================================
// TESTS
// =============================================================================
