//! # Gene Annotations
//!
//! Precomputed annotation table used to expand a functional cluster's
//! homologue list into gene nodes.
//!
//! The table is supplied already downloaded; `from_tsv` reads the tab-separated
//! CKN export with a header row. Only rows carrying a TAIR locus are kept.

use crate::primitives::{ANNOTATION_SPECIES, ANNOTATION_TAXON};
use crate::{PropertyMap, PropertyValue, PssError};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Source column -> stored property.
const COLUMN_MAP: [(&str, &str); 5] = [
    ("short_name", "name"),
    ("synonyms", "synonyms"),
    ("full_name", "description"),
    ("GMM", "gomapman_annotations"),
    ("node_type", "type"),
];

const KEY_COLUMN: &str = "node_ID";
const TAIR_COLUMN: &str = "TAIR";

/// Annotation properties keyed by gene identifier.
#[derive(Debug, Clone, Default)]
pub struct GeneAnnotations {
    entries: BTreeMap<String, PropertyMap>,
}

impl GeneAnnotations {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a tab-separated annotation export.
    ///
    /// Empty cells are left out of the stored properties. Every stored row
    /// also gets the fixed `taxon` and `species` properties.
    ///
    /// # Errors
    /// Returns `PssError::Parse` if the header lacks a required column and
    /// `PssError::Io` if reading fails.
    pub fn from_tsv<R: BufRead>(reader: R) -> Result<Self, PssError> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Ok(Self::new()),
        };
        let columns: Vec<&str> = header.trim_end_matches('\r').split('\t').collect();
        let index_of = |name: &str| {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| PssError::Parse(format!("annotation table lacks column '{name}'")))
        };

        let key_idx = index_of(KEY_COLUMN)?;
        let tair_idx = index_of(TAIR_COLUMN)?;
        let mapped = COLUMN_MAP
            .iter()
            .map(|&(column, property)| index_of(column).map(|idx| (idx, property)))
            .collect::<Result<Vec<_>, PssError>>()?;

        let mut table = Self::new();
        for line in lines {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.split('\t').map(unquote).collect();
            let cell = |idx: usize| cells.get(idx).copied().unwrap_or("");

            if cell(tair_idx).is_empty() || cell(key_idx).is_empty() {
                continue;
            }

            let mut props = PropertyMap::new();
            for (idx, property) in &mapped {
                let value = cell(*idx);
                if !value.is_empty() {
                    props.insert((*property).to_string(), PropertyValue::from(value));
                }
            }
            table.insert(cell(key_idx), props);
        }

        tracing::debug!(genes = table.len(), "loaded gene annotations");
        Ok(table)
    }

    /// Insert annotations for a gene; fixed taxon/species are added.
    pub fn insert(&mut self, gene: &str, mut properties: PropertyMap) {
        properties.insert("taxon".to_string(), PropertyValue::from(ANNOTATION_TAXON));
        properties.insert("species".to_string(), PropertyValue::from(ANNOTATION_SPECIES));
        self.entries.insert(gene.to_string(), properties);
    }

    /// Look up a gene's annotation properties.
    #[must_use]
    pub fn get(&self, gene: &str) -> Option<&PropertyMap> {
        self.entries.get(gene)
    }

    /// Number of annotated genes.
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

fn unquote(cell: &str) -> &str {
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}

// =============================================================================
// TESTS
// =============================================================================
