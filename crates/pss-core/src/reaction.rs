//! # Reaction Processing
//!
//! One reaction pattern in, the reaction's edges out.
//!
//! Combines participant classification with category dispatch. A reaction
//! whose category label is not recognized yields no edges; that is not an
//! error.

use crate::diagnostics::Diagnostics;
use crate::identity::IdentityTable;
use crate::participant::{classify_participants, reaction_properties};
use crate::rules::generate_for_label;
use crate::{OutputEdge, PssError, RawReactionPattern};

/// Process a single reaction pattern.
///
/// Unresolvable participants are reported on `diagnostics` and skipped.
///
/// # Errors
/// Returns an error when the pattern is malformed; the caller abandons this
/// reaction and moves on to the next one.
pub fn process_reaction(
    pattern: &RawReactionPattern,
    identities: &IdentityTable,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<OutputEdge>, PssError> {
    let reaction = &pattern.reaction;
    let classified = classify_participants(pattern, identities, diagnostics)?;
    let props = reaction_properties(reaction);
    Ok(generate_for_label(&reaction.reaction_type, &classified, &props))
}

// =============================================================================
// TESTS
// =============================================================================
