//! # Participant Classifier
//!
//! Splits one reaction pattern into role-sets.
//!
//! The relationship type decides the role and which endpoint moves:
//!
//! | Edge type | Role | Endpoint | Attribute side |
//! |-----------|------|----------|----------------|
//! | `SUBSTRATE`, `TRANSLOCATE_FROM` | Substrate | start | `source_` |
//! | `PRODUCT`, `TRANSLOCATE_TO` | Product | end | `target_` |
//! | `INHIBITS`, `ACTIVATES` | Modifier | start | `source_` |
//!
//! Any other relationship type is ignored. Role-sets preserve the edge
//! order of the pattern so output is reproducible.

use crate::diagnostics::Diagnostics;
use crate::identity::IdentityTable;
use crate::primitives::{CONDITION_FORM, DOI_LINK, REACTION_URL, SKM_PREFIX, all_links};
use crate::{
    Identity, PropertyMap, PropertyValue, PssError, RawNode, RawReaction, RawReactionPattern,
    RawRelationship,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// ROLES
// =============================================================================

/// The function a participant has in a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParticipantRole {
    Substrate,
    Product,
    Modifier,
}

impl ParticipantRole {
    /// Map a relationship type label to a role. Unknown labels are ignored.
    #[must_use]
    pub fn from_edge_type(edge_type: &str) -> Option<Self> {
        match edge_type {
            "SUBSTRATE" | "TRANSLOCATE_FROM" => Some(Self::Substrate),
            "PRODUCT" | "TRANSLOCATE_TO" => Some(Self::Product),
            "INHIBITS" | "ACTIVATES" => Some(Self::Modifier),
            _ => None,
        }
    }

    /// Prefix of the edge attributes describing the participant.
    #[must_use]
    pub fn attribute_side(&self) -> &'static str {
        match self {
            Self::Substrate | Self::Modifier => "source",
            Self::Product => "target",
        }
    }

    /// The endpoint of the relationship that is the participant.
    #[must_use]
    pub fn endpoint<'a>(&self, relationship: &'a RawRelationship) -> &'a RawNode {
        match self {
            Self::Substrate | Self::Modifier => &relationship.start_node,
            Self::Product => &relationship.end_node,
        }
    }

    /// Lowercase role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substrate => "substrate",
            Self::Product => "product",
            Self::Modifier => "modifier",
        }
    }
}

// =============================================================================
// PARTICIPANTS
// =============================================================================

/// A resolved participant of a single reaction.
///
/// Created transiently during classification and discarded once the
/// reaction's edges are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionParticipant {
    /// Natural name (identity table key).
    pub name: String,
    /// Resolved identity.
    pub identity: Identity,
    /// Physical form annotation (e.g. "protein").
    pub form: String,
    /// Cellular compartment, if annotated.
    pub location: Option<String>,
}

/// Role-sets of one reaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedReaction {
    pub substrates: Vec<ReactionParticipant>,
    pub products: Vec<ReactionParticipant>,
    pub modifiers: Vec<ReactionParticipant>,
}

impl ClassifiedReaction {
    /// Get the participants holding a role.
    #[must_use]
    pub fn role_set(&self, role: ParticipantRole) -> &[ReactionParticipant] {
        match role {
            ParticipantRole::Substrate => &self.substrates,
            ParticipantRole::Product => &self.products,
            ParticipantRole::Modifier => &self.modifiers,
        }
    }

    fn role_set_mut(&mut self, role: ParticipantRole) -> &mut Vec<ReactionParticipant> {
        match role {
            ParticipantRole::Substrate => &mut self.substrates,
            ParticipantRole::Product => &mut self.products,
            ParticipantRole::Modifier => &mut self.modifiers,
        }
    }

    /// Check if every role-set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.substrates.is_empty() && self.products.is_empty() && self.modifiers.is_empty()
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classify the participants of a reaction pattern.
///
/// Unresolvable participants are reported on `diagnostics` and dropped; the
/// rest of the reaction is still classified. Modifiers whose form is
/// `"condition"` are excluded before resolution.
///
/// # Errors
/// Returns `PssError::MissingAttribute` / `PssError::InvalidAttribute` when a
/// relationship lacks its participant's name, or a resolved participant
/// lacks its form. The caller abandons the whole reaction in that case.
pub fn classify_participants(
    pattern: &RawReactionPattern,
    identities: &IdentityTable,
    diagnostics: &mut Diagnostics,
) -> Result<ClassifiedReaction, PssError> {
    let reaction_id = &pattern.reaction.reaction_id;
    let mut classified = ClassifiedReaction::default();

    for relationship in &pattern.relationships {
        let Some(role) = ParticipantRole::from_edge_type(&relationship.edge_type) else {
            continue;
        };

        let side = role.attribute_side();
        let name = role
            .endpoint(relationship)
            .name()
            .ok_or_else(|| PssError::MissingAttribute {
                record: format!("reaction {reaction_id} {} edge", relationship.edge_type),
                attribute: "name".to_string(),
            })?;

        let form_key = format!("{side}_form");
        let form = relationship.attribute_str(&form_key);
        let location = relationship
            .attribute_str(&format!("{side}_location"))
            .map(str::to_string);

        if role == ParticipantRole::Modifier && form == Some(CONDITION_FORM) {
            continue;
        }

        let identity = match identities.resolve(name) {
            Ok(identity) => identity.clone(),
            Err(_) => {
                diagnostics.report(&PssError::UnresolvedParticipant {
                    name: name.to_string(),
                    reaction_id: reaction_id.clone(),
                });
                continue;
            }
        };

        let Some(form) = form else {
            return Err(PssError::MissingAttribute {
                record: format!("reaction {reaction_id} {} '{name}'", role.as_str()),
                attribute: form_key,
            });
        };

        classified.role_set_mut(role).push(ReactionParticipant {
            name: name.to_string(),
            identity,
            form: form.to_string(),
            location,
        });
    }

    Ok(classified)
}

/// Reaction-scoped properties shared by every edge of the reaction.
///
/// - `reaction_identifier`: `skm:{reaction_id}`
/// - `url`: reaction lookup URL
/// - `references`: every `doi:` external link, when there is at least one
#[must_use]
pub fn reaction_properties(reaction: &RawReaction) -> PropertyMap {
    let id = &reaction.reaction_id;
    let mut props = PropertyMap::new();
    props.insert(
        "reaction_identifier".to_string(),
        PropertyValue::Str(format!("{SKM_PREFIX}:{id}")),
    );
    props.insert(
        "url".to_string(),
        PropertyValue::Str(format!("{REACTION_URL}{id}")),
    );

    if let Some(links) = &reaction.external_links {
        let refs = all_links(links, DOI_LINK);
        if !refs.is_empty() {
            props.insert("references".to_string(), PropertyValue::StrList(refs));
        }
    }

    props
}

// =============================================================================
// TESTS
// =============================================================================
