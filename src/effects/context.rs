//! Effect context: the optional inputs an effect may need.
//!
//! The context is a plain struct of optionals built directly by the caller.
//! Each card kind declares which fields it needs; [`EffectContext::validate`]
//! checks the manifest before any effect runs.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{IllegalMove, PlayerId, Resource};

/// Units named in an exchange (at most three per side).
pub type Units = SmallVec<[Resource; 3]>;

/// An optional field of [`EffectContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextField {
    Group,
    Resource,
    Card,
    Sources,
    Destinations,
}

/// Inputs for one special-card effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectContext {
    /// The player using the card.
    pub player: PlayerId,

    pub resource: Option<Resource>,

    /// Island position.
    pub group: Option<usize>,

    /// Position of the card among the cards in play. Filled by the resolver.
    pub card: Option<usize>,

    /// Units leaving the first container of an exchange.
    pub sources: Option<Units>,

    /// Units leaving the second container of an exchange.
    pub destinations: Option<Units>,
}

impl EffectContext {
    /// A context with every optional field unset.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            resource: None,
            group: None,
            card: None,
            sources: None,
            destinations: None,
        }
    }

    /// Whether a field is present.
    #[must_use]
    pub fn has(&self, field: ContextField) -> bool {
        match field {
            ContextField::Group => self.group.is_some(),
            ContextField::Resource => self.resource.is_some(),
            ContextField::Card => self.card.is_some(),
            ContextField::Sources => self.sources.is_some(),
            ContextField::Destinations => self.destinations.is_some(),
        }
    }

    /// Fail on the first required field that is missing.
    pub fn validate(&self, required: &[ContextField]) -> Result<(), IllegalMove> {
        match required.iter().find(|&&f| !self.has(f)) {
            Some(&missing) => Err(IllegalMove::MissingField(missing)),
            None => Ok(()),
        }
    }

    pub fn resource(&self) -> Result<Resource, IllegalMove> {
        self.resource.ok_or(IllegalMove::MissingField(ContextField::Resource))
    }

    pub fn group(&self) -> Result<usize, IllegalMove> {
        self.group.ok_or(IllegalMove::MissingField(ContextField::Group))
    }

    pub fn card(&self) -> Result<usize, IllegalMove> {
        self.card.ok_or(IllegalMove::MissingField(ContextField::Card))
    }

    pub fn sources(&self) -> Result<&[Resource], IllegalMove> {
        self.sources
            .as_deref()
            .ok_or(IllegalMove::MissingField(ContextField::Sources))
    }

    pub fn destinations(&self) -> Result<&[Resource], IllegalMove> {
        self.destinations
            .as_deref()
            .ok_or(IllegalMove::MissingField(ContextField::Destinations))
    }
}
