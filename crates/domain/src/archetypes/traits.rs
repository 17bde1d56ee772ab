//! The archetype template contract.
//!
//! Everything that differs between Mortal, Ghoul and Animal sheets sits behind
//! [`ArchetypeTemplate`]. Callers hold `&dyn ArchetypeTemplate` and pass the
//! record, the session's priorities and the mode on every call; templates keep
//! no state of their own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entities::{Archetype, ArchetypeKind, CharacterRecord, TraitDefaults};
use crate::error::DomainError;
use crate::priority::{PriorityAssignment, PrioritySpreads};
use crate::value_objects::{EconomyMode, PaidMode, TraitCategory, TraitChange};

/// Outcome of validating a proposed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict", content = "reason")]
pub enum Verdict {
    Accepted,
    /// A rules violation, worded for the player.
    Rejected(String),
}

impl Verdict {
    pub fn reject(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Price of a change in a paid economy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "cost", content = "value")]
pub enum Cost {
    /// Points to charge. Negative only for flaw bonuses.
    Points(i32),
    /// The change cannot be bought in this economy at all.
    Unpurchasable(String),
}

impl Cost {
    pub fn points(&self) -> Option<i32> {
        match self {
            Self::Points(points) => Some(*points),
            Self::Unpurchasable(_) => None,
        }
    }
}

/// Categories a template applies to a given record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet(BTreeSet<TraitCategory>);

impl FeatureSet {
    pub fn new(categories: impl IntoIterator<Item = TraitCategory>) -> Self {
        Self(categories.into_iter().collect())
    }

    pub fn with(mut self, category: TraitCategory) -> Self {
        self.0.insert(category);
        self
    }

    pub fn contains(&self, category: TraitCategory) -> bool {
        self.0.contains(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = TraitCategory> + '_ {
        self.0.iter().copied()
    }
}

/// Everything the validator needs about one proposed change.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub change: &'a TraitChange,
    pub current: i32,
    pub record: &'a CharacterRecord,
    pub priorities: &'a PriorityAssignment,
    pub mode: EconomyMode,
}

/// Rules for one archetype.
pub trait ArchetypeTemplate: Send + Sync {
    /// Registry key.
    fn kind(&self) -> ArchetypeKind;

    /// Human-readable name (e.g., "Ghoul").
    fn display_name(&self) -> &str;

    /// Categories that apply to this record.
    fn features(&self, record: &CharacterRecord) -> FeatureSet;

    /// Starting values for a fresh record.
    fn defaults(&self) -> TraitDefaults;

    /// Archetype-specific starting traits applied after defaults.
    fn seed(&self, _record: &mut CharacterRecord) {}

    /// Creation budget values per category.
    fn priority_spreads(&self) -> PrioritySpreads;

    /// Dots above 1 the virtue triad may hold at creation. `None` when the
    /// record has no virtues.
    fn virtue_limit(&self, record: &CharacterRecord) -> Option<i32>;

    /// Decide whether a change is allowed.
    ///
    /// Rule violations come back as [`Verdict::Rejected`]. A category the
    /// template does not apply, or a key outside the catalog, is an `Err`.
    fn validate(&self, input: &ValidationInput<'_>) -> Result<Verdict, DomainError>;

    /// Price a change from `current` to `target` in a paid economy. Pure.
    fn cost(
        &self,
        mode: PaidMode,
        category: TraitCategory,
        key: &str,
        current: i32,
        target: i32,
        record: &CharacterRecord,
    ) -> Result<Cost, DomainError>;

    /// Build a new record for this archetype: defaults, then seed values.
    fn new_record(
        &self,
        name: &str,
        archetype: Archetype,
    ) -> Result<CharacterRecord, DomainError> {
        if archetype.kind() != self.kind() {
            return Err(DomainError::invalid_configuration(format!(
                "{} template cannot create a {} record",
                self.kind(),
                archetype.kind()
            )));
        }
        let mut record = CharacterRecord::new(name, archetype, &self.defaults());
        self.seed(&mut record);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_accessors() {
        assert!(Verdict::Accepted.is_accepted());
        let rejected = Verdict::reject("too many dots");
        assert!(!rejected.is_accepted());
        assert_eq!(rejected.reason(), Some("too many dots"));
    }

    #[test]
    fn cost_points_projection() {
        assert_eq!(Cost::Points(12).points(), Some(12));
        assert_eq!(Cost::Unpurchasable("one dot at a time".into()).points(), None);
    }

    #[test]
    fn feature_set_membership() {
        let features = FeatureSet::new([TraitCategory::Attributes]).with(TraitCategory::Disciplines);
        assert!(features.contains(TraitCategory::Disciplines));
        assert!(!features.contains(TraitCategory::Virtues));
        assert_eq!(features.iter().count(), 2);
    }
}
